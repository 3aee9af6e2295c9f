use chrono::Utc;
use clap::Subcommand;
use rooted_core::onboarding::{
    apply_avatar, apply_mentor, find_mentor, log_in, sign_up, sso_profile, workplace_profile,
    AvatarConfig, LoginForm, NextStep, SignupForm, MENTORS, SKIN_TONES,
};
use rooted_core::ProfileStore;

use super::{open_store, print_json, CliResult};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Print the stored profile as JSON
    Show,
    /// Create a new account (replaces any stored profile)
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Log in with email and password, or through a simulated provider
    Login {
        #[arg(long, required_unless_present_any = ["provider", "workplace"])]
        email: Option<String>,
        #[arg(long, required_unless_present_any = ["provider", "workplace"])]
        password: Option<String>,
        /// Simulated single sign-on provider (e.g. google)
        #[arg(long, conflicts_with = "workplace")]
        provider: Option<String>,
        /// Simulated workplace sign-on
        #[arg(long)]
        workplace: bool,
    },
    /// Configure the avatar
    Avatar {
        #[arg(long)]
        name: String,
        /// Tone name (e.g. "Medium Dark") or hex value
        #[arg(long)]
        skin_tone: Option<String>,
        #[arg(long)]
        hair: Option<String>,
        #[arg(long)]
        outfit: Option<String>,
        #[arg(long)]
        accessory: Option<String>,
    },
    /// List mentors
    Mentors,
    /// Choose a mentor by id
    Mentor { id: String },
    /// Delete the stored profile
    Clear,
}

fn skin_tone_value(input: &str) -> String {
    SKIN_TONES
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(input))
        .map_or_else(|| input.to_string(), |t| t.value.to_string())
}

pub fn run(action: ProfileAction) -> CliResult {
    let store = open_store()?;
    let profiles = ProfileStore::new(&store);
    let now = Utc::now();

    match action {
        ProfileAction::Show => match profiles.load()? {
            Some(profile) => print_json(&profile)?,
            None => println!("no profile"),
        },
        ProfileAction::Signup {
            name,
            email,
            password,
            confirm_password,
        } => {
            let form = SignupForm {
                name,
                email,
                password,
                confirm_password,
            };
            let mut profile = sign_up(&form, now)?;
            profiles.replace(&mut profile)?;
            println!("account created; next: profile avatar");
        }
        ProfileAction::Login {
            email,
            password,
            provider,
            workplace,
        } => {
            let (mut profile, next) = if workplace {
                (workplace_profile(now), NextStep::AvatarSetup)
            } else if let Some(provider) = provider {
                (sso_profile(&provider, now), NextStep::AvatarSetup)
            } else {
                let form = LoginForm {
                    email: email.unwrap_or_default(),
                    password: password.unwrap_or_default(),
                };
                log_in(&form, profiles.load()?, now)?
            };
            if profile.version == 0 {
                profiles.replace(&mut profile)?;
            }
            let name = profile.display_name().unwrap_or("there").to_string();
            match next {
                NextStep::Dashboard => println!("welcome back, {name}; next: dashboard"),
                NextStep::AvatarSetup => println!("logged in as {name}; next: profile avatar"),
            }
        }
        ProfileAction::Avatar {
            name,
            skin_tone,
            hair,
            outfit,
            accessory,
        } => {
            let defaults = AvatarConfig::default();
            let avatar = AvatarConfig {
                name,
                skin_tone: skin_tone.map_or(defaults.skin_tone, |s| skin_tone_value(&s)),
                hair_style: hair.unwrap_or(defaults.hair_style),
                outfit_style: outfit.unwrap_or(defaults.outfit_style),
                accessory: accessory.unwrap_or(defaults.accessory),
            };
            profiles.update(|p| apply_avatar(p, avatar))?;
            println!("avatar saved; next: profile mentor");
        }
        ProfileAction::Mentors => {
            for m in &MENTORS {
                println!("{:<10} {} {:<24} {}", m.id, m.emoji, m.name, m.personality);
            }
        }
        ProfileAction::Mentor { id } => {
            profiles.update(|p| apply_mentor(p, &id))?;
            if let Some(mentor) = find_mentor(&id) {
                let greeting = mentor.random_greeting(&mut rand::thread_rng());
                println!("{} {}: {greeting}", mentor.emoji, mentor.name);
            }
        }
        ProfileAction::Clear => {
            profiles.clear()?;
            println!("profile cleared");
        }
    }
    Ok(())
}
