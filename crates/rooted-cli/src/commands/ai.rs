use clap::Subcommand;
use rooted_core::{AiClient, ProfileStore};

use super::{load_config, open_store, runtime, CliResult};

#[derive(Subcommand)]
pub enum AiAction {
    /// Personalized recommendations for today
    Recommend {
        #[arg(long)]
        mood: Option<String>,
    },
    /// Reflect on a journal entry
    Journal { text: String },
    /// Generate a guided meditation script
    Meditation {
        #[arg(long, default_value = "mindfulness")]
        kind: String,
        #[arg(long, default_value_t = 5)]
        minutes: u32,
        /// Focus area, repeatable
        #[arg(long = "need")]
        needs: Vec<String>,
    },
    /// A message from your mentor
    Mentor {
        #[arg(long)]
        context: Option<String>,
    },
    /// Generate an image from a prompt
    Image { prompt: String },
}

pub fn run(action: AiAction) -> CliResult {
    let config = load_config()?;
    let client = AiClient::from_config(&config.ai)?;
    let store = open_store()?;
    let profile = ProfileStore::new(&store).load()?.unwrap_or_default();
    let rt = runtime()?;

    let reply = match action {
        AiAction::Recommend { mood } => {
            rt.block_on(client.recommendations(&profile, mood.as_deref()))?
        }
        AiAction::Journal { text } => rt.block_on(client.journal_reflection(&text, &profile))?,
        AiAction::Meditation {
            kind,
            minutes,
            needs,
        } => {
            let needs = if needs.is_empty() {
                vec!["stress relief".to_string()]
            } else {
                needs
            };
            rt.block_on(client.meditation_script(&kind, minutes, &needs))?
        }
        AiAction::Mentor { context } => {
            let mentor = profile
                .mentor
                .clone()
                .ok_or("no mentor chosen; run: rooted-cli profile mentor <id>")?;
            let state = serde_json::json!({
                "name": profile.display_name(),
                "assessmentResults": profile.assessment_results,
            });
            rt.block_on(client.mentor_dialogue(&mentor, &state, context.as_deref()))?
        }
        AiAction::Image { prompt } => rt.block_on(client.generate_image(&prompt))?,
    };
    println!("{reply}");
    Ok(())
}
