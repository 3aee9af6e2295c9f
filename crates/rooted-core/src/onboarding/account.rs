//! Simulated sign-up and log-in.
//!
//! There is no backend: a successful form simply produces the profile the
//! app should store. Validation is the only real logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::profile::UserProfile;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::MissingField("password"));
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        Ok(())
    }
}

/// Validate the form and build a fresh profile. The previous profile, if
/// any, is replaced rather than merged.
pub fn sign_up(form: &SignupForm, now: DateTime<Utc>) -> Result<UserProfile, ValidationError> {
    form.validate()?;
    tracing::info!(email = %form.email.trim(), "account created");
    Ok(UserProfile {
        email: Some(form.email.trim().to_string()),
        name: Some(form.name.trim().to_string()),
        registered_at: Some(now),
        ..Default::default()
    })
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::MissingField("password"));
        }
        Ok(())
    }
}

/// Where the user lands after authenticating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStep {
    Dashboard,
    AvatarSetup,
}

/// Log in against whatever profile is stored locally.
///
/// A fully onboarded profile goes to the dashboard, a partial one back to
/// avatar setup, and with no profile a new one is created from the email.
pub fn log_in(
    form: &LoginForm,
    existing: Option<UserProfile>,
    now: DateTime<Utc>,
) -> Result<(UserProfile, NextStep), ValidationError> {
    form.validate()?;
    match existing {
        Some(profile) if profile.is_onboarded() => Ok((profile, NextStep::Dashboard)),
        Some(profile) => Ok((profile, NextStep::AvatarSetup)),
        None => {
            let email = form.email.trim();
            let name = email.split('@').next().unwrap_or(email);
            Ok((
                UserProfile {
                    email: Some(email.to_string()),
                    name: Some(name.to_string()),
                    registered_at: Some(now),
                    ..Default::default()
                },
                NextStep::AvatarSetup,
            ))
        }
    }
}

/// Profile produced by a simulated third-party sign-in.
pub fn sso_profile(provider: &str, now: DateTime<Utc>) -> UserProfile {
    UserProfile {
        email: Some(format!("user@{provider}.com")),
        name: Some(format!("{provider} User")),
        registered_at: Some(now),
        provider: Some(provider.to_string()),
        ..Default::default()
    }
}

/// Profile produced by the simulated workplace sign-in.
pub fn workplace_profile(now: DateTime<Utc>) -> UserProfile {
    UserProfile {
        email: Some("employee@company.com".to_string()),
        name: Some("Employee User".to_string()),
        registered_at: Some(now),
        provider: Some("workplace".to_string()),
        organization_id: Some("demo-org-123".to_string()),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::{find_mentor, AvatarConfig};

    fn form(password: &str, confirm: &str) -> SignupForm {
        SignupForm {
            name: "Asha".into(),
            email: "asha@example.com".into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn signup_checks_in_order() {
        let mut f = form("secret1", "secret1");
        f.name = " ".into();
        assert_eq!(f.validate(), Err(ValidationError::MissingField("name")));
        assert_eq!(form("abc", "abd").validate(), Err(ValidationError::PasswordMismatch));
        assert_eq!(
            form("abc", "abc").validate(),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
        assert!(form("abcdef", "abcdef").validate().is_ok());
    }

    #[test]
    fn signup_builds_profile() {
        let now = Utc::now();
        let profile = sign_up(&form("abcdef", "abcdef"), now).unwrap();
        assert_eq!(profile.email.as_deref(), Some("asha@example.com"));
        assert_eq!(profile.registered_at, Some(now));
        assert!(!profile.is_onboarded());
    }

    #[test]
    fn login_requires_both_fields() {
        let f = LoginForm {
            email: "a@b.com".into(),
            password: String::new(),
        };
        assert_eq!(
            log_in(&f, None, Utc::now()).unwrap_err(),
            ValidationError::MissingField("password")
        );
    }

    #[test]
    fn login_routes_by_onboarding() {
        let f = LoginForm {
            email: "ravi.k@corp.in".into(),
            password: "pw".into(),
        };
        let (fresh, step) = log_in(&f, None, Utc::now()).unwrap();
        assert_eq!(step, NextStep::AvatarSetup);
        assert_eq!(fresh.name.as_deref(), Some("ravi.k"));

        let (_, step) = log_in(&f, Some(fresh.clone()), Utc::now()).unwrap();
        assert_eq!(step, NextStep::AvatarSetup);

        let mut done = fresh;
        done.avatar = Some(AvatarConfig {
            name: "Ravi".into(),
            ..Default::default()
        });
        done.mentor = Some(find_mentor("dog").unwrap().to_record());
        let (_, step) = log_in(&f, Some(done), Utc::now()).unwrap();
        assert_eq!(step, NextStep::Dashboard);
    }

    #[test]
    fn simulated_providers() {
        let now = Utc::now();
        let g = sso_profile("google", now);
        assert_eq!(g.email.as_deref(), Some("user@google.com"));
        assert_eq!(g.name.as_deref(), Some("google User"));
        let w = workplace_profile(now);
        assert_eq!(w.organization_id.as_deref(), Some("demo-org-123"));
        assert_eq!(w.provider.as_deref(), Some("workplace"));
    }
}
