//! The user profile record stored under `rootedUser`.
//!
//! The browser version grew this blob additively, one page at a time, so
//! every known field is optional and anything unrecognized is carried
//! through untouched in `extra`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::assessment::AssessmentResults;
use crate::onboarding::{AvatarConfig, MentorRecord};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Write counter, bumped by the profile store on every save.
    #[serde(default)]
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registered_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<AvatarConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentor: Option<MentorRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onboarding_step: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment_results: Option<AssessmentResults>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Both onboarding pages done.
    pub fn is_onboarded(&self) -> bool {
        self.avatar.is_some() && self.mentor.is_some()
    }

    /// Name to greet the user with: avatar name first, then account name.
    pub fn display_name(&self) -> Option<&str> {
        self.avatar
            .as_ref()
            .map(|a| a.name.as_str())
            .filter(|n| !n.trim().is_empty())
            .or(self.name.as_deref().filter(|n| !n.trim().is_empty()))
    }

    /// Shallow-merge the top-level keys of `patch` over this profile.
    ///
    /// Keys absent from `patch` are kept. `version` is owned by the store
    /// and never taken from the patch.
    pub fn merge(&mut self, patch: Value) -> Result<(), serde_json::Error> {
        let Value::Object(patch) = patch else {
            return Err(serde::de::Error::custom("profile patch must be a JSON object"));
        };
        let version = self.version;
        let mut current = match serde_json::to_value(&*self)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in patch {
            if key != "version" {
                current.insert(key, value);
            }
        }
        *self = serde_json::from_value(Value::Object(current))?;
        self.version = version;
        Ok(())
    }
}
