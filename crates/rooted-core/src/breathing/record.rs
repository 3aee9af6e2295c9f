use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::session::BreathingSession;
use super::technique::{find_technique_by_name, Technique};

/// One entry of the persisted breathwork log.
///
/// Field names and shape match the stored `breathworkSessions` array:
/// `{ technique, duration, cycles, completedAt }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Technique display name.
    pub technique: String,
    /// Nominal technique length in minutes.
    pub duration: u32,
    /// Cycles actually completed.
    pub cycles: u32,
    pub completed_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Summarize a session. `None` when no technique was ever selected.
    pub fn from_session(session: &BreathingSession, completed_at: DateTime<Utc>) -> Option<Self> {
        let technique = session.technique()?;
        Some(Self {
            technique: technique.name.to_string(),
            duration: technique.duration_min,
            cycles: session.completed_cycles(),
            completed_at,
        })
    }

    /// Resolve the logged name back to the catalog entry.
    pub fn technique(&self) -> Option<&'static Technique> {
        find_technique_by_name(&self.technique)
    }
}
