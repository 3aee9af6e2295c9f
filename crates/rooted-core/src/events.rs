use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::breathing::SessionState;

/// Every breathing-session state change produces an Event.
/// The renderer consumes them from the driver's channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SessionStarted {
        technique: String,
        target_cycles: u32,
        phase_label: String,
        phase_secs: u32,
        at: DateTime<Utc>,
    },
    PhaseAdvanced {
        phase: usize,
        phase_label: String,
        phase_secs: u32,
        completed_cycles: u32,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        technique: String,
        completed_cycles: u32,
        at: DateTime<Utc>,
    },
    SessionStopped {
        completed_cycles: u32,
        target_cycles: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: SessionState,
        technique: Option<String>,
        phase: usize,
        phase_label: String,
        remaining_secs: u32,
        phase_secs: u32,
        completed_cycles: u32,
        target_cycles: u32,
        circle_scale: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Whether this event ends the session's ticking.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Event::SessionCompleted { .. } | Event::SessionStopped { .. }
        )
    }
}
