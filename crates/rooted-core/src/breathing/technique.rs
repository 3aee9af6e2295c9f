use serde::{Deserialize, Serialize};

/// Number of phases in every breathing pattern.
pub const PHASES: usize = 4;

/// A guided breathing pattern.
///
/// `pattern[i]` is the length of phase `i` in seconds; `0` marks a phase the
/// technique does not use. `labels` are aligned with `pattern` and may be
/// empty for unused phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Technique {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Nominal session length shown to the user, in minutes.
    pub duration_min: u32,
    pub pattern: [u32; PHASES],
    pub labels: [&'static str; PHASES],
    pub benefits: &'static [&'static str],
    pub icon: &'static str,
}

impl Technique {
    pub fn phase_secs(&self, phase: usize) -> u32 {
        self.pattern.get(phase).copied().unwrap_or(0)
    }

    /// Seconds per cycle, counting zero phases as instantaneous.
    pub fn cycle_secs(&self) -> u32 {
        self.pattern.iter().sum()
    }
}

pub const TECHNIQUES: [Technique; 3] = [
    Technique {
        id: "box",
        name: "Box Breathing",
        description: "Equal counts for inhale, hold, exhale, hold",
        duration_min: 4,
        pattern: [4, 4, 4, 4],
        labels: ["Inhale", "Hold", "Exhale", "Hold"],
        benefits: &["Reduces stress", "Improves focus", "Calms nervous system"],
        icon: "📦",
    },
    Technique {
        id: "calming",
        name: "Calming Breath",
        description: "Longer exhale for relaxation",
        duration_min: 3,
        pattern: [4, 0, 8, 0],
        labels: ["Inhale", "", "Exhale", ""],
        benefits: &["Deep relaxation", "Anxiety relief", "Better sleep"],
        icon: "🌙",
    },
    Technique {
        id: "energy",
        name: "Energizing Breath",
        description: "Quick energizing technique",
        duration_min: 2,
        pattern: [2, 0, 2, 0],
        labels: ["Inhale", "", "Exhale", ""],
        benefits: &["Increases alertness", "Boosts energy", "Mental clarity"],
        icon: "⚡",
    },
];

pub fn find_technique(id: &str) -> Option<&'static Technique> {
    TECHNIQUES.iter().find(|t| t.id == id)
}

/// Lookup by display name, as stored in the session log.
pub fn find_technique_by_name(name: &str) -> Option<&'static Technique> {
    TECHNIQUES.iter().find(|t| t.name == name)
}

/// How the timer treats a phase of length 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroPhasePolicy {
    /// Pass through the phase within the same tick.
    #[default]
    Skip,
    /// Sit on the phase for one tick showing 0 before moving on.
    Hold,
}
