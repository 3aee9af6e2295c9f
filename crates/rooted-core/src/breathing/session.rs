//! Breathing session state machine.
//!
//! The session does not own a clock. The caller (normally
//! [`super::BreathingDriver`]) invokes `tick()` once per second.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Configuring -> Running -> Completed
//!              ^            |           |
//!              +-- stop ----+           |
//!              +------- start again ----+
//! ```
//!
//! Invariants held after every call:
//! - `completed_cycles <= target_cycles` while a target is set
//! - `phase < 4`
//! - `remaining_secs <= pattern[phase]`

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::technique::{Technique, ZeroPhasePolicy, PHASES};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No technique chosen.
    Idle,
    /// Technique chosen, not ticking.
    Configuring,
    Running,
    /// Target cycle count reached.
    Completed,
}

#[derive(Debug, Clone)]
pub struct BreathingSession {
    technique: Option<&'static Technique>,
    target_cycles: u32,
    phase: usize,
    remaining_secs: u32,
    completed_cycles: u32,
    running: bool,
    zero_phase: ZeroPhasePolicy,
}

impl Default for BreathingSession {
    fn default() -> Self {
        Self::new(ZeroPhasePolicy::default())
    }
}

impl BreathingSession {
    pub fn new(zero_phase: ZeroPhasePolicy) -> Self {
        Self {
            technique: None,
            target_cycles: 0,
            phase: 0,
            remaining_secs: 0,
            completed_cycles: 0,
            running: false,
            zero_phase,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        if self.technique.is_none() {
            SessionState::Idle
        } else if self.running {
            SessionState::Running
        } else if self.target_cycles > 0 && self.completed_cycles >= self.target_cycles {
            SessionState::Completed
        } else {
            SessionState::Configuring
        }
    }

    pub fn technique(&self) -> Option<&'static Technique> {
        self.technique
    }

    pub fn target_cycles(&self) -> u32 {
        self.target_cycles
    }

    pub fn phase(&self) -> usize {
        self.phase
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Length of the current phase in seconds.
    pub fn phase_secs(&self) -> u32 {
        self.technique.map(|t| t.phase_secs(self.phase)).unwrap_or(0)
    }

    /// Label for the current phase; unused phases read as "Rest".
    pub fn phase_label(&self) -> &'static str {
        let Some(technique) = self.technique else {
            return "";
        };
        match technique.labels[self.phase] {
            "" => "Rest",
            label => label,
        }
    }

    /// Relative size of the breathing circle: grows 1.0 -> 1.5 on the
    /// inhale, shrinks back on the exhale, holds in between.
    pub fn circle_scale(&self) -> f64 {
        if self.technique.is_none() {
            return 1.0;
        }
        let total = self.phase_secs();
        let progress = if total == 0 {
            0.0
        } else {
            (total - self.remaining_secs.min(total)) as f64 / total as f64
        };
        match self.phase {
            0 if total == 0 => 1.0,
            0 => 1.0 + progress * 0.5,
            1 => 1.5,
            2 if total == 0 => 1.0,
            2 => 1.5 - progress * 0.5,
            _ => 1.0,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state(),
            technique: self.technique.map(|t| t.id.to_string()),
            phase: self.phase,
            phase_label: self.phase_label().to_string(),
            remaining_secs: self.remaining_secs,
            phase_secs: self.phase_secs(),
            completed_cycles: self.completed_cycles,
            target_cycles: self.target_cycles,
            circle_scale: self.circle_scale(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Choose a technique. Any running session is abandoned and counters
    /// are cleared.
    pub fn select(&mut self, technique: &'static Technique) {
        self.technique = Some(technique);
        self.running = false;
        self.target_cycles = 0;
        self.completed_cycles = 0;
        self.phase = 0;
        self.remaining_secs = technique.pattern[0];
    }

    /// Begin (or restart) ticking toward `target_cycles`.
    ///
    /// No-op without a technique or with a zero target.
    pub fn start(&mut self, target_cycles: u32) -> Option<Event> {
        let technique = self.technique?;
        if target_cycles == 0 {
            return None;
        }
        self.target_cycles = target_cycles;
        self.completed_cycles = 0;
        self.phase = 0;
        self.remaining_secs = technique.pattern[0];
        self.running = true;
        tracing::info!(technique = technique.id, target_cycles, "breathing session started");
        Some(Event::SessionStarted {
            technique: technique.id.to_string(),
            target_cycles,
            phase_label: self.phase_label().to_string(),
            phase_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Halt ticking. Counters stay inspectable; the session cannot be
    /// resumed mid-phase. No-op when not running.
    pub fn stop(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        tracing::info!(
            completed = self.completed_cycles,
            target = self.target_cycles,
            "breathing session stopped"
        );
        Some(Event::SessionStopped {
            completed_cycles: self.completed_cycles,
            target_cycles: self.target_cycles,
            at: Utc::now(),
        })
    }

    /// Advance one second.
    ///
    /// Returns `PhaseAdvanced` when a phase boundary is crossed and
    /// `SessionCompleted` when the final cycle ends. Phase and remaining
    /// seconds are left as they are on completion.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        let technique = self.technique?;

        if self.remaining_secs > 1 {
            self.remaining_secs -= 1;
            return None;
        }

        // Bounded so a pattern of all zeros cannot spin.
        for _ in 0..PHASES {
            self.phase = (self.phase + 1) % PHASES;
            if self.phase == 0 {
                self.completed_cycles += 1;
                if self.completed_cycles >= self.target_cycles {
                    self.running = false;
                    tracing::info!(
                        technique = technique.id,
                        cycles = self.completed_cycles,
                        "breathing session completed"
                    );
                    return Some(Event::SessionCompleted {
                        technique: technique.id.to_string(),
                        completed_cycles: self.completed_cycles,
                        at: Utc::now(),
                    });
                }
            }

            let secs = technique.pattern[self.phase];
            if secs == 0 && self.zero_phase == ZeroPhasePolicy::Skip {
                continue;
            }
            self.remaining_secs = secs;
            break;
        }

        tracing::debug!(
            phase = self.phase,
            remaining = self.remaining_secs,
            completed = self.completed_cycles,
            "phase advanced"
        );
        Some(Event::PhaseAdvanced {
            phase: self.phase,
            phase_label: self.phase_label().to_string(),
            phase_secs: self.remaining_secs,
            completed_cycles: self.completed_cycles,
            at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breathing::technique::find_technique;

    fn session(id: &str, policy: ZeroPhasePolicy) -> BreathingSession {
        let mut s = BreathingSession::new(policy);
        s.select(find_technique(id).unwrap());
        s
    }

    fn assert_invariants(s: &BreathingSession) {
        assert!(s.phase() < PHASES);
        assert!(s.remaining_secs() <= s.phase_secs());
        assert!(s.completed_cycles() <= s.target_cycles());
    }

    #[test]
    fn states_progress() {
        let mut s = BreathingSession::default();
        assert_eq!(s.state(), SessionState::Idle);
        s.select(find_technique("box").unwrap());
        assert_eq!(s.state(), SessionState::Configuring);
        s.start(1);
        assert_eq!(s.state(), SessionState::Running);
    }

    #[test]
    fn start_without_technique_is_noop() {
        let mut s = BreathingSession::default();
        assert!(s.start(5).is_none());
        assert!(!s.is_running());
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn start_with_zero_target_is_noop() {
        let mut s = session("box", ZeroPhasePolicy::Skip);
        assert!(s.start(0).is_none());
        assert!(!s.is_running());
    }

    #[test]
    fn start_resets_counters() {
        let mut s = session("box", ZeroPhasePolicy::Skip);
        s.start(3);
        for _ in 0..20 {
            s.tick();
        }
        assert_eq!(s.completed_cycles(), 1);
        s.start(2);
        assert_eq!(s.completed_cycles(), 0);
        assert_eq!(s.phase(), 0);
        assert_eq!(s.remaining_secs(), 4);
        assert_eq!(s.target_cycles(), 2);
    }

    #[test]
    fn box_one_cycle_takes_sixteen_ticks() {
        let mut s = session("box", ZeroPhasePolicy::Skip);
        s.start(1);
        let mut phases_seen = vec![s.phase()];

        for n in 1..=16 {
            let event = s.tick();
            assert_invariants(&s);
            if n < 16 {
                assert!(s.is_running(), "tick {n}");
                if let Some(Event::PhaseAdvanced { phase, phase_secs, .. }) = event {
                    assert_eq!(n % 4, 0);
                    assert_eq!(phase_secs, 4);
                    phases_seen.push(phase);
                }
            } else {
                assert!(matches!(event, Some(Event::SessionCompleted { completed_cycles: 1, .. })));
            }
        }

        assert_eq!(phases_seen, vec![0, 1, 2, 3]);
        assert_eq!(s.completed_cycles(), 1);
        assert!(!s.is_running());
        assert_eq!(s.state(), SessionState::Completed);

        // nothing further happens
        assert!(s.tick().is_none());
        assert_eq!(s.completed_cycles(), 1);
    }

    #[test]
    fn decrement_emits_nothing() {
        let mut s = session("box", ZeroPhasePolicy::Skip);
        s.start(1);
        assert!(s.tick().is_none());
        assert_eq!(s.remaining_secs(), 3);
        assert_eq!(s.phase(), 0);
    }

    #[test]
    fn completion_leaves_phase_and_seconds() {
        let mut s = session("energy", ZeroPhasePolicy::Skip);
        s.start(1);
        while s.is_running() {
            s.tick();
        }
        assert_eq!(s.phase(), 0);
        assert_eq!(s.remaining_secs(), 1);
        assert_invariants(&s);
    }

    #[test]
    fn skip_policy_passes_through_zero_phases() {
        let mut s = session("calming", ZeroPhasePolicy::Skip);
        s.start(1);
        let mut ticks = 0;
        while s.is_running() {
            s.tick();
            ticks += 1;
            assert_ne!(s.phase_secs(), 0, "landed on a zero phase");
            assert_invariants(&s);
        }
        assert_eq!(ticks, 12);
        assert_eq!(s.completed_cycles(), 1);
    }

    #[test]
    fn hold_policy_waits_on_zero_phases() {
        let mut s = session("calming", ZeroPhasePolicy::Hold);
        s.start(1);
        for _ in 0..4 {
            s.tick();
        }
        assert_eq!(s.phase(), 1);
        assert_eq!(s.remaining_secs(), 0);
        assert_eq!(s.phase_label(), "Rest");
        s.tick();
        assert_eq!(s.phase(), 2);
        assert_eq!(s.remaining_secs(), 8);

        let mut ticks = 5;
        while s.is_running() {
            s.tick();
            ticks += 1;
            assert_invariants(&s);
        }
        assert_eq!(ticks, 14);
    }

    #[test]
    fn multiple_cycles_count() {
        let mut s = session("energy", ZeroPhasePolicy::Skip);
        s.start(3);
        let mut ticks = 0;
        while s.is_running() {
            s.tick();
            ticks += 1;
        }
        assert_eq!(ticks, 12);
        assert_eq!(s.completed_cycles(), 3);
    }

    #[test]
    fn stop_when_idle_is_noop() {
        let mut s = BreathingSession::default();
        assert!(s.stop().is_none());
        let mut s = session("box", ZeroPhasePolicy::Skip);
        assert!(s.stop().is_none());
    }

    #[test]
    fn stop_keeps_counters() {
        let mut s = session("box", ZeroPhasePolicy::Skip);
        s.start(5);
        for _ in 0..18 {
            s.tick();
        }
        let event = s.stop();
        assert!(matches!(event, Some(Event::SessionStopped { completed_cycles: 1, target_cycles: 5, .. })));
        assert_eq!(s.state(), SessionState::Configuring);
        assert_eq!(s.completed_cycles(), 1);
        assert_eq!(s.phase(), 0);
        assert_eq!(s.remaining_secs(), 2);
        assert!(s.tick().is_none());
        assert_eq!(s.remaining_secs(), 2);
        assert!(s.stop().is_none());
    }

    #[test]
    fn circle_scale_follows_breath() {
        let mut s = session("box", ZeroPhasePolicy::Skip);
        s.start(1);
        assert_eq!(s.circle_scale(), 1.0);
        s.tick();
        s.tick();
        assert_eq!(s.circle_scale(), 1.25);
        s.tick();
        s.tick(); // hold
        assert_eq!(s.circle_scale(), 1.5);
        for _ in 0..4 {
            s.tick();
        }
        assert_eq!(s.phase(), 2);
        assert_eq!(s.circle_scale(), 1.5);
        for _ in 0..4 {
            s.tick();
        }
        assert_eq!(s.phase(), 3);
        assert_eq!(s.circle_scale(), 1.0);
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut s = session("box", ZeroPhasePolicy::Skip);
        s.start(2);
        s.tick();
        match s.snapshot() {
            Event::StateSnapshot {
                state,
                technique,
                remaining_secs,
                phase_label,
                target_cycles,
                ..
            } => {
                assert_eq!(state, SessionState::Running);
                assert_eq!(technique.as_deref(), Some("box"));
                assert_eq!(remaining_secs, 3);
                assert_eq!(phase_label, "Inhale");
                assert_eq!(target_cycles, 2);
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }
}
