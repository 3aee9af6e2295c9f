//! Home screen summaries: greeting, mentor nudge, burnout headline and
//! breathwork totals.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::assessment::AssessmentResults;
use crate::breathing::SessionRecord;
use crate::profile::UserProfile;

pub const MENTOR_MESSAGES: [&str; 5] = [
    "Ready to nurture your well-being today?",
    "What would help you feel more balanced right now?",
    "Remember, small steps lead to big changes!",
    "I'm here to support your wellness journey.",
    "How can we make today a little brighter?",
];

/// Time-of-day greeting. `hour` is the local hour, 0..=23.
pub fn welcome_message(name: Option<&str>, hour: u32) -> String {
    let name = name.filter(|n| !n.trim().is_empty()).unwrap_or("Friend");
    if hour < 12 {
        format!("Good morning, {name}! 🌅")
    } else if hour < 17 {
        format!("Good afternoon, {name}! ☀️")
    } else {
        format!("Good evening, {name}! 🌙")
    }
}

/// A random nudge from the mentor, if one has been chosen.
pub fn mentor_message<R: Rng + ?Sized>(profile: &UserProfile, rng: &mut R) -> Option<&'static str> {
    profile.mentor.as_ref()?;
    MENTOR_MESSAGES.choose(rng).copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SummaryLevel {
    Good,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BurnoutSummary {
    pub level: SummaryLevel,
    /// Rounded mean of the three sub-scales.
    pub average: u8,
    pub message: &'static str,
}

pub fn burnout_summary(results: &AssessmentResults) -> BurnoutSummary {
    let average = results.burnout.average().round() as u8;
    let (level, message) = if average < 30 {
        (SummaryLevel::Good, "You're managing well!")
    } else if average < 60 {
        (SummaryLevel::Moderate, "Some areas need attention")
    } else {
        (SummaryLevel::High, "Let's focus on recovery")
    };
    BurnoutSummary {
        level,
        average,
        message,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BreathworkStats {
    pub sessions: usize,
    pub cycles: u32,
    pub minutes: u32,
    pub last_session: Option<DateTime<Utc>>,
}

pub fn breathwork_stats(log: &[SessionRecord]) -> BreathworkStats {
    BreathworkStats {
        sessions: log.len(),
        cycles: log.iter().map(|r| r.cycles).sum(),
        minutes: log.iter().map(|r| r.duration).sum(),
        last_session: log.iter().map(|r| r.completed_at).max(),
    }
}

/// Everything the home screen shows, in one value.
#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub welcome: String,
    pub mentor: Option<String>,
    pub mentor_message: Option<&'static str>,
    pub burnout: Option<BurnoutSummary>,
    pub stress: Option<u8>,
    pub breathwork: BreathworkStats,
}

pub fn overview<R: Rng + ?Sized>(
    profile: &UserProfile,
    log: &[SessionRecord],
    hour: u32,
    rng: &mut R,
) -> Overview {
    let name = profile.avatar.as_ref().map(|a| a.name.as_str());
    Overview {
        welcome: welcome_message(name, hour),
        mentor: profile
            .mentor
            .as_ref()
            .map(|m| format!("{} {}", m.emoji, m.name)),
        mentor_message: mentor_message(profile, rng),
        burnout: profile.assessment_results.as_ref().map(burnout_summary),
        stress: profile.assessment_results.as_ref().map(|r| r.stress),
        breathwork: breathwork_stats(log),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::BurnoutScores;
    use crate::onboarding::find_mentor;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    fn results(physical: u8, mental: u8, emotional: u8) -> AssessmentResults {
        AssessmentResults {
            burnout: BurnoutScores {
                physical,
                mental,
                emotional,
            },
            stress: 50,
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn greeting_by_hour() {
        assert_eq!(welcome_message(Some("Asha"), 0), "Good morning, Asha! 🌅");
        assert_eq!(welcome_message(Some("Asha"), 11), "Good morning, Asha! 🌅");
        assert_eq!(welcome_message(Some("Asha"), 12), "Good afternoon, Asha! ☀️");
        assert_eq!(welcome_message(None, 16), "Good afternoon, Friend! ☀️");
        assert_eq!(welcome_message(Some(""), 17), "Good evening, Friend! 🌙");
    }

    #[test]
    fn no_mentor_no_message() {
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        assert!(mentor_message(&UserProfile::default(), &mut rng).is_none());

        let profile = UserProfile {
            mentor: Some(find_mentor("dolphin").unwrap().to_record()),
            ..Default::default()
        };
        let msg = mentor_message(&profile, &mut rng).unwrap();
        assert!(MENTOR_MESSAGES.contains(&msg));
    }

    #[test]
    fn summary_thresholds() {
        assert_eq!(burnout_summary(&results(29, 29, 29)).level, SummaryLevel::Good);
        // (30 + 29 + 29) / 3 = 29.33 rounds to 29
        assert_eq!(burnout_summary(&results(30, 29, 29)).level, SummaryLevel::Good);
        // (30 + 30 + 29) / 3 = 29.67 rounds to 30
        let s = burnout_summary(&results(30, 30, 29));
        assert_eq!((s.level, s.average), (SummaryLevel::Moderate, 30));
        assert_eq!(s.message, "Some areas need attention");
        let s = burnout_summary(&results(100, 58, 25));
        assert_eq!((s.level, s.average), (SummaryLevel::High, 61));
        assert_eq!(s.message, "Let's focus on recovery");
    }

    #[test]
    fn stats_total_the_log() {
        assert_eq!(breathwork_stats(&[]), BreathworkStats::default());
        let at = |d| Utc.with_ymd_and_hms(2025, 1, d, 8, 0, 0).unwrap();
        let log = vec![
            SessionRecord {
                technique: "Box Breathing".into(),
                duration: 4,
                cycles: 5,
                completed_at: at(3),
            },
            SessionRecord {
                technique: "Energizing Breath".into(),
                duration: 2,
                cycles: 3,
                completed_at: at(1),
            },
        ];
        let stats = breathwork_stats(&log);
        assert_eq!(stats.sessions, 2);
        assert_eq!(stats.cycles, 8);
        assert_eq!(stats.minutes, 6);
        assert_eq!(stats.last_session, Some(at(3)));
    }

    #[test]
    fn overview_for_new_user() {
        let mut rng = Mcg128Xsl64::seed_from_u64(9);
        let view = overview(&UserProfile::default(), &[], 9, &mut rng);
        assert_eq!(view.welcome, "Good morning, Friend! 🌅");
        assert!(view.mentor.is_none());
        assert!(view.burnout.is_none());
        assert_eq!(view.breathwork.sessions, 0);
    }
}
