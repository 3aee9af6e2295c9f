//! Assessment scoring engine.
//!
//! Maps an [`AnswerSet`] to normalized percentages:
//!
//! ```text
//! burnout[category] = round(sum(effective levels in category) / 12 * 100)
//! stress            = round(sum(levels) / 20 * 100)
//! ```
//!
//! Unanswered questions contribute 0, so a partially completed set yields a
//! lower-bound estimate rather than an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::questions::{AnswerSet, BurnoutCategory, Question, MAX_LEVEL};

/// Items per burnout sub-scale.
const QUESTIONS_PER_CATEGORY: u32 = 3;
/// Items on the stress scale.
const STRESS_ITEMS: u32 = 5;

/// Whether positively-phrased stress items are reverse-scored.
///
/// The clinical instrument reverse-scores them; the shipped scoring never
/// did, so `Standard` stays the default and the other mode is opt-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressScoring {
    #[default]
    Standard,
    ReversePositiveItems,
}

impl StressScoring {
    pub fn from_reverse_flag(reverse_positive_items: bool) -> Self {
        if reverse_positive_items {
            StressScoring::ReversePositiveItems
        } else {
            StressScoring::Standard
        }
    }
}

/// Percentage per burnout sub-scale, each in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BurnoutScores {
    #[serde(rename = "Physical")]
    pub physical: u8,
    #[serde(rename = "Mental")]
    pub mental: u8,
    #[serde(rename = "Emotional")]
    pub emotional: u8,
}

impl BurnoutScores {
    pub fn get(&self, category: BurnoutCategory) -> u8 {
        match category {
            BurnoutCategory::Physical => self.physical,
            BurnoutCategory::Mental => self.mental,
            BurnoutCategory::Emotional => self.emotional,
        }
    }

    fn slot(&mut self, category: BurnoutCategory) -> &mut u8 {
        match category {
            BurnoutCategory::Physical => &mut self.physical,
            BurnoutCategory::Mental => &mut self.mental,
            BurnoutCategory::Emotional => &mut self.emotional,
        }
    }

    /// Unrounded mean of the three sub-scales.
    pub fn average(&self) -> f64 {
        (self.physical as f64 + self.mental as f64 + self.emotional as f64) / 3.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (BurnoutCategory, u8)> + '_ {
        BurnoutCategory::ALL.into_iter().map(|c| (c, self.get(c)))
    }
}

/// Outcome of a finished assessment, persisted under `assessmentResults`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResults {
    pub burnout: BurnoutScores,
    pub stress: u8,
    pub completed_at: DateTime<Utc>,
}

fn effective_level(question: &Question, answers: &AnswerSet, reverse: bool) -> u32 {
    let Some(response) = answers.get(question.id) else {
        return 0;
    };
    let raw = response.level();
    if reverse && question.reverse {
        u32::from(MAX_LEVEL - raw)
    } else {
        u32::from(raw)
    }
}

fn percentage(sum: u32, max: u32) -> u8 {
    let pct = (sum as f64 / max as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Score the burnout questionnaire.
///
/// Reverse-flagged items contribute `4 - level`. Questions in `catalog`
/// without a category are ignored.
pub fn compute_burnout_scores(answers: &AnswerSet, catalog: &[Question]) -> BurnoutScores {
    let mut sums = [0u32; 3];
    for question in catalog {
        let Some(category) = question.category else {
            continue;
        };
        let idx = BurnoutCategory::ALL
            .iter()
            .position(|c| *c == category)
            .unwrap_or_default();
        sums[idx] += effective_level(question, answers, true);
    }

    let max = QUESTIONS_PER_CATEGORY * u32::from(MAX_LEVEL);
    let mut scores = BurnoutScores::default();
    for (category, sum) in BurnoutCategory::ALL.into_iter().zip(sums) {
        *scores.slot(category) = percentage(sum, max);
    }
    scores
}

/// Score the stress questionnaire.
pub fn compute_stress_score(answers: &AnswerSet, catalog: &[Question], policy: StressScoring) -> u8 {
    let reverse = policy == StressScoring::ReversePositiveItems;
    let sum: u32 = catalog
        .iter()
        .map(|q| effective_level(q, answers, reverse))
        .sum();
    percentage(sum, STRESS_ITEMS * u32::from(MAX_LEVEL))
}

/// Coarse band for a percentage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    Low,
    Moderate,
    High,
}

/// Band plus its fixed description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub level: Level,
    pub description: &'static str,
}

/// `<30` Low, `<60` Moderate, otherwise High.
pub fn classify_burnout(score: u8) -> Classification {
    match score {
        0..=29 => Classification {
            level: Level::Low,
            description: "Minimal burnout indicators",
        },
        30..=59 => Classification {
            level: Level::Moderate,
            description: "Some burnout symptoms present",
        },
        _ => Classification {
            level: Level::High,
            description: "Significant burnout indicators",
        },
    }
}

/// `<40` Low, `<70` Moderate, otherwise High.
pub fn classify_stress(score: u8) -> Classification {
    match score {
        0..=39 => Classification {
            level: Level::Low,
            description: "Good stress management",
        },
        40..=69 => Classification {
            level: Level::Moderate,
            description: "Manageable stress levels",
        },
        _ => Classification {
            level: Level::High,
            description: "High stress levels",
        },
    }
}
