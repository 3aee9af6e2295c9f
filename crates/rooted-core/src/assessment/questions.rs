//! Fixed questionnaire catalogs and the 5-level response scale.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Highest level on the response scale.
pub const MAX_LEVEL: u8 = 4;

/// Burnout sub-scale a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BurnoutCategory {
    Physical,
    Mental,
    Emotional,
}

impl BurnoutCategory {
    pub const ALL: [BurnoutCategory; 3] = [
        BurnoutCategory::Physical,
        BurnoutCategory::Mental,
        BurnoutCategory::Emotional,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BurnoutCategory::Physical => "Physical",
            BurnoutCategory::Mental => "Mental",
            BurnoutCategory::Emotional => "Emotional",
        }
    }
}

impl fmt::Display for BurnoutCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single questionnaire item.
///
/// `reverse` marks positively-phrased items where agreement indicates the
/// opposite of the measured trait. Burnout scoring always honors it; stress
/// scoring honors it only under [`super::StressScoring::ReversePositiveItems`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: &'static str,
    /// Burnout sub-scale, `None` for stress items.
    pub category: Option<BurnoutCategory>,
    pub prompt: &'static str,
    pub reverse: bool,
}

const fn burnout(
    id: &'static str,
    category: BurnoutCategory,
    prompt: &'static str,
    reverse: bool,
) -> Question {
    Question {
        id,
        category: Some(category),
        prompt,
        reverse,
    }
}

const fn stress(id: &'static str, prompt: &'static str, reverse: bool) -> Question {
    Question {
        id,
        category: None,
        prompt,
        reverse,
    }
}

/// WHO-style burnout index: three sub-scales of three items each.
pub const BURNOUT_QUESTIONS: [Question; 9] = [
    burnout(
        "exhaustion_1",
        BurnoutCategory::Physical,
        "I feel emotionally drained by my work",
        false,
    ),
    burnout(
        "exhaustion_2",
        BurnoutCategory::Physical,
        "I feel used up at the end of the workday",
        false,
    ),
    burnout(
        "exhaustion_3",
        BurnoutCategory::Physical,
        "I feel fatigued when I get up and have to face another day",
        false,
    ),
    burnout(
        "cynicism_1",
        BurnoutCategory::Mental,
        "I treat some recipients as if they were impersonal objects",
        false,
    ),
    burnout(
        "cynicism_2",
        BurnoutCategory::Mental,
        "I have become more callous toward people since I took this job",
        false,
    ),
    burnout(
        "cynicism_3",
        BurnoutCategory::Mental,
        "I worry that this job is hardening me emotionally",
        false,
    ),
    burnout(
        "efficacy_1",
        BurnoutCategory::Emotional,
        "I can easily understand how my recipients feel about things",
        true,
    ),
    burnout(
        "efficacy_2",
        BurnoutCategory::Emotional,
        "I deal very effectively with the problems of my recipients",
        true,
    ),
    burnout(
        "efficacy_3",
        BurnoutCategory::Emotional,
        "I feel I am positively influencing other people's lives through my work",
        true,
    ),
];

/// Perceived Stress Scale short form.
pub const STRESS_QUESTIONS: [Question; 5] = [
    stress(
        "stress_1",
        "In the last month, how often have you been upset because of something that happened unexpectedly?",
        false,
    ),
    stress(
        "stress_2",
        "In the last month, how often have you felt that you were unable to control the important things in your life?",
        false,
    ),
    stress(
        "stress_3",
        "In the last month, how often have you felt nervous and \"stressed\"?",
        false,
    ),
    stress(
        "stress_4",
        "In the last month, how often have you felt confident about your ability to handle your personal problems?",
        true,
    ),
    stress(
        "stress_5",
        "In the last month, how often have you felt that things were going your way?",
        true,
    ),
];

/// Find a question in either catalog.
pub fn find_question(id: &str) -> Option<&'static Question> {
    BURNOUT_QUESTIONS
        .iter()
        .chain(STRESS_QUESTIONS.iter())
        .find(|q| q.id == id)
}

/// One of the five ordinal response levels. The level is also the raw score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Response {
    Never = 0,
    Rarely = 1,
    Sometimes = 2,
    Often = 3,
    Always = 4,
}

impl Response {
    pub const ALL: [Response; 5] = [
        Response::Never,
        Response::Rarely,
        Response::Sometimes,
        Response::Often,
        Response::Always,
    ];

    pub fn from_level(level: u8) -> Option<Self> {
        Self::ALL.get(level as usize).copied()
    }

    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Response::Never => "Never",
            Response::Rarely => "Rarely",
            Response::Sometimes => "Sometimes",
            Response::Often => "Often",
            Response::Always => "Always",
        }
    }
}

impl From<Response> for u8 {
    fn from(r: Response) -> u8 {
        r.level()
    }
}

impl TryFrom<u8> for Response {
    type Error = ValidationError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Response::from_level(level).ok_or_else(|| ValidationError::InvalidValue {
            field: "response".into(),
            message: format!("level {level} is outside 0..={MAX_LEVEL}"),
        })
    }
}

/// Accepts either the numeric level (`"3"`) or the label (`"often"`).
impl FromStr for Response {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(level) = s.parse::<u8>() {
            return Response::try_from(level);
        }
        Response::ALL
            .iter()
            .copied()
            .find(|r| r.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "response".into(),
                message: format!("'{s}' is not a response level"),
            })
    }
}

/// Answers keyed by question id. Unanswered questions are simply absent;
/// answers are only ever added or overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<String, Response>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(&mut self, question_id: impl Into<String>, response: Response) {
        self.0.insert(question_id.into(), response);
    }

    pub fn get(&self, question_id: &str) -> Option<Response> {
        self.0.get(question_id).copied()
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.0.contains_key(question_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every question in `catalog` answered with the same response.
    pub fn uniform(catalog: &[Question], response: Response) -> Self {
        let mut set = Self::new();
        for q in catalog {
            set.answer(q.id, response);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burnout_catalog_has_three_per_category() {
        for category in BurnoutCategory::ALL {
            let n = BURNOUT_QUESTIONS
                .iter()
                .filter(|q| q.category == Some(category))
                .count();
            assert_eq!(n, 3, "{category}");
        }
    }

    #[test]
    fn only_efficacy_items_reverse() {
        let reversed: Vec<_> = BURNOUT_QUESTIONS
            .iter()
            .filter(|q| q.reverse)
            .map(|q| q.category)
            .collect();
        assert_eq!(reversed, vec![Some(BurnoutCategory::Emotional); 3]);
    }

    #[test]
    fn stress_positive_items_flagged() {
        let flagged: Vec<_> = STRESS_QUESTIONS
            .iter()
            .filter(|q| q.reverse)
            .map(|q| q.id)
            .collect();
        assert_eq!(flagged, vec!["stress_4", "stress_5"]);
    }

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<_> = BURNOUT_QUESTIONS
            .iter()
            .chain(STRESS_QUESTIONS.iter())
            .map(|q| q.id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 14);
    }

    #[test]
    fn response_parses_level_and_label() {
        assert_eq!("3".parse::<Response>().unwrap(), Response::Often);
        assert_eq!("always".parse::<Response>().unwrap(), Response::Always);
        assert!("5".parse::<Response>().is_err());
        assert!("sometimes-ish".parse::<Response>().is_err());
    }

    #[test]
    fn response_serializes_as_level() {
        assert_eq!(serde_json::to_string(&Response::Sometimes).unwrap(), "2");
        let r: Response = serde_json::from_str("4").unwrap();
        assert_eq!(r, Response::Always);
        assert!(serde_json::from_str::<Response>("9").is_err());
    }

    #[test]
    fn answers_overwrite() {
        let mut set = AnswerSet::new();
        set.answer("stress_1", Response::Never);
        set.answer("stress_1", Response::Often);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("stress_1"), Some(Response::Often));
        assert!(!set.is_answered("stress_2"));
    }

    #[test]
    fn find_question_spans_both_catalogs() {
        assert_eq!(find_question("cynicism_2").unwrap().category, Some(BurnoutCategory::Mental));
        assert!(find_question("stress_5").unwrap().category.is_none());
        assert!(find_question("nope").is_none());
    }
}
