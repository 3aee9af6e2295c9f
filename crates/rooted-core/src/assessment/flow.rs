//! Question-by-question navigation through the assessment.
//!
//! ```text
//! Intro -> Burnout (9) -> Stress (5) -> Results
//! ```
//!
//! `next()` only advances once the current question has an answer. Leaving
//! the last stress question scores both questionnaires and freezes the
//! results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::questions::{AnswerSet, Question, Response, BURNOUT_QUESTIONS, STRESS_QUESTIONS};
use super::scoring::{
    compute_burnout_scores, compute_stress_score, AssessmentResults, BurnoutScores, StressScoring,
};
use crate::onboarding::MentorRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Intro,
    Burnout,
    Stress,
    Results,
}

#[derive(Debug, Clone)]
pub struct AssessmentFlow {
    section: Section,
    index: usize,
    burnout: AnswerSet,
    stress: AnswerSet,
    policy: StressScoring,
    results: Option<AssessmentResults>,
}

impl Default for AssessmentFlow {
    fn default() -> Self {
        Self::new(StressScoring::default())
    }
}

impl AssessmentFlow {
    pub fn new(policy: StressScoring) -> Self {
        Self {
            section: Section::Intro,
            index: 0,
            burnout: AnswerSet::new(),
            stress: AnswerSet::new(),
            policy,
            results: None,
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn question_index(&self) -> usize {
        self.index
    }

    pub fn results(&self) -> Option<&AssessmentResults> {
        self.results.as_ref()
    }

    pub fn burnout_answers(&self) -> &AnswerSet {
        &self.burnout
    }

    pub fn stress_answers(&self) -> &AnswerSet {
        &self.stress
    }

    /// Leave the intro screen.
    pub fn begin(&mut self) {
        if self.section == Section::Intro {
            self.section = Section::Burnout;
            self.index = 0;
        }
    }

    pub fn current_question(&self) -> Option<&'static Question> {
        match self.section {
            Section::Burnout => BURNOUT_QUESTIONS.get(self.index),
            Section::Stress => STRESS_QUESTIONS.get(self.index),
            Section::Intro | Section::Results => None,
        }
    }

    /// Record an answer for the current question. Ignored outside a
    /// questionnaire section.
    pub fn answer(&mut self, response: Response) {
        let Some(question) = self.current_question() else {
            return;
        };
        match self.section {
            Section::Burnout => self.burnout.answer(question.id, response),
            Section::Stress => self.stress.answer(question.id, response),
            _ => {}
        }
    }

    pub fn can_proceed(&self) -> bool {
        match (self.section, self.current_question()) {
            (Section::Burnout, Some(q)) => self.burnout.is_answered(q.id),
            (Section::Stress, Some(q)) => self.stress.is_answered(q.id),
            _ => false,
        }
    }

    /// Advance one question. Returns the results when this step finished
    /// the assessment.
    pub fn next(&mut self, now: DateTime<Utc>) -> Option<AssessmentResults> {
        if !self.can_proceed() {
            return None;
        }
        match self.section {
            Section::Burnout => {
                if self.index + 1 < BURNOUT_QUESTIONS.len() {
                    self.index += 1;
                } else {
                    self.section = Section::Stress;
                    self.index = 0;
                }
                None
            }
            Section::Stress => {
                if self.index + 1 < STRESS_QUESTIONS.len() {
                    self.index += 1;
                    return None;
                }
                let results = self.score(now);
                tracing::info!(
                    stress = results.stress,
                    physical = results.burnout.physical,
                    mental = results.burnout.mental,
                    emotional = results.burnout.emotional,
                    "assessment completed"
                );
                self.section = Section::Results;
                self.results = Some(results.clone());
                Some(results)
            }
            Section::Intro | Section::Results => None,
        }
    }

    /// Step back one question, crossing from stress back into burnout.
    pub fn prev(&mut self) {
        if self.index > 0 && matches!(self.section, Section::Burnout | Section::Stress) {
            self.index -= 1;
        } else if self.section == Section::Stress {
            self.section = Section::Burnout;
            self.index = BURNOUT_QUESTIONS.len() - 1;
        }
    }

    /// Score whatever has been answered so far.
    pub fn score(&self, now: DateTime<Utc>) -> AssessmentResults {
        AssessmentResults {
            burnout: compute_burnout_scores(&self.burnout, &BURNOUT_QUESTIONS),
            stress: compute_stress_score(&self.stress, &STRESS_QUESTIONS, self.policy),
            completed_at: now,
        }
    }

    /// 0.0 .. 100.0 through the questionnaire.
    pub fn progress_pct(&self) -> f64 {
        let total = (BURNOUT_QUESTIONS.len() + STRESS_QUESTIONS.len()) as f64;
        match self.section {
            Section::Intro => 0.0,
            Section::Burnout => self.index as f64 / total * 100.0,
            Section::Stress => (BURNOUT_QUESTIONS.len() + self.index) as f64 / total * 100.0,
            Section::Results => 100.0,
        }
    }
}

/// Closing message from the user's mentor after an assessment.
pub fn mentor_feedback(mentor: Option<&MentorRecord>, burnout: &BurnoutScores, stress: u8) -> String {
    let Some(mentor) = mentor else {
        return "You're on a journey of self-discovery. Every step counts!".to_string();
    };
    let avg = burnout.average();
    let emoji = &mentor.emoji;
    if avg < 30.0 && stress < 40 {
        format!("{emoji} Great work! You're managing stress well. Let's build on these healthy patterns together! 🌟")
    } else if avg < 60.0 && stress < 70 {
        format!("{emoji} I see some areas where we can work together. You're not alone in this journey - let's create some positive changes! 💪")
    } else {
        format!("{emoji} I'm here to support you through this challenging time. Remember, seeking help shows strength, not weakness. Let's take this one day at a time. 🤗")
    }
}
