mod flow;
mod questions;
mod scoring;

pub use flow::{mentor_feedback, AssessmentFlow, Section};
pub use questions::{
    find_question, AnswerSet, BurnoutCategory, Question, Response, BURNOUT_QUESTIONS, MAX_LEVEL,
    STRESS_QUESTIONS,
};
pub use scoring::{
    classify_burnout, classify_stress, compute_burnout_scores, compute_stress_score,
    AssessmentResults, BurnoutScores, Classification, Level, StressScoring,
};
