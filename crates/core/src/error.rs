use thiserror::Error;

use crate::model::{AchievementId, QuestionId};

/// A caller supplied a value the quiz core cannot make sense of.
///
/// Always surfaced synchronously; the core never clamps or guesses a replacement.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum InvalidInputError {
    #[error("time taken must be non-negative, got {provided}")]
    NegativeTime { provided: f64 },

    #[error("time taken must be finite, got {provided}")]
    NonFiniteTime { provided: f64 },

    #[error("unknown question id: {0}")]
    UnknownQuestion(QuestionId),

    #[error("unknown achievement id: {0}")]
    UnknownAchievement(AchievementId),

    #[error("option {label:?} is not offered by question {question_id}")]
    UnknownOption {
        question_id: QuestionId,
        label: String,
    },

    #[error("target time per question must be positive and finite, got {provided}")]
    InvalidTargetTime { provided: f64 },

    #[error("metrics window sizes must be > 0")]
    InvalidWindow,
}

/// A question record or rule table violates its construction invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("question {0} has an empty prompt")]
    EmptyPrompt(QuestionId),

    #[error("question {id} must offer 2 to 4 options, found {count}")]
    OptionCount { id: QuestionId, count: usize },

    #[error("question {id} names {correct:?} as correct, but it is not one of its options")]
    CorrectOptionMissing { id: QuestionId, correct: String },

    #[error("duplicate question id: {0}")]
    DuplicateQuestion(QuestionId),

    #[error("duplicate achievement id: {0}")]
    DuplicateAchievement(AchievementId),

    #[error("achievement id cannot be empty")]
    EmptyAchievementId,
}
