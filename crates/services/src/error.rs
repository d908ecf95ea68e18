//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::QuestionId;
use quiz_core::{CatalogError, InvalidInputError};
use storage::PersistError;

/// Errors emitted by `QuizSession`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("question catalog is empty")]
    EmptyCatalog,
    #[error("quiz already completed")]
    Completed,
    #[error("question {0} has not been answered yet")]
    NotAnswered(QuestionId),
    #[error("question {0} was already answered")]
    AlreadyAnswered(QuestionId),
    #[error("question {0} was already answered correctly")]
    AlreadyCorrect(QuestionId),
    #[error("hints are not available right now")]
    HintsDisabled,
    #[error("retry limit of {limit} reached for question {question_id}")]
    RetryLimitReached { question_id: QuestionId, limit: u32 },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),
}
