#![forbid(unsafe_code)]

pub mod error;
pub mod progress_service;
pub mod quiz;
pub mod report;

pub use quiz_core::Clock;

pub use error::{ProgressError, QuizError};
pub use progress_service::{LoadOutcome, ProgressService};
pub use quiz::{AnswerFeedback, QuizProgress, QuizSession};
pub use report::{EarnedAchievement, SessionReport};
