mod order;
mod progress;
mod session;

pub use crate::error::QuizError;
pub use progress::QuizProgress;
pub use session::{AnswerFeedback, QuizSession};
