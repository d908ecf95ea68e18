mod answer;
mod ids;
mod question;

pub use answer::AnswerEvent;
pub use ids::{AchievementId, ParseIdError, QuestionId};
pub use question::{Difficulty, QuestionDraft, QuestionRecord};
