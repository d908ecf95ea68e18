use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;

/// Record of a single submitted answer.
///
/// Appended to the session history exactly once per submission. A retry that
/// produces a new submission is a new event with `retried` set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerEvent {
    pub question_id: QuestionId,
    pub is_correct: bool,
    pub time_taken_seconds: f64,
    pub hint_used: bool,
    pub retried: bool,
    pub timestamp: DateTime<Utc>,
}

impl AnswerEvent {
    #[must_use]
    pub fn new(
        question_id: QuestionId,
        is_correct: bool,
        time_taken_seconds: f64,
        hint_used: bool,
        retried: bool,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            question_id,
            is_correct,
            time_taken_seconds,
            hint_used,
            retried,
            timestamp,
        }
    }

    /// Correct on the first go, without a hint.
    #[must_use]
    pub fn is_unassisted_correct(&self) -> bool {
        self.is_correct && !self.hint_used && !self.retried
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn unassisted_requires_no_hint_or_retry() {
        let base = AnswerEvent::new(QuestionId::new(1), true, 3.0, false, false, fixed_now());
        assert!(base.is_unassisted_correct());

        let hinted = AnswerEvent {
            hint_used: true,
            ..base.clone()
        };
        assert!(!hinted.is_unassisted_correct());

        let retried = AnswerEvent {
            retried: true,
            ..base
        };
        assert!(!retried.is_unassisted_correct());
    }

    #[test]
    fn serializes_with_iso_timestamp() {
        let event = AnswerEvent::new(QuestionId::new(4), false, 12.5, true, false, fixed_now());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["question_id"], 4);
        assert_eq!(json["time_taken_seconds"], 12.5);
        assert_eq!(json["timestamp"], "2023-11-14T22:13:20Z");
    }
}
