use chrono::{DateTime, Utc};

use crate::error::InvalidInputError;
use crate::metrics::{MetricsConfig, SessionMetrics};
use crate::model::{AnswerEvent, QuestionId};
use crate::time::seconds_between;

/// Raw record of one play-through: the ordered answer history plus the metrics
/// rebuilt from it after every mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    config: MetricsConfig,
    history: Vec<AnswerEvent>,
    metrics: SessionMetrics,
    started_at: DateTime<Utc>,
}

impl SessionState {
    /// `started_at` should come from the services layer clock.
    #[must_use]
    pub fn new(config: MetricsConfig, started_at: DateTime<Utc>) -> Self {
        Self {
            config,
            history: Vec::new(),
            metrics: SessionMetrics::empty(),
            started_at,
        }
    }

    /// Append an answer and recompute the metrics.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInputError::NegativeTime` or `InvalidInputError::NonFiniteTime`
    /// if `time_taken` is not a valid duration. The session is unchanged on error.
    pub fn record_answer(
        &mut self,
        question_id: QuestionId,
        is_correct: bool,
        time_taken: f64,
        hint_used: bool,
        retried: bool,
        answered_at: DateTime<Utc>,
    ) -> Result<&AnswerEvent, InvalidInputError> {
        validate_time(time_taken)?;
        self.history.push(AnswerEvent::new(
            question_id,
            is_correct,
            time_taken,
            hint_used,
            retried,
            answered_at,
        ));
        self.recompute();
        Ok(&self.history[self.history.len() - 1])
    }

    /// Clear history and counters and restart the elapsed-time clock.
    pub fn reset(&mut self, started_at: DateTime<Utc>) {
        self.history.clear();
        self.metrics = SessionMetrics::empty();
        self.started_at = started_at;
    }

    /// Replace the history with a persisted one.
    ///
    /// Metrics are rebuilt from the history; the history is authoritative.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInputError` if any event carries an invalid duration.
    /// The session is unchanged on error.
    pub fn restore(
        &mut self,
        history: Vec<AnswerEvent>,
        started_at: DateTime<Utc>,
    ) -> Result<(), InvalidInputError> {
        for event in &history {
            validate_time(event.time_taken_seconds)?;
        }
        self.history = history;
        self.started_at = started_at;
        self.recompute();
        Ok(())
    }

    fn recompute(&mut self) {
        self.metrics = SessionMetrics::from_history(&self.history, &self.config);
    }

    #[must_use]
    pub fn history(&self) -> &[AnswerEvent] {
        &self.history
    }

    #[must_use]
    pub fn metrics(&self) -> &SessionMetrics {
        &self.metrics
    }

    #[must_use]
    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Wall-clock seconds since the session (re)started.
    #[must_use]
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> f64 {
        seconds_between(self.started_at, now)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

fn validate_time(time_taken: f64) -> Result<(), InvalidInputError> {
    if time_taken.is_nan() || time_taken.is_infinite() {
        return Err(InvalidInputError::NonFiniteTime {
            provided: time_taken,
        });
    }
    if time_taken < 0.0 {
        return Err(InvalidInputError::NegativeTime {
            provided: time_taken,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn session() -> SessionState {
        SessionState::new(MetricsConfig::default(), fixed_now())
    }

    fn answer(s: &mut SessionState, correct: bool) {
        s.record_answer(QuestionId::new(1), correct, 5.0, false, false, fixed_now())
            .unwrap();
    }

    #[test]
    fn first_correct_answer() {
        let mut s = session();
        let event = s
            .record_answer(QuestionId::new(3), true, 5.0, false, false, fixed_now())
            .unwrap()
            .clone();
        assert_eq!(event.question_id, QuestionId::new(3));

        let m = s.metrics();
        assert_eq!(m.total_answered(), 1);
        assert_eq!(m.accuracy(), 1.0);
        assert_eq!(m.current_streak(), 1);
        assert_eq!(m.best_streak(), 1);
    }

    #[test]
    fn streak_sequence() {
        let mut s = session();
        for correct in [true, true, false, true] {
            answer(&mut s, correct);
        }
        assert_eq!(s.metrics().current_streak(), 1);
        assert_eq!(s.metrics().best_streak(), 2);
    }

    #[test]
    fn negative_time_is_rejected_without_side_effects() {
        let mut s = session();
        answer(&mut s, true);
        let before = s.clone();

        let err = s
            .record_answer(QuestionId::new(1), true, -0.5, false, false, fixed_now())
            .unwrap_err();
        assert_eq!(err, InvalidInputError::NegativeTime { provided: -0.5 });
        assert_eq!(s, before);

        let err = s
            .record_answer(QuestionId::new(1), true, f64::NAN, false, false, fixed_now())
            .unwrap_err();
        assert!(matches!(err, InvalidInputError::NonFiniteTime { .. }));
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn zero_time_is_allowed() {
        let mut s = session();
        assert!(
            s.record_answer(QuestionId::new(1), false, 0.0, false, false, fixed_now())
                .is_ok()
        );
    }

    #[test]
    fn history_and_counters_stay_in_lockstep() {
        let mut s = session();
        for (i, correct) in [true, false, true, true, false, false, true].into_iter().enumerate() {
            answer(&mut s, correct);
            let m = s.metrics();
            assert_eq!(m.total_answered() as usize, i + 1);
            assert_eq!(m.total_answered() as usize, s.history().len());
            assert_eq!(m.total_correct() + m.total_incorrect(), m.total_answered());
        }
    }

    #[test]
    fn reset_clears_everything() {
        let mut s = session();
        for _ in 0..4 {
            answer(&mut s, true);
        }
        let restart = fixed_now() + Duration::minutes(3);
        s.reset(restart);
        assert!(s.is_empty());
        assert_eq!(s.metrics().total_answered(), 0);
        assert_eq!(s.metrics().current_streak(), 0);
        assert_eq!(s.metrics().best_streak(), 0);
        assert_eq!(s.started_at(), restart);
    }

    #[test]
    fn restore_rebuilds_metrics_from_history() {
        let mut source = session();
        for correct in [true, false, true] {
            answer(&mut source, correct);
        }

        let mut target = session();
        target
            .restore(source.history().to_vec(), source.started_at())
            .unwrap();
        assert_eq!(target.metrics(), source.metrics());
    }

    #[test]
    fn restore_rejects_bad_events() {
        let mut s = session();
        answer(&mut s, true);
        let mut bad = s.history().to_vec();
        bad[0].time_taken_seconds = -3.0;

        let mut target = session();
        assert!(target.restore(bad, fixed_now()).is_err());
        assert!(target.is_empty());
    }

    #[test]
    fn elapsed_time_tracks_clock() {
        let s = session();
        assert_eq!(s.elapsed_seconds(fixed_now() + Duration::seconds(90)), 90.0);
    }
}
