//! Scoring and metrics engine.
//!
//! Every figure in [`SessionMetrics`] is a pure function of the answer history.
//! There is no incremental update path: callers rebuild the whole struct with
//! [`SessionMetrics::from_history`] after each append.

mod config;
mod report;

use serde::{Deserialize, Serialize};

use crate::model::AnswerEvent;

pub use config::MetricsConfig;
pub use report::{CategoryAccuracy, MasteryTier, PerformanceReport, category_accuracy};

/// Largest possible standard deviation of a 0/1 sequence.
const MAX_BINARY_STDDEV: f64 = 0.5;

//
// ─── SESSION METRICS ───────────────────────────────────────────────────────────
//

/// Aggregate counters and derived scores for one play session.
///
/// `total_answered == total_correct + total_incorrect == history.len()` always holds
/// for a value built by `from_history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetrics {
    total_answered: u32,
    total_correct: u32,
    total_incorrect: u32,
    hints_used_count: u32,
    retries_count: u32,
    total_time_spent: f64,
    current_streak: u32,
    best_streak: u32,
    accuracy: f64,
    average_time_per_question: f64,
    consistency_score: f64,
    learning_velocity: f64,
    hint_efficiency: f64,
    time_efficiency: f64,
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::empty()
    }
}

impl SessionMetrics {
    /// Metrics of a session with no answers.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total_answered: 0,
            total_correct: 0,
            total_incorrect: 0,
            hints_used_count: 0,
            retries_count: 0,
            total_time_spent: 0.0,
            current_streak: 0,
            best_streak: 0,
            accuracy: 0.0,
            average_time_per_question: 0.0,
            consistency_score: 0.0,
            learning_velocity: 0.0,
            hint_efficiency: 1.0,
            time_efficiency: 1.0,
        }
    }

    /// Recompute every counter and derived score from scratch.
    #[must_use]
    pub fn from_history(history: &[AnswerEvent], config: &MetricsConfig) -> Self {
        let mut metrics = Self::empty();

        for event in history {
            metrics.total_answered = metrics.total_answered.saturating_add(1);
            if event.is_correct {
                metrics.total_correct = metrics.total_correct.saturating_add(1);
                metrics.current_streak = metrics.current_streak.saturating_add(1);
            } else {
                metrics.total_incorrect = metrics.total_incorrect.saturating_add(1);
                metrics.current_streak = 0;
            }
            metrics.best_streak = metrics.best_streak.max(metrics.current_streak);
            if event.hint_used {
                metrics.hints_used_count = metrics.hints_used_count.saturating_add(1);
            }
            if event.retried {
                metrics.retries_count = metrics.retries_count.saturating_add(1);
            }
            metrics.total_time_spent += event.time_taken_seconds;
        }

        if metrics.total_answered > 0 {
            let answered = f64::from(metrics.total_answered);
            metrics.accuracy = f64::from(metrics.total_correct) / answered;
            metrics.average_time_per_question = metrics.total_time_spent / answered;
            metrics.hint_efficiency = 1.0 - f64::from(metrics.hints_used_count) / answered;
        }

        metrics.time_efficiency = time_efficiency(
            metrics.average_time_per_question,
            config.target_seconds_per_question(),
        );
        metrics.consistency_score = consistency_score(history, config).unwrap_or(0.0);
        metrics.learning_velocity = learning_velocity(history, config.velocity_min_events());

        metrics
    }

    #[must_use]
    pub fn total_answered(&self) -> u32 {
        self.total_answered
    }

    #[must_use]
    pub fn total_correct(&self) -> u32 {
        self.total_correct
    }

    #[must_use]
    pub fn total_incorrect(&self) -> u32 {
        self.total_incorrect
    }

    #[must_use]
    pub fn hints_used_count(&self) -> u32 {
        self.hints_used_count
    }

    #[must_use]
    pub fn retries_count(&self) -> u32 {
        self.retries_count
    }

    #[must_use]
    pub fn total_time_spent(&self) -> f64 {
        self.total_time_spent
    }

    #[must_use]
    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    #[must_use]
    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    /// Share of correct answers, `0.0` before the first answer.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Mastery tracks overall accuracy.
    #[must_use]
    pub fn mastery_level(&self) -> f64 {
        self.accuracy
    }

    #[must_use]
    pub fn average_time_per_question(&self) -> f64 {
        self.average_time_per_question
    }

    #[must_use]
    pub fn consistency_score(&self) -> f64 {
        self.consistency_score
    }

    /// Signed relative improvement between history halves; negative means regression.
    #[must_use]
    pub fn learning_velocity(&self) -> f64 {
        self.learning_velocity
    }

    #[must_use]
    pub fn hint_efficiency(&self) -> f64 {
        self.hint_efficiency
    }

    #[must_use]
    pub fn time_efficiency(&self) -> f64 {
        self.time_efficiency
    }

    #[must_use]
    pub fn mastery_tier(&self) -> MasteryTier {
        MasteryTier::from_accuracy(self.accuracy)
    }

    #[must_use]
    pub fn performance_report(&self) -> PerformanceReport {
        PerformanceReport::from_metrics(self)
    }
}

//
// ─── FORMULAS ──────────────────────────────────────────────────────────────────
//

fn time_efficiency(average: f64, target: f64) -> f64 {
    if average <= target {
        1.0
    } else {
        target / average
    }
}

/// `max(0, 1 - σ/0.5)` over the trailing window, or `None` below the minimum.
#[allow(clippy::cast_precision_loss)]
fn consistency_score(history: &[AnswerEvent], config: &MetricsConfig) -> Option<f64> {
    if history.len() < config.consistency_min_events() {
        return None;
    }
    let start = history.len().saturating_sub(config.consistency_window());
    let window = &history[start..];
    // Sample standard deviation needs two points.
    if window.len() < 2 {
        return None;
    }

    let n = window.len() as f64;
    let values = window.iter().map(|e| if e.is_correct { 1.0 } else { 0.0 });
    let mean = values.clone().sum::<f64>() / n;
    let variance = values.map(|x: f64| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let sigma = variance.sqrt();

    Some((1.0 - sigma / MAX_BINARY_STDDEV).max(0.0))
}

/// Relative improvement of the second half of the history over the first.
///
/// When the first half has no correct answer the ratio is undefined and the
/// previous value stands. Walking every prefix keeps that rule a pure function
/// of the history: the result is the ratio of the longest qualifying prefix
/// whose first half had a correct answer, or `0.0` if none did.
#[allow(clippy::cast_precision_loss)]
fn learning_velocity(history: &[AnswerEvent], min_events: usize) -> f64 {
    if history.len() < min_events {
        return 0.0;
    }

    let mut prefix_correct = Vec::with_capacity(history.len() + 1);
    prefix_correct.push(0_usize);
    for event in history {
        let last = prefix_correct[prefix_correct.len() - 1];
        prefix_correct.push(last + usize::from(event.is_correct));
    }

    let mut velocity = 0.0;
    for len in min_events..=history.len() {
        let half = len / 2;
        let first = prefix_correct[half];
        let second = prefix_correct[len] - first;
        if first > 0 {
            velocity = (second as f64 - first as f64) / first as f64;
        }
    }
    velocity
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
