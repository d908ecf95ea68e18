//! The stock achievement table.

use crate::achievements::definition::{AchievementDefinition, Rarity};
use crate::metrics::SessionMetrics;
use crate::model::AnswerEvent;

const ACCURACY_WINDOW: usize = 10;
const ACCURACY_THRESHOLD: f64 = 0.9;
const SPEED_WINDOW: usize = 5;
const SPEED_SECONDS: f64 = 10.0;
const STREAK_TARGET: u32 = 15;
const PERFECT_RUN: usize = 10;
const SCHOLAR_MASTERY: f64 = 0.95;
const SCHOLAR_MIN_ANSWERS: u32 = 20;
const PERSISTENT_RETRIES: u32 = 5;
const EFFICIENT_SECONDS: f64 = 1800.0;
const EXPLORER_HINTS: u32 = 5;
const CONSISTENT_SCORE: f64 = 0.8;

/// Accuracy over the trailing `window` answers, `None` while fewer exist.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn recent_accuracy(history: &[AnswerEvent], window: usize) -> Option<f64> {
    if window == 0 || history.len() < window {
        return None;
    }
    let recent = &history[history.len() - window..];
    let correct = recent.iter().filter(|e| e.is_correct).count();
    Some(correct as f64 / window as f64)
}

#[allow(clippy::cast_precision_loss)]
fn perfect_fraction(history: &[AnswerEvent], window: usize) -> f64 {
    if history.len() < window {
        return 0.0;
    }
    let recent = &history[history.len() - window..];
    recent.iter().filter(|e| e.is_unassisted_correct()).count() as f64 / window as f64
}

fn ratio(value: u32, target: u32) -> f64 {
    f64::from(value) / f64::from(target)
}

/// Rule table used by the quiz, in evaluation order.
///
/// `total_questions` is the size of the question catalog; "efficient" requires
/// every question to have been answered.
#[must_use]
pub fn builtin_achievements(total_questions: usize) -> Vec<AchievementDefinition> {
    let total_questions = u32::try_from(total_questions).unwrap_or(u32::MAX).max(1);

    vec![
        AchievementDefinition::new(
            "first_victory",
            "First Victory",
            "Completed your first mission correctly",
            10,
            Rarity::Common,
            |m: &SessionMetrics, _: &[AnswerEvent]| m.total_correct() >= 1,
        ),
        AchievementDefinition::new(
            "accuracy_master",
            "Accuracy Master",
            "Reached 90% accuracy over the last 10 questions",
            50,
            Rarity::Rare,
            |_: &SessionMetrics, h: &[AnswerEvent]| {
                recent_accuracy(h, ACCURACY_WINDOW).is_some_and(|acc| acc >= ACCURACY_THRESHOLD)
            },
        )
        .with_progress(ACCURACY_THRESHOLD, |_: &SessionMetrics, h: &[AnswerEvent]| {
            recent_accuracy(h, ACCURACY_WINDOW).unwrap_or(0.0)
        }),
        AchievementDefinition::new(
            "speed_demon",
            "Speed Demon",
            "Answered correctly in under 10 seconds",
            75,
            Rarity::Epic,
            |_: &SessionMetrics, h: &[AnswerEvent]| {
                h.iter()
                    .rev()
                    .take(SPEED_WINDOW)
                    .any(|e| e.is_correct && e.time_taken_seconds < SPEED_SECONDS)
            },
        ),
        AchievementDefinition::new(
            "streak_master",
            "Streak Master",
            "Kept a streak of 15 correct answers",
            100,
            Rarity::Legendary,
            |m: &SessionMetrics, _: &[AnswerEvent]| m.best_streak() >= STREAK_TARGET,
        )
        .with_progress(1.0, |m: &SessionMetrics, _: &[AnswerEvent]| {
            ratio(m.best_streak(), STREAK_TARGET)
        }),
        AchievementDefinition::new(
            "perfectionist",
            "Perfectionist",
            "Completed 10 missions in a row without hints or retries",
            150,
            Rarity::Mythic,
            |_: &SessionMetrics, h: &[AnswerEvent]| perfect_fraction(h, PERFECT_RUN) >= 1.0,
        )
        .with_progress(1.0, |_: &SessionMetrics, h: &[AnswerEvent]| {
            perfect_fraction(h, PERFECT_RUN)
        }),
        AchievementDefinition::new(
            "scholar",
            "Scholar",
            "Reached 95% mastery after answering at least 20 questions",
            200,
            Rarity::Ultimate,
            |m: &SessionMetrics, _: &[AnswerEvent]| {
                m.total_answered() >= SCHOLAR_MIN_ANSWERS && m.mastery_level() >= SCHOLAR_MASTERY
            },
        )
        .with_progress(1.0, |m: &SessionMetrics, _: &[AnswerEvent]| {
            let volume = ratio(m.total_answered(), SCHOLAR_MIN_ANSWERS).min(1.0);
            volume * (m.mastery_level() / SCHOLAR_MASTERY).min(1.0)
        }),
        AchievementDefinition::new(
            "persistent",
            "Persistent",
            "Retried missions 5 times and learned from mistakes",
            25,
            Rarity::Common,
            |m: &SessionMetrics, _: &[AnswerEvent]| m.retries_count() >= PERSISTENT_RETRIES,
        )
        .with_progress(1.0, |m: &SessionMetrics, _: &[AnswerEvent]| {
            ratio(m.retries_count(), PERSISTENT_RETRIES)
        }),
        AchievementDefinition::new(
            "efficient",
            "Efficient",
            "Answered every mission with under 30 minutes of total answer time",
            60,
            Rarity::Rare,
            move |m: &SessionMetrics, _: &[AnswerEvent]| {
                m.total_answered() >= total_questions && m.total_time_spent() < EFFICIENT_SECONDS
            },
        ),
        AchievementDefinition::new(
            "explorer",
            "Explorer",
            "Used hints on at least 5 missions",
            30,
            Rarity::Uncommon,
            |m: &SessionMetrics, _: &[AnswerEvent]| m.hints_used_count() >= EXPLORER_HINTS,
        )
        .with_progress(1.0, |m: &SessionMetrics, _: &[AnswerEvent]| {
            ratio(m.hints_used_count(), EXPLORER_HINTS)
        }),
        AchievementDefinition::new(
            "consistent",
            "Consistent",
            "Kept a consistency score of 80%",
            70,
            Rarity::Rare,
            |m: &SessionMetrics, _: &[AnswerEvent]| m.consistency_score() >= CONSISTENT_SCORE,
        )
        .with_progress(CONSISTENT_SCORE, |m: &SessionMetrics, _: &[AnswerEvent]| {
            m.consistency_score()
        }),
    ]
}
