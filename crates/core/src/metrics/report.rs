use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::QuestionCatalog;
use crate::metrics::SessionMetrics;
use crate::model::AnswerEvent;

/// Named band of overall accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MasteryTier {
    Developing,
    Basic,
    Intermediate,
    Advanced,
    Expert,
}

impl MasteryTier {
    #[must_use]
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= 0.9 {
            Self::Expert
        } else if accuracy >= 0.8 {
            Self::Advanced
        } else if accuracy >= 0.7 {
            Self::Intermediate
        } else if accuracy >= 0.6 {
            Self::Basic
        } else {
            Self::Developing
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Developing => "Developing",
            Self::Basic => "Basic",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
        }
    }
}

impl fmt::Display for MasteryTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Flat view of the headline scores, for reports and dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub accuracy: f64,
    pub mastery_level: f64,
    pub average_time: f64,
    pub best_streak: u32,
    pub consistency: f64,
    pub learning_velocity: f64,
    pub hint_efficiency: f64,
    pub time_efficiency: f64,
}

impl PerformanceReport {
    #[must_use]
    pub fn from_metrics(metrics: &SessionMetrics) -> Self {
        Self {
            accuracy: metrics.accuracy(),
            mastery_level: metrics.mastery_level(),
            average_time: metrics.average_time_per_question(),
            best_streak: metrics.best_streak(),
            consistency: metrics.consistency_score(),
            learning_velocity: metrics.learning_velocity(),
            hint_efficiency: metrics.hint_efficiency(),
            time_efficiency: metrics.time_efficiency(),
        }
    }
}

/// Answers and accuracy for one catalog category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAccuracy {
    pub category: String,
    pub answered: u32,
    pub correct: u32,
}

impl CategoryAccuracy {
    /// `None` until the category has been answered at least once.
    #[must_use]
    pub fn accuracy(&self) -> Option<f64> {
        (self.answered > 0).then(|| f64::from(self.correct) / f64::from(self.answered))
    }
}

/// Per-category tallies, in the catalog's category order.
///
/// Events whose question is not in the catalog are skipped.
#[must_use]
pub fn category_accuracy(history: &[AnswerEvent], catalog: &QuestionCatalog) -> Vec<CategoryAccuracy> {
    let mut rows: Vec<CategoryAccuracy> = catalog
        .categories()
        .into_iter()
        .map(|category| CategoryAccuracy {
            category: category.to_string(),
            answered: 0,
            correct: 0,
        })
        .collect();

    for event in history {
        let Some(question) = catalog.get(event.question_id) else {
            continue;
        };
        if let Some(row) = rows.iter_mut().find(|r| r.category == question.category()) {
            row.answered = row.answered.saturating_add(1);
            if event.is_correct {
                row.correct = row.correct.saturating_add(1);
            }
        }
    }

    rows
}
