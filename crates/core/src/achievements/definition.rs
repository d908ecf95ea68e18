use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::metrics::SessionMetrics;
use crate::model::{AchievementId, AnswerEvent};

/// Pure unlock condition over the current metrics and history.
pub type Predicate = Arc<dyn Fn(&SessionMetrics, &[AnswerEvent]) -> bool + Send + Sync>;

/// Continuous quantity behind an achievement, compared against `required`.
pub type Measure = Arc<dyn Fn(&SessionMetrics, &[AnswerEvent]) -> f64 + Send + Sync>;

//
// ─── RARITY ────────────────────────────────────────────────────────────────────
//

/// Cosmetic rarity tag, ordered from most to least common.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
    Ultimate,
}

impl Rarity {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
            Self::Mythic => "mythic",
            Self::Ultimate => "ultimate",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//
// ─── DEFINITION ────────────────────────────────────────────────────────────────
//

#[derive(Clone)]
struct ProgressRule {
    measure: Measure,
    required: f64,
}

/// One entry of the achievement rule table.
///
/// The predicate is stored as a value next to its metadata; definitions are
/// cheap to clone because the closures are shared.
#[derive(Clone)]
pub struct AchievementDefinition {
    id: AchievementId,
    display_name: String,
    description: String,
    points: u32,
    rarity: Rarity,
    predicate: Predicate,
    progress: Option<ProgressRule>,
}

impl AchievementDefinition {
    #[must_use]
    pub fn new(
        id: impl Into<AchievementId>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        points: u32,
        rarity: Rarity,
        predicate: impl Fn(&SessionMetrics, &[AnswerEvent]) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: description.into(),
            points,
            rarity,
            predicate: Arc::new(predicate),
            progress: None,
        }
    }

    /// Attach a continuous measure so progress can be reported as a fraction.
    ///
    /// `measure` should return a value in `[0, 1]`; `required` is the level the
    /// predicate asks for, in the same units.
    #[must_use]
    pub fn with_progress(
        mut self,
        required: f64,
        measure: impl Fn(&SessionMetrics, &[AnswerEvent]) -> f64 + Send + Sync + 'static,
    ) -> Self {
        self.progress = Some(ProgressRule {
            measure: Arc::new(measure),
            required,
        });
        self
    }

    #[must_use]
    pub fn id(&self) -> &AchievementId {
        &self.id
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn rarity(&self) -> Rarity {
        self.rarity
    }

    #[must_use]
    pub fn is_satisfied(&self, metrics: &SessionMetrics, history: &[AnswerEvent]) -> bool {
        (self.predicate)(metrics, history)
    }

    #[must_use]
    pub fn has_continuous_progress(&self) -> bool {
        self.progress.is_some()
    }

    /// Progress towards this achievement, ignoring whether it is already unlocked.
    #[must_use]
    pub(crate) fn measure(&self, metrics: &SessionMetrics, history: &[AnswerEvent]) -> (f64, f64) {
        match &self.progress {
            Some(rule) => {
                let value = (rule.measure)(metrics, history);
                let value = if value.is_finite() {
                    value.clamp(0.0, 1.0)
                } else {
                    0.0
                };
                (value, rule.required)
            }
            None => {
                let done = self.is_satisfied(metrics, history);
                (if done { 1.0 } else { 0.0 }, 1.0)
            }
        }
    }
}

impl fmt::Debug for AchievementDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AchievementDefinition")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("points", &self.points)
            .field("rarity", &self.rarity)
            .field("continuous", &self.progress.is_some())
            .finish_non_exhaustive()
    }
}

/// Progress report for a single achievement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AchievementProgress {
    pub unlocked: bool,
    /// Fraction in `[0, 1]`.
    pub progress: f64,
    pub required: f64,
}
