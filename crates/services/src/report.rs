use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use quiz_core::achievements::{AchievementDefinition, Rarity};
use quiz_core::learning::LearningMode;
use quiz_core::metrics::{CategoryAccuracy, MasteryTier, PerformanceReport};
use quiz_core::model::AchievementId;

/// One unlocked achievement as shown in a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EarnedAchievement {
    pub id: AchievementId,
    pub name: String,
    pub description: String,
    pub points: u32,
    pub rarity: Rarity,
}

impl From<&AchievementDefinition> for EarnedAchievement {
    fn from(def: &AchievementDefinition) -> Self {
        Self {
            id: def.id().clone(),
            name: def.display_name().to_string(),
            description: def.description().to_string(),
            points: def.points(),
            rarity: def.rarity(),
        }
    }
}

/// End-of-session summary, serializable for export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub mode: LearningMode,
    pub started_at: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
    pub elapsed_seconds: f64,
    pub questions_total: usize,
    pub answered: u32,
    pub correct: u32,
    pub mastery_tier: MasteryTier,
    pub performance: PerformanceReport,
    pub categories: Vec<CategoryAccuracy>,
    pub achievements: Vec<EarnedAchievement>,
    pub total_points: u32,
}

impl SessionReport {
    /// Pretty JSON rendering of the report.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
