//! Learning modes and adaptive difficulty.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::Difficulty;

/// How a play session presents questions and help.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningMode {
    #[default]
    Adaptive,
    Quiz,
    Study,
    Review,
}

/// Order in which catalog questions are served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionOrder {
    Sequential,
    Random,
    /// Least accurate categories first; unanswered categories count as weakest.
    WeakestFirst,
}

/// Knobs a mode turns on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSettings {
    pub hints_enabled: bool,
    pub question_order: QuestionOrder,
    /// `None` means unlimited retries.
    pub retry_limit: Option<u32>,
    pub detailed_explanations: bool,
    pub adaptive_difficulty: bool,
}

impl LearningMode {
    pub const ALL: [LearningMode; 4] = [Self::Adaptive, Self::Quiz, Self::Study, Self::Review];

    #[must_use]
    pub const fn settings(self) -> ModeSettings {
        match self {
            Self::Adaptive => ModeSettings {
                hints_enabled: true,
                question_order: QuestionOrder::Sequential,
                retry_limit: Some(2),
                detailed_explanations: false,
                adaptive_difficulty: true,
            },
            Self::Quiz => ModeSettings {
                hints_enabled: false,
                question_order: QuestionOrder::Random,
                retry_limit: Some(1),
                detailed_explanations: false,
                adaptive_difficulty: false,
            },
            Self::Study => ModeSettings {
                hints_enabled: true,
                question_order: QuestionOrder::Sequential,
                retry_limit: None,
                detailed_explanations: true,
                adaptive_difficulty: false,
            },
            Self::Review => ModeSettings {
                hints_enabled: true,
                question_order: QuestionOrder::WeakestFirst,
                retry_limit: None,
                detailed_explanations: true,
                adaptive_difficulty: true,
            },
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Adaptive => "adaptive",
            Self::Quiz => "quiz",
            Self::Study => "study",
            Self::Review => "review",
        }
    }
}

impl fmt::Display for LearningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError(String);

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown learning mode {:?} (expected adaptive, quiz, study or review)",
            self.0
        )
    }
}

impl std::error::Error for ParseModeError {}

impl FromStr for LearningMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == wanted)
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}

/// Suggests a difficulty level from overall accuracy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyAdvisor {
    hard_threshold: f64,
    normal_threshold: f64,
}

impl Default for DifficultyAdvisor {
    fn default() -> Self {
        Self {
            hard_threshold: 0.85,
            normal_threshold: 0.7,
        }
    }
}

impl DifficultyAdvisor {
    #[must_use]
    pub fn recommend(&self, accuracy: f64) -> Difficulty {
        if accuracy >= self.hard_threshold {
            Difficulty::Hard
        } else if accuracy >= self.normal_threshold {
            Difficulty::Normal
        } else {
            Difficulty::Easy
        }
    }

    /// Whether hints should be offered under `settings` at the given accuracy.
    ///
    /// Adaptive modes withhold hints from players already performing at the hard level.
    #[must_use]
    pub fn hints_available(&self, settings: &ModeSettings, accuracy: f64, answered: u32) -> bool {
        if !settings.hints_enabled {
            return false;
        }
        if settings.adaptive_difficulty && answered > 0 {
            return self.recommend(accuracy) != Difficulty::Hard;
        }
        true
    }
}
