//! Achievement rule table and unlock engine.

mod builtin;
mod definition;
mod engine;

pub use builtin::{builtin_achievements, recent_accuracy};
pub use definition::{AchievementDefinition, AchievementProgress, Measure, Predicate, Rarity};
pub use engine::AchievementEngine;
