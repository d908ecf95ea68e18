use std::collections::{BTreeSet, HashSet};

use crate::achievements::definition::{AchievementDefinition, AchievementProgress};
use crate::error::{CatalogError, InvalidInputError};
use crate::metrics::SessionMetrics;
use crate::model::{AchievementId, AnswerEvent};

/// Evaluates a fixed rule table and remembers which achievements have fired.
///
/// Each achievement moves `LOCKED -> UNLOCKED` at most once per session; only
/// [`AchievementEngine::reset`] returns it to `LOCKED`.
#[derive(Debug, Clone)]
pub struct AchievementEngine {
    definitions: Vec<AchievementDefinition>,
    unlocked: BTreeSet<AchievementId>,
}

impl AchievementEngine {
    /// Build an engine over a rule table, evaluated in the given order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateAchievement` if two rules share an id and
    /// `CatalogError::EmptyAchievementId` for a blank id.
    pub fn new(definitions: Vec<AchievementDefinition>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for def in &definitions {
            if def.id().as_str().trim().is_empty() {
                return Err(CatalogError::EmptyAchievementId);
            }
            if !seen.insert(def.id().clone()) {
                return Err(CatalogError::DuplicateAchievement(def.id().clone()));
            }
        }
        Ok(Self {
            definitions,
            unlocked: BTreeSet::new(),
        })
    }

    /// Evaluate every locked rule and unlock those whose predicate holds.
    ///
    /// Returns the newly unlocked definitions in rule-table order. Calling again
    /// without new answers returns an empty list.
    pub fn check(
        &mut self,
        metrics: &SessionMetrics,
        history: &[AnswerEvent],
    ) -> Vec<AchievementDefinition> {
        let mut newly = Vec::new();
        for def in &self.definitions {
            if self.unlocked.contains(def.id()) {
                continue;
            }
            if def.is_satisfied(metrics, history) {
                self.unlocked.insert(def.id().clone());
                newly.push(def.clone());
            }
        }
        newly
    }

    /// Fractional progress towards one achievement.
    ///
    /// Unlocked achievements always report full progress.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInputError::UnknownAchievement` if the id is not in the table.
    pub fn get_progress(
        &self,
        id: &str,
        metrics: &SessionMetrics,
        history: &[AnswerEvent],
    ) -> Result<AchievementProgress, InvalidInputError> {
        let def = self
            .definition(id)
            .ok_or_else(|| InvalidInputError::UnknownAchievement(AchievementId::new(id)))?;
        let unlocked = self.unlocked.contains(def.id());
        let (progress, required) = def.measure(metrics, history);
        Ok(AchievementProgress {
            unlocked,
            progress: if unlocked { 1.0 } else { progress },
            required,
        })
    }

    /// Sum of points over unlocked achievements.
    #[must_use]
    pub fn total_points(&self) -> u32 {
        self.definitions
            .iter()
            .filter(|def| self.unlocked.contains(def.id()))
            .map(AchievementDefinition::points)
            .fold(0_u32, u32::saturating_add)
    }

    /// Lock every achievement again. Used when a new session starts.
    pub fn reset(&mut self) {
        self.unlocked.clear();
    }

    /// Adopt a persisted set of unlocked ids.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInputError::UnknownAchievement` for the first id missing from
    /// the table. The engine is unchanged on error.
    pub fn restore(
        &mut self,
        ids: impl IntoIterator<Item = AchievementId>,
    ) -> Result<(), InvalidInputError> {
        let mut restored = BTreeSet::new();
        for id in ids {
            if self.definition(id.as_str()).is_none() {
                return Err(InvalidInputError::UnknownAchievement(id));
            }
            restored.insert(id);
        }
        self.unlocked = restored;
        Ok(())
    }

    #[must_use]
    pub fn definition(&self, id: &str) -> Option<&AchievementDefinition> {
        self.definitions.iter().find(|def| def.id().as_str() == id)
    }

    #[must_use]
    pub fn definitions(&self) -> &[AchievementDefinition] {
        &self.definitions
    }

    #[must_use]
    pub fn unlocked_ids(&self) -> &BTreeSet<AchievementId> {
        &self.unlocked
    }

    #[must_use]
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.iter().any(|unlocked| unlocked.as_str() == id)
    }

    /// Unlocked definitions in rule-table order.
    #[must_use]
    pub fn earned(&self) -> Vec<&AchievementDefinition> {
        self.definitions
            .iter()
            .filter(|def| self.unlocked.contains(def.id()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::Rarity;
    use crate::metrics::MetricsConfig;
    use crate::model::QuestionId;
    use crate::time::fixed_now;

    fn first_victory() -> AchievementDefinition {
        AchievementDefinition::new(
            "first_victory",
            "First Victory",
            "Answer a question correctly",
            10,
            Rarity::Common,
            |m, _| m.total_correct() >= 1,
        )
    }

    fn two_correct() -> AchievementDefinition {
        AchievementDefinition::new(
            "double",
            "Double",
            "Two correct answers",
            20,
            Rarity::Uncommon,
            |m, _| m.total_correct() >= 2,
        )
        .with_progress(1.0, |m, _| f64::from(m.total_correct()) / 2.0)
    }

    fn state(pattern: &[bool]) -> (SessionMetrics, Vec<AnswerEvent>) {
        let history: Vec<_> = pattern
            .iter()
            .map(|&c| AnswerEvent::new(QuestionId::new(1), c, 5.0, false, false, fixed_now()))
            .collect();
        let metrics = SessionMetrics::from_history(&history, &MetricsConfig::default());
        (metrics, history)
    }

    #[test]
    fn first_victory_fires_once() {
        let mut engine = AchievementEngine::new(vec![first_victory()]).unwrap();
        let (m, h) = state(&[true]);

        let unlocked = engine.check(&m, &h);
        assert_eq!(unlocked.len(), 1);
        assert_eq!(unlocked[0].id(), &AchievementId::new("first_victory"));

        assert!(engine.check(&m, &h).is_empty());
    }

    #[test]
    fn nothing_fires_before_conditions_hold() {
        let mut engine = AchievementEngine::new(vec![first_victory()]).unwrap();
        let (m, h) = state(&[false]);
        assert!(engine.check(&m, &h).is_empty());
        assert_eq!(engine.total_points(), 0);
    }

    #[test]
    fn simultaneous_unlocks_share_one_check() {
        let mut engine = AchievementEngine::new(vec![two_correct(), first_victory()]).unwrap();
        let (m, h) = state(&[true, true]);

        let ids: Vec<_> = engine
            .check(&m, &h)
            .iter()
            .map(|d| d.id().to_string())
            .collect();
        assert_eq!(ids, vec!["double", "first_victory"]);
        assert_eq!(engine.total_points(), 30);
    }

    #[test]
    fn unlocked_achievement_survives_worse_metrics() {
        let mut engine = AchievementEngine::new(vec![first_victory()]).unwrap();
        let (m, h) = state(&[true]);
        engine.check(&m, &h);

        let (empty_m, empty_h) = state(&[]);
        assert!(engine.check(&empty_m, &empty_h).is_empty());
        assert!(engine.is_unlocked("first_victory"));
    }

    #[test]
    fn progress_for_continuous_and_boolean_rules() {
        let engine = AchievementEngine::new(vec![first_victory(), two_correct()]).unwrap();
        let (m, h) = state(&[true]);

        let p = engine.get_progress("double", &m, &h).unwrap();
        assert!(!p.unlocked);
        assert_eq!(p.progress, 0.5);
        assert_eq!(p.required, 1.0);

        let p = engine.get_progress("first_victory", &m, &h).unwrap();
        assert_eq!(p.progress, 1.0);
        assert!(!p.unlocked);

        let (m0, h0) = state(&[false]);
        assert_eq!(engine.get_progress("first_victory", &m0, &h0).unwrap().progress, 0.0);
    }

    #[test]
    fn unlocked_progress_is_full() {
        let mut engine = AchievementEngine::new(vec![two_correct()]).unwrap();
        let (m, h) = state(&[true, true]);
        engine.check(&m, &h);

        let (m1, h1) = state(&[true]);
        let p = engine.get_progress("double", &m1, &h1).unwrap();
        assert!(p.unlocked);
        assert_eq!(p.progress, 1.0);
    }

    #[test]
    fn unknown_achievement_is_an_error() {
        let engine = AchievementEngine::new(vec![first_victory()]).unwrap();
        let (m, h) = state(&[]);
        let err = engine.get_progress("ghost", &m, &h).unwrap_err();
        assert_eq!(
            err,
            InvalidInputError::UnknownAchievement(AchievementId::new("ghost"))
        );
    }

    #[test]
    fn reset_locks_everything() {
        let mut engine = AchievementEngine::new(vec![first_victory()]).unwrap();
        let (m, h) = state(&[true]);
        engine.check(&m, &h);
        engine.reset();
        assert!(engine.unlocked_ids().is_empty());
        assert_eq!(engine.total_points(), 0);
        assert_eq!(engine.check(&m, &h).len(), 1);
    }

    #[test]
    fn restore_is_all_or_nothing() {
        let mut engine = AchievementEngine::new(vec![first_victory(), two_correct()]).unwrap();
        engine
            .restore(vec![AchievementId::new("double")])
            .unwrap();
        assert_eq!(engine.total_points(), 20);

        let err = engine
            .restore(vec![AchievementId::new("first_victory"), AchievementId::new("ghost")])
            .unwrap_err();
        assert!(matches!(err, InvalidInputError::UnknownAchievement(_)));
        assert!(engine.is_unlocked("double"));
        assert!(!engine.is_unlocked("first_victory"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = AchievementEngine::new(vec![first_victory(), first_victory()]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateAchievement(_)));
    }

    #[test]
    fn earned_follows_table_order() {
        let mut engine = AchievementEngine::new(vec![two_correct(), first_victory()]).unwrap();
        let (m, h) = state(&[true, true]);
        engine.check(&m, &h);
        let names: Vec<_> = engine.earned().iter().map(|d| d.display_name()).collect();
        assert_eq!(names, vec!["Double", "First Victory"]);
    }
}
