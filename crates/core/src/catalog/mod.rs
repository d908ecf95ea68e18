//! Read-only question catalog.

mod builtin;

use std::collections::HashMap;

use crate::error::{CatalogError, InvalidInputError};
use crate::model::{Difficulty, QuestionDraft, QuestionId, QuestionRecord};

/// Ordered, immutable collection of questions with unique ids.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionCatalog {
    questions: Vec<QuestionRecord>,
    index: HashMap<QuestionId, usize>,
}

impl QuestionCatalog {
    /// Validate every draft and build the catalog in declared order.
    ///
    /// # Errors
    ///
    /// Returns the first `CatalogError` raised by a record, or
    /// `CatalogError::DuplicateQuestion` if two drafts share an id.
    pub fn new(drafts: impl IntoIterator<Item = QuestionDraft>) -> Result<Self, CatalogError> {
        let mut questions = Vec::new();
        let mut index = HashMap::new();
        for draft in drafts {
            let record = draft.validate()?;
            if index.insert(record.id(), questions.len()).is_some() {
                return Err(CatalogError::DuplicateQuestion(record.id()));
            }
            questions.push(record);
        }
        Ok(Self { questions, index })
    }

    /// The embedded AI-concepts mission table.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the embedded table is inconsistent.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(builtin::drafts())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&QuestionRecord> {
        self.index.get(&id).map(|&i| &self.questions[i])
    }

    /// Like `get`, but an unknown id is an input error.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInputError::UnknownQuestion` if the id is not in the catalog.
    pub fn require(&self, id: QuestionId) -> Result<&QuestionRecord, InvalidInputError> {
        self.get(id).ok_or(InvalidInputError::UnknownQuestion(id))
    }

    #[must_use]
    pub fn contains(&self, id: QuestionId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuestionRecord> {
        self.questions.iter()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<QuestionId> {
        self.questions.iter().map(QuestionRecord::id).collect()
    }

    /// Distinct categories in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for q in &self.questions {
            if !seen.contains(&q.category()) {
                seen.push(q.category());
            }
        }
        seen
    }

    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a QuestionRecord> {
        self.questions.iter().filter(move |q| q.category() == category)
    }

    pub fn by_difficulty(&self, difficulty: Difficulty) -> impl Iterator<Item = &QuestionRecord> {
        self.questions
            .iter()
            .filter(move |q| q.difficulty() == difficulty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(id: u32, category: &str) -> QuestionDraft {
        QuestionDraft {
            id: QuestionId::new(id),
            title: format!("Q{id}"),
            prompt: format!("Prompt {id}"),
            concept: String::new(),
            options: vec![("A".into(), "a".into()), ("B".into(), "b".into())],
            correct_option: "A".into(),
            hints: vec![],
            explanation: None,
            category: category.into(),
            difficulty: Difficulty::Normal,
            learning_objectives: vec![],
        }
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = QuestionCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), 12);
        for q in catalog.iter() {
            assert!(q.options().contains_key(q.correct_option()));
            assert!(!q.hints().is_empty());
        }
        assert_eq!(catalog.by_difficulty(Difficulty::Expert).count(), 1);
    }

    #[test]
    fn preserves_declared_order() {
        let catalog =
            QuestionCatalog::new(vec![draft(3, "x"), draft(1, "y"), draft(2, "x")]).unwrap();
        assert_eq!(
            catalog.ids(),
            vec![QuestionId::new(3), QuestionId::new(1), QuestionId::new(2)]
        );
        assert_eq!(catalog.categories(), vec!["x", "y"]);
        assert_eq!(catalog.by_category("x").count(), 2);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = QuestionCatalog::new(vec![draft(1, "x"), draft(1, "y")]).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateQuestion(QuestionId::new(1)));
    }

    #[test]
    fn require_reports_unknown_ids() {
        let catalog = QuestionCatalog::new(vec![draft(1, "x")]).unwrap();
        assert!(catalog.require(QuestionId::new(1)).is_ok());
        assert_eq!(
            catalog.require(QuestionId::new(9)).unwrap_err(),
            InvalidInputError::UnknownQuestion(QuestionId::new(9))
        );
    }
}
