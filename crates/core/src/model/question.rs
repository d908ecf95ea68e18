use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, InvalidInputError};
use crate::model::ids::QuestionId;

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty tag carried by each question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    Expert,
}

impl Difficulty {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
            Self::Expert => "expert",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated question as authored in a static table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub id: QuestionId,
    pub title: String,
    pub prompt: String,
    pub concept: String,
    pub options: Vec<(String, String)>,
    pub correct_option: String,
    pub hints: Vec<String>,
    pub explanation: Option<String>,
    pub category: String,
    pub difficulty: Difficulty,
    pub learning_objectives: Vec<String>,
}

impl QuestionDraft {
    /// Check the record invariants and freeze the question.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptyPrompt` if the prompt is blank,
    /// `CatalogError::OptionCount` unless there are 2 to 4 distinct options, and
    /// `CatalogError::CorrectOptionMissing` if the correct label is not an option.
    pub fn validate(self) -> Result<QuestionRecord, CatalogError> {
        if self.prompt.trim().is_empty() {
            return Err(CatalogError::EmptyPrompt(self.id));
        }

        let declared = self.options.len();
        let options: BTreeMap<String, String> = self.options.into_iter().collect();
        if options.len() != declared || !(2..=4).contains(&options.len()) {
            return Err(CatalogError::OptionCount {
                id: self.id,
                count: options.len(),
            });
        }

        if !options.contains_key(&self.correct_option) {
            return Err(CatalogError::CorrectOptionMissing {
                id: self.id,
                correct: self.correct_option,
            });
        }

        Ok(QuestionRecord {
            id: self.id,
            title: self.title,
            prompt: self.prompt,
            concept: self.concept,
            options,
            correct_option: self.correct_option,
            hints: self.hints,
            explanation: self.explanation.filter(|text| !text.trim().is_empty()),
            category: self.category,
            difficulty: self.difficulty,
            learning_objectives: self.learning_objectives,
        })
    }
}

//
// ─── RECORD ────────────────────────────────────────────────────────────────────
//

/// Immutable question. `correct_option` is always a key of `options`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    id: QuestionId,
    title: String,
    prompt: String,
    concept: String,
    options: BTreeMap<String, String>,
    correct_option: String,
    hints: Vec<String>,
    explanation: Option<String>,
    category: String,
    difficulty: Difficulty,
    learning_objectives: Vec<String>,
}

impl QuestionRecord {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn concept(&self) -> &str {
        &self.concept
    }

    /// Option labels mapped to the text explaining each choice.
    #[must_use]
    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.correct_option
    }

    #[must_use]
    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn learning_objectives(&self) -> &[String] {
        &self.learning_objectives
    }

    /// Whether `label` is the correct option.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInputError::UnknownOption` if `label` is not one of the options.
    pub fn is_correct(&self, label: &str) -> Result<bool, InvalidInputError> {
        if !self.options.contains_key(label) {
            return Err(InvalidInputError::UnknownOption {
                question_id: self.id,
                label: label.to_string(),
            });
        }
        Ok(label == self.correct_option)
    }

    /// Explanatory text attached to an option, if the label exists.
    #[must_use]
    pub fn option_text(&self, label: &str) -> Option<&str> {
        self.options.get(label).map(String::as_str)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
