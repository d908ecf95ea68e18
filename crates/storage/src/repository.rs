use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::metrics::SessionMetrics;
use quiz_core::model::{AchievementId, AnswerEvent};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by persistence adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PersistError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed snapshot: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("could not encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("connection error: {0}")]
    Connection(String),
}

/// Persisted shape of a play session.
///
/// Unknown top-level keys are ignored on decode. Every field is required except
/// `history`, which defaults to empty for saves that predate history tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub metrics: SessionMetrics,
    #[serde(default)]
    pub history: Vec<AnswerEvent>,
    pub unlocked_achievement_ids: BTreeSet<AchievementId>,
    pub saved_at: DateTime<Utc>,
}

impl ProgressSnapshot {
    #[must_use]
    pub fn new(
        metrics: SessionMetrics,
        history: Vec<AnswerEvent>,
        unlocked_achievement_ids: BTreeSet<AchievementId>,
        saved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            metrics,
            history,
            unlocked_achievement_ids,
            saved_at,
        }
    }

    /// Pretty JSON text of the snapshot.
    ///
    /// # Errors
    ///
    /// Returns `PersistError::Encode` if serialization fails.
    pub fn to_json(&self) -> Result<String, PersistError> {
        serde_json::to_string_pretty(self).map_err(PersistError::Encode)
    }

    /// Parse a snapshot from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `PersistError::Malformed` for invalid JSON or a missing required key.
    pub fn from_json(text: &str) -> Result<Self, PersistError> {
        serde_json::from_str(text).map_err(PersistError::Malformed)
    }
}

/// Load/save contract the quiz needs from its host.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the last saved snapshot.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if a snapshot exists but cannot be read or decoded.
    /// A missing snapshot is `Ok(None)`.
    async fn load(&self) -> Result<Option<ProgressSnapshot>, PersistError>;

    /// Replace the stored snapshot. Either the new snapshot is stored or the old
    /// one remains.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if the snapshot cannot be written.
    async fn save(&self, snapshot: &ProgressSnapshot) -> Result<(), PersistError>;
}

/// Simple in-memory repository for tests and ephemeral sessions.
///
/// Keeps the encoded JSON text, so the codec is exercised on every round trip.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    stored: Arc<Mutex<Option<String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed raw JSON text, as if a previous run had written it.
    ///
    /// # Errors
    ///
    /// Returns `PersistError::Connection` if the lock is poisoned.
    pub fn put_raw(&self, text: impl Into<String>) -> Result<(), PersistError> {
        let mut guard = self
            .stored
            .lock()
            .map_err(|e| PersistError::Connection(e.to_string()))?;
        *guard = Some(text.into());
        Ok(())
    }

    /// Raw JSON text currently stored, if any.
    ///
    /// # Errors
    ///
    /// Returns `PersistError::Connection` if the lock is poisoned.
    pub fn raw(&self) -> Result<Option<String>, PersistError> {
        let guard = self
            .stored
            .lock()
            .map_err(|e| PersistError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load(&self) -> Result<Option<ProgressSnapshot>, PersistError> {
        match self.raw()? {
            Some(text) => ProgressSnapshot::from_json(&text).map(Some),
            None => Ok(None),
        }
    }

    async fn save(&self, snapshot: &ProgressSnapshot) -> Result<(), PersistError> {
        let text = snapshot.to_json()?;
        self.put_raw(text)
    }
}

/// Holds the progress repository behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            progress: Arc::new(InMemoryRepository::new()),
        }
    }

    #[must_use]
    pub fn json_file(path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            progress: Arc::new(crate::json_file::JsonFileRepository::new(path)),
        }
    }
}
