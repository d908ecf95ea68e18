use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use storage::{ProgressRepository, Storage, write_json_atomic};

use crate::error::ProgressError;
use crate::quiz::QuizSession;

/// Result of trying to resume a previous session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Restored {
        saved_at: DateTime<Utc>,
        answered: usize,
    },
    NoPriorSave,
}

/// Saves and resumes quiz progress through a `ProgressRepository`.
#[derive(Clone)]
pub struct ProgressService {
    repo: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(repo: Arc<dyn ProgressRepository>) -> Self {
        Self { repo }
    }

    #[must_use]
    pub fn from_storage(storage: &Storage) -> Self {
        Self::new(Arc::clone(&storage.progress))
    }

    /// Persist the session, stamped with the session clock's current time.
    ///
    /// Returns the `saved_at` timestamp written.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Persist` if the repository write fails. The
    /// previously stored snapshot stays in place.
    pub async fn save(&self, session: &QuizSession) -> Result<DateTime<Utc>, ProgressError> {
        let snapshot = session.snapshot();
        self.repo.save(&snapshot).await?;
        info!(
            answered = snapshot.history.len(),
            unlocked = snapshot.unlocked_achievement_ids.len(),
            "progress saved"
        );
        Ok(snapshot.saved_at)
    }

    /// Load the last snapshot into `session`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Persist` for an unreadable or malformed snapshot and
    /// `ProgressError::InvalidInput` if it does not fit the session's catalog or
    /// achievement table. The session is left untouched on any error.
    pub async fn load_into(&self, session: &mut QuizSession) -> Result<LoadOutcome, ProgressError> {
        let Some(snapshot) = self.repo.load().await? else {
            info!("no prior save; starting fresh");
            return Ok(LoadOutcome::NoPriorSave);
        };
        let saved_at = snapshot.saved_at;
        let answered = snapshot.history.len();
        if let Err(err) = session.restore(snapshot) {
            warn!(error = %err, "saved progress rejected");
            return Err(err.into());
        }
        Ok(LoadOutcome::Restored { saved_at, answered })
    }

    /// Write the session report to `path` as pretty JSON, replacing any
    /// existing file atomically.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Persist` if the report cannot be written.
    pub async fn export_report(&self, session: &QuizSession, path: &Path) -> Result<(), ProgressError> {
        let report = session.report();
        write_json_atomic(path, &report).await?;
        info!(path = %path.display(), session_id = %report.session_id, "report exported");
        Ok(())
    }
}
