use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::repository::{PersistError, ProgressRepository, ProgressSnapshot};

/// Progress stored as a single pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ProgressRepository for JsonFileRepository {
    async fn load(&self) -> Result<Option<ProgressSnapshot>, PersistError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no saved progress");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };
        let snapshot = ProgressSnapshot::from_json(&text)?;
        info!(
            path = %self.path.display(),
            answered = snapshot.history.len(),
            "progress loaded"
        );
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &ProgressSnapshot) -> Result<(), PersistError> {
        let text = snapshot.to_json()?;
        write_atomic(&self.path, text.as_bytes()).await?;
        info!(
            path = %self.path.display(),
            answered = snapshot.history.len(),
            "progress saved"
        );
        Ok(())
    }
}

/// Serialize `value` as pretty JSON and atomically replace `path` with it.
///
/// # Errors
///
/// Returns `PersistError::Encode` if serialization fails or `PersistError::Io`
/// if the file cannot be written.
pub async fn write_json_atomic<T>(path: &Path, value: &T) -> Result<(), PersistError>
where
    T: Serialize + ?Sized + Sync,
{
    let text = serde_json::to_string_pretty(value).map_err(PersistError::Encode)?;
    write_atomic(path, text.as_bytes()).await
}

/// Write to a sibling temp file, flush it to disk, then rename over the target.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), PersistError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let temp_path = temp_path_for(path);
    let written = async {
        let mut file = tokio::fs::File::create(&temp_path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&temp_path, path).await
    }
    .await;

    if let Err(err) = written {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(err.into());
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_is_a_sibling() {
        let temp = temp_path_for(Path::new("/data/quiz_progress.json"));
        assert_eq!(temp, PathBuf::from("/data/quiz_progress.json.tmp"));
    }
}
