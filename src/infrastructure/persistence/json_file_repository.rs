//! JSON file statblock store
//!
//! The whole catalogue lives in one pretty-printed JSON array. Writes go to
//! a temp file that is renamed over the original.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::application::ports::outbound::{RepositoryError, StatblockRepositoryPort};
use crate::domain::entities::Statblock;

pub struct JsonFileStatblockRepository {
    path: PathBuf,
    /// Held for every file access so only one writer runs at a time
    lock: Mutex<()>,
}

impl JsonFileStatblockRepository {
    /// Open the store, creating the parent directory and an empty
    /// catalogue when the file does not exist yet
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let repository = Self {
            path: path.into(),
            lock: Mutex::new(()),
        };
        repository.ensure_file().await?;
        Ok(repository)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_file(&self) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                RepositoryError::Io(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        match tokio::fs::metadata(&self.path).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Creating empty statblock file");
                self.write_file(&[]).await
            }
            Err(e) => Err(RepositoryError::Io(format!(
                "Failed to inspect '{}': {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn read_file(&self) -> Result<Vec<Statblock>, RepositoryError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(RepositoryError::Io(format!(
                    "Failed to read '{}': {}",
                    self.path.display(),
                    e
                )))
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            RepositoryError::Serialization(format!(
                "Failed to parse '{}': {}",
                self.path.display(),
                e
            ))
        })
    }

    async fn write_file(&self, statblocks: &[Statblock]) -> Result<(), RepositoryError> {
        let content = serde_json::to_string_pretty(statblocks)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &content).await.map_err(|e| {
            RepositoryError::Io(format!(
                "Failed to write temp file '{}': {}",
                temp_path.display(),
                e
            ))
        })?;

        if let Err(e) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(RepositoryError::Io(format!(
                "Failed to rename '{}' to '{}': {}",
                temp_path.display(),
                self.path.display(),
                e
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl StatblockRepositoryPort for JsonFileStatblockRepository {
    async fn load_all(&self) -> Result<Vec<Statblock>, RepositoryError> {
        let _guard = self.lock.lock().await;
        self.read_file().await
    }

    #[instrument(skip(self, statblocks), fields(count = statblocks.len()))]
    async fn save_all(&self, statblocks: &[Statblock]) -> Result<(), RepositoryError> {
        let _guard = self.lock.lock().await;
        self.write_file(statblocks).await
    }
}
