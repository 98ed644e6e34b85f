use async_trait::async_trait;

use crate::domain::entities::Statblock;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Storage error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Whole-catalogue storage. Implementations serialize writers.
#[async_trait]
pub trait StatblockRepositoryPort: Send + Sync {
    async fn load_all(&self) -> Result<Vec<Statblock>, RepositoryError>;
    async fn save_all(&self, statblocks: &[Statblock]) -> Result<(), RepositoryError>;

    /// Case-insensitive lookup by trimmed name
    async fn find_by_name(&self, name: &str) -> Result<Option<Statblock>, RepositoryError> {
        Ok(self
            .load_all()
            .await?
            .into_iter()
            .find(|stat| stat.is_named(name)))
    }
}
