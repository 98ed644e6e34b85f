//! Shared application state

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::application::services::StatblockServiceImpl;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::persistence::JsonFileStatblockRepository;

/// Shared application state
pub struct AppState {
    pub statblock_service: StatblockServiceImpl,
}

impl AppState {
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let repository = JsonFileStatblockRepository::new(&config.data_file)
            .await
            .with_context(|| {
                format!("Failed to open statblock store at {}", config.data_file.display())
            })?;

        let statblock_service = StatblockServiceImpl::new(Arc::new(repository));

        Ok(Self { statblock_service })
    }
}
