//! Application state management

use std::sync::Arc;

use crate::config::Config;

/// Error type for state initialization
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to create directory: {0}")]
    CreateDir(#[from] std::io::Error),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
}

impl AppState {
    /// Create the application state.
    ///
    /// Ensures the staging and output directories exist so request handlers
    /// and the sweeper can assume them.
    pub async fn new(config: Config) -> Result<Self, StateError> {
        tokio::fs::create_dir_all(&config.storage.upload_dir).await?;
        tokio::fs::create_dir_all(&config.storage.output_dir).await?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config }),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
