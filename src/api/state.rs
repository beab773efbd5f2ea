use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::model::ModelRegistry;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<AppConfig>,

    /// The one model registry; handlers never hold a lock across awaits
    pub registry: Arc<ModelRegistry>,

    /// Application start time
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: AppConfig, registry: ModelRegistry) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            start_time: Utc::now(),
        }
    }

    /// Open the registry on the configured model directory
    pub async fn open(config: AppConfig) -> crate::error::Result<Self> {
        let registry = ModelRegistry::open(config.model_dir.clone()).await?;
        Ok(Self::new(config, registry))
    }

    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.start_time).num_seconds()
    }
}
