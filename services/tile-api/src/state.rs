//! Application state and shared resources.

use std::sync::Arc;

use tracing::warn;

use storage::{ActivityProvider, InMemoryActivityProvider, TileCache};
use trackmap_common::TileResult;

use crate::config::ServiceConfig;

/// Shared application state, owned by the server and passed by reference to
/// every request handler.
pub struct AppState {
    pub cache: TileCache,
    pub provider: Arc<dyn ActivityProvider>,
    pub config: ServiceConfig,
}

impl AppState {
    /// Build state from configuration, loading the activity fixture when one
    /// is configured.
    pub fn new(config: ServiceConfig) -> TileResult<Self> {
        let provider: Arc<dyn ActivityProvider> = match &config.activities_file {
            Some(path) => Arc::new(InMemoryActivityProvider::from_json_file(path)?),
            None => {
                warn!("ACTIVITIES_FILE not set; serving empty tiles");
                Arc::new(InMemoryActivityProvider::empty())
            }
        };

        Ok(Self::with_provider(config, provider))
    }

    /// Build state around an explicit provider (used by tests and by
    /// deployments wiring their own provider implementation).
    pub fn with_provider(config: ServiceConfig, provider: Arc<dyn ActivityProvider>) -> Self {
        Self {
            cache: TileCache::new(config.cache_capacity_bytes),
            provider,
            config,
        }
    }
}
