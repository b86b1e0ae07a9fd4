//! Service configuration parsed from environment variables.

use std::env;

use storage::DEFAULT_CACHE_CAPACITY;

/// Runtime configuration for the tile service.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Tile cache capacity in bytes of encoded PNG data.
    pub cache_capacity_bytes: u64,

    /// Wall-clock budget for a single tile render in milliseconds.
    pub render_deadline_ms: u64,

    /// Optional JSON activity fixture backing the in-memory provider.
    pub activities_file: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cache_capacity_bytes: DEFAULT_CACHE_CAPACITY,
            render_deadline_ms: 10_000,
            activities_file: None,
        }
    }
}

impl ServiceConfig {
    /// Parse configuration from environment variables.
    pub fn from_env() -> Self {
        fn parse_u64(key: &str, default: u64) -> u64 {
            env::var(key)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        Self {
            cache_capacity_bytes: parse_u64("TILE_CACHE_CAPACITY_BYTES", DEFAULT_CACHE_CAPACITY),
            render_deadline_ms: parse_u64("RENDER_DEADLINE_MS", 10_000),
            activities_file: env::var("ACTIVITIES_FILE").ok(),
        }
    }
}
