//! Cache administration handlers.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use axum::{extract::Extension, Json};
use tracing::{info, instrument};

use crate::state::AppState;

/// POST /tiles/cache/clear - empty the tile cache.
#[instrument(skip(state))]
pub async fn cache_clear_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<serde_json::Value> {
    let cleared = state.cache.clear().await;
    info!(cleared, "tile cache cleared");

    Json(serde_json::json!({ "cleared": cleared }))
}

/// GET /tiles/cache/stats - cache occupancy and hit/miss counters.
#[instrument(skip(state))]
pub async fn cache_stats_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<serde_json::Value> {
    let stats = state.cache.stats();

    Json(serde_json::json!({
        "entries": state.cache.len().await,
        "size_bytes": stats.size_bytes.load(Ordering::Relaxed),
        "capacity_bytes": state.cache.capacity_bytes(),
        "hits": stats.hits.load(Ordering::Relaxed),
        "misses": stats.misses.load(Ordering::Relaxed),
        "evictions": stats.evictions.load(Ordering::Relaxed),
        "hit_rate": stats.hit_rate(),
    }))
}
