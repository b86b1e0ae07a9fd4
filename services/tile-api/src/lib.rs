//! Heatmap tile API service.
//!
//! HTTP server exposing Z/X/Y heatmap tiles rendered from GPS tracks, plus
//! cache administration endpoints.

pub mod config;
pub mod handlers;
pub mod params;
pub mod rendering;
pub mod state;

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};

use state::AppState;

/// Build the service router. Split out of `main` so tests can drive the
/// handlers without binding a socket.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Tile endpoint (the final segment is "{y}.png")
        .route("/tiles/:z/:x/:y", get(handlers::tile_handler))
        // Cache admin
        .route("/tiles/cache/clear", post(handlers::cache_clear_handler))
        .route("/tiles/cache/stats", get(handlers::cache_stats_handler))
        // Health check
        .route("/health", get(handlers::health_handler))
        .layer(Extension(state))
}
