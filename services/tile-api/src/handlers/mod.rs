//! HTTP request handlers for the tile API.
//!
//! This module is organized into submodules:
//! - `tiles`: the Z/X/Y tile endpoint
//! - `cache`: cache administration (clear, stats)
//! - `health`: liveness check

pub mod cache;
pub mod health;
pub mod tiles;

pub use cache::{cache_clear_handler, cache_stats_handler};
pub use health::health_handler;
pub use tiles::tile_handler;
