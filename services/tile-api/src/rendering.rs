//! Request-side rendering pipeline: cache lookup, provider query, CPU-bound
//! render on a blocking worker, cache insert.

use std::time::{Duration, Instant};

use bytes::Bytes;

use renderer::tile::{prefilter_bbox, render_tile};
use renderer::ResolvedGradient;
use storage::TileCacheKey;
use trackmap_common::palette::Palette;
use trackmap_common::{ActivityFilter, TileCoord, TileError, TileResult};

use crate::state::AppState;

/// Whether a response was served from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheStatus::Hit => "hit",
            CacheStatus::Miss => "miss",
        }
    }
}

/// Serve one tile: from the cache when possible, otherwise render and insert.
///
/// The cache lock is never held across the provider query or the render.
/// Failed renders are not cached. Concurrent misses for the same key each
/// render; the rasterizer is deterministic, so every caller receives
/// equivalent bytes whichever insert lands last.
pub async fn fetch_or_render(
    state: &AppState,
    coord: TileCoord,
    palette: &Palette,
    filter: &ActivityFilter,
) -> TileResult<(Bytes, CacheStatus)> {
    let key = TileCacheKey::new(coord, palette.digest(), filter.digest());

    if let Some(bytes) = state.cache.get(&key).await {
        return Ok((bytes, CacheStatus::Hit));
    }

    let activities = state
        .provider
        .query(filter, &prefilter_bbox(coord))
        .await?;

    let deadline = Duration::from_millis(state.config.render_deadline_ms);
    let gradient = ResolvedGradient::new(palette);
    let render = tokio::task::spawn_blocking(move || {
        render_tile(coord, &gradient, &activities, Some(Instant::now() + deadline))
    });

    let rendered = match tokio::time::timeout(deadline, render).await {
        Err(_) => return Err(TileError::RenderTimeout),
        Ok(Err(join_err)) => {
            return Err(TileError::Internal(format!("render task failed: {join_err}")))
        }
        Ok(Ok(result)) => result?,
    };

    let bytes = Bytes::from(rendered);
    state.cache.put(key, bytes.clone()).await;
    Ok((bytes, CacheStatus::Miss))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use storage::{ActivityProvider, InMemoryActivityProvider};
    use test_utils::london_activities;
    use trackmap_common::{Activity, BoundingBox};

    use crate::config::ServiceConfig;

    fn state_with_fixture() -> AppState {
        AppState::with_provider(
            ServiceConfig::default(),
            Arc::new(InMemoryActivityProvider::new(london_activities())),
        )
    }

    fn london_tile() -> TileCoord {
        trackmap_common::tile::lonlat_to_tile(-0.09, 51.5, 12)
    }

    #[tokio::test]
    async fn test_repeated_request_hits_cache_with_identical_bytes() {
        let state = state_with_fixture();
        let coord = london_tile();
        let palette = Palette::default();
        let filter = ActivityFilter::default();

        let (first, status) = fetch_or_render(&state, coord, &palette, &filter)
            .await
            .unwrap();
        assert_eq!(status, CacheStatus::Miss);

        let (second, status) = fetch_or_render(&state, coord, &palette, &filter)
            .await
            .unwrap();
        assert_eq!(status, CacheStatus::Hit);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_distinct_palettes_render_distinct_entries() {
        let state = state_with_fixture();
        let coord = london_tile();
        let filter = ActivityFilter::default();

        let orange = Palette::default();
        let red = Palette::preset(trackmap_common::PresetPalette::Red, 10).unwrap();

        let (_, s1) = fetch_or_render(&state, coord, &orange, &filter).await.unwrap();
        let (_, s2) = fetch_or_render(&state, coord, &red, &filter).await.unwrap();
        assert_eq!(s1, CacheStatus::Miss);
        assert_eq!(s2, CacheStatus::Miss, "different palette must not hit");
        assert_eq!(state.cache.len().await, 2);
    }

    struct FailingProvider;

    #[async_trait]
    impl ActivityProvider for FailingProvider {
        async fn query(
            &self,
            _filter: &ActivityFilter,
            _bbox: &BoundingBox,
        ) -> TileResult<Vec<Activity>> {
            Err(TileError::ProviderUnavailable("backing store down".into()))
        }
    }

    #[tokio::test]
    async fn test_provider_failure_is_not_cached() {
        let state = AppState::with_provider(ServiceConfig::default(), Arc::new(FailingProvider));
        let coord = london_tile();

        let result =
            fetch_or_render(&state, coord, &Palette::default(), &ActivityFilter::default()).await;
        assert!(matches!(result, Err(TileError::ProviderUnavailable(_))));
        assert!(state.cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_empty_region_still_renders_a_tile() {
        let state = state_with_fixture();
        // A tile with no activities anywhere near it.
        let coord = trackmap_common::tile::lonlat_to_tile(151.2, -33.8, 12);

        let (bytes, status) =
            fetch_or_render(&state, coord, &Palette::default(), &ActivityFilter::default())
                .await
                .unwrap();
        assert_eq!(status, CacheStatus::Miss);
        assert!(!bytes.is_empty(), "empty tiles are valid transparent PNGs");
    }
}
