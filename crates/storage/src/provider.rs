//! Read-only activity-provider port.
//!
//! The renderer consumes activities through this interface; ingestion,
//! persistence, and upstream sync live entirely behind it. Implementations
//! may block on I/O and must tolerate concurrent calls from parallel tile
//! renders. Activities crossing the antimeridian must arrive pre-split.

use async_trait::async_trait;
use tracing::info;

use trackmap_common::{Activity, ActivityFilter, BoundingBox, TileError, TileResult};

/// Query surface the tile renderer consumes.
#[async_trait]
pub trait ActivityProvider: Send + Sync {
    /// Activities passing `filter` whose bounding box intersects `bbox`.
    ///
    /// No ordering guarantees; no mutation.
    async fn query(
        &self,
        filter: &ActivityFilter,
        bbox: &BoundingBox,
    ) -> TileResult<Vec<Activity>>;
}

/// Provider backed by an in-memory activity list.
///
/// Serves as the test fixture and as the demo data source for the service
/// binary (loaded from a JSON file at startup).
#[derive(Debug)]
pub struct InMemoryActivityProvider {
    activities: Vec<Activity>,
}

impl InMemoryActivityProvider {
    pub fn new(activities: Vec<Activity>) -> Self {
        Self { activities }
    }

    pub fn empty() -> Self {
        Self {
            activities: Vec::new(),
        }
    }

    /// Load activities from a JSON array file.
    pub fn from_json_file(path: &str) -> TileResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TileError::ProviderUnavailable(format!("cannot read {path}: {e}"))
        })?;
        let activities: Vec<Activity> = serde_json::from_str(&content).map_err(|e| {
            TileError::ProviderUnavailable(format!("cannot parse {path}: {e}"))
        })?;

        info!(path, count = activities.len(), "loaded activity fixture");
        Ok(Self::new(activities))
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

#[async_trait]
impl ActivityProvider for InMemoryActivityProvider {
    async fn query(
        &self,
        filter: &ActivityFilter,
        bbox: &BoundingBox,
    ) -> TileResult<Vec<Activity>> {
        Ok(self
            .activities
            .iter()
            .filter(|a| filter.matches(a) && bbox.intersects(&a.bbox))
            .cloned()
            .collect())
    }
}
