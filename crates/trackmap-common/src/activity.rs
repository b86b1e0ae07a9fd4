//! Activity metadata consumed by the tile renderer.
//!
//! Ingestion and persistence of activities live outside this workspace; the
//! renderer only sees this read-only shape through the provider port.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::BoundingBox;

/// One GPS-tracked activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Upstream activity id.
    pub id: u64,

    /// Google-encoded polyline of the track.
    pub polyline: String,

    /// Activity type label, e.g. "ride" or "run".
    pub activity_type: String,

    /// Local start date of the activity.
    pub start_date: NaiveDate,

    /// Geographic bounding box of the track, precomputed at ingestion.
    pub bbox: BoundingBox,
}

/// Per-request activity filter.
///
/// All fields optional; an empty filter matches everything. Date bounds are
/// inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityFilter {
    pub activity_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ActivityFilter {
    pub fn is_empty(&self) -> bool {
        self.activity_type.is_none() && self.start_date.is_none() && self.end_date.is_none()
    }

    /// Whether an activity passes this filter.
    pub fn matches(&self, activity: &Activity) -> bool {
        if let Some(activity_type) = &self.activity_type {
            if !activity.activity_type.eq_ignore_ascii_case(activity_type) {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if activity.start_date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if activity.start_date > end {
                return false;
            }
        }
        true
    }

    /// Canonical string form: lowercase, fixed field order, unset fields
    /// omitted. The digest of this string keys the tile cache.
    pub fn canonical(&self) -> String {
        let mut parts = Vec::new();
        if let Some(activity_type) = &self.activity_type {
            parts.push(format!("type={}", activity_type.to_lowercase()));
        }
        if let Some(start) = self.start_date {
            parts.push(format!("from={}", start));
        }
        if let Some(end) = self.end_date {
            parts.push(format!("to={}", end));
        }
        parts.join(";")
    }

    /// Stable digest of the canonical form.
    pub fn digest(&self) -> u32 {
        crc32fast::hash(self.canonical().as_bytes())
    }
}
