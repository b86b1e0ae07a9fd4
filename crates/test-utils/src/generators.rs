//! Generators for synthetic tracks and activities.
//!
//! These produce predictable, deterministic data so tests can assert exact
//! pixel positions and cache keys.

use chrono::NaiveDate;
use trackmap_common::{polyline, Activity, BoundingBox};

/// Evenly spaced `(lon, lat)` points along the straight line `from..=to`.
///
/// `n` must be at least 2; both endpoints are included.
pub fn line_points(from: (f64, f64), to: (f64, f64), n: usize) -> Vec<(f64, f64)> {
    assert!(n >= 2, "a line needs at least 2 points");
    (0..n)
        .map(|i| {
            let t = i as f64 / (n - 1) as f64;
            (
                from.0 + (to.0 - from.0) * t,
                from.1 + (to.1 - from.1) * t,
            )
        })
        .collect()
}

/// Build an [`Activity`] from raw `(lon, lat)` points.
///
/// Encodes the polyline and computes the bbox the way the ingestion side
/// would, so provider and renderer tests see realistic records.
pub fn track_activity(
    id: u64,
    activity_type: &str,
    start_date: NaiveDate,
    points: &[(f64, f64)],
) -> Activity {
    let bbox = BoundingBox::of_points(points)
        .unwrap_or_else(|| BoundingBox::new(0.0, 0.0, 0.0, 0.0));
    Activity {
        id,
        polyline: polyline::encode(points),
        activity_type: activity_type.to_string(),
        start_date,
        bbox,
    }
}

/// Shorthand for a dated ride activity along a straight line.
pub fn straight_ride(id: u64, from: (f64, f64), to: (f64, f64), n: usize) -> Activity {
    track_activity(
        id,
        "ride",
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        &line_points(from, to, n),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_points_endpoints() {
        let points = line_points((-1.0, 50.0), (1.0, 52.0), 5);
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], (-1.0, 50.0));
        assert_eq!(points[4], (1.0, 52.0));
        assert_eq!(points[2], (0.0, 51.0));
    }

    #[test]
    fn test_track_activity_roundtrips_points() {
        let points = line_points((-0.2, 51.4), (0.2, 51.6), 4);
        let activity = straight_ride(7, (-0.2, 51.4), (0.2, 51.6), 4);

        let decoded = trackmap_common::polyline::decode(&activity.polyline).unwrap();
        assert_eq!(decoded.len(), points.len());
        for ((lon, lat), (elon, elat)) in decoded.iter().zip(points.iter()) {
            crate::assert_approx_eq!(*lon, *elon, 1e-5);
            crate::assert_approx_eq!(*lat, *elat, 1e-5);
        }
        assert!(activity.bbox.contains_point(0.0, 51.5));
    }
}
