//! Common fixtures shared across the test suite.

use chrono::NaiveDate;
use trackmap_common::Activity;

use crate::generators::{line_points, track_activity};

/// The canonical polyline example from the format documentation.
///
/// Decodes to three points in the Sierra Nevada, lon-first:
/// (-120.2, 38.5), (-120.95, 40.7), (-126.453, 43.252).
pub const SIERRA_POLYLINE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

/// A single east-west segment straddling the Greenwich meridian at 51.5°N.
///
/// Useful for tile-seam tests: its endpoints land in different tile columns,
/// and with only two points there are no interior joints to double-stamp.
pub fn greenwich_crossing() -> Activity {
    track_activity(
        100,
        "ride",
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        &line_points((-0.001, 51.5), (0.001, 51.5), 2),
    )
}

/// A small mixed set of activities around London: two rides and a run
/// across three dates.
pub fn london_activities() -> Vec<Activity> {
    vec![
        track_activity(
            1,
            "ride",
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            &line_points((-0.15, 51.45), (-0.05, 51.55), 20),
        ),
        track_activity(
            2,
            "ride",
            NaiveDate::from_ymd_opt(2024, 2, 20).unwrap(),
            &line_points((-0.12, 51.50), (-0.02, 51.50), 20),
        ),
        track_activity(
            3,
            "run",
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            &line_points((-0.10, 51.48), (-0.08, 51.52), 10),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sierra_polyline_decodes() {
        let points = trackmap_common::polyline::decode(SIERRA_POLYLINE).unwrap();
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn test_london_activities_have_distinct_ids() {
        let activities = london_activities();
        assert_eq!(activities.len(), 3);
        assert_ne!(activities[0].id, activities[1].id);
        assert!(activities.iter().any(|a| a.activity_type == "run"));
    }
}
