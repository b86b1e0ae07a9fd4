//! Tests for the overlap-grid rasterizer.

use renderer::raster::{draw_track, OverlapGrid, ProjectedPoint};

fn track(points: &[(f64, f64)]) -> Vec<ProjectedPoint> {
    points
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| ProjectedPoint::new(x, y, i))
        .collect()
}

// ============================================================================
// Scenario: single diagonal line
// ============================================================================

#[test]
fn test_full_diagonal_lights_512_pixels() {
    let mut grid = OverlapGrid::new();
    draw_track(&mut grid, &track(&[(0.0, 0.0), (511.0, 511.0)]));

    for i in 0..512 {
        assert_eq!(grid.count(i, i), 1, "diagonal pixel ({i},{i})");
    }
    assert_eq!(grid.total_mass(), 512, "no pixels off the diagonal");
}

// ============================================================================
// Scenario: overlap of two identical segments
// ============================================================================

#[test]
fn test_identical_tracks_double_counts() {
    let mut grid = OverlapGrid::new();
    let points = track(&[(0.0, 0.0), (511.0, 511.0)]);
    draw_track(&mut grid, &points);
    draw_track(&mut grid, &points);

    for i in 0..512 {
        assert_eq!(grid.count(i, i), 2);
    }
    assert_eq!(grid.total_mass(), 1024);
}

// ============================================================================
// Saturation
// ============================================================================

#[test]
fn test_counts_saturate_at_255() {
    // Stamp the same short segment 300 times; each covered pixel holds
    // min(300, 255).
    let mut grid = OverlapGrid::with_size(16);
    let points = track(&[(0.0, 3.0), (7.0, 3.0)]);
    for _ in 0..300 {
        draw_track(&mut grid, &points);
    }

    for u in 0..=7 {
        assert_eq!(grid.count(u, 3), 255);
    }
    assert_eq!(grid.total_mass(), 8 * 255);
}

// ============================================================================
// Order independence (below saturation)
// ============================================================================

#[test]
fn test_draw_order_does_not_change_counts() {
    let a = track(&[(0.0, 0.0), (200.0, 150.0), (400.0, 100.0)]);
    let b = track(&[(50.0, 500.0), (300.0, 20.0)]);
    let c = track(&[(511.0, 0.0), (0.0, 511.0)]);

    let mut forward = OverlapGrid::new();
    draw_track(&mut forward, &a);
    draw_track(&mut forward, &b);
    draw_track(&mut forward, &c);

    let mut reversed = OverlapGrid::new();
    draw_track(&mut reversed, &c);
    draw_track(&mut reversed, &b);
    draw_track(&mut reversed, &a);

    assert_eq!(forward.counts(), reversed.counts());
}

// ============================================================================
// Adjacency rule
// ============================================================================

#[test]
fn test_prefilter_gap_never_bridged() {
    // Track [(0,0),(10,10),(20,20),(500,500)] with (20,20) dropped upstream:
    // only (0,0)-(10,10) may be drawn.
    let points = vec![
        ProjectedPoint::new(0.0, 0.0, 0),
        ProjectedPoint::new(10.0, 10.0, 1),
        ProjectedPoint::new(500.0, 500.0, 3),
    ];
    let mut grid = OverlapGrid::new();
    draw_track(&mut grid, &points);

    for i in 0..=10 {
        assert_eq!(grid.count(i, i), 1);
    }
    // Nothing between (10,10) and (500,500).
    for i in 11..512 {
        assert_eq!(grid.count(i, i), 0, "spurious diagonal pixel at {i}");
    }
    assert_eq!(grid.total_mass(), 11);
}

#[test]
fn test_points_in_margin_do_not_leak_into_grid() {
    // Both endpoints inside the 1-pixel clip margin but outside the grid.
    let points = vec![
        ProjectedPoint::new(-0.6, 5.0, 0),
        ProjectedPoint::new(-0.6, 9.0, 1),
    ];
    let mut grid = OverlapGrid::with_size(16);
    draw_track(&mut grid, &points);
    assert_eq!(grid.total_mass(), 0);
}
