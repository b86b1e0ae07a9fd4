//! Benchmarks for the rasterization hot path.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use renderer::gradient::ResolvedGradient;
use renderer::raster::{draw_track, OverlapGrid, ProjectedPoint};
use renderer::tile::render_tile;
use test_utils::straight_ride;
use trackmap_common::palette::Palette;
use trackmap_common::TileCoord;

/// A zig-zag track with ~1000 points spread across the tile.
fn synthetic_track() -> Vec<ProjectedPoint> {
    (0..1000usize)
        .map(|i| {
            let x = (i % 512) as f64;
            let y = ((i * 7) % 512) as f64;
            ProjectedPoint::new(x, y, i)
        })
        .collect()
}

fn bench_draw_track(c: &mut Criterion) {
    let points = synthetic_track();
    c.bench_function("draw_track_1000_points", |b| {
        b.iter(|| {
            let mut grid = OverlapGrid::new();
            draw_track(&mut grid, black_box(&points));
            grid
        })
    });
}

fn bench_render_tile(c: &mut Criterion) {
    let coord = TileCoord::new(12, 2048, 1361);
    let bbox = trackmap_common::tile::geo_bounds(coord);
    let activities: Vec<_> = (0..50u64)
        .map(|i| {
            let t = i as f64 / 50.0;
            straight_ride(
                i,
                (bbox.min_x, bbox.min_y + bbox.height() * t),
                (bbox.max_x, bbox.max_y - bbox.height() * t),
                100,
            )
        })
        .collect();
    let gradient = ResolvedGradient::new(&Palette::default());

    c.bench_function("render_tile_50_tracks", |b| {
        b.iter(|| render_tile(coord, &gradient, black_box(&activities), None).unwrap())
    });
}

criterion_group!(benches, bench_draw_track, bench_render_tile);
criterion_main!(benches);
