//! Per-tile rendering pipeline.
//!
//! `render_tile` turns a tile address, a gradient, and a set of activities
//! into PNG bytes: spatial prefilter, polyline decode, projection to
//! tile-local pixels, overlap rasterization, colorization, PNG encode.

use std::time::Instant;

use tracing::warn;

use trackmap_common::tile::{geo_bounds, lonlat_to_world_px, world_bounds};
use trackmap_common::{Activity, BoundingBox, TileCoord, TileError, TileResult};

use crate::gradient::ResolvedGradient;
use crate::png;
use crate::raster::{draw_track, OverlapGrid, ProjectedPoint};

/// Fraction of the tile's extent added on each side of the prefilter box.
///
/// Tracks are drawn with a 1-pixel clip margin, so anything relevant to the
/// tile lies well within this inflated box; activities whose bbox misses it
/// are skipped before their polyline is decoded.
const PREFILTER_MARGIN: f64 = 0.1;

/// Geographic box an activity must intersect to contribute to this tile.
pub fn prefilter_bbox(coord: TileCoord) -> BoundingBox {
    geo_bounds(coord).inflate(PREFILTER_MARGIN)
}

/// Rasterize the given activities onto a fresh overlap grid.
///
/// Per-activity failures are non-fatal: a malformed polyline is logged and
/// skipped, and the tile still renders. The optional `deadline` is honored at
/// activity boundaries only; a tile mid-raster runs to completion.
pub fn rasterize_activities(
    coord: TileCoord,
    activities: &[Activity],
    deadline: Option<Instant>,
) -> TileResult<OverlapGrid> {
    let prefilter = prefilter_bbox(coord);
    let (x0, y0, _, _) = world_bounds(coord);
    let mut grid = OverlapGrid::new();

    for activity in activities {
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                return Err(TileError::RenderTimeout);
            }
        }
        if !prefilter.intersects(&activity.bbox) {
            continue;
        }

        let points = match trackmap_common::polyline::decode(&activity.polyline) {
            Ok(points) => points,
            Err(err) => {
                warn!(
                    activity_id = activity.id,
                    error = %err,
                    "skipping activity with malformed polyline"
                );
                continue;
            }
        };

        // Project to tile-local float pixels, keeping the original sample
        // index so the rasterizer never bridges dropped points.
        let projected: Vec<ProjectedPoint> = points
            .iter()
            .enumerate()
            .map(|(index, &(lon, lat))| {
                let (px, py) = lonlat_to_world_px(lon, lat, coord.z);
                ProjectedPoint::new(px - x0, py - y0, index)
            })
            .collect();

        draw_track(&mut grid, &projected);
    }

    Ok(grid)
}

/// Render one tile to PNG bytes.
pub fn render_tile(
    coord: TileCoord,
    gradient: &ResolvedGradient,
    activities: &[Activity],
    deadline: Option<Instant>,
) -> TileResult<Vec<u8>> {
    let grid = rasterize_activities(coord, activities, deadline)?;

    // The overlap grid doubles as the index plane: the 256-entry LUT is the
    // PNG palette and each counter is its own palette index.
    let lut = gradient.build_lut();
    png::create_png_indexed(grid.size(), grid.size(), &lut.colors, grid.counts())
        .map_err(TileError::EncodeFailure)
}
