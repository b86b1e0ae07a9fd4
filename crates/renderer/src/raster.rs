//! Overlap-count rasterization of projected tracks.
//!
//! Each tile render owns one [`OverlapGrid`]: a `T x T` plane of `u8`
//! counters, saturating at 255. Tracks are drawn segment by segment with
//! integer Bresenham; a pixel's final count is the number of drawn segments
//! that covered it (clipped to 255).

use trackmap_common::tile::{round_half_away, TILE_SIZE};

use crate::buffer_pool;
use crate::clip::{clip_segment, ClipRect};

/// Pixels the clip rectangle extends beyond the tile on each side.
///
/// Segments are clipped against this expanded rectangle so a crossing at the
/// tile edge keeps its true geometry; adjacent tiles then rasterize identical
/// pixels along the shared boundary.
const CLIP_MARGIN: f64 = 1.0;

/// A projected track point in tile-local float pixels.
///
/// `index` is the position the source GPS sample held in the original
/// polyline; segments are only drawn between consecutive indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
    pub index: usize,
}

impl ProjectedPoint {
    pub fn new(x: f64, y: f64, index: usize) -> Self {
        Self { x, y, index }
    }
}

/// A square grid of saturating `u8` overlap counters.
pub struct OverlapGrid {
    counts: Vec<u8>,
    size: usize,
}

impl OverlapGrid {
    /// A zeroed tile-sized grid, backed by the thread-local buffer pool.
    pub fn new() -> Self {
        Self::with_size(TILE_SIZE as usize)
    }

    pub fn with_size(size: usize) -> Self {
        Self {
            counts: buffer_pool::take_grid_buffer(size * size),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Row-major counter plane; also serves as the index plane for indexed
    /// PNG encoding.
    pub fn counts(&self) -> &[u8] {
        &self.counts
    }

    /// Count at column `u`, row `v`.
    pub fn count(&self, u: usize, v: usize) -> u8 {
        self.counts[v * self.size + u]
    }

    /// Increment the counter at `(u, v)`, saturating at 255. Pixels outside
    /// the grid are ignored.
    pub fn stamp(&mut self, u: i64, v: i64) {
        let size = self.size as i64;
        if u < 0 || v < 0 || u >= size || v >= size {
            return;
        }
        let cell = &mut self.counts[v as usize * self.size + u as usize];
        *cell = cell.saturating_add(1);
    }

    /// Total of all counters, for mass-conservation checks.
    pub fn total_mass(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }
}

impl Default for OverlapGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// Rasterize one track onto the grid.
///
/// Walks consecutive point pairs in input order and draws a segment only when
/// the original indices are adjacent (`i1 - i0 == 1`). An index gap means the
/// intermediate sample was dropped upstream; connecting across it would paint
/// a line the athlete never traveled.
pub fn draw_track(grid: &mut OverlapGrid, points: &[ProjectedPoint]) {
    let size = grid.size() as f64;
    let rect = ClipRect::new(-CLIP_MARGIN, -CLIP_MARGIN, size - 1.0 + CLIP_MARGIN, size - 1.0 + CLIP_MARGIN);

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if b.index != a.index + 1 {
            continue;
        }

        let Some(((cx0, cy0), (cx1, cy1))) = clip_segment((a.x, a.y), (b.x, b.y), &rect)
        else {
            continue;
        };

        draw_segment(
            grid,
            round_half_away(cx0),
            round_half_away(cy0),
            round_half_away(cx1),
            round_half_away(cy1),
        );
    }
}

/// Bresenham integer line draw, stamping every visited pixel.
///
/// Endpoints may sit in the 1-pixel clip margin; `stamp` discards anything
/// outside the grid.
fn draw_segment(grid: &mut OverlapGrid, x0: i64, y0: i64, x1: i64, y1: i64) {
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let (mut x, mut y) = (x0, y0);
    loop {
        grid.stamp(x, y);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}
