//! Tile rasterization for GPS-track heatmaps.
//!
//! Turns a set of encoded polylines into a 512x512 PNG in which per-pixel
//! brightness encodes how many tracks covered that pixel:
//! - Segment clipping to tile bounds (Cohen-Sutherland)
//! - Integer line rasterization onto a saturating overlap grid (Bresenham)
//! - Count-to-color gradient mapping
//! - PNG encoding

pub mod buffer_pool;
pub mod clip;
pub mod gradient;
pub mod png;
pub mod raster;
pub mod tile;

pub use gradient::ResolvedGradient;
pub use raster::{OverlapGrid, ProjectedPoint};
pub use tile::render_tile;
