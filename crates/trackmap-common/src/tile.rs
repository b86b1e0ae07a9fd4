//! Slippy-map tile addressing and Web-Mercator pixel geometry.
//!
//! All pixel math is done in "world pixels": the full map at zoom `z` is a
//! square of `2^z * TILE_SIZE` pixels with origin at the top-left
//! (lon = -180, lat = +85.05...), y increasing southward.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::{BoundingBox, TileError, TileResult};

/// Edge length of a rendered tile in pixels.
pub const TILE_SIZE: u32 = 512;

/// Maximum supported zoom level.
pub const MAX_ZOOM: u32 = 22;

/// Latitude limit of the spherical Mercator projection.
pub const MAX_MERCATOR_LAT: f64 = 85.05112877980659;

/// A tile coordinate (z/x/y), top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level
    pub z: u32,
    /// Column (x)
    pub x: u32,
    /// Row (y)
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Validate a requested tile address.
    ///
    /// Rejects zoom levels above [`MAX_ZOOM`] and columns/rows outside the
    /// `2^z` grid.
    pub fn parse(z: u32, x: u32, y: u32) -> TileResult<Self> {
        if z > MAX_ZOOM {
            return Err(TileError::InvalidTileAddress { z, x, y });
        }
        let n = 1u32 << z;
        if x >= n || y >= n {
            return Err(TileError::InvalidTileAddress { z, x, y });
        }
        Ok(Self { z, x, y })
    }

    /// Generate a cache key fragment.
    pub fn cache_key(&self) -> String {
        format!("{}/{}/{}", self.z, self.x, self.y)
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// Total width of the world in pixels at zoom `z`.
fn world_size(z: u32) -> f64 {
    (1u64 << z) as f64 * TILE_SIZE as f64
}

/// Project a geodetic coordinate to world pixels at zoom `z`.
///
/// Spherical Mercator: x is linear in longitude, y follows
/// `ln(tan(phi) + sec(phi))`. Latitudes are clamped to the Mercator-valid
/// range so the result is always finite.
pub fn lonlat_to_world_px(lon: f64, lat: f64, z: u32) -> (f64, f64) {
    let world = world_size(z);
    let lat = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
    let phi = lat.to_radians();

    let px = (lon + 180.0) / 360.0 * world;
    let py = (1.0 - (phi.tan() + 1.0 / phi.cos()).ln() / PI) / 2.0 * world;
    (px, py)
}

/// Inverse of [`lonlat_to_world_px`].
pub fn world_px_to_lonlat(px: f64, py: f64, z: u32) -> (f64, f64) {
    let world = world_size(z);

    let lon = px / world * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * py / world)).sinh().atan().to_degrees();
    (lon, lat)
}

/// World-pixel bounds of a tile: `(x0, y0, x1, y1)` with `x1 = x0 + TILE_SIZE`.
pub fn world_bounds(coord: TileCoord) -> (f64, f64, f64, f64) {
    let x0 = coord.x as f64 * TILE_SIZE as f64;
    let y0 = coord.y as f64 * TILE_SIZE as f64;
    (x0, y0, x0 + TILE_SIZE as f64, y0 + TILE_SIZE as f64)
}

/// Geographic (lon/lat) bounds of a tile.
pub fn geo_bounds(coord: TileCoord) -> BoundingBox {
    let n = (1u64 << coord.z) as f64;

    let lon_min = coord.x as f64 / n * 360.0 - 180.0;
    let lon_max = (coord.x + 1) as f64 / n * 360.0 - 180.0;

    let lat_max = (PI * (1.0 - 2.0 * coord.y as f64 / n))
        .sinh()
        .atan()
        .to_degrees();
    let lat_min = (PI * (1.0 - 2.0 * (coord.y + 1) as f64 / n))
        .sinh()
        .atan()
        .to_degrees();

    BoundingBox::new(lon_min, lat_min, lon_max, lat_max)
}

/// Convert lat/lon to the tile containing it at `zoom`.
pub fn lonlat_to_tile(lon: f64, lat: f64, zoom: u32) -> TileCoord {
    let n = (1u64 << zoom) as f64;
    let lat = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);

    let x = ((lon + 180.0) / 360.0 * n).floor() as u32;
    let lat_rad = lat.to_radians();
    let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n).floor() as u32;

    let max = (1u64 << zoom) as u32 - 1;
    TileCoord {
        z: zoom,
        x: x.min(max),
        y: y.min(max),
    }
}

/// Round a world/tile pixel coordinate to an integer pixel.
///
/// Half-away-from-zero, applied identically wherever a float pixel becomes an
/// integer pixel, so a world point on a tile boundary lands on the same pixel
/// in both neighboring tiles.
pub fn round_half_away(v: f64) -> i64 {
    v.round() as i64
}
