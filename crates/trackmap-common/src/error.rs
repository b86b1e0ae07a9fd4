//! Error types for trackmap services.

use thiserror::Error;

use crate::palette::PaletteError;
use crate::polyline::PolylineError;

/// Result type alias using TileError.
pub type TileResult<T> = Result<T, TileError>;

/// Primary error type for tile operations.
#[derive(Debug, Error)]
pub enum TileError {
    // === Per-activity errors (recovered locally) ===
    #[error("malformed polyline: {0}")]
    MalformedPolyline(String),

    // === Request-level errors ===
    #[error("invalid tile address {z}/{x}/{y}")]
    InvalidTileAddress { z: u32, x: u32, y: u32 },

    #[error("invalid palette arguments: {0}")]
    InvalidPaletteArgs(String),

    #[error("invalid filter arguments: {0}")]
    InvalidFilterArgs(String),

    // === Render/infrastructure errors ===
    #[error("activity provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("tile render exceeded its deadline")]
    RenderTimeout,

    #[error("PNG encoding failed: {0}")]
    EncodeFailure(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl TileError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            TileError::InvalidPaletteArgs(_) | TileError::InvalidFilterArgs(_) => 400,
            TileError::InvalidTileAddress { .. } => 404,
            TileError::ProviderUnavailable(_) => 503,
            TileError::RenderTimeout => 504,
            TileError::MalformedPolyline(_)
            | TileError::EncodeFailure(_)
            | TileError::Internal(_) => 500,
        }
    }
}

impl From<PolylineError> for TileError {
    fn from(err: PolylineError) -> Self {
        TileError::MalformedPolyline(err.to_string())
    }
}

impl From<PaletteError> for TileError {
    fn from(err: PaletteError) -> Self {
        TileError::InvalidPaletteArgs(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            TileError::InvalidTileAddress { z: 23, x: 0, y: 0 }.http_status_code(),
            404
        );
        assert_eq!(
            TileError::InvalidPaletteArgs("bad".into()).http_status_code(),
            400
        );
        assert_eq!(
            TileError::ProviderUnavailable("down".into()).http_status_code(),
            503
        );
        assert_eq!(TileError::RenderTimeout.http_status_code(), 504);
        assert_eq!(
            TileError::EncodeFailure("broken".into()).http_status_code(),
            500
        );
    }
}
