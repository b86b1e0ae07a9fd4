//! Z/X/Y tile endpoint.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, error, instrument};

use trackmap_common::TileError;

use crate::params::{self, TileQuery};
use crate::rendering;
use crate::state::AppState;

/// Browser and proxy caching window for served tiles, in seconds.
const CACHE_CONTROL_MAX_AGE: u32 = 86_400;

/// GET /tiles/:z/:x/:y — the final path segment is `{y}.png`.
#[instrument(skip(state, query))]
pub async fn tile_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((z, x, y)): Path<(u32, u32, String)>,
    Query(query): Query<TileQuery>,
) -> Response {
    let result = async {
        let coord = params::parse_tile_path(z, x, &y)?;
        let palette = params::parse_palette(&query)?;
        let filter = params::parse_filter(&query)?;
        rendering::fetch_or_render(&state, coord, &palette, &filter).await
    }
    .await;

    match result {
        Ok((bytes, status)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "image/png".to_string()),
                (
                    header::CACHE_CONTROL,
                    format!("public, max-age={CACHE_CONTROL_MAX_AGE}"),
                ),
                (
                    header::HeaderName::from_static("x-cache"),
                    status.as_str().to_string(),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(err) => tile_error_response(&err),
    }
}

fn tile_error_response(err: &TileError) -> Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        error!(error = %err, "tile request failed");
    } else {
        debug!(error = %err, "tile request rejected");
    }

    (status, err.to_string()).into_response()
}
