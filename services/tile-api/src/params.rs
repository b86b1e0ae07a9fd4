//! Query-parameter parsing and normalization for the tile endpoint.

use chrono::NaiveDate;
use serde::Deserialize;

use trackmap_common::palette::{Color, Palette, PresetPalette, DEFAULT_MIDPOINT};
use trackmap_common::{ActivityFilter, TileCoord, TileError, TileResult};

/// Raw query parameters of `GET /tiles/{z}/{x}/{y}.png`. All optional.
#[derive(Debug, Default, Deserialize)]
pub struct TileQuery {
    pub gradient: Option<String>,
    pub min_color: Option<String>,
    pub mid_color: Option<String>,
    pub max_color: Option<String>,
    pub midpoint: Option<u32>,
    pub activity_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Parse the final `{y}.png` path segment and validate the tile address.
pub fn parse_tile_path(z: u32, x: u32, y_segment: &str) -> TileResult<TileCoord> {
    let y = y_segment
        .strip_suffix(".png")
        .and_then(|y| y.parse::<u32>().ok())
        .ok_or(TileError::InvalidTileAddress { z, x, y: u32::MAX })?;

    TileCoord::parse(z, x, y)
}

/// Normalize palette parameters into a [`Palette`].
///
/// A complete custom triple (`min_color`, `mid_color`, `max_color`) overrides
/// `gradient`; a partial triple is an error. With neither, the default preset
/// applies.
pub fn parse_palette(query: &TileQuery) -> TileResult<Palette> {
    let midpoint = query.midpoint.unwrap_or(DEFAULT_MIDPOINT);

    let custom_colors = [&query.min_color, &query.mid_color, &query.max_color];
    let present = custom_colors.iter().filter(|c| c.is_some()).count();

    match present {
        3 => {
            let parse = |value: &Option<String>| -> TileResult<Color> {
                Ok(Color::from_hex(value.as_deref().unwrap_or_default())?)
            };
            Ok(Palette::custom(
                parse(&query.min_color)?,
                parse(&query.mid_color)?,
                parse(&query.max_color)?,
                midpoint,
            )?)
        }
        0 => {
            let preset = match &query.gradient {
                Some(name) => PresetPalette::from_name(name).ok_or_else(|| {
                    TileError::InvalidPaletteArgs(format!(
                        "unknown gradient {:?}, expected one of: {}",
                        name,
                        PresetPalette::names().join(", ")
                    ))
                })?,
                None => PresetPalette::Orange,
            };
            Ok(Palette::preset(preset, midpoint)?)
        }
        _ => Err(TileError::InvalidPaletteArgs(
            "custom palette requires min_color, mid_color and max_color together".to_string(),
        )),
    }
}

/// Normalize filter parameters into an [`ActivityFilter`].
pub fn parse_filter(query: &TileQuery) -> TileResult<ActivityFilter> {
    let parse_date = |value: &Option<String>, param: &str| -> TileResult<Option<NaiveDate>> {
        match value {
            None => Ok(None),
            Some(s) => s.parse::<NaiveDate>().map(Some).map_err(|_| {
                TileError::InvalidFilterArgs(format!(
                    "{param} {s:?} is not an ISO-8601 date"
                ))
            }),
        }
    };

    let start_date = parse_date(&query.start_date, "start_date")?;
    let end_date = parse_date(&query.end_date, "end_date")?;
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            return Err(TileError::InvalidFilterArgs(format!(
                "start_date {start} is after end_date {end}"
            )));
        }
    }

    Ok(ActivityFilter {
        activity_type: query.activity_type.clone(),
        start_date,
        end_date,
    })
}
