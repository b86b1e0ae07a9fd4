//! Palette configuration for heatmap rendering.
//!
//! A palette is either a named preset or a custom three-color ramp. Both
//! normalize to an ordered gradient stop list; the renderer maps overlap
//! counts onto the stops with `t = count / midpoint` clamped to [0, 1].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default count mapped onto the mid stop of the gradient.
pub const DEFAULT_MIDPOINT: u32 = 10;

/// Color value in RGBA format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Parse a `#RRGGBB` hex string.
    pub fn from_hex(s: &str) -> Result<Self, PaletteError> {
        let hex = s.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(PaletteError::InvalidColor(s.to_string()));
        }

        let parse = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| PaletteError::InvalidColor(s.to_string()))
        };

        Ok(Self {
            r: parse(0..2)?,
            g: parse(2..4)?,
            b: parse(4..6)?,
            a: 255,
        })
    }

    /// Lowercase hex form used in canonical palette strings.
    pub fn to_hex(self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear interpolation toward `other`, per channel in RGBA.
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let lerp_u8 =
            |a: u8, b: u8| -> u8 { ((a as f64) * (1.0 - t) + (b as f64) * t).round() as u8 };

        Color {
            r: lerp_u8(self.r, other.r),
            g: lerp_u8(self.g, other.g),
            b: lerp_u8(self.b, other.b),
            a: lerp_u8(self.a, other.a),
        }
    }
}

/// A color stop in a gradient: position in [0, 1] plus the color there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub position: f64,
    pub color: Color,
}

impl GradientStop {
    pub fn new(position: f64, color: Color) -> Self {
        Self { position, color }
    }
}

/// Validate a stop list: strictly increasing positions, anchored at 0 and 1.
pub fn validate_stops(stops: &[GradientStop]) -> Result<(), PaletteError> {
    if stops.len() < 2 {
        return Err(PaletteError::InvalidStops(
            "gradient needs at least 2 stops".to_string(),
        ));
    }
    if stops[0].position != 0.0 {
        return Err(PaletteError::InvalidStops(
            "first stop must sit at position 0.0".to_string(),
        ));
    }
    if stops[stops.len() - 1].position != 1.0 {
        return Err(PaletteError::InvalidStops(
            "last stop must sit at position 1.0".to_string(),
        ));
    }
    for pair in stops.windows(2) {
        if pair[1].position <= pair[0].position {
            return Err(PaletteError::InvalidStops(
                "stop positions must be strictly increasing".to_string(),
            ));
        }
    }
    Ok(())
}

/// Named preset palettes. Each preset is purely a stop list; adding a preset
/// means adding a name and its stops here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetPalette {
    Orange,
    Pinkish,
    BlueRed,
    Red,
}

impl PresetPalette {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "orange" => Some(Self::Orange),
            "pinkish" => Some(Self::Pinkish),
            "blue_red" => Some(Self::BlueRed),
            "red" => Some(Self::Red),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Orange => "orange",
            Self::Pinkish => "pinkish",
            Self::BlueRed => "blue_red",
            Self::Red => "red",
        }
    }

    /// All preset names, for error messages and capability listings.
    pub fn names() -> &'static [&'static str] {
        &["orange", "pinkish", "blue_red", "red"]
    }

    pub fn stops(self) -> Vec<GradientStop> {
        match self {
            Self::Orange => vec![
                GradientStop::new(0.0, Color::rgb(0x66, 0x22, 0x00)),
                GradientStop::new(0.4, Color::rgb(0xff, 0x66, 0x00)),
                GradientStop::new(0.75, Color::rgb(0xff, 0xcc, 0x00)),
                GradientStop::new(1.0, Color::rgb(0xff, 0xff, 0xcc)),
            ],
            Self::Pinkish => vec![
                GradientStop::new(0.0, Color::rgb(0x33, 0x00, 0x1a)),
                GradientStop::new(0.5, Color::rgb(0xff, 0x33, 0x99)),
                GradientStop::new(1.0, Color::rgb(0xff, 0xcc, 0xff)),
            ],
            Self::BlueRed => vec![
                GradientStop::new(0.0, Color::rgb(0x00, 0x00, 0xff)),
                GradientStop::new(0.5, Color::rgb(0x80, 0x00, 0x80)),
                GradientStop::new(1.0, Color::rgb(0xff, 0x00, 0x00)),
            ],
            Self::Red => vec![
                GradientStop::new(0.0, Color::rgb(0x33, 0x00, 0x00)),
                GradientStop::new(0.5, Color::rgb(0xcc, 0x00, 0x00)),
                GradientStop::new(1.0, Color::rgb(0xff, 0x66, 0x66)),
            ],
        }
    }
}

/// A fully-specified palette request.
#[derive(Debug, Clone, PartialEq)]
pub enum Palette {
    Preset {
        preset: PresetPalette,
        midpoint: u32,
    },
    Custom {
        min: Color,
        mid: Color,
        max: Color,
        midpoint: u32,
    },
}

impl Default for Palette {
    fn default() -> Self {
        Self::Preset {
            preset: PresetPalette::Orange,
            midpoint: DEFAULT_MIDPOINT,
        }
    }
}

impl Palette {
    pub fn preset(preset: PresetPalette, midpoint: u32) -> Result<Self, PaletteError> {
        let palette = Self::Preset { preset, midpoint };
        palette.validate()?;
        Ok(palette)
    }

    pub fn custom(min: Color, mid: Color, max: Color, midpoint: u32) -> Result<Self, PaletteError> {
        let palette = Self::Custom {
            min,
            mid,
            max,
            midpoint,
        };
        palette.validate()?;
        Ok(palette)
    }

    pub fn validate(&self) -> Result<(), PaletteError> {
        if self.midpoint() < 1 {
            return Err(PaletteError::InvalidMidpoint(self.midpoint()));
        }
        validate_stops(&self.stops())
    }

    /// Count mapped to the mid stop; `t = count / midpoint`.
    pub fn midpoint(&self) -> u32 {
        match self {
            Self::Preset { midpoint, .. } | Self::Custom { midpoint, .. } => *midpoint,
        }
    }

    /// Normalized stop list for this palette.
    pub fn stops(&self) -> Vec<GradientStop> {
        match self {
            Self::Preset { preset, .. } => preset.stops(),
            Self::Custom { min, mid, max, .. } => vec![
                GradientStop::new(0.0, *min),
                GradientStop::new(0.5, *mid),
                GradientStop::new(1.0, *max),
            ],
        }
    }

    /// Canonical string form: lowercase, fixed field order, defaults omitted.
    ///
    /// Two requests describing the same palette produce the same string, so
    /// its digest can key the tile cache.
    pub fn canonical(&self) -> String {
        let mut out = match self {
            Self::Preset { preset, .. } => preset.name().to_string(),
            Self::Custom { min, mid, max, .. } => {
                format!("{},{},{}", min.to_hex(), mid.to_hex(), max.to_hex())
            }
        };
        if self.midpoint() != DEFAULT_MIDPOINT {
            out.push_str(&format!(";midpoint={}", self.midpoint()));
        }
        out
    }

    /// Stable digest of the canonical form.
    pub fn digest(&self) -> u32 {
        crc32fast::hash(self.canonical().as_bytes())
    }
}

#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("invalid color {0:?}, expected #RRGGBB")]
    InvalidColor(String),

    #[error("midpoint must be >= 1, got {0}")]
    InvalidMidpoint(u32),

    #[error("invalid gradient stops: {0}")]
    InvalidStops(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        let c = Color::from_hex("#FF5500").unwrap();
        assert_eq!((c.r, c.g, c.b, c.a), (255, 85, 0, 255));

        let c = Color::from_hex("00ff00").unwrap();
        assert_eq!((c.r, c.g, c.b), (0, 255, 0));

        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#GGGGGG").is_err());
    }

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        let black = Color::rgb(0, 0, 0);
        let white = Color::rgb(255, 255, 255);

        assert_eq!(black.lerp(white, 0.0), black);
        assert_eq!(black.lerp(white, 1.0), white);

        let mid = black.lerp(white, 0.5);
        assert!((mid.r as i32 - 128).abs() <= 1);
    }

    #[test]
    fn test_every_preset_has_valid_stops() {
        for name in PresetPalette::names() {
            let preset = PresetPalette::from_name(name).unwrap();
            validate_stops(&preset.stops()).unwrap();
        }
    }

    #[test]
    fn test_midpoint_validation() {
        assert!(Palette::preset(PresetPalette::Red, 0).is_err());
        assert!(Palette::preset(PresetPalette::Red, 1).is_ok());
    }

    #[test]
    fn test_canonical_omits_default_midpoint() {
        let p = Palette::preset(PresetPalette::Orange, DEFAULT_MIDPOINT).unwrap();
        assert_eq!(p.canonical(), "orange");

        let p = Palette::preset(PresetPalette::Orange, 2).unwrap();
        assert_eq!(p.canonical(), "orange;midpoint=2");

        let p = Palette::custom(
            Color::from_hex("#FF0000").unwrap(),
            Color::from_hex("#00FF00").unwrap(),
            Color::from_hex("#0000FF").unwrap(),
            DEFAULT_MIDPOINT,
        )
        .unwrap();
        assert_eq!(p.canonical(), "ff0000,00ff00,0000ff");
    }

    #[test]
    fn test_digest_distinguishes_palettes() {
        let a = Palette::preset(PresetPalette::Orange, 10).unwrap();
        let b = Palette::preset(PresetPalette::Red, 10).unwrap();
        let c = Palette::preset(PresetPalette::Orange, 5).unwrap();
        assert_ne!(a.digest(), b.digest());
        assert_ne!(a.digest(), c.digest());
        assert_eq!(a.digest(), a.clone().digest());
    }
}
