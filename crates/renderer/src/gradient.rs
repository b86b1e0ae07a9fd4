//! Count-to-color gradient mapping.
//!
//! A [`ResolvedGradient`] is a palette normalized to its stop list plus the
//! midpoint count. Counts map to `t = count / midpoint` clamped to [0, 1],
//! then linearly interpolated across the stops per RGBA channel. Count 0 is
//! always fully transparent so empty pixels never occlude the base map.

use rayon::prelude::*;

use trackmap_common::palette::{Color, GradientStop, Palette};

use crate::buffer_pool;
use crate::raster::OverlapGrid;

/// A palette normalized for rendering.
#[derive(Debug, Clone)]
pub struct ResolvedGradient {
    stops: Vec<GradientStop>,
    midpoint: u32,
}

impl ResolvedGradient {
    pub fn new(palette: &Palette) -> Self {
        Self {
            stops: palette.stops(),
            midpoint: palette.midpoint(),
        }
    }

    /// Color for an overlap count. Count 0 is fully transparent regardless
    /// of the stop list.
    pub fn color_for(&self, count: u8) -> Color {
        if count == 0 {
            return Color::transparent();
        }
        let t = (count as f64 / self.midpoint as f64).clamp(0.0, 1.0);
        self.sample(t)
    }

    /// Interpolate the stop list at `t` in [0, 1].
    fn sample(&self, t: f64) -> Color {
        // Find the bracketing stops; positions are strictly increasing with
        // the first at 0.0 and the last at 1.0.
        for pair in self.stops.windows(2) {
            let (low, high) = (pair[0], pair[1]);
            if t <= high.position {
                let span = high.position - low.position;
                let local = (t - low.position) / span;
                return low.color.lerp(high.color, local);
            }
        }
        self.stops[self.stops.len() - 1].color
    }

    /// Precompute the color for every possible count.
    ///
    /// Computed once per tile render; colorizing then indexes instead of
    /// interpolating per pixel, and the table doubles as the PLTE/tRNS
    /// palette for indexed PNG encoding.
    pub fn build_lut(&self) -> PaletteLut {
        let colors = (0..=255u16)
            .map(|count| {
                let c = self.color_for(count as u8);
                (c.r, c.g, c.b, c.a)
            })
            .collect();
        PaletteLut { colors }
    }
}

/// 256-entry RGBA lookup table: one color per overlap count.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteLut {
    /// `colors[count]` is the RGBA tuple for that count.
    pub colors: Vec<(u8, u8, u8, u8)>,
}

/// Expand an overlap grid into RGBA pixels through the lookup table.
///
/// Rows are independent, so this processes them in parallel. The indexed PNG
/// path skips this entirely (the grid itself is the index plane); the RGBA
/// output exists for callers that need raw pixels.
pub fn colorize(grid: &OverlapGrid, lut: &PaletteLut) -> Vec<u8> {
    let size = grid.size();
    let counts = grid.counts();

    buffer_pool::take_pixel_buffer(size, size, |pixels| {
        let row_bytes = size * 4;
        pixels
            .par_chunks_mut(row_bytes)
            .enumerate()
            .for_each(|(v, row)| {
                let count_row = &counts[v * size..(v + 1) * size];
                for (u, &count) in count_row.iter().enumerate() {
                    let (r, g, b, a) = lut.colors[count as usize];
                    let px = u * 4;
                    row[px] = r;
                    row[px + 1] = g;
                    row[px + 2] = b;
                    row[px + 3] = a;
                }
            });
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackmap_common::palette::{PresetPalette, DEFAULT_MIDPOINT};

    fn custom_palette(midpoint: u32) -> Palette {
        Palette::custom(
            Color::rgb(0, 0, 0),
            Color::rgb(128, 128, 128),
            Color::rgb(255, 255, 255),
            midpoint,
        )
        .unwrap()
    }

    #[test]
    fn test_count_zero_is_transparent_for_every_palette() {
        let mut palettes: Vec<Palette> = PresetPalette::names()
            .iter()
            .map(|name| {
                Palette::preset(PresetPalette::from_name(name).unwrap(), DEFAULT_MIDPOINT)
                    .unwrap()
            })
            .collect();
        palettes.push(custom_palette(5));

        for palette in &palettes {
            let gradient = ResolvedGradient::new(palette);
            assert_eq!(gradient.color_for(0).a, 0, "palette {palette:?}");
            assert_eq!(gradient.build_lut().colors[0].3, 0);
        }
    }

    #[test]
    fn test_midpoint_count_hits_mid_stop() {
        let gradient = ResolvedGradient::new(&custom_palette(10));
        let c = gradient.color_for(5);
        assert_eq!((c.r, c.g, c.b), (128, 128, 128));
    }

    #[test]
    fn test_counts_at_and_beyond_midpoint_clamp_to_max() {
        let gradient = ResolvedGradient::new(&custom_palette(2));
        let at = gradient.color_for(2);
        let beyond = gradient.color_for(200);
        assert_eq!((at.r, at.g, at.b), (255, 255, 255));
        assert_eq!(at, beyond);
    }

    #[test]
    fn test_lut_matches_direct_evaluation() {
        let gradient = ResolvedGradient::new(&custom_palette(7));
        let lut = gradient.build_lut();
        for count in [0u8, 1, 3, 7, 8, 255] {
            let c = gradient.color_for(count);
            assert_eq!(lut.colors[count as usize], (c.r, c.g, c.b, c.a));
        }
    }

    #[test]
    fn test_colorize_maps_counts_to_pixels() {
        let mut grid = OverlapGrid::with_size(2);
        grid.stamp(0, 0);
        grid.stamp(1, 1);
        grid.stamp(1, 1);

        let gradient = ResolvedGradient::new(&custom_palette(2));
        let pixels = colorize(&grid, &gradient.build_lut());
        assert_eq!(pixels.len(), 2 * 2 * 4);

        // (0,0): count 1 -> mid color, opaque.
        assert_eq!(&pixels[0..4], &[128, 128, 128, 255]);
        // (1,0): count 0 -> transparent.
        assert_eq!(pixels[7], 0);
        // (1,1): count 2 -> max color.
        assert_eq!(&pixels[12..16], &[255, 255, 255, 255]);
    }
}
