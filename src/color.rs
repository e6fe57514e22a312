use std::collections::{BTreeMap, BTreeSet};

use palette::{Hsl, IntoColor, Srgb};

/// Colour used for values the map has never seen.
pub const DEFAULT_COLOR: &str = "#808080";

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct `#rrggbb` colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category label → hex colour
// ---------------------------------------------------------------------------

/// Maps the distinct values of a categorical column to distinct colours.
///
/// Built once over the whole dataset so a category keeps its colour no
/// matter which subset is currently plotted.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, String>,
}

impl ColorMap {
    pub fn new(values: &BTreeSet<String>) -> Self {
        let palette = generate_palette(values.len());
        let mapping = values.iter().cloned().zip(palette).collect();
        ColorMap { mapping }
    }

    pub fn color_for(&self, value: &str) -> &str {
        self.mapping
            .get(value)
            .map(String::as_str)
            .unwrap_or(DEFAULT_COLOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_distinct_hex() {
        let colors = generate_palette(5);
        assert_eq!(colors.len(), 5);
        assert!(colors.iter().all(|c| c.len() == 7 && c.starts_with('#')));
        let unique: BTreeSet<_> = colors.iter().collect();
        assert_eq!(unique.len(), 5);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn color_map_is_stable_and_falls_back() {
        let cats: BTreeSet<String> = ["v1.0", "v1.1", "FT", "B4", "B5"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let map = ColorMap::new(&cats);

        assert_eq!(map.color_for("FT"), ColorMap::new(&cats).color_for("FT"));
        assert_ne!(map.color_for("FT"), map.color_for("B5"));
        assert_eq!(map.color_for("Starship"), DEFAULT_COLOR);
    }
}
