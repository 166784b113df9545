use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};

/// 8-bit sRGB triple handed to the rendering collaborator.
pub type Color = Srgb<u8>;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Srgb::new(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category → Color
// ---------------------------------------------------------------------------

/// Maps the categories of one dimension to distinct colours.
///
/// Built once per load from the *full* dimension value set, in the order
/// given, so a category keeps its colour no matter which filter subset is
/// currently active.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub dimension: String,
    mapping: BTreeMap<String, Color>,
    default_color: Color,
}

impl ColorMap {
    /// Assign palette slots to `categories` in iteration order.
    pub fn new<I, S>(dimension: &str, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let categories: Vec<String> = categories.into_iter().map(Into::into).collect();
        let palette = generate_palette(categories.len());
        let mapping: BTreeMap<String, Color> =
            categories.into_iter().zip(palette).collect();

        ColorMap {
            dimension: dimension.to_string(),
            mapping,
            default_color: Srgb::new(128, 128, 128),
        }
    }

    /// Look up the colour for a category; unknown categories get grey.
    pub fn color_for(&self, category: &str) -> Color {
        self.mapping
            .get(category)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Legend entries (category → colour) for the UI, in sorted order.
    pub fn legend_entries(&self) -> Vec<(String, Color)> {
        self.mapping
            .iter()
            .map(|(cat, c)| (cat.clone(), *c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_size_matches_request() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(7).len(), 7);
    }

    #[test]
    fn palette_hues_are_distinct() {
        let palette = generate_palette(10);
        for i in 0..palette.len() {
            for j in (i + 1)..palette.len() {
                assert_ne!(palette[i], palette[j]);
            }
        }
    }

    #[test]
    fn assignment_is_stable_across_rebuilds() {
        let cats = ["Bird", "Fish", "Frog"];
        let a = ColorMap::new("species", cats);
        let b = ColorMap::new("species", cats);
        for cat in cats {
            assert_eq!(a.color_for(cat), b.color_for(cat));
        }
    }

    #[test]
    fn unknown_category_gets_default() {
        let map = ColorMap::new("species", ["Fish"]);
        assert_eq!(map.color_for("Whale"), Srgb::new(128, 128, 128));
    }
}
