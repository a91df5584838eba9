use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Bars and map points outside any selection.
pub const NEUTRAL: Color32 = Color32::from_rgb(100, 149, 237);

/// `n` distinct colours on evenly spaced hues, starting at `offset` degrees.
pub fn generate_palette(n: usize, offset: f32) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = offset + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.70, 0.50);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Municipality → colour
// ---------------------------------------------------------------------------

/// Stable colours per municipality, shared by comparison charts, the map
/// and the metric-card headers so one place reads as one colour.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    /// Colours for the given (already sorted) municipality list.
    pub fn new(municipalities: &[String]) -> Self {
        let palette = generate_palette(municipalities.len(), 210.0);
        ColorMap {
            mapping: municipalities.iter().cloned().zip(palette).collect(),
        }
    }

    pub fn color_for(&self, municipality: Option<&str>) -> Color32 {
        municipality
            .and_then(|m| self.mapping.get(m))
            .copied()
            .unwrap_or(NEUTRAL)
    }

    /// Two clearly different colours for a side-by-side comparison; the
    /// per-municipality palette can put neighbours on near-identical hues.
    pub fn pair(first: &str, second: &str) -> [Color32; 2] {
        let pal = generate_palette(2, 210.0);
        if first == second {
            [pal[0], pal[0]]
        } else {
            [pal[0], pal[1]]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_hues_are_distinct() {
        let pal = generate_palette(4, 0.0);
        assert_eq!(pal.len(), 4);
        for (i, a) in pal.iter().enumerate() {
            for b in &pal[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0, 0.0).is_empty());
    }

    #[test]
    fn unknown_municipality_gets_neutral() {
        let cm = ColorMap::new(&["Amsterdam".to_string(), "Rotterdam".to_string()]);
        assert_ne!(cm.color_for(Some("Amsterdam")), cm.color_for(Some("Rotterdam")));
        assert_eq!(cm.color_for(Some("Delft")), NEUTRAL);
        assert_eq!(cm.color_for(None), NEUTRAL);
    }

    #[test]
    fn same_pair_shares_colour() {
        let [a, b] = ColorMap::pair("Delft", "Delft");
        assert_eq!(a, b);
        let [a, b] = ColorMap::pair("Delft", "Leiden");
        assert_ne!(a, b);
    }
}
