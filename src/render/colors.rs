//! Hotness palette and color helpers.
//!
//! Colors are CSS strings so they can go straight into SVG attributes.

use crate::types::Hotness;

/// A CSS color string (e.g., "#EB6045")
pub type CssColor = String;

/// RGB color with u8 components for color math without re-parsing strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse from a hex string (with or without #).
    /// Returns None if the format is invalid.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        Some(Self::new(r, g, b))
    }

    /// Convert to CSS hex string (#RRGGBB).
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Darken the color by blending with black.
    /// Factor of 0.0 = no change, 1.0 = pure black.
    pub fn darken(self, factor: f64) -> Self {
        Self::new(
            Self::blend_component(self.r, 0, factor),
            Self::blend_component(self.g, 0, factor),
            Self::blend_component(self.b, 0, factor),
        )
    }

    /// Relative luminance (0.0 to 1.0): 0.299*R + 0.587*G + 0.114*B
    pub fn luminance(self) -> f64 {
        let r = f64::from(self.r);
        let g = f64::from(self.g);
        let b = f64::from(self.b);
        (0.299 * r + 0.587 * g + 0.114 * b) / 255.0
    }

    pub fn is_light(self) -> bool {
        self.luminance() > 0.5
    }

    /// Blend a single color component toward a target.
    /// The cast is safe because we clamp to [0, 255] before converting.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn blend_component(from: u8, to: u8, factor: f64) -> u8 {
        let from = f64::from(from);
        let to = f64::from(to);
        let blended = from + (to - from) * factor.clamp(0.0, 1.0);
        blended.clamp(0.0, 255.0).round() as u8
    }
}

/// Fill colors for hotness 1 (very hot) through 5 (never hot).
pub const HOT_FILLS: [&str; 5] = ["#EB6045", "#FDC171", "#D2EC9B", "#69C3A4", "#4AA3B1"];

/// Class names for the same buckets, for hosts that style cells with CSS.
pub const HOT_CLASSES: [&str; 5] = ["very-hot", "some-hot", "so-so", "no-hot", "never-hot"];

/// Text color used on light fills.
pub const INK: &str = "#333E48";

fn bucket(hot: Hotness) -> usize {
    usize::from(hot.level().saturating_sub(1))
}

/// Fill color for a hotness bucket.
pub fn hot_fill(hot: Hotness) -> &'static str {
    HOT_FILLS.get(bucket(hot)).copied().unwrap_or(INK)
}

/// CSS class for a hotness bucket.
pub fn hot_class(hot: Hotness) -> &'static str {
    HOT_CLASSES.get(bucket(hot)).copied().unwrap_or("never-hot")
}

/// Readable text color on top of `fill`.
pub fn text_color_on(fill: &str) -> &'static str {
    match Rgb::from_hex(fill) {
        Some(rgb) if !rgb.is_light() => "#FFFFFF",
        _ => INK,
    }
}

/// Outline for an emphasized cell: its own fill, a quarter darker.
pub fn emphasis_stroke(fill: &str) -> CssColor {
    Rgb::from_hex(fill)
        .map(|rgb| rgb.darken(0.25).to_hex())
        .unwrap_or_else(|| INK.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_buckets() {
        assert_eq!(hot_fill(Hotness::new(1)), "#EB6045");
        assert_eq!(hot_fill(Hotness::new(5)), "#4AA3B1");
        assert_eq!(hot_class(Hotness::new(3)), "so-so");
    }

    #[test]
    fn test_palette_text_is_dark() {
        for fill in HOT_FILLS {
            assert_eq!(text_color_on(fill), INK, "fill {fill}");
        }
        assert_eq!(text_color_on("#101010"), "#FFFFFF");
    }

    #[test]
    fn test_darken() {
        assert_eq!(Rgb::from_hex("#FFFFFF").unwrap().darken(0.5).to_hex(), "#808080");
        assert_eq!(emphasis_stroke("not a color"), INK);
    }
}
