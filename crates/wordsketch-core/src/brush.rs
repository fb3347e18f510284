//! Brush settings applied to new strokes.

use peniko::Color;
use peniko::color::{ParseError, Srgb};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default brush color.
pub const DEFAULT_BRUSH_COLOR: &str = "#000000";

/// Default brush size in surface pixels.
pub const DEFAULT_BRUSH_SIZE: f64 = 4.0;

/// Brush errors.
#[derive(Debug, Error)]
pub enum BrushError {
    #[error("Invalid color {value:?}: {source}")]
    InvalidColor {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("Invalid brush size: {0}")]
    InvalidSize(f64),
}

/// Parse any CSS color value (`#rgb`, `#rrggbb`, `rgb()`, named colors...).
pub fn parse_color(value: &str) -> Result<Color, BrushError> {
    peniko::color::parse_color(value)
        .map(|color| color.to_alpha_color::<Srgb>())
        .map_err(|source| BrushError::InvalidColor {
            value: value.to_string(),
            source,
        })
}

/// Size presets offered to children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrushSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl BrushSize {
    /// Line width for this preset.
    pub fn width(self) -> f64 {
        match self {
            BrushSize::Small => 2.0,
            BrushSize::Medium => 4.0,
            BrushSize::Large => 8.0,
        }
    }

    /// Cycle to the next preset.
    pub fn next(self) -> Self {
        match self {
            BrushSize::Small => BrushSize::Medium,
            BrushSize::Medium => BrushSize::Large,
            BrushSize::Large => BrushSize::Small,
        }
    }
}

/// Current brush color and size.
///
/// The brush is read once when a stroke begins; later changes only affect
/// the next stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    color: String,
    size: f64,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: DEFAULT_BRUSH_COLOR.to_string(),
            size: DEFAULT_BRUSH_SIZE,
        }
    }
}

impl Brush {
    /// Create a brush, validating both settings.
    pub fn new(color: &str, size: f64) -> Result<Self, BrushError> {
        let mut brush = Self::default();
        brush.set_color(color)?;
        brush.set_size(size)?;
        Ok(brush)
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    /// Set the color. Unparseable colors leave the brush unchanged.
    pub fn set_color(&mut self, value: &str) -> Result<(), BrushError> {
        parse_color(value)?;
        self.color = value.trim().to_string();
        Ok(())
    }

    /// Set the size. Non-positive or non-finite sizes leave the brush unchanged.
    pub fn set_size(&mut self, size: f64) -> Result<(), BrushError> {
        if !(size.is_finite() && size > 0.0) {
            return Err(BrushError::InvalidSize(size));
        }
        self.size = size;
        Ok(())
    }

    /// Apply a size preset.
    pub fn set_preset(&mut self, preset: BrushSize) {
        self.size = preset.width();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_brush() {
        let brush = Brush::default();
        assert_eq!(brush.color(), "#000000");
        assert_eq!(brush.size(), 4.0);
    }

    #[test]
    fn test_parse_color_forms() {
        let red = parse_color("#ff0000").unwrap().to_rgba8();
        assert_eq!((red.r, red.g, red.b, red.a), (255, 0, 0, 255));

        let named = parse_color("blue").unwrap().to_rgba8();
        assert_eq!((named.r, named.g, named.b), (0, 0, 255));

        let func = parse_color("rgb(0, 128, 0)").unwrap().to_rgba8();
        assert_eq!(func.g, 128);

        assert!(parse_color("definitely-not-a-color").is_err());
    }

    #[test]
    fn test_invalid_settings_leave_brush_unchanged() {
        let mut brush = Brush::default();
        assert!(brush.set_color("nope").is_err());
        assert!(brush.set_size(0.0).is_err());
        assert!(brush.set_size(f64::NAN).is_err());
        assert_eq!(brush, Brush::default());
    }

    #[test]
    fn test_presets() {
        let mut brush = Brush::default();
        brush.set_preset(BrushSize::Large);
        assert_eq!(brush.size(), 8.0);
        assert_eq!(BrushSize::Large.next(), BrushSize::Small);
    }
}
