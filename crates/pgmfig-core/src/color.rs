//! Color handling for pgmfig diagrams
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. Node fills, strokes, arrow heads and the raster
//! background all go through it.

use std::{fmt, str::FromStr};

use color::{DynamicColor, Srgb};

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use pgmfig_core::color::Color;
    ///
    /// let grey = Color::new("#b3b3b3").unwrap();
    /// let white = Color::new("white").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns the alpha (transparency) component of this color.
    ///
    /// The value is between 0.0 (fully transparent) and 1.0 (fully opaque).
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }

    /// Converts the color to 8-bit sRGB channels `[r, g, b, a]`.
    ///
    /// Used when a color has to leave the SVG world, e.g. to fill a raster
    /// background.
    ///
    /// ```
    /// use pgmfig_core::color::Color;
    ///
    /// let white = Color::new("white").unwrap();
    /// assert_eq!(white.to_rgba8(), [255, 255, 255, 255]);
    /// ```
    pub fn to_rgba8(self) -> [u8; 4] {
        let rgba = self.color.to_alpha_color::<Srgb>().to_rgba8();
        [rgba.r, rgba.g, rgba.b, rgba.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<Color> for svg::node::Value {
    fn from(color: Color) -> Self {
        Self::from(color.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_new() {
        assert!(Color::new("#ff0000").is_ok());
        assert!(Color::new("not-a-color").is_err());
    }

    #[test]
    fn test_color_default() {
        let color = Color::default();
        assert_eq!(color.to_string(), "black");
        assert_eq!(color.to_rgba8(), [0, 0, 0, 255]);
    }

    #[test]
    fn test_color_to_rgba8_grey() {
        let grey = Color::new("#b3b3b3").unwrap();
        assert_eq!(grey.to_rgba8(), [0xb3, 0xb3, 0xb3, 255]);
    }

    #[test]
    fn test_color_transparent_alpha() {
        let transparent = Color::new("transparent").unwrap();
        assert!(transparent.alpha() < 0.001);
    }
}
