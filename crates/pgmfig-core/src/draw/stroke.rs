//! Stroke and line-style definitions.
//!
//! - [`StrokeDefinition`]: color, width and pattern of a line
//! - [`StrokeStyle`]: solid or patterned lines
//! - [`apply_stroke!`](crate::apply_stroke!): applies a definition to an SVG element
//!
//! ```
//! use pgmfig_core::draw::{StrokeDefinition, StrokeStyle};
//! use pgmfig_core::color::Color;
//! use svg::node::element as svg_element;
//!
//! let mut stroke = StrokeDefinition::new(Color::default(), 1.0);
//! stroke.set_style(StrokeStyle::Dashed);
//!
//! let rect = svg_element::Rectangle::new().set("width", 10).set("height", 5);
//! let rect = pgmfig_core::apply_stroke!(rect, &stroke);
//! ```

use std::str::FromStr;

use serde::Deserialize;

use crate::color::Color;

/// Defines the visual pattern of a stroke.
///
/// # SVG Mapping
///
/// - `Solid`: no dasharray attribute
/// - `Dashed`: "5,5"
/// - `Dotted`: "2,3"
/// - `Custom(pattern)`: the provided pattern string
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    /// Comma or space separated dash/gap lengths, e.g. "10,5,2,3"
    Custom(String),
}

impl FromStr for StrokeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            pattern if is_dash_pattern(pattern) => Ok(Self::Custom(pattern.to_string())),
            _ => Err(format!(
                "invalid stroke style `{s}`, valid values: solid, dashed, dotted, or a dash pattern like \"4,2\""
            )),
        }
    }
}

impl TryFrom<String> for StrokeStyle {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl StrokeStyle {
    /// Returns the SVG dasharray value for this style, or None for solid lines
    pub fn to_svg_value(&self) -> Option<String> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("5,5".to_string()),
            Self::Dotted => Some("2,3".to_string()),
            Self::Custom(pattern) => Some(pattern.clone()),
        }
    }
}

fn is_dash_pattern(s: &str) -> bool {
    let mut lengths = s
        .split([',', ' '])
        .filter(|part| !part.is_empty())
        .peekable();
    lengths.peek().is_some() && lengths.all(|part| part.parse::<f32>().is_ok_and(|v| v >= 0.0))
}

/// A stroke definition for rendering lines and outlines.
///
/// Widths are in points.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
}

impl StrokeDefinition {
    /// Creates a new solid stroke with the given color and width.
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
        }
    }

    /// Returns the stroke color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns the stroke width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Returns the stroke style.
    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// Sets the stroke style.
    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self::new(Color::default(), 1.0)
    }
}

/// Apply all stroke attributes to an SVG element.
///
/// Sets color, opacity, width and, for patterned styles, the dasharray.
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let mut elem = $element
            .set("stroke", $stroke.color().to_string())
            .set("stroke-opacity", $stroke.color().alpha())
            .set("stroke-width", $stroke.width());

        if let Some(dasharray) = $stroke.style().to_svg_value() {
            elem = elem.set("stroke-dasharray", dasharray);
        }

        elem
    }};
}
