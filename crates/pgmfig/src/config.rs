//! Configuration types for pgmfig rendering.
//!
//! All types implement [`serde::Deserialize`] and default every missing
//! field, so an empty document is a valid configuration.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining render and style settings.
//! - [`RenderConfig`] - Output resolution and raster background.
//! - [`StyleConfig`] - Fonts, line widths, arrow heads and node styling.
//!
//! # Example
//!
//! ```
//! # use pgmfig::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.render().dpi(), 200);
//! assert!(config.render().background_color().is_ok());
//! ```

use serde::Deserialize;

use pgmfig_core::{color::Color, draw::StrokeStyle};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Render configuration section.
    #[serde(default)]
    render: RenderConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its two sections.
    pub fn new(render: RenderConfig, style: StyleConfig) -> Self {
        Self { render, style }
    }

    /// Returns the render configuration.
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the configuration with its DPI replaced.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.render.dpi = dpi;
        self
    }
}

/// Output resolution and raster background.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Raster resolution in dots per inch.
    #[serde(default = "default_dpi")]
    dpi: u32,

    /// Raster background, as a CSS color string.
    #[serde(default = "default_background_color")]
    background_color: String,
}

impl RenderConfig {
    /// Returns the raster resolution in dots per inch.
    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Returns the parsed background [`Color`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a valid color.
    pub fn background_color(&self) -> Result<Color, String> {
        Color::new(&self.background_color)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dpi: default_dpi(),
            background_color: default_background_color(),
        }
    }
}

/// Visual styling shared by every diagram.
///
/// Lengths are in points except the arrow head dimensions, which are in
/// centimetres.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    font_family: String,
    font_size: f32,
    line_width: f32,
    observed_offset: f32,
    shaded_color: String,
    arrow_head_length: f32,
    arrow_head_width: f32,
    plate_line_style: StrokeStyle,
}

impl StyleConfig {
    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    /// Distance between the two outlines of a ringed observed node.
    pub fn observed_offset(&self) -> f32 {
        self.observed_offset
    }

    /// Returns the parsed fill of shaded observed nodes.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a valid color.
    pub fn shaded_color(&self) -> Result<Color, String> {
        Color::new(&self.shaded_color)
    }

    pub fn arrow_head_length(&self) -> f32 {
        self.arrow_head_length
    }

    pub fn arrow_head_width(&self) -> f32 {
        self.arrow_head_width
    }

    pub fn plate_line_style(&self) -> &StrokeStyle {
        &self.plate_line_style
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_family: "serif".to_string(),
            font_size: 12.0,
            line_width: 1.0,
            observed_offset: 4.0,
            shaded_color: "#b3b3b3".to_string(),
            arrow_head_length: 0.2,
            arrow_head_width: 0.12,
            plate_line_style: StrokeStyle::Solid,
        }
    }
}

fn default_dpi() -> u32 {
    200
}

fn default_background_color() -> String {
    "white".to_string()
}
