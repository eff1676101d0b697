//! Text rendering for node labels and plate captions.
//!
//! A [`Label`] pairs parsed [`Markup`] with a [`TextDefinition`] and renders
//! to a single SVG `<text>` element holding one `<tspan>` per styled run.
//! Subscripts and superscripts use `baseline-shift` with a reduced font size.

use svg::{self, node::Text as SvgText, node::element as svg_element};

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer},
    geometry::Point,
    markup::{Markup, Script},
};

/// Font size of sub/superscripts relative to the surrounding text.
const SCRIPT_SCALE: f32 = 0.7;

/// Defines the visual style for label text.
///
/// | Property    | Default   |
/// |-------------|-----------|
/// | Font family | `"serif"` |
/// | Font size   | `12` pt   |
/// | Color       | black     |
#[derive(Debug, Clone, PartialEq)]
pub struct TextDefinition {
    font_family: String,
    font_size: f32,
    color: Color,
}

impl TextDefinition {
    pub fn new(font_family: impl Into<String>, font_size: f32) -> Self {
        Self {
            font_family: font_family.into(),
            font_size,
            color: Color::default(),
        }
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self::new("serif", 12.0)
    }
}

/// Which point of the text box sits on the render position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAnchor {
    /// Centred horizontally and vertically
    #[default]
    Center,
    /// Centred horizontally, alphabetic baseline on the position
    Baseline,
    BottomLeft,
    BottomCenter,
    BottomRight,
    TopLeft,
    TopCenter,
    TopRight,
}

impl TextAnchor {
    /// Returns the SVG `text-anchor` and `dominant-baseline` values.
    fn svg_values(self) -> (&'static str, &'static str) {
        match self {
            Self::Center => ("middle", "central"),
            Self::Baseline => ("middle", "alphabetic"),
            Self::BottomLeft => ("start", "text-after-edge"),
            Self::BottomCenter => ("middle", "text-after-edge"),
            Self::BottomRight => ("end", "text-after-edge"),
            Self::TopLeft => ("start", "text-before-edge"),
            Self::TopCenter => ("middle", "text-before-edge"),
            Self::TopRight => ("end", "text-before-edge"),
        }
    }
}

/// A renderable label.
#[derive(Debug, Clone)]
pub struct Label<'a> {
    definition: &'a TextDefinition,
    markup: &'a Markup,
    anchor: TextAnchor,
}

impl<'a> Label<'a> {
    pub fn new(definition: &'a TextDefinition, markup: &'a Markup, anchor: TextAnchor) -> Self {
        Self {
            definition,
            markup,
            anchor,
        }
    }
}

impl Drawable for Label<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        if self.markup.is_empty() {
            return output;
        }

        let (text_anchor, baseline) = self.anchor.svg_values();
        let color = self.definition.color();

        let mut rendered_text = svg_element::Text::new("")
            .set("class", "label")
            .set("x", position.x())
            .set("y", position.y())
            .set("text-anchor", text_anchor)
            .set("dominant-baseline", baseline)
            .set("font-family", self.definition.font_family())
            .set("font-size", self.definition.font_size())
            .set("fill", color.to_string())
            .set("fill-opacity", color.alpha());

        for segment in self.markup.segments() {
            let mut tspan = svg_element::TSpan::new("");
            if segment.is_italic() {
                tspan = tspan.set("font-style", "italic");
            }
            match segment.script() {
                Script::Normal => {}
                Script::Subscript => {
                    tspan = tspan
                        .set("baseline-shift", "sub")
                        .set("font-size", self.definition.font_size() * SCRIPT_SCALE);
                }
                Script::Superscript => {
                    tspan = tspan
                        .set("baseline-shift", "super")
                        .set("font-size", self.definition.font_size() * SCRIPT_SCALE);
                }
            }
            rendered_text = rendered_text.add(tspan.add(SvgText::new(segment.text())));
        }

        output.add_to_layer(RenderLayer::Text, Box::new(rendered_text));
        output
    }
}
