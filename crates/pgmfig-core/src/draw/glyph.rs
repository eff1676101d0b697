//! Node glyphs: the circles, ellipses and dots that stand for variables.

use svg::node::element as svg_element;

use crate::{
    apply_stroke,
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition},
    geometry::{Point, Size},
};

/// Extra ring marking an observed node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObservedRing {
    /// Second outline inset by the given distance in points
    Inner(f32),
    /// Second outline outset by the given distance in points
    Outer(f32),
}

/// Whether the glyph is a hollow node or a filled dot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NodeStyle {
    #[default]
    Open,
    /// Solid dot in the stroke color
    Filled,
}

/// A node glyph of a given size, centred on its render position.
#[derive(Debug, Clone)]
pub struct NodeGlyph {
    id: String,
    size: Size,
    stroke: StrokeDefinition,
    style: NodeStyle,
    fill: Option<Color>,
    ring: Option<ObservedRing>,
}

impl NodeGlyph {
    /// Creates an open white glyph.
    ///
    /// `id` ends up in the `data-id` attribute of the rendered group.
    pub fn new(id: impl Into<String>, size: Size, stroke: StrokeDefinition) -> Self {
        Self {
            id: id.into(),
            size,
            stroke,
            style: NodeStyle::Open,
            fill: None,
            ring: None,
        }
    }

    pub fn with_style(mut self, style: NodeStyle) -> Self {
        self.style = style;
        self
    }

    /// Sets the interior color of an open glyph (white when unset).
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_ring(mut self, ring: ObservedRing) -> Self {
        self.ring = Some(ring);
        self
    }

    /// Returns the size of the main outline.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns the size of the outermost outline, including an outer ring.
    pub fn outline_size(&self) -> Size {
        match self.ring {
            Some(ObservedRing::Outer(offset)) => self.size.grow(offset),
            _ => self.size,
        }
    }

    /// Finds where the segment from `center` toward `external` leaves the
    /// outermost outline of this glyph.
    ///
    /// Returns `center` itself when both points coincide.
    pub fn find_intersection(&self, center: Point, external: Point) -> Point {
        let size = self.outline_size();
        let half_width = size.width() / 2.0;
        let half_height = size.height() / 2.0;

        let Some(direction) = external.sub_point(center).normalize() else {
            return center;
        };

        // Radius of the ellipse along the direction:
        // r = (a*b) / sqrt((b*cos(θ))² + (a*sin(θ))²)
        let radius = (half_width * half_height)
            / (half_height * direction.x()).hypot(half_width * direction.y());

        center.add_point(direction.scale(radius))
    }

    fn ellipse(&self, center: Point, size: Size) -> svg_element::Ellipse {
        let ellipse = svg_element::Ellipse::new()
            .set("cx", center.x())
            .set("cy", center.y())
            .set("rx", size.width() / 2.0)
            .set("ry", size.height() / 2.0);
        apply_stroke!(ellipse, &self.stroke)
    }
}

impl Drawable for NodeGlyph {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        let main_fill = match self.style {
            NodeStyle::Filled => self.stroke.color(),
            NodeStyle::Open => self.fill.unwrap_or_else(|| {
                Color::new("white").expect("'white' is a valid CSS color")
            }),
        };

        let mut group = svg_element::Group::new()
            .set("class", "node")
            .set("data-id", self.id.as_str());

        if let Some(ObservedRing::Outer(offset)) = self.ring {
            group = group.add(
                self.ellipse(position, self.size.grow(offset))
                    .set("fill", "none"),
            );
        }

        group = group.add(
            self.ellipse(position, self.size)
                .set("fill", main_fill)
                .set("fill-opacity", main_fill.alpha()),
        );

        if let Some(ObservedRing::Inner(offset)) = self.ring {
            let inner = self.size.grow(-offset);
            if inner.width() > 0.0 && inner.height() > 0.0 {
                group = group.add(self.ellipse(position, inner).set("fill", "none"));
            }
        }

        output.add_to_layer(RenderLayer::Node, Box::new(group));
        output
    }
}
