//! Straight edges with optional filled arrow heads.

use svg::node::element as svg_element;

use crate::{
    apply_stroke,
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition},
    geometry::Point,
};

/// Visual style shared by every edge of a diagram.
///
/// Head dimensions are in points. `head_width` is the full width of the
/// triangle's base.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowDefinition {
    stroke: StrokeDefinition,
    head_length: f32,
    head_width: f32,
}

impl ArrowDefinition {
    pub fn new(stroke: StrokeDefinition, head_length: f32, head_width: f32) -> Self {
        Self {
            stroke,
            head_length,
            head_width,
        }
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    pub fn head_length(&self) -> f32 {
        self.head_length
    }

    pub fn head_width(&self) -> f32 {
        self.head_width
    }
}

/// An edge between two already clipped endpoints.
///
/// Endpoints are relative to the position passed to
/// [`Drawable::render_to_layers`].
#[derive(Debug, Clone)]
pub struct Arrow<'a> {
    definition: &'a ArrowDefinition,
    start: Point,
    end: Point,
    directed: bool,
}

impl<'a> Arrow<'a> {
    pub fn new(definition: &'a ArrowDefinition, start: Point, end: Point, directed: bool) -> Self {
        Self {
            definition,
            start,
            end,
            directed,
        }
    }

    /// Returns the three corners of the head: tip, left and right base.
    ///
    /// A segment shorter than the head gets a head scaled down to fit.
    fn head_points(&self, start: Point, end: Point) -> Option<[Point; 3]> {
        let delta = end.sub_point(start);
        let direction = delta.normalize()?;
        let length = self.definition.head_length().min(delta.hypot());
        let half_width = self.definition.head_width() / 2.0 * length
            / self.definition.head_length().max(f32::EPSILON);

        let base = end.sub_point(direction.scale(length));
        let offset = direction.perpendicular().scale(half_width);
        Some([end, base.add_point(offset), base.sub_point(offset)])
    }
}

impl Drawable for Arrow<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let start = position.add_point(self.start);
        let end = position.add_point(self.end);
        let stroke = self.definition.stroke();

        let mut group = svg_element::Group::new().set("class", "edge");

        let head = if self.directed {
            self.head_points(start, end)
        } else {
            None
        };

        // The shaft stops at the head's base so a wide stroke does not poke
        // through the tip.
        let shaft_end = match head {
            Some([_, left, right]) => left.add_point(right).scale(0.5),
            None => end,
        };

        let line = svg_element::Line::new()
            .set("x1", start.x())
            .set("y1", start.y())
            .set("x2", shaft_end.x())
            .set("y2", shaft_end.y())
            .set("stroke-linecap", "butt");
        group = group.add(apply_stroke!(line, stroke));

        if let Some(corners) = head {
            let points = corners
                .iter()
                .map(|point| format!("{},{}", point.x(), point.y()))
                .collect::<Vec<_>>()
                .join(" ");
            group = group.add(
                svg_element::Polygon::new()
                    .set("class", "arrow-head")
                    .set("points", points)
                    .set("fill", stroke.color())
                    .set("fill-opacity", stroke.color().alpha())
                    .set("stroke", "none"),
            );
        }

        output.add_to_layer(RenderLayer::Edge, Box::new(group));
        output
    }
}
