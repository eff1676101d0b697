//! Plates: rectangles grouping replicated nodes.

use svg::node::element as svg_element;

use crate::{
    apply_stroke,
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition},
    geometry::{Point, Size},
};

/// Visual style for plate rectangles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlateDefinition {
    stroke: StrokeDefinition,
}

impl PlateDefinition {
    pub fn new(stroke: StrokeDefinition) -> Self {
        Self { stroke }
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }
}

/// A plate rectangle whose top-left corner is the render position.
#[derive(Debug, Clone)]
pub struct Plate<'a> {
    definition: &'a PlateDefinition,
    size: Size,
}

impl<'a> Plate<'a> {
    pub fn new(definition: &'a PlateDefinition, size: Size) -> Self {
        Self { definition, size }
    }
}

impl Drawable for Plate<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        let rect = svg_element::Rectangle::new()
            .set("class", "plate")
            .set("x", position.x())
            .set("y", position.y())
            .set("width", self.size.width())
            .set("height", self.size.height());
        let rect = apply_stroke!(rect, self.definition.stroke()).set("fill", "none");

        output.add_to_layer(RenderLayer::Plate, Box::new(rect));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(definition: &PlateDefinition) -> String {
        Plate::new(definition, Size::new(40.0, 30.0))
            .render_to_layers(Point::new(5.0, 10.0))
            .render()
            .into_iter()
            .map(|node| node.to_string())
            .collect()
    }

    #[test]
    fn test_plate_renders_unfilled_rect() {
        let svg = render(&PlateDefinition::default());
        assert!(svg.contains("data-layer=\"plate\""));
        assert!(svg.contains("class=\"plate\""));
        assert!(svg.contains("x=\"5\""));
        assert!(svg.contains("width=\"40\""));
        assert!(svg.contains("fill=\"none\""));
    }
}
