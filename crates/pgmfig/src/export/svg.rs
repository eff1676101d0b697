//! SVG scene building.
//!
//! Turns a validated [`Pgm`] into an SVG document: a background rectangle,
//! then plates, edges, nodes and labels, each in its own layer.

use log::{debug, warn};
use svg::{Document, node::element as svg_element};

use pgmfig_core::{
    color::Color,
    draw::{
        Arrow, ArrowDefinition, Drawable, Label, LayeredOutput, NodeGlyph, NodeStyle,
        ObservedRing, Plate as PlateDrawable, PlateDefinition, RenderLayer, StrokeDefinition,
        TextAnchor, TextDefinition,
    },
    geometry::{Point, Size},
};

use crate::{
    canvas::{Canvas, cm_to_pt},
    config::StyleConfig,
    error::PgmError,
    pgm::{LabelPosition, Labeled, Node, ObservedStyle, Pgm, Plate},
};

/// Distance in points between a fixed node's centre and its label baseline.
const FIXED_LABEL_RISE: f32 = 6.0;

/// Size divisor for the dot of a fixed node.
const FIXED_NODE_DIVISOR: f32 = 6.0;

/// Builds SVG scenes with one resolved style.
#[derive(Debug)]
pub struct SceneBuilder {
    background: Color,
    shaded: Color,
    observed_offset: f32,
    stroke: StrokeDefinition,
    text: TextDefinition,
    head_length_cm: f32,
    head_width_cm: f32,
    plate: PlateDefinition,
}

impl SceneBuilder {
    /// Resolves the colors and strokes of `style`.
    ///
    /// # Errors
    ///
    /// [`PgmError::Config`] if a configured color does not parse.
    pub fn new(style: &StyleConfig, background: Color) -> Result<Self, PgmError> {
        let shaded = style.shaded_color().map_err(PgmError::Config)?;
        let stroke = StrokeDefinition::new(Color::default(), style.line_width());

        let mut plate_stroke = stroke.clone();
        plate_stroke.set_style(style.plate_line_style().clone());

        Ok(Self {
            background,
            shaded,
            observed_offset: style.observed_offset(),
            stroke,
            text: TextDefinition::new(style.font_family(), style.font_size()),
            head_length_cm: style.arrow_head_length(),
            head_width_cm: style.arrow_head_width(),
            plate: PlateDefinition::new(plate_stroke),
        })
    }

    /// Renders the diagram to an SVG document string.
    pub fn build(&self, pgm: &Pgm) -> String {
        let canvas = pgm.canvas();
        let size = canvas.size_pt();
        let mut output = LayeredOutput::new();

        output.add_to_layer(
            RenderLayer::Background,
            Box::new(
                svg_element::Rectangle::new()
                    .set("class", "background")
                    .set("width", size.width())
                    .set("height", size.height())
                    .set("fill", self.background)
                    .set("fill-opacity", self.background.alpha()),
            ),
        );

        for plate in pgm.labeled_plates() {
            output.merge(self.render_plate(canvas, plate));
        }

        let arrow = ArrowDefinition::new(
            self.stroke.clone(),
            cm_to_pt(self.head_length_cm),
            cm_to_pt(self.head_width_cm),
        );
        for edge in pgm.edges() {
            let (Some(source), Some(target)) = (
                pgm.labeled_node(edge.source()),
                pgm.labeled_node(edge.target()),
            ) else {
                continue;
            };
            let source_center = canvas.to_svg(source.item.position());
            let target_center = canvas.to_svg(target.item.position());
            let direction = target_center.sub_point(source_center);
            if direction.normalize().is_none() {
                warn!(source = edge.source(), target = edge.target(); "Skipping edge between coincident nodes");
                continue;
            }

            let start = self
                .glyph(canvas, pgm.observed_style(), &source.item)
                .find_intersection(source_center, target_center);
            let end = self
                .glyph(canvas, pgm.observed_style(), &target.item)
                .find_intersection(target_center, source_center);
            // Overlapping glyphs clip the segment past itself
            if end.sub_point(start).dot(direction) <= 0.0 {
                warn!(source = edge.source(), target = edge.target(); "Skipping edge between overlapping nodes");
                continue;
            }
            output.merge(
                Arrow::new(&arrow, start, end, edge.is_directed())
                    .render_to_layers(Point::default()),
            );
        }

        for node in pgm.labeled_nodes() {
            output.merge(self.render_node(canvas, pgm.observed_style(), node));
        }

        let mut document = Document::new()
            .set("xmlns", "http://www.w3.org/2000/svg")
            .set("width", size.width())
            .set("height", size.height())
            .set("viewBox", (0.0, 0.0, size.width(), size.height()));
        for node in output.render() {
            document = document.add(node);
        }

        debug!(nodes = pgm.node_count(), edges = pgm.edges().len(), plates = pgm.plate_count(); "SVG scene built");
        document.to_string()
    }

    fn glyph(&self, canvas: &Canvas, observed_style: ObservedStyle, node: &Node) -> NodeGlyph {
        let mut diameter = canvas.node_diameter() * node.scale();
        if node.is_fixed() {
            diameter /= FIXED_NODE_DIVISOR;
        }
        let size = Size::new(diameter * node.aspect(), diameter);
        let glyph = NodeGlyph::new(node.id(), size, self.stroke.clone());

        if node.is_fixed() {
            return glyph.with_style(NodeStyle::Filled);
        }
        if !node.is_observed() {
            return glyph;
        }
        match observed_style {
            ObservedStyle::Shaded => glyph.with_fill(self.shaded),
            ObservedStyle::Inner => glyph.with_ring(ObservedRing::Inner(self.observed_offset)),
            ObservedStyle::Outer => glyph.with_ring(ObservedRing::Outer(self.observed_offset)),
        }
    }

    fn render_node(
        &self,
        canvas: &Canvas,
        observed_style: ObservedStyle,
        node: &Labeled<Node>,
    ) -> LayeredOutput {
        let center = canvas.to_svg(node.item.position());
        let mut output = self
            .glyph(canvas, observed_style, &node.item)
            .render_to_layers(center);

        // Offsets point up, SVG y points down
        let offset = node.item.offset();
        let (rise, anchor) = if node.item.is_fixed() {
            (FIXED_LABEL_RISE, TextAnchor::Baseline)
        } else {
            (0.0, TextAnchor::Center)
        };
        let label_position = center.add_point(Point::new(offset.x(), -(offset.y() + rise)));
        output.merge(Label::new(&self.text, &node.markup, anchor).render_to_layers(label_position));
        output
    }

    fn render_plate(&self, canvas: &Canvas, plate: &Labeled<Plate>) -> LayeredOutput {
        let bounds = plate.item.bounds();
        let top_left = canvas.to_svg(Point::new(bounds.min_x(), bounds.max_y()));
        let size = bounds.to_size().scale(canvas.pt_per_grid());

        let mut output = PlateDrawable::new(&self.plate, size).render_to_layers(top_left);

        let offset = plate.item.label_offset();
        let left = top_left.x() + offset.x();
        let center = top_left.x() + size.width() / 2.0;
        let right = top_left.x() + size.width() - offset.x();
        let top = top_left.y() + offset.y();
        let bottom = top_left.y() + size.height() - offset.y();

        let (position, anchor) = match plate.item.label_position() {
            LabelPosition::BottomLeft => (Point::new(left, bottom), TextAnchor::BottomLeft),
            LabelPosition::BottomCenter => (Point::new(center, bottom), TextAnchor::BottomCenter),
            LabelPosition::BottomRight => (Point::new(right, bottom), TextAnchor::BottomRight),
            LabelPosition::TopLeft => (Point::new(left, top), TextAnchor::TopLeft),
            LabelPosition::TopCenter => (Point::new(center, top), TextAnchor::TopCenter),
            LabelPosition::TopRight => (Point::new(right, top), TextAnchor::TopRight),
        };
        output.merge(Label::new(&self.text, &plate.markup, anchor).render_to_layers(position));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> SceneBuilder {
        SceneBuilder::new(&StyleConfig::default(), Color::new("white").unwrap()).unwrap()
    }

    fn two_nodes(style: ObservedStyle) -> Pgm {
        let mut pgm = Pgm::new(2.0, 1.0).with_observed_style(style);
        pgm.add_node(Node::new("a", "$a$", 0.5, 0.5)).unwrap();
        pgm.add_node(Node::new("b", "$b$", 1.5, 0.5).observed())
            .unwrap();
        pgm.add_edge("a", "b").unwrap();
        pgm
    }

    #[test]
    fn test_scene_has_canvas_size() {
        let svg = builder().build(&Pgm::new(3.2, 1.65));
        let size = Pgm::new(3.2, 1.65).canvas().size_pt();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(&format!("width=\"{}\"", size.width())));
        assert!(svg.contains("class=\"background\""));
    }

    #[test]
    fn test_shaded_observed_node() {
        let svg = builder().build(&two_nodes(ObservedStyle::Shaded));
        assert_eq!(svg.matches("class=\"node\"").count(), 2);
        assert_eq!(svg.matches("<ellipse").count(), 2);
        assert_eq!(svg.matches("class=\"edge\"").count(), 1);
    }

    #[test]
    fn test_inner_observed_node() {
        let svg = builder().build(&two_nodes(ObservedStyle::Inner));
        assert_eq!(svg.matches("<ellipse").count(), 3);
    }

    #[test]
    fn test_fixed_node_label_sits_above_dot() {
        let mut pgm = Pgm::new(1.0, 1.0);
        pgm.add_node(Node::new("mu", r"$\mu$", 0.5, 0.5).fixed())
            .unwrap();
        let svg = builder().build(&pgm);
        assert!(svg.contains("dominant-baseline=\"alphabetic\""));

        let center_y = pgm.canvas().to_svg(Point::new(0.5, 0.5)).y();
        assert!(svg.contains(&format!("y=\"{}\"", center_y - FIXED_LABEL_RISE)));
    }

    #[test]
    fn test_coincident_nodes_skip_edge() {
        let mut pgm = Pgm::new(1.0, 1.0);
        pgm.add_node(Node::new("a", "a", 0.5, 0.5)).unwrap();
        pgm.add_node(Node::new("b", "b", 0.5, 0.5)).unwrap();
        pgm.add_edge("a", "b").unwrap();
        let svg = builder().build(&pgm);
        assert_eq!(svg.matches("class=\"edge\"").count(), 0);
        assert_eq!(svg.matches("class=\"node\"").count(), 2);
    }

    #[test]
    fn test_overlapping_nodes_skip_edge() {
        let mut pgm = Pgm::new(1.0, 1.0);
        pgm.add_node(Node::new("a", "a", 0.5, 0.5)).unwrap();
        pgm.add_node(Node::new("b", "b", 0.6, 0.5)).unwrap();
        pgm.add_node(Node::new("c", "c", 0.5, 0.95).fixed()).unwrap();
        pgm.add_edge("a", "b").unwrap();
        pgm.add_edge("c", "a").unwrap();
        let svg = builder().build(&pgm);
        assert_eq!(svg.matches("class=\"edge\"").count(), 1);
        assert_eq!(svg.matches("class=\"node\"").count(), 3);
    }

    #[test]
    fn test_plate_caption_anchor() {
        let mut pgm = Pgm::new(2.0, 2.0);
        pgm.add_plate(
            Plate::new(0.5, 0.5, 1.0, 1.0, "$n$").with_label_position(LabelPosition::TopRight),
        )
        .unwrap();
        let svg = builder().build(&pgm);
        assert_eq!(svg.matches("class=\"plate\"").count(), 1);
        assert!(svg.contains("text-anchor=\"end\""));
        assert!(svg.contains("dominant-baseline=\"text-before-edge\""));
    }

    #[test]
    fn test_bad_shaded_color_is_config_error() {
        let style: StyleConfig = toml::from_str("shaded_color = \"nope\"").unwrap();
        let err = SceneBuilder::new(&style, Color::default()).unwrap_err();
        assert!(matches!(err, PgmError::Config(_)));
    }
}
