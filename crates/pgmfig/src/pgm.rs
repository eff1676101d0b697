//! The declarative diagram model.
//!
//! A [`Pgm`] owns the canvas settings, the nodes in declaration order, the
//! edges between them and any plates. Every `add_*` call validates its input
//! right away, so a `Pgm` that exists is always renderable.

use std::str::FromStr;

use indexmap::IndexMap;
use log::debug;

use pgmfig_core::{
    geometry::{Bounds, Point, Size},
    markup::Markup,
};

use crate::{canvas::Canvas, error::PgmError};

/// How observed nodes are told apart from latent ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ObservedStyle {
    /// Grey fill
    #[default]
    Shaded,
    /// Second outline inside the node
    Inner,
    /// Second outline around the node
    Outer,
}

/// A random variable or constant placed on the canvas.
///
/// ```
/// use pgmfig::Node;
///
/// let mu = Node::new("mu", r"$\mu$", 1.9, 0.75).fixed();
/// assert!(mu.is_fixed());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: String,
    label: String,
    position: Point,
    fixed: bool,
    observed: bool,
    offset: Point,
    scale: f32,
    aspect: f32,
}

impl Node {
    /// Creates a free node at `(x, y)` grid units.
    pub fn new(id: impl Into<String>, label: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            position: Point::new(x, y),
            fixed: false,
            observed: false,
            offset: Point::default(),
            scale: 1.0,
            aspect: 1.0,
        }
    }

    /// Marks the node as a constant, drawn as a small filled dot.
    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    /// Marks the node as observed data.
    pub fn observed(mut self) -> Self {
        self.observed = true;
        self
    }

    /// Moves the label by `(x, y)` points, y pointing up.
    pub fn with_offset(mut self, x: f32, y: f32) -> Self {
        self.offset = Point::new(x, y);
        self
    }

    /// Multiplies the node diameter.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the width to height ratio; values above 1 give a wide ellipse.
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the label source, markup included.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the position in grid units.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn is_observed(&self) -> bool {
        self.observed
    }

    /// Returns the label offset in points.
    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    fn check_geometry(&self) -> Result<(), PgmError> {
        let reason = if !(self.scale.is_finite() && self.scale > 0.0) {
            format!("scale must be positive, got {}", self.scale)
        } else if !(self.aspect.is_finite() && self.aspect > 0.0) {
            format!("aspect must be positive, got {}", self.aspect)
        } else if !(self.position.x().is_finite() && self.position.y().is_finite()) {
            "position must be finite".to_string()
        } else if !(self.offset.x().is_finite() && self.offset.y().is_finite()) {
            "label offset must be finite".to_string()
        } else {
            return Ok(());
        };
        Err(PgmError::InvalidNode {
            id: self.id.clone(),
            reason,
        })
    }
}

/// A dependency between two declared nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    source: String,
    target: String,
    directed: bool,
}

impl Edge {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns false for plain lines without an arrow head.
    pub fn is_directed(&self) -> bool {
        self.directed
    }
}

/// Where a plate caption sits inside its rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LabelPosition {
    #[default]
    BottomLeft,
    BottomCenter,
    BottomRight,
    TopLeft,
    TopCenter,
    TopRight,
}

impl FromStr for LabelPosition {
    type Err = String;

    /// Parses the space separated form, e.g. `"bottom left"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bottom left" => Ok(Self::BottomLeft),
            "bottom center" => Ok(Self::BottomCenter),
            "bottom right" => Ok(Self::BottomRight),
            "top left" => Ok(Self::TopLeft),
            "top center" => Ok(Self::TopCenter),
            "top right" => Ok(Self::TopRight),
            _ => Err(format!(
                "invalid label position `{s}`, expected `bottom|top left|center|right`"
            )),
        }
    }
}

/// A repetition box drawn around a group of nodes.
///
/// ```
/// use pgmfig::{LabelPosition, Plate};
///
/// let plate = Plate::new(1.45, 0.85, 1.65, 1.1, r"${}_{i=1,\ldots,m}$")
///     .with_label_position(LabelPosition::TopRight);
/// assert_eq!(plate.label_position(), LabelPosition::TopRight);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Plate {
    bounds: Bounds,
    label: String,
    label_position: LabelPosition,
    label_offset: Point,
}

impl Plate {
    /// Creates a plate whose bottom-left corner is `(x, y)` grid units.
    pub fn new(x: f32, y: f32, width: f32, height: f32, label: impl Into<String>) -> Self {
        Self {
            bounds: Bounds::from_origin(Point::new(x, y), Size::new(width, height)),
            label: label.into(),
            label_position: LabelPosition::default(),
            label_offset: Point::new(5.0, 5.0),
        }
    }

    pub fn with_label_position(mut self, position: LabelPosition) -> Self {
        self.label_position = position;
        self
    }

    /// Sets the caption distance in points from its corner, toward the inside.
    pub fn with_label_offset(mut self, x: f32, y: f32) -> Self {
        self.label_offset = Point::new(x, y);
        self
    }

    /// Returns the rectangle in grid units.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn label_position(&self) -> LabelPosition {
        self.label_position
    }

    pub fn label_offset(&self) -> Point {
        self.label_offset
    }
}

/// A declaration paired with its parsed label.
#[derive(Debug, Clone)]
pub(crate) struct Labeled<T> {
    pub(crate) item: T,
    pub(crate) markup: Markup,
}

/// A probabilistic graphical model diagram.
///
/// # Examples
///
/// ```
/// use pgmfig::{Node, Pgm};
///
/// let mut pgm = Pgm::new(3.2, 1.65);
/// pgm.add_node(Node::new("F", "$F$", 1.0, 0.75))?;
/// pgm.add_node(Node::new("N", "$N$", 2.8, 0.75).observed())?;
/// pgm.add_edge("F", "N")?;
/// assert_eq!(pgm.edges().len(), 1);
/// # Ok::<(), pgmfig::PgmError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Pgm {
    canvas: Canvas,
    observed_style: ObservedStyle,
    nodes: IndexMap<String, Labeled<Node>>,
    edges: Vec<Edge>,
    plates: Vec<Labeled<Plate>>,
}

impl Pgm {
    /// Creates an empty diagram of `width` x `height` grid units.
    ///
    /// The canvas starts at the origin with 2 cm grid units and 1 cm nodes.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            canvas: Canvas::new(Size::new(width, height), Point::default(), 2.0, 1.0),
            observed_style: ObservedStyle::default(),
            nodes: IndexMap::new(),
            edges: Vec::new(),
            plates: Vec::new(),
        }
    }

    /// Moves the bottom-left corner of the canvas to `(x, y)`.
    pub fn with_origin(mut self, x: f32, y: f32) -> Self {
        self.canvas = Canvas::new(
            self.canvas.shape(),
            Point::new(x, y),
            self.canvas.grid_unit(),
            self.canvas.node_unit(),
        );
        self
    }

    /// Sets the length of one grid unit in centimetres.
    pub fn with_grid_unit(mut self, grid_unit: f32) -> Self {
        self.canvas = Canvas::new(
            self.canvas.shape(),
            self.canvas.origin(),
            grid_unit,
            self.canvas.node_unit(),
        );
        self
    }

    /// Sets the diameter of a unit-scale node in centimetres.
    pub fn with_node_unit(mut self, node_unit: f32) -> Self {
        self.canvas = Canvas::new(
            self.canvas.shape(),
            self.canvas.origin(),
            self.canvas.grid_unit(),
            node_unit,
        );
        self
    }

    pub fn with_observed_style(mut self, style: ObservedStyle) -> Self {
        self.observed_style = style;
        self
    }

    /// Declares a node.
    ///
    /// # Errors
    ///
    /// - [`PgmError::DuplicateKey`] if the id is taken; the existing node is
    ///   left as it was.
    /// - [`PgmError::InvalidNode`] if the scale or aspect is not positive, or
    ///   the position or offset is not finite.
    /// - [`PgmError::Markup`] if the label does not parse.
    pub fn add_node(&mut self, node: Node) -> Result<(), PgmError> {
        if self.nodes.contains_key(node.id()) {
            return Err(PgmError::DuplicateKey {
                id: node.id().to_string(),
            });
        }
        node.check_geometry()?;
        let markup = Markup::parse(node.label())?;
        debug!(node_id = node.id(), fixed = node.is_fixed(), observed = node.is_observed(); "Node declared");
        self.nodes
            .insert(node.id().to_string(), Labeled { item: node, markup });
        Ok(())
    }

    /// Declares a directed edge from `source` to `target`.
    ///
    /// # Errors
    ///
    /// [`PgmError::UnknownNode`] naming the first endpoint that has not been
    /// declared.
    pub fn add_edge(&mut self, source: &str, target: &str) -> Result<(), PgmError> {
        self.push_edge(source, target, true)
    }

    /// Declares a plain line between two nodes.
    ///
    /// # Errors
    ///
    /// Same as [`Pgm::add_edge`].
    pub fn add_undirected_edge(&mut self, source: &str, target: &str) -> Result<(), PgmError> {
        self.push_edge(source, target, false)
    }

    fn push_edge(&mut self, source: &str, target: &str, directed: bool) -> Result<(), PgmError> {
        for id in [source, target] {
            if !self.nodes.contains_key(id) {
                return Err(PgmError::UnknownNode { id: id.to_string() });
            }
        }
        debug!(source, target, directed; "Edge declared");
        self.edges.push(Edge {
            source: source.to_string(),
            target: target.to_string(),
            directed,
        });
        Ok(())
    }

    /// Declares a plate.
    ///
    /// # Errors
    ///
    /// [`PgmError::Markup`] if the caption does not parse.
    pub fn add_plate(&mut self, plate: Plate) -> Result<(), PgmError> {
        let markup = Markup::parse(plate.label())?;
        debug!(caption = markup.plain_text(); "Plate declared");
        self.plates.push(Labeled {
            item: plate,
            markup,
        });
        Ok(())
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id).map(|entry| &entry.item)
    }

    /// Returns the nodes in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().map(|entry| &entry.item)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the plates in declaration order.
    pub fn plates(&self) -> impl Iterator<Item = &Plate> {
        self.plates.iter().map(|entry| &entry.item)
    }

    pub fn plate_count(&self) -> usize {
        self.plates.len()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn observed_style(&self) -> ObservedStyle {
        self.observed_style
    }

    pub(crate) fn labeled_node(&self, id: &str) -> Option<&Labeled<Node>> {
        self.nodes.get(id)
    }

    pub(crate) fn labeled_nodes(&self) -> impl Iterator<Item = &Labeled<Node>> {
        self.nodes.values()
    }

    pub(crate) fn labeled_plates(&self) -> &[Labeled<Plate>] {
        &self.plates
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_node_defaults() {
        let node = Node::new("F", "$F$", 1.0, 0.75);
        assert_eq!(node.id(), "F");
        assert_eq!(node.position(), Point::new(1.0, 0.75));
        assert!(!node.is_fixed());
        assert!(!node.is_observed());
        assert_eq!(node.offset(), Point::default());
        assert_eq!(node.scale(), 1.0);
        assert_eq!(node.aspect(), 1.0);
    }

    #[test]
    fn test_duplicate_node_keeps_original() {
        let mut pgm = Pgm::new(3.0, 2.0);
        pgm.add_node(Node::new("mu", r"$\mu$", 1.9, 0.75).fixed())
            .unwrap();

        let err = pgm
            .add_node(Node::new("mu", "other", 0.1, 0.1).observed())
            .unwrap_err();
        assert!(matches!(err, PgmError::DuplicateKey { ref id } if id == "mu"));

        let node = pgm.node("mu").unwrap();
        assert_eq!(node.label(), r"$\mu$");
        assert_eq!(node.position(), Point::new(1.9, 0.75));
        assert!(node.is_fixed());
        assert!(!node.is_observed());
        assert_eq!(pgm.node_count(), 1);
    }

    #[test]
    fn test_edge_requires_declared_endpoints() {
        let mut pgm = Pgm::new(3.0, 2.0);
        let err = pgm.add_edge("F", "N").unwrap_err();
        assert!(matches!(err, PgmError::UnknownNode { ref id } if id == "F"));

        pgm.add_node(Node::new("F", "$F$", 1.0, 0.75)).unwrap();
        let err = pgm.add_edge("F", "N").unwrap_err();
        assert!(matches!(err, PgmError::UnknownNode { ref id } if id == "N"));
        assert!(pgm.edges().is_empty());

        pgm.add_node(Node::new("N", "$N$", 2.8, 0.75)).unwrap();
        pgm.add_edge("F", "N").unwrap();
        assert_eq!(pgm.edges().len(), 1);
        assert!(pgm.edges()[0].is_directed());
    }

    #[test]
    fn test_undirected_edge() {
        let mut pgm = Pgm::new(3.0, 2.0);
        pgm.add_node(Node::new("a", "a", 0.5, 0.5)).unwrap();
        pgm.add_node(Node::new("b", "b", 1.5, 0.5)).unwrap();
        pgm.add_undirected_edge("a", "b").unwrap();
        assert!(!pgm.edges()[0].is_directed());
    }

    #[test]
    fn test_bad_label_markup_is_rejected() {
        let mut pgm = Pgm::new(3.0, 2.0);
        let err = pgm
            .add_node(Node::new("x", r"$\nope$", 1.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, PgmError::Markup(_)));
        assert!(pgm.node("x").is_none());

        let err = pgm.add_plate(Plate::new(0.0, 0.0, 1.0, 1.0, "$i")).unwrap_err();
        assert!(matches!(err, PgmError::Markup(_)));
        assert_eq!(pgm.plate_count(), 0);
    }

    #[test]
    fn test_degenerate_node_size_is_rejected() {
        let mut pgm = Pgm::new(3.0, 2.0);
        let err = pgm
            .add_node(Node::new("a", "a", 0.5, 0.5).with_scale(0.0))
            .unwrap_err();
        assert!(matches!(err, PgmError::InvalidNode { ref id, .. } if id == "a"));

        let err = pgm
            .add_node(Node::new("b", "b", 0.5, 0.5).with_aspect(f32::NAN))
            .unwrap_err();
        assert!(matches!(err, PgmError::InvalidNode { .. }));

        let err = pgm
            .add_node(Node::new("c", "c", f32::INFINITY, 0.5))
            .unwrap_err();
        assert!(matches!(err, PgmError::InvalidNode { .. }));
        assert_eq!(pgm.node_count(), 0);

        pgm.add_node(Node::new("d", "d", 0.5, 0.5).with_scale(0.5).with_aspect(2.0))
            .unwrap();
        assert_eq!(pgm.node_count(), 1);
    }

    #[test]
    fn test_nodes_keep_declaration_order() {
        let mut pgm = Pgm::new(3.0, 2.0);
        for id in ["z", "a", "m"] {
            pgm.add_node(Node::new(id, id, 0.0, 0.0)).unwrap();
        }
        let ids: Vec<&str> = pgm.nodes().map(Node::id).collect();
        assert_eq!(ids, ["z", "a", "m"]);
    }

    #[test]
    fn test_label_position_from_str() {
        assert_eq!(
            "bottom left".parse::<LabelPosition>().unwrap(),
            LabelPosition::BottomLeft
        );
        assert_eq!(
            "top center".parse::<LabelPosition>().unwrap(),
            LabelPosition::TopCenter
        );
        assert!("middle".parse::<LabelPosition>().is_err());
    }

    #[test]
    fn test_canvas_options() {
        let pgm = Pgm::new(2.0, 1.0)
            .with_origin(-0.5, -0.5)
            .with_grid_unit(4.0)
            .with_node_unit(1.5)
            .with_observed_style(ObservedStyle::Inner);
        assert_eq!(pgm.canvas().origin(), Point::new(-0.5, -0.5));
        assert_eq!(pgm.canvas().grid_unit(), 4.0);
        assert_eq!(pgm.canvas().node_unit(), 1.5);
        assert_eq!(pgm.canvas().shape(), Size::new(2.0, 1.0));
        assert_eq!(pgm.observed_style(), ObservedStyle::Inner);
    }

    proptest! {
        #[test]
        fn prop_ids_stay_unique(ids in prop::collection::vec("[a-d]", 0..20)) {
            let mut pgm = Pgm::new(1.0, 1.0);
            let mut accepted = Vec::new();
            for id in &ids {
                let result = pgm.add_node(Node::new(id.as_str(), id.as_str(), 0.0, 0.0));
                if accepted.contains(id) {
                    prop_assert!(
                        matches!(result, Err(PgmError::DuplicateKey { .. })),
                        "duplicate id should be rejected"
                    );
                } else {
                    prop_assert!(result.is_ok());
                    accepted.push(id.clone());
                }
            }
            prop_assert_eq!(pgm.node_count(), accepted.len());
        }

        #[test]
        fn prop_edges_only_join_declared_nodes(
            declared in prop::collection::vec("[a-f]", 0..6),
            pairs in prop::collection::vec(("[a-f]", "[a-f]"), 0..12),
        ) {
            let mut pgm = Pgm::new(1.0, 1.0);
            for id in &declared {
                let _ = pgm.add_node(Node::new(id.as_str(), id.as_str(), 0.0, 0.0));
            }
            for (source, target) in &pairs {
                let _ = pgm.add_edge(source, target);
            }
            for edge in pgm.edges() {
                prop_assert!(pgm.node(edge.source()).is_some());
                prop_assert!(pgm.node(edge.target()).is_some());
            }
        }
    }
}
