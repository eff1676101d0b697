//! Drawable Components for Diagram Rendering
//!
//! This module provides drawable abstractions for the parts of a PGM figure:
//! node glyphs, arrows, plates and labels. All of them implement the
//! [`Drawable`] trait and emit SVG nodes into a [`LayeredOutput`] so that
//! plates end up beneath edges, edges beneath nodes, and labels on top.

mod arrow;
mod glyph;
mod layer;
mod plate;
mod stroke;
mod text;

pub use arrow::{Arrow, ArrowDefinition};
pub use glyph::{NodeGlyph, NodeStyle, ObservedRing};
pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use plate::{Plate, PlateDefinition};
pub use stroke::{StrokeDefinition, StrokeStyle};
pub use text::{Label, TextAnchor, TextDefinition};

use crate::geometry::Point;

/// Anything that can render itself, positioned, into layered SVG output.
pub trait Drawable: std::fmt::Debug {
    fn render_to_layers(&self, position: Point) -> LayeredOutput;
}
