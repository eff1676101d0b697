//! Conversion between diagram grid units and SVG points.
//!
//! Diagram coordinates grow upward from `origin` and are measured in grid
//! units of `grid_unit` centimetres. The SVG scene is measured in points
//! (1/72 in) and grows downward from the top-left corner.

use pgmfig_core::geometry::{Point, Size};

const CM_PER_INCH: f32 = 2.54;
const PT_PER_INCH: f32 = 72.0;

/// Converts a length in centimetres to points.
pub fn cm_to_pt(cm: f32) -> f32 {
    cm / CM_PER_INCH * PT_PER_INCH
}

/// The coordinate frame of one diagram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    shape: Size,
    origin: Point,
    grid_unit: f32,
    node_unit: f32,
}

impl Canvas {
    pub fn new(shape: Size, origin: Point, grid_unit: f32, node_unit: f32) -> Self {
        Self {
            shape,
            origin,
            grid_unit,
            node_unit,
        }
    }

    /// Returns the canvas size in grid units.
    pub fn shape(&self) -> Size {
        self.shape
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn grid_unit(&self) -> f32 {
        self.grid_unit
    }

    pub fn node_unit(&self) -> f32 {
        self.node_unit
    }

    /// Points per grid unit.
    pub fn pt_per_grid(&self) -> f32 {
        cm_to_pt(self.grid_unit)
    }

    /// Diameter of a unit-scale node in points.
    pub fn node_diameter(&self) -> f32 {
        cm_to_pt(self.node_unit)
    }

    /// Returns the canvas size in points.
    pub fn size_pt(&self) -> Size {
        self.shape.scale(self.pt_per_grid())
    }

    /// Maps a diagram point to SVG coordinates.
    pub fn to_svg(&self, point: Point) -> Point {
        let scale = self.pt_per_grid();
        let local = point.sub_point(self.origin);
        Point::new(
            local.x() * scale,
            self.size_pt().height() - local.y() * scale,
        )
    }

    /// Returns the raster size in pixels at the given resolution.
    ///
    /// Partial pixels round up so the whole canvas is covered.
    pub fn pixel_size(&self, dpi: u32) -> (u32, u32) {
        let size = self.size_pt();
        let to_px = |pt: f32| {
            let px = (f64::from(pt) * f64::from(dpi) / f64::from(PT_PER_INCH)).ceil();
            px.max(1.0) as u32
        };
        (to_px(size.width()), to_px(size.height()))
    }
}
