//! Basic geometric types shared by the model and the drawables.
//!
//! The same types are used in two coordinate systems: canvas grid units
//! (y grows upward) and SVG points (y grows downward). Conversion between
//! the two lives with the canvas in the `pgmfig` crate.

/// A 2D point or displacement
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the hypotenuse (Euclidean distance from origin)
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Dot product of two vectors
    pub fn dot(self, other: Point) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Multiplies both coordinates by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Returns the unit vector pointing the same way, or `None` for a
    /// (near) zero vector.
    pub fn normalize(self) -> Option<Self> {
        let length = self.hypot();
        if length < 1e-4 {
            return None;
        }
        Some(self.scale(1.0 / length))
    }

    /// Returns the vector rotated by 90 degrees counter-clockwise
    pub fn perpendicular(self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Multiplies both dimensions by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    /// Returns a new Size grown by `amount` on every side
    pub fn grow(self, amount: f32) -> Self {
        Self {
            width: self.width + 2.0 * amount,
            height: self.height + 2.0 * amount,
        }
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates bounds from a corner point and a size.
    ///
    /// Negative sizes are normalized so that `min <= max` always holds.
    pub fn from_origin(origin: Point, size: Size) -> Self {
        let (x0, x1) = (origin.x, origin.x + size.width);
        let (y0, y1) = (origin.y, origin.y + size.height);
        Self {
            min_x: x0.min(x1),
            min_y: y0.min(y1),
            max_x: x0.max(x1),
            max_y: y0.max(y1),
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Converts bounds to a Size object
    pub fn to_size(self) -> Size {
        Size {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Returns true if the point lies inside or on the edge of the bounds
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn test_point_default() {
        let point = Point::default();
        assert_eq!(point.x(), 0.0);
        assert_eq!(point.y(), 0.0);
    }

    #[test]
    fn test_point_add_sub() {
        let p1 = Point::new(1.0, 2.0);
        let p2 = Point::new(3.0, 4.0);
        assert_eq!(p1.add_point(p2), Point::new(4.0, 6.0));
        assert_eq!(p2.sub_point(p1), Point::new(2.0, 2.0));
    }

    #[test]
    fn test_point_hypot() {
        assert_eq!(Point::new(3.0, 4.0).hypot(), 5.0);
        assert_eq!(Point::new(0.0, 0.0).hypot(), 0.0);
    }

    #[test]
    fn test_point_dot() {
        assert_eq!(Point::new(1.0, 2.0).dot(Point::new(3.0, -4.0)), -5.0);
        assert_eq!(Point::new(1.0, 0.0).dot(Point::new(0.0, 1.0)), 0.0);
    }

    #[test]
    fn test_point_normalize() {
        let unit = Point::new(3.0, 4.0).normalize().unwrap();
        assert!(approx_eq!(f32, unit.x(), 0.6, epsilon = 1e-6));
        assert!(approx_eq!(f32, unit.y(), 0.8, epsilon = 1e-6));

        assert!(Point::new(0.0, 0.0).normalize().is_none());
    }

    #[test]
    fn test_point_perpendicular() {
        let perp = Point::new(1.0, 0.0).perpendicular();
        assert_eq!(perp, Point::new(-0.0, 1.0));
    }

    #[test]
    fn test_size_grow_and_scale() {
        let size = Size::new(10.0, 4.0);
        assert_eq!(size.grow(1.0), Size::new(12.0, 6.0));
        assert_eq!(size.scale(0.5), Size::new(5.0, 2.0));
    }

    #[test]
    fn test_bounds_from_origin_normalizes() {
        let bounds = Bounds::from_origin(Point::new(2.0, 2.0), Size::new(-1.0, 3.0));
        assert_eq!(bounds.min_x(), 1.0);
        assert_eq!(bounds.max_x(), 2.0);
        assert_eq!(bounds.min_y(), 2.0);
        assert_eq!(bounds.max_y(), 5.0);
        assert_eq!(bounds.to_size(), Size::new(1.0, 3.0));
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = Bounds::from_origin(Point::new(1.45, 0.85), Size::new(1.65, 1.1));
        assert!(bounds.contains(Point::new(1.9, 1.4)));
        assert!(bounds.contains(Point::new(2.8, 1.4)));
        assert!(!bounds.contains(Point::new(1.65, 0.4)));
        assert!(bounds.contains(Point::new(bounds.min_x(), bounds.min_y())));
    }
}
