//! Raw path drawable.

use crate::drawable::{Drawable, PathCursor, Vertex};
use crate::foundation::geometry::{Affine, BezPath, Point, Rect};

/// A polyline/curve path authored in model coordinates.
///
/// The device-space vertex sequence is rebuilt on every
/// [`Drawable::apply_transform`] call; the source geometry is never mutated.
#[derive(Clone, Debug, Default)]
pub struct PathShape {
    source: BezPath,
    cursor: PathCursor,
}

impl PathShape {
    /// An empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing [`BezPath`].
    pub fn from_bez(source: BezPath) -> Self {
        Self {
            source,
            cursor: PathCursor::default(),
        }
    }

    /// Start a new subpath.
    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.source.move_to(Point::new(x, y));
        self
    }

    /// Straight segment to `(x, y)`.
    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.source.line_to(Point::new(x, y));
        self
    }

    /// Quadratic curve through one control point.
    pub fn curve3(&mut self, cx: f64, cy: f64, x: f64, y: f64) -> &mut Self {
        self.source.quad_to(Point::new(cx, cy), Point::new(x, y));
        self
    }

    /// Cubic curve through two control points.
    pub fn curve4(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) -> &mut Self {
        self.source.curve_to(
            Point::new(c1x, c1y),
            Point::new(c2x, c2y),
            Point::new(x, y),
        );
        self
    }

    /// Close the current subpath.
    pub fn close(&mut self) -> &mut Self {
        self.source.close_path();
        self
    }

    /// The model-space geometry.
    pub fn path(&self) -> &BezPath {
        &self.source
    }
}

impl Drawable for PathShape {
    fn rewind(&mut self) {
        self.cursor.rewind();
    }

    fn vertex(&mut self) -> Vertex {
        self.cursor.next()
    }

    fn bounding_box(&self) -> Option<Rect> {
        use kurbo::Shape;
        if self.source.elements().is_empty() {
            return None;
        }
        Some(self.source.bounding_box())
    }

    fn apply_transform(&mut self, m: Affine, _approx_scale: f64) {
        self.cursor.set_path(m * self.source.clone());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/drawable/path.rs"]
mod tests;
