//! Ellipse drawable.

use crate::drawable::{Drawable, PathCursor, Vertex};
use crate::foundation::geometry::{Affine, Point, Rect, Vec2};

/// Ellipse centered at a model-space point.
///
/// Tessellation density follows the approximation-scale hint supplied at
/// [`Drawable::apply_transform`] time, so the curve stays smooth at any zoom.
#[derive(Clone, Debug)]
pub struct EllipseShape {
    center: Point,
    radii: Vec2,
    cursor: PathCursor,
}

impl EllipseShape {
    /// Ellipse centered at `(x, y)` with radii `(rx, ry)`.
    pub fn new(x: f64, y: f64, rx: f64, ry: f64) -> Self {
        Self {
            center: Point::new(x, y),
            radii: Vec2::new(rx, ry),
            cursor: PathCursor::default(),
        }
    }

    /// Center point.
    pub fn center(&self) -> Point {
        self.center
    }

    /// Radii.
    pub fn radii(&self) -> Vec2 {
        self.radii
    }
}

impl Drawable for EllipseShape {
    fn rewind(&mut self) {
        self.cursor.rewind();
    }

    fn vertex(&mut self) -> Vertex {
        self.cursor.next()
    }

    fn bounding_box(&self) -> Option<Rect> {
        Some(Rect::new(
            self.center.x - self.radii.x,
            self.center.y - self.radii.y,
            self.center.x + self.radii.x,
            self.center.y + self.radii.y,
        ))
    }

    fn apply_transform(&mut self, m: Affine, approx_scale: f64) {
        use kurbo::Shape;
        let tolerance = 0.25 / approx_scale.max(1e-6);
        let ellipse = kurbo::Ellipse::new(self.center, self.radii, 0.0);
        self.cursor.set_path(m * ellipse.to_path(tolerance));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/drawable/ellipse.rs"]
mod tests;
