//! Rectangle and affine helpers shared by the layout and draw passes.

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Axis-aligned rectangle that may still be undefined.
///
/// Bounding-box accumulators start undefined and become defined on the first
/// `add_*` call. Once defined a box never shrinks except through
/// [`OptRect::clear`]. Undefined operands are identity-neutral for unions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OptRect(Option<Rect>);

impl OptRect {
    /// A new, undefined rectangle.
    pub fn new() -> Self {
        Self(None)
    }

    /// A defined rectangle.
    pub fn from_rect(r: Rect) -> Self {
        Self(Some(r))
    }

    /// Return `true` when the rectangle is defined.
    pub fn is_defined(&self) -> bool {
        self.0.is_some()
    }

    /// The contained rectangle, if defined.
    pub fn rect(&self) -> Option<Rect> {
        self.0
    }

    /// Reset to the undefined state.
    pub fn clear(&mut self) {
        self.0 = None;
    }

    /// Replace the content with a defined rectangle.
    pub fn set(&mut self, r: Rect) {
        self.0 = Some(r);
    }

    /// Union `r` into the accumulator, becoming defined if it wasn't.
    pub fn add_union(&mut self, r: Rect) {
        self.0 = Some(match self.0 {
            Some(cur) => cur.union(r),
            None => r,
        });
    }

    /// Union an optional rectangle; `None` leaves the accumulator unchanged.
    pub fn add_opt(&mut self, r: Option<Rect>) {
        if let Some(r) = r {
            self.add_union(r);
        }
    }

    /// Intersect-first union policy: clip `r` against `within` and union the
    /// result. An empty intersection leaves the accumulator unchanged.
    pub fn add_clipped(&mut self, r: Rect, within: Rect) {
        let clipped = r.intersect(within);
        if clipped.width() > 0.0 && clipped.height() > 0.0 {
            self.add_union(clipped);
        }
    }
}

/// Affine mapping the unit square onto `r`: scale = width/height, translate
/// = origin. This is the canonical "destination rectangle as a transform"
/// representation used throughout the layout engine.
pub fn affine_of_rect(r: Rect) -> Affine {
    Affine::new([r.width(), 0.0, 0.0, r.height(), r.x0, r.y0])
}

/// The viewport rectangle spanned by a transform produced with
/// [`affine_of_rect`] (or any axis-aligned scale + translate).
pub fn rect_of_affine(m: Affine) -> Rect {
    let [sx, _, _, sy, tx, ty] = m.as_coeffs();
    Rect::new(tx, ty, tx + sx, ty + sy)
}

/// Overall scale of a transform: the geometric mean of its x/y scale
/// factors, i.e. `sqrt(|det|)`. Used for resolution-independent line widths
/// and font sizes; exact under repeated composition, no re-derivation drift.
pub fn matrix_scale(m: Affine) -> f64 {
    m.determinant().abs().sqrt()
}

/// Return `true` when both corners of `inner` hit-test inside `outer`.
pub fn fits_inside(outer: &Rect, inner: &Rect) -> bool {
    outer.contains(Point::new(inner.x0, inner.y0)) && outer.contains(Point::new(inner.x1, inner.y1))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/geometry.rs"]
mod tests;
