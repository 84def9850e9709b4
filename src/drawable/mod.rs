//! The drawable capability and its concrete shapes.
//!
//! A [`Drawable`] produces a rewindable sequence of path commands in device
//! coordinates, reports its model-space bounding box, and accepts a per-draw
//! affine placement plus an approximation-scale hint that controls curve
//! tessellation density. Derived wrappers (stroke outline, dash pattern,
//! curve flattening, uniform resize) each wrap exactly one upstream drawable
//! and forward geometry lazily.

pub mod ellipse;
pub mod path;
pub mod text;
pub mod transforms;

use std::sync::{Arc, Mutex};

use crate::foundation::geometry::{Affine, BezPath, Point, Rect};
use crate::text::TextSpan;

/// One step of a drawable's vertex sequence.
///
/// Coordinates are post-transform (device space); the sequence is finite and
/// restartable via [`Drawable::rewind`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Vertex {
    /// Start a new subpath at the given point.
    MoveTo(Point),
    /// Straight segment to the given point.
    LineTo(Point),
    /// Quadratic curve through one control point.
    Curve3(Point, Point),
    /// Cubic curve through two control points.
    Curve4(Point, Point, Point),
    /// Close the current subpath.
    Close,
    /// End of the sequence.
    Stop,
}

/// Polymorphic shape capability consumed by canvases and the plot engine.
pub trait Drawable: Send {
    /// Restart the vertex sequence from the beginning.
    fn rewind(&mut self);

    /// Yield the next path command, or [`Vertex::Stop`] when exhausted.
    fn vertex(&mut self) -> Vertex;

    /// Bounding box in the drawable's own coordinate space, before any
    /// transform. `None` signals an empty or unbounded shape; callers must
    /// treat it as identity-neutral for union operations.
    fn bounding_box(&self) -> Option<Rect>;

    /// Install the placement transform and level-of-detail hint for the next
    /// draw pass. Must be called before each pass; the drawable does not
    /// track its transform persistently.
    fn apply_transform(&mut self, m: Affine, approx_scale: f64);

    /// Whether the shape needs a post-resize step when the viewport changes.
    fn need_resize(&self) -> bool {
        false
    }

    /// Native text content, when the drawable is a label. Backends with
    /// first-class text (SVG `<text>`, glyph runs) special-case this instead
    /// of consuming vertices.
    fn as_text(&self) -> Option<&TextSpan> {
        None
    }
}

/// Shared handle to a drawable.
///
/// The plot holds one clone per item; the caller may keep its own. Dropping
/// the plot's clone on removal is the "plot owns" disposal, while a caller
/// retaining a handle gets the "caller owns" lifetime, so no separate
/// ownership-mode tag is needed.
pub type SharedDrawable = Arc<Mutex<dyn Drawable>>;

/// Wrap a drawable into a [`SharedDrawable`] handle.
pub fn share(d: impl Drawable + 'static) -> SharedDrawable {
    Arc::new(Mutex::new(d))
}

/// Collect a drawable's full vertex sequence into a [`BezPath`].
pub fn collect_path(d: &mut dyn Drawable) -> BezPath {
    let mut out = BezPath::new();
    d.rewind();
    loop {
        match d.vertex() {
            Vertex::MoveTo(p) => out.move_to(p),
            Vertex::LineTo(p) => out.line_to(p),
            Vertex::Curve3(p1, p2) => out.quad_to(p1, p2),
            Vertex::Curve4(p1, p2, p3) => out.curve_to(p1, p2, p3),
            Vertex::Close => out.close_path(),
            Vertex::Stop => break,
        }
    }
    out
}

/// Device-space bounding box of a drawable's vertex sequence, control points
/// included. `None` when the sequence is empty; text labels fall back to
/// their span extent since they carry no vertices.
pub fn vertex_bounding_box(d: &mut dyn Drawable) -> Option<Rect> {
    if let Some(span) = d.as_text() {
        return Some(span.device_box());
    }

    let mut acc: Option<Rect> = None;
    let mut grow = |p: Point| {
        let r = Rect::new(p.x, p.y, p.x, p.y);
        acc = Some(match acc {
            Some(cur) => cur.union(r),
            None => r,
        });
    };

    d.rewind();
    loop {
        match d.vertex() {
            Vertex::MoveTo(p) | Vertex::LineTo(p) => grow(p),
            Vertex::Curve3(p1, p2) => {
                grow(p1);
                grow(p2);
            }
            Vertex::Curve4(p1, p2, p3) => {
                grow(p1);
                grow(p2);
                grow(p3);
            }
            Vertex::Close => {}
            Vertex::Stop => break,
        }
    }
    acc
}

/// Shared iteration state for drawables that cache a device-space path.
#[derive(Clone, Debug, Default)]
pub(crate) struct PathCursor {
    els: Vec<kurbo::PathEl>,
    idx: usize,
}

impl PathCursor {
    pub(crate) fn set_path(&mut self, path: BezPath) {
        self.els = path.elements().to_vec();
        self.idx = 0;
    }

    pub(crate) fn rewind(&mut self) {
        self.idx = 0;
    }

    pub(crate) fn next(&mut self) -> Vertex {
        use kurbo::PathEl;
        let Some(&el) = self.els.get(self.idx) else {
            return Vertex::Stop;
        };
        self.idx += 1;
        match el {
            PathEl::MoveTo(p) => Vertex::MoveTo(p),
            PathEl::LineTo(p) => Vertex::LineTo(p),
            PathEl::QuadTo(p1, p2) => Vertex::Curve3(p1, p2),
            PathEl::CurveTo(p1, p2, p3) => Vertex::Curve4(p1, p2, p3),
            PathEl::ClosePath => Vertex::Close,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/drawable/core.rs"]
mod tests;
