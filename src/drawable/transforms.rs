//! Derived drawables: stroke outlines, dash patterns, curve flattening and
//! uniform resizing. Each wraps exactly one upstream drawable and forwards
//! geometry lazily at `apply_transform` time.

use kurbo::{Cap, Join, Stroke, StrokeOpts};

use crate::drawable::{Drawable, PathCursor, Vertex, collect_path};
use crate::foundation::geometry::{Affine, Rect};

const STROKE_TOLERANCE: f64 = 0.25;

/// Stroke outline of the wrapped drawable, expanded to a fillable shape.
///
/// The bounding box delegates to the source and ignores width growth, which
/// is an acceptable approximation for dirty-region and auto-range purposes.
pub struct StrokeShape {
    source: Box<dyn Drawable>,
    width: f64,
    cursor: PathCursor,
}

impl StrokeShape {
    /// Stroke `source` with the given line width in device pixels.
    pub fn new(source: impl Drawable + 'static, width: f64) -> Self {
        Self {
            source: Box::new(source),
            width,
            cursor: PathCursor::default(),
        }
    }

    /// Change the line width.
    pub fn set_width(&mut self, width: f64) -> &mut Self {
        self.width = width;
        self
    }
}

impl Drawable for StrokeShape {
    fn rewind(&mut self) {
        self.cursor.rewind();
    }

    fn vertex(&mut self) -> Vertex {
        self.cursor.next()
    }

    fn bounding_box(&self) -> Option<Rect> {
        self.source.bounding_box()
    }

    fn apply_transform(&mut self, m: Affine, approx_scale: f64) {
        self.source.apply_transform(m, approx_scale);
        let path = collect_path(self.source.as_mut());
        let style = Stroke::new(self.width)
            .with_caps(Cap::Round)
            .with_join(Join::Round);
        let outline = kurbo::stroke(
            path.elements().iter().copied(),
            &style,
            &StrokeOpts::default(),
            STROKE_TOLERANCE,
        );
        self.cursor.set_path(outline);
    }

    fn need_resize(&self) -> bool {
        self.source.need_resize()
    }
}

/// Dashed stroke outline of the wrapped drawable.
///
/// Dash segmentation and outline expansion happen in one pass; the dash
/// pattern is expressed in device pixels.
pub struct DashShape {
    source: Box<dyn Drawable>,
    width: f64,
    dashes: Vec<f64>,
    cursor: PathCursor,
}

impl DashShape {
    /// Dash `source` with the given line width; the pattern starts empty and
    /// is extended with [`DashShape::add_dash`].
    pub fn new(source: impl Drawable + 'static, width: f64) -> Self {
        Self {
            source: Box::new(source),
            width,
            dashes: Vec::new(),
            cursor: PathCursor::default(),
        }
    }

    /// Append an on/off pair (in device pixels) to the dash pattern.
    pub fn add_dash(&mut self, dash_len: f64, gap_len: f64) -> &mut Self {
        self.dashes.push(dash_len);
        self.dashes.push(gap_len);
        self
    }
}

impl Drawable for DashShape {
    fn rewind(&mut self) {
        self.cursor.rewind();
    }

    fn vertex(&mut self) -> Vertex {
        self.cursor.next()
    }

    fn bounding_box(&self) -> Option<Rect> {
        self.source.bounding_box()
    }

    fn apply_transform(&mut self, m: Affine, approx_scale: f64) {
        self.source.apply_transform(m, approx_scale);
        let path = collect_path(self.source.as_mut());
        let style = Stroke::new(self.width)
            .with_caps(Cap::Butt)
            .with_join(Join::Bevel)
            .with_dashes(0.0, self.dashes.iter().copied());
        let outline = kurbo::stroke(
            path.elements().iter().copied(),
            &style,
            &StrokeOpts::default(),
            STROKE_TOLERANCE,
        );
        self.cursor.set_path(outline);
    }

    fn need_resize(&self) -> bool {
        self.source.need_resize()
    }
}

/// Curve-flattening wrapper: replaces curve commands with line segments at a
/// tolerance driven by the approximation-scale hint.
pub struct CurveApprox {
    source: Box<dyn Drawable>,
    cursor: PathCursor,
}

impl CurveApprox {
    /// Flatten the curves of `source`.
    pub fn new(source: impl Drawable + 'static) -> Self {
        Self {
            source: Box::new(source),
            cursor: PathCursor::default(),
        }
    }
}

impl Drawable for CurveApprox {
    fn rewind(&mut self) {
        self.cursor.rewind();
    }

    fn vertex(&mut self) -> Vertex {
        self.cursor.next()
    }

    fn bounding_box(&self) -> Option<Rect> {
        self.source.bounding_box()
    }

    fn apply_transform(&mut self, m: Affine, approx_scale: f64) {
        self.source.apply_transform(m, approx_scale);
        let path = collect_path(self.source.as_mut());
        let tolerance = 0.25 / approx_scale.max(1e-6);
        let mut flat = kurbo::BezPath::new();
        kurbo::flatten(path.elements().iter().copied(), tolerance, |el| {
            flat.push(el);
        });
        self.cursor.set_path(flat);
    }

    fn need_resize(&self) -> bool {
        self.source.need_resize()
    }
}

/// Uniform-resize wrapper: scales the wrapped drawable by a fixed factor
/// composed before the placement transform, and recomputes the bounding box
/// accordingly. Marked as needing a post-resize step.
pub struct FixedRatio {
    source: Box<dyn Drawable>,
    factor: f64,
}

impl FixedRatio {
    /// Scale `source` uniformly by `factor`.
    pub fn new(source: impl Drawable + 'static, factor: f64) -> Self {
        Self {
            source: Box::new(source),
            factor,
        }
    }
}

impl Drawable for FixedRatio {
    fn rewind(&mut self) {
        self.source.rewind();
    }

    fn vertex(&mut self) -> Vertex {
        self.source.vertex()
    }

    fn bounding_box(&self) -> Option<Rect> {
        let r = self.source.bounding_box()?;
        Some(Rect::new(
            r.x0 * self.factor,
            r.y0 * self.factor,
            r.x1 * self.factor,
            r.y1 * self.factor,
        ))
    }

    fn apply_transform(&mut self, m: Affine, approx_scale: f64) {
        self.source
            .apply_transform(m * Affine::scale(self.factor), approx_scale * self.factor);
    }

    fn need_resize(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/drawable/transforms.rs"]
mod tests;
