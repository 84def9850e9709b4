//! Text label drawable.

use crate::drawable::{Drawable, Vertex};
use crate::foundation::geometry::{Affine, Point, Rect};
use crate::text::{TextMeasure, TextSpan, rotated_extents};

/// A text label anchored at a model-space point.
///
/// Labels carry no vertex geometry; backends consume them through
/// [`Drawable::as_text`]. Font size is in device pixels and is not affected
/// by the placement transform, which only moves the anchor point.
#[derive(Clone, Debug)]
pub struct TextLabel {
    text: String,
    size: f64,
    hjust: f64,
    vjust: f64,
    angle: f64,
    point: Point,
    extents: Option<(f64, f64)>,
    span: TextSpan,
}

impl TextLabel {
    /// New label with the given justification (0 = left/bottom edge at the
    /// anchor, 1 = right/top edge).
    pub fn new(text: impl Into<String>, size: f64, hjust: f64, vjust: f64) -> Self {
        let text = text.into();
        let span = TextSpan {
            text: text.clone(),
            size,
            hjust,
            vjust,
            ..TextSpan::default()
        };
        Self {
            text,
            size,
            hjust,
            vjust,
            angle: 0.0,
            point: Point::ZERO,
            extents: None,
            span,
        }
    }

    /// Set the model-space anchor point.
    pub fn set_point(&mut self, x: f64, y: f64) -> &mut Self {
        self.point = Point::new(x, y);
        self
    }

    /// Set the rotation angle in radians (counter-clockwise).
    pub fn set_angle(&mut self, angle: f64) -> &mut Self {
        self.angle = angle;
        self.span.angle = angle;
        self
    }

    /// Record measured extents in pixels, enabling a real bounding box.
    pub fn set_extents(&mut self, width: f64, height: f64) -> &mut Self {
        self.extents = Some((width, height));
        self.span.width = width;
        self.span.height = height;
        self
    }

    /// Measure the label with the given capability and record the extents.
    pub fn measure_with(&mut self, metrics: &mut dyn TextMeasure) -> &mut Self {
        let (w, h) = metrics.measure(&self.text, self.size);
        self.set_extents(w, h)
    }

    /// Text content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Font size in pixels.
    pub fn size(&self) -> f64 {
        self.size
    }
}

impl Drawable for TextLabel {
    fn rewind(&mut self) {}

    fn vertex(&mut self) -> Vertex {
        Vertex::Stop
    }

    /// With measured extents, the justified (rotation-expanded) box around
    /// the anchor, padded by one pixel like any stroked glyph run; otherwise
    /// the degenerate anchor-point rectangle.
    fn bounding_box(&self) -> Option<Rect> {
        match self.extents {
            Some((w, h)) => {
                let pad = 1.0;
                let (rw, rh) = rotated_extents(w, h, self.angle);
                let x0 = self.point.x - self.hjust * rw;
                let y0 = self.point.y - self.vjust * rh;
                Some(Rect::new(x0 - pad, y0 - pad, x0 + rw + pad, y0 + rh + pad))
            }
            None => Some(Rect::new(
                self.point.x,
                self.point.y,
                self.point.x,
                self.point.y,
            )),
        }
    }

    fn apply_transform(&mut self, m: Affine, _approx_scale: f64) {
        self.span.pos = m * self.point;
    }

    fn as_text(&self) -> Option<&TextSpan> {
        Some(&self.span)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/drawable/text.rs"]
mod tests;
