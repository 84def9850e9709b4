//! Text measurement capability.
//!
//! The engine never talks to a hidden global font stack: measurement is an
//! injected capability ([`TextMeasure`]), defaulting to a deterministic
//! approximation. A parley-backed engine is available for hosts that inject
//! real font bytes; the raster backend reuses the same engine for glyph
//! drawing.

mod metrics;

pub use metrics::{ApproxMetrics, LabelBrush, ParleyMetrics, TextMeasure};

use crate::foundation::geometry::{Point, Rect};

/// A positioned text run in device coordinates.
///
/// This is what text-aware backends consume instead of a vertex sequence:
/// the SVG writer emits a `<text>` element, the raster backend lays out a
/// glyph run. Extents are zero until the owning label has been measured.
#[derive(Clone, Debug, Default)]
pub struct TextSpan {
    /// Text content.
    pub text: String,
    /// Font size in pixels.
    pub size: f64,
    /// Anchor point in device coordinates (model orientation, y up).
    pub pos: Point,
    /// Rotation in radians, counter-clockwise.
    pub angle: f64,
    /// Horizontal justification in `[0, 1]` (0 = left edge at anchor).
    pub hjust: f64,
    /// Vertical justification in `[0, 1]` (0 = bottom edge at anchor).
    pub vjust: f64,
    /// Measured width in pixels, 0 when unknown.
    pub width: f64,
    /// Measured height in pixels, 0 when unknown.
    pub height: f64,
}

impl TextSpan {
    /// Device-space box covered by the run: the justified, rotation-expanded
    /// extent around the anchor. Degenerates to the anchor point while the
    /// extents are unmeasured.
    pub fn device_box(&self) -> Rect {
        let (rw, rh) = rotated_extents(self.width, self.height, self.angle);
        let x0 = self.pos.x - self.hjust * rw;
        let y0 = self.pos.y - self.vjust * rh;
        Rect::new(x0, y0, x0 + rw, y0 + rh)
    }
}

/// Axis-aligned extents of a `w`×`h` box rotated by `angle`.
pub(crate) fn rotated_extents(w: f64, h: f64, angle: f64) -> (f64, f64) {
    let (s, c) = angle.sin_cos();
    (w * c.abs() + h * s.abs(), w * s.abs() + h * c.abs())
}

#[cfg(test)]
#[path = "../../tests/unit/text.rs"]
mod tests;
