//! Canvas capability consumed by the plot engine.

pub mod raster;
pub mod svg;

use crate::drawable::Drawable;
use crate::foundation::color::Rgba8;
use crate::foundation::geometry::Rect;

/// Draw target abstraction.
///
/// Any backend implementing these operations is a valid target: the raster
/// backend fills pixels, the SVG backend writes elements. Drawables arrive
/// with their placement transform already applied, so backends only consume
/// the device-space vertex stream (or the native text span).
pub trait Canvas {
    /// Fill the shape with the given color.
    fn draw(&mut self, shape: &mut dyn Drawable, color: Rgba8);

    /// Stroke the shape's outline with the given color.
    fn draw_outline(&mut self, shape: &mut dyn Drawable, color: Rgba8);

    /// Restrict subsequent drawing to `r` (device coordinates).
    fn clip_box(&mut self, r: Rect);

    /// Remove any active clip.
    fn reset_clipping(&mut self);

    /// Open a logical section (sub-plot, legend). Structure-aware backends
    /// group output; pixel backends ignore it.
    fn begin_group(&mut self, _id: &str) {}

    /// Close the innermost open section.
    fn end_group(&mut self) {}
}
