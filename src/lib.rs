//! Plotine is an embeddable 2D plot layout and incremental rendering engine.
//!
//! Given a set of geometric drawables (paths, ellipses, text labels) with
//! styling, it lays out a chart (title, axes, legends, margins) inside an
//! arbitrary destination rectangle, renders through a backend-agnostic
//! [`Canvas`] capability (pixel buffer or SVG), and tracks dirty regions so
//! a host can redraw only what changed.
//!
//! # Pipeline overview
//!
//! 1. **Collect**: drawables are added to a [`Plot`] (current layer or the
//!    pending queue, depending on whether they extend the known data range)
//! 2. **Layout**: a draw pass partitions the destination rectangle into
//!    title, legend, axis and plot-area regions
//! 3. **Render**: items are walked in layer order through the composed
//!    model transform and handed to the canvas
//! 4. **Incremental**: queued draws reuse the last layout and return the
//!    union of the touched device rectangles
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No hidden globals**: text measurement is an injected capability.
//! - **No locking or IO in the engine**: the host serializes access around
//!   the whole mutate → layout → draw pipeline.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod layer;

/// Canvas capability and the raster/SVG backends.
pub mod canvas;
/// Drawable capability and the concrete shapes.
pub mod drawable;
/// The plot engine: layers, layout, axes, incremental draws.
pub mod plot;
/// Text measurement capability.
pub mod text;
/// Axis tick generation and category labeling.
pub mod units;

pub use canvas::Canvas;
pub use canvas::raster::{FrameRGBA, RasterCanvas};
pub use canvas::svg::SvgCanvas;
pub use drawable::ellipse::EllipseShape;
pub use drawable::path::PathShape;
pub use drawable::text::TextLabel;
pub use drawable::transforms::{CurveApprox, DashShape, FixedRatio, StrokeShape};
pub use drawable::{Drawable, SharedDrawable, Vertex, collect_path, share, vertex_bounding_box};
pub use foundation::color::Rgba8;
pub use foundation::error::{PlotError, PlotResult};
pub use foundation::geometry::{
    Affine, BezPath, OptRect, Point, Rect, Vec2, affine_of_rect, fits_inside, matrix_scale,
    rect_of_affine,
};
pub use layer::Item;
pub use plot::{Axis, AxisKind, MAX_LAYERS, Placement, Plot, PlotLayout, RenderInfo};
pub use text::{ApproxMetrics, LabelBrush, ParleyMetrics, TextMeasure, TextSpan};
pub use units::categories::CategoryMap;
pub use units::{LabelFormat, Units, parse_label_format};
