//! The plot: layers, auto-ranging, layout and the incremental draw protocol.
//!
//! A [`Plot`] owns a stack of layers holding committed items plus a pending
//! queue of incrementally added ones. Drawing walks a two-stage transform:
//! the user transform normalizes the data range onto the unit square, and
//! the layout pass maps the unit square onto the active plotting area of the
//! destination rectangle (after carving out title, legends and axis labels).
//!
//! The engine performs no locking and no IO; a host sharing a plot between a
//! mutation thread and a render thread must serialize every call on this
//! type (legends reference other plots, so one coarse domain around the
//! whole plot graph, spanning layout through canvas output).

use std::sync::{Arc, Mutex};

use crate::canvas::Canvas;
use crate::drawable::text::TextLabel;
use crate::drawable::transforms::{DashShape, StrokeShape};
use crate::drawable::path::PathShape;
use crate::drawable::{Drawable, SharedDrawable, share, vertex_bounding_box};
use crate::foundation::color::Rgba8;
use crate::foundation::error::PlotResult;
use crate::foundation::geometry::{
    Affine, OptRect, Point, Rect, affine_of_rect, fits_inside, matrix_scale, rect_of_affine,
};
use crate::layer::{Item, Layer};
use crate::text::{ApproxMetrics, TextMeasure, rotated_extents};
use crate::units::categories::CategoryMap;
use crate::units::{LabelFormat, Units, parse_label_format};

/// Maximum depth of the layer stack, root layer included.
pub const MAX_LAYERS: usize = 8;

const AXIS_LABEL_PROP_SPACE: f64 = 20.0; // per mille
const AXIS_TITLE_PROP_SPACE: f64 = 30.0; // per mille
const CANVAS_MARGIN_PROP_SPACE: f64 = 15.0; // per mille
const CANVAS_MARGIN_FIXED_SPACE: f64 = 4.0; // pixels

const LEGEND_SIZE_FRAC_X: f64 = 0.125;
const LEGEND_SIZE_FRAC_Y: f64 = 0.05;

/// Reference overall scale: font and line sizes are tuned for a 480 px
/// viewport and scale proportionally from there.
const REFERENCE_SCALE: f64 = 480.0;

/// Minimum plot-area scale below which axes and elements are skipped.
const AREA_MIN_SCALE: f64 = 40.0;

const TICK_ACCEPT_EPS: f64 = 1.0e-3;

/// Axis direction selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AxisKind {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

/// Legend placement slots, in layout evaluation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Placement {
    /// Right of the plot area.
    Right,
    /// Left of the plot area.
    Left,
    /// Below the plot area.
    Bottom,
    /// Above the plot area.
    Top,
}

impl Placement {
    /// All placements in layout evaluation order.
    pub const ALL: [Placement; 4] = [
        Placement::Right,
        Placement::Left,
        Placement::Bottom,
        Placement::Top,
    ];

    fn index(self) -> usize {
        match self {
            Placement::Right => 0,
            Placement::Left => 1,
            Placement::Bottom => 2,
            Placement::Top => 3,
        }
    }

    fn group_id(self) -> &'static str {
        match self {
            Placement::Right => "legend-right",
            Placement::Left => "legend-left",
            Placement::Bottom => "legend-bottom",
            Placement::Top => "legend-top",
        }
    }
}

#[derive(Clone, Copy)]
enum TextClass {
    AxisTitle,
    AxisLabels,
    PlotTitle,
}

fn default_font_size(tc: TextClass, scale: f64) -> f64 {
    let base_size = match tc {
        TextClass::AxisTitle => 15.0,
        TextClass::AxisLabels => 14.0,
        TextClass::PlotTitle => 18.0,
    };
    base_size * scale.max(0.75)
}

fn compute_scale(m: Affine) -> f64 {
    matrix_scale(m) / REFERENCE_SCALE
}

fn std_line_width(_scale: f64, w: f64) -> f64 {
    w * 1.5
}

fn approx_text_height(text_size: f64) -> f64 {
    text_size * 1.5
}

fn area_is_valid(m: Affine) -> bool {
    let [sx, _, _, sy, _, _] = m.as_coeffs();
    sx > AREA_MIN_SCALE && sy > AREA_MIN_SCALE
}

/// Per-axis state: title, tick mode and label orientation.
#[derive(Clone, Debug)]
pub struct Axis {
    /// Axis title, empty when unset.
    pub title: String,
    /// Use category entries instead of numeric ticks.
    pub use_categories: bool,
    /// Category entries for category mode.
    pub categories: CategoryMap,
    kind: AxisKind,
    format: Option<LabelFormat>,
    labels_angle: f64,
    labels_hjust: f64,
    labels_vjust: f64,
}

impl Axis {
    fn new(kind: AxisKind) -> Self {
        let is_x = kind == AxisKind::X;
        Self {
            title: String::new(),
            use_categories: false,
            categories: CategoryMap::new(),
            kind,
            format: None,
            labels_angle: 0.0,
            labels_hjust: if is_x { 0.5 } else { 1.0 },
            labels_vjust: if is_x { 1.0 } else { 0.5 },
        }
    }

    /// Rotate tick labels; the justification is re-derived from the angle so
    /// rotated labels stay visually anchored at their tick.
    pub fn set_labels_angle(&mut self, angle: f64) {
        let a = if self.kind == AxisKind::X {
            -angle + std::f64::consts::FRAC_PI_2
        } else {
            -angle
        };
        let (s, c) = a.sin_cos();
        self.labels_hjust = (c + 1.0).round() / 2.0;
        self.labels_vjust = (s + 1.0).round() / 2.0;
        self.labels_angle = angle;
    }

    /// Current label rotation in radians.
    pub fn labels_angle(&self) -> f64 {
        self.labels_angle
    }

    /// Current label format, `None` for the default numeric formatting.
    pub fn label_format(&self) -> Option<LabelFormat> {
        self.format
    }
}

/// Geometry of one draw pass: where the title, legends and plotting areas
/// landed inside the destination rectangle. Transient, recomputed per draw.
#[derive(Clone, Copy, Debug)]
pub struct PlotLayout {
    /// Title anchor point (device coordinates).
    pub title_pos: Point,
    /// Title font size in pixels.
    pub title_font_size: f64,
    /// Placement transform per legend slot; `None` when absent or skipped.
    pub legend_area: [Option<Affine>; 4],
    /// Plot area after margins, title and legends.
    pub plot_area: Affine,
    /// Plot area after axis/label space, `None` until the axis pass ran (or
    /// when the area was too small to draw).
    pub plot_active_area: Option<Affine>,
}

/// Result of a full draw, needed to run incremental draws against the same
/// geometry without a relayout.
#[derive(Clone, Copy, Debug, Default)]
pub struct RenderInfo {
    /// The active-area transform of the last full draw.
    pub active_area: Option<Affine>,
}

/// A 2D plot: drawable items in stacked layers, auto-scaled axes, legends
/// and incremental redraw tracking.
pub struct Plot {
    user_trans: Affine,
    pending: Vec<Item>,
    layers: Vec<Layer>,

    clip_flag: bool,
    need_redraw: bool,
    rect: OptRect,
    explicit_limits: bool,
    bbox_updated: bool,
    is_empty: bool,

    // Region where changes happened since the last commit, and the region
    // carried over from the previous clear.
    changes_accu: OptRect,
    changes_pending: OptRect,

    use_units: bool,
    pad_units: bool,
    sync_mode: bool,
    ux: Units,
    uy: Units,

    title: String,
    x_axis: Axis,
    y_axis: Axis,
    legends: [Option<Box<Plot>>; 4],

    metrics: Arc<Mutex<dyn TextMeasure>>,
}

impl Default for Plot {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Plot {
    /// New empty plot; `use_units` enables the axis/tick machinery.
    pub fn new(use_units: bool) -> Self {
        let mut plot = Self {
            user_trans: Affine::IDENTITY,
            pending: Vec::new(),
            layers: vec![Layer::new()],
            clip_flag: true,
            need_redraw: true,
            rect: OptRect::new(),
            explicit_limits: false,
            bbox_updated: true,
            is_empty: true,
            changes_accu: OptRect::new(),
            changes_pending: OptRect::new(),
            use_units,
            pad_units: false,
            sync_mode: true,
            ux: Units::default(),
            uy: Units::default(),
            title: String::new(),
            x_axis: Axis::new(AxisKind::X),
            y_axis: Axis::new(AxisKind::Y),
            legends: [None, None, None, None],
            metrics: Arc::new(Mutex::new(ApproxMetrics::default())),
        };
        plot.compute_user_trans();
        plot
    }

    /// Replace the text measurement capability (propagated to legends added
    /// afterwards).
    pub fn set_metrics(&mut self, metrics: Arc<Mutex<dyn TextMeasure>>) {
        self.metrics = metrics;
    }

    /// Plot title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set the plot title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.need_redraw = true;
    }

    /// Set an axis title.
    pub fn set_axis_title(&mut self, dir: AxisKind, title: impl Into<String>) {
        self.axis_mut(dir).title = title.into();
        self.need_redraw = true;
    }

    /// Axis state for one direction.
    pub fn axis(&self, dir: AxisKind) -> &Axis {
        match dir {
            AxisKind::X => &self.x_axis,
            AxisKind::Y => &self.y_axis,
        }
    }

    /// Mutable axis state for one direction.
    pub fn axis_mut(&mut self, dir: AxisKind) -> &mut Axis {
        match dir {
            AxisKind::X => &mut self.x_axis,
            AxisKind::Y => &mut self.y_axis,
        }
    }

    /// Rotate the tick labels of one axis.
    pub fn set_axis_labels_angle(&mut self, dir: AxisKind, angle: f64) {
        self.axis_mut(dir).set_labels_angle(angle);
        self.need_redraw = true;
        self.compute_user_trans();
    }

    /// Attach a legend sub-plot at the given placement, replacing any
    /// previous one.
    pub fn add_legend(&mut self, mut legend: Plot, place: Placement) {
        legend.metrics = self.metrics.clone();
        self.legends[place.index()] = Some(Box::new(legend));
        self.need_redraw = true;
    }

    /// The legend attached at `place`, if any.
    pub fn legend(&self, place: Placement) -> Option<&Plot> {
        self.legends[place.index()].as_deref()
    }

    /// Mutable access to the legend attached at `place`.
    pub fn legend_mut(&mut self, place: Placement) -> Option<&mut Plot> {
        self.legends[place.index()].as_deref_mut()
    }

    /// Enable or disable the axis/tick machinery.
    pub fn set_units(&mut self, use_units: bool) {
        if self.use_units != use_units {
            self.use_units = use_units;
            self.need_redraw = true;
            self.compute_user_trans();
        }
    }

    /// Whether the axis/tick machinery is enabled.
    pub fn use_units(&self) -> bool {
        self.use_units
    }

    /// Pad the data range out to whole tick increments.
    pub fn set_pad_mode(&mut self, pad: bool) {
        if pad != self.pad_units {
            self.pad_units = pad;
            self.need_redraw = true;
            self.compute_user_trans();
        }
    }

    /// Whether pad-to-units mode is active.
    pub fn pad_mode(&self) -> bool {
        self.pad_units
    }

    /// Clip element drawing to the active area.
    pub fn set_clip_mode(&mut self, flag: bool) {
        self.clip_flag = flag;
    }

    /// Whether element drawing is clipped to the active area.
    pub fn clip_is_active(&self) -> bool {
        self.clip_flag
    }

    /// Draw-on-every-mutation hint for hosts (the engine itself only stores
    /// the flag).
    pub fn set_sync_mode(&mut self, sync: bool) {
        self.sync_mode = sync;
    }

    /// Whether sync mode is requested.
    pub fn sync_mode(&self) -> bool {
        self.sync_mode
    }

    /// Whether a structural change requires a full redraw.
    pub fn need_redraw(&self) -> bool {
        self.need_redraw
    }

    /// Set an explicit data range, overriding auto-ranging.
    pub fn set_limits(&mut self, r: Rect) {
        self.rect.set(r);
        self.explicit_limits = true;
        self.bbox_updated = true;
        self.update_units();
        self.need_redraw = true;
    }

    /// Return to auto-ranging from content.
    pub fn unset_limits(&mut self) {
        self.explicit_limits = false;
        self.rect.clear();
        self.bbox_updated = false;
        self.update_units();
        self.need_redraw = true;
    }

    /// Set or clear the label format of one axis.
    ///
    /// `None` restores the default formatting. An unrecognized tag is
    /// rejected and the previous format stays in effect.
    pub fn enable_label_format(&mut self, dir: AxisKind, fmt: Option<&str>) -> PlotResult<()> {
        match fmt {
            None => {
                self.axis_mut(dir).format = None;
                Ok(())
            }
            Some(tag) => {
                let parsed = parse_label_format(tag)?;
                self.axis_mut(dir).format = Some(parsed);
                Ok(())
            }
        }
    }

    /// Switch one axis to category mode.
    pub fn enable_categories(&mut self, dir: AxisKind) {
        self.axis_mut(dir).use_categories = true;
    }

    /// Leave category mode and drop the entries.
    pub fn disable_categories(&mut self, dir: AxisKind) {
        let axis = self.axis_mut(dir);
        axis.use_categories = false;
        axis.categories.clear();
    }

    /// Append a category entry to one axis.
    pub fn add_category_entry(&mut self, dir: AxisKind, value: f64, label: impl Into<String>) {
        self.axis_mut(dir).categories.add_item(value, label);
    }

    /// Add an item.
    ///
    /// Auto semantics: when the item's bounding box fits inside the known
    /// plot box it joins the pending queue (cheap incremental draw);
    /// otherwise it lands in the current layer and invalidates the cached
    /// box, forcing a full relayout.
    pub fn add(&mut self, drawable: SharedDrawable, color: Rgba8, outline: bool) {
        let item = Item::new(drawable, color, outline);
        if !self.fit_inside(item.drawable()) {
            self.bbox_updated = false;
            self.need_redraw = true;
            self.current_layer_mut().add(item);
        } else {
            self.pending.push(item);
        }
        self.is_empty = false;
    }

    /// Convenience wrapper around [`Plot::add`] taking a concrete drawable
    /// and returning the shared handle.
    pub fn add_shape(
        &mut self,
        drawable: impl Drawable + 'static,
        color: Rgba8,
        outline: bool,
    ) -> SharedDrawable {
        let handle = share(drawable);
        self.add(handle.clone(), color, outline);
        handle
    }

    /// The data-range rectangle: explicit limits if set, otherwise the union
    /// of every item's bounding box; zero when the plot is empty.
    pub fn bounding_rect(&mut self) -> Rect {
        self.check_bounding_box();
        self.rect.rect().unwrap_or(Rect::ZERO)
    }

    /// Push a new empty layer and make it current.
    ///
    /// Commits the pending queue into the old top layer first. Returns
    /// `false` (no state change) when the stack is at [`MAX_LAYERS`].
    pub fn push_layer(&mut self) -> bool {
        if self.layers.len() >= MAX_LAYERS {
            return false;
        }
        self.check_bounding_box();
        self.commit_queue_to_current();
        self.layers.push(Layer::new());
        true
    }

    /// Pop the current layer, disposing its items and the pending queue.
    ///
    /// Returns `false` when only the root layer remains.
    pub fn pop_layer(&mut self) -> bool {
        if self.layers.len() <= 1 {
            return false;
        }
        self.layers.pop();
        self.pending.clear();
        self.need_redraw = true;
        self.bbox_updated = false;
        self.is_empty = self.layers.iter().all(Layer::is_empty);
        true
    }

    /// Empty the current layer and the pending queue, carrying the
    /// accumulated dirty region over so the next draw knows what to erase.
    pub fn clear_current_layer(&mut self) {
        self.pending.clear();
        self.current_layer_mut().clear();
        self.changes_pending = self.changes_accu;
        self.changes_accu.clear();
        self.bbox_updated = false;
        self.is_empty = self.layers.iter().all(Layer::is_empty);
    }

    /// 1-based index of the current layer (== number of layers).
    pub fn current_layer_index(&self) -> usize {
        self.layers.len()
    }

    /// Move pending items into the current layer (preserving order) and
    /// clear the redraw and pending-changes markers.
    pub fn commit_pending_draw(&mut self) {
        self.commit_queue_to_current();
        self.need_redraw = false;
        self.changes_pending.clear();
    }

    /// Full draw into `dest`: relayout, legends, axes (when the area is
    /// large enough) and every committed item, later layers on top.
    #[tracing::instrument(level = "debug", skip(self, canvas))]
    pub fn draw(&mut self, canvas: &mut dyn Canvas, dest: Rect) -> RenderInfo {
        let mtx = affine_of_rect(dest);
        let mut layout = self.compute_layout(mtx, true);
        canvas.begin_group("plot");
        self.draw_on(canvas, &mut layout, Some(dest));
        canvas.end_group();
        self.need_redraw = false;
        RenderInfo {
            active_area: layout.plot_active_area,
        }
    }

    /// Incremental draw: reuse the last active area, draw only pending
    /// items, and return the device rectangle the host must repaint (this
    /// pass's changes unioned with any carried-over pending region).
    #[tracing::instrument(level = "debug", skip(self, canvas, info))]
    pub fn draw_queue(
        &mut self,
        canvas: &mut dyn Canvas,
        dest: Rect,
        info: &RenderInfo,
    ) -> Option<Rect> {
        self.check_bounding_box();
        let mtx = affine_of_rect(dest);
        let mut layout = self.compute_layout(mtx, true);
        layout.plot_active_area = info.active_area;

        let mut bb = OptRect::new();
        if let Some(active) = layout.plot_active_area {
            if self.clip_flag {
                canvas.clip_box(rect_of_affine(active));
            }
            let m = active * self.user_trans;
            for item in &self.pending {
                Self::draw_element(item, canvas, m);
                let mut d = lock(item.drawable());
                if let Some(r) = vertex_bounding_box(&mut *d) {
                    bb.add_clipped(r, dest);
                }
            }
            canvas.reset_clipping();
        }

        self.changes_accu.add_opt(bb.rect());
        if let Some(p) = self.changes_pending.rect() {
            bb.add_union(p);
        }
        bb.rect()
    }

    // ---- internals ----------------------------------------------------

    fn current_layer_mut(&mut self) -> &mut Layer {
        self.layers.last_mut().expect("layer stack never empty")
    }

    fn commit_queue_to_current(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        let layer = self.current_layer_mut();
        for item in pending {
            layer.add(item);
        }
    }

    fn fit_inside(&self, drawable: &SharedDrawable) -> bool {
        if self.is_empty || !self.bbox_updated {
            return false;
        }
        let Some(bb) = self.rect.rect() else {
            return false;
        };
        let Some(r) = lock(drawable).bounding_box() else {
            return false;
        };
        fits_inside(&bb, &r)
    }

    /// Refresh the auto-computed bounding box and units when invalidated.
    /// Pending items are not consulted: they passed the fit test against the
    /// last valid box, which makes this a conservative approximation rather
    /// than a strict invariant.
    fn check_bounding_box(&mut self) {
        if self.explicit_limits || self.bbox_updated || self.is_empty {
            return;
        }

        let mut bb = OptRect::new();
        for layer in &mut self.layers {
            if !layer.bounding_box().is_defined() {
                let mut lb = OptRect::new();
                for item in layer.items() {
                    lb.add_opt(lock(item.drawable()).bounding_box());
                }
                if let Some(r) = lb.rect() {
                    layer.set_bounding_box(r);
                }
            }
            bb.add_opt(layer.bounding_box().rect());
        }

        if let Some(r) = bb.rect() {
            self.rect.set(r);
        }
        self.update_units();
        self.bbox_updated = true;
    }

    fn update_units(&mut self) {
        match self.rect.rect() {
            Some(r) => {
                self.ux = Units::new(r.x0, r.x1);
                self.uy = Units::new(r.y0, r.y1);
            }
            None => {
                self.ux = Units::default();
                self.uy = Units::default();
            }
        }
        self.compute_user_trans();
    }

    /// Transform mapping the data range onto the unit square.
    fn compute_user_trans(&mut self) {
        let r = if self.use_units && self.pad_units {
            let (xi, xs, xd) = self.ux.limits();
            let (yi, ys, yd) = self.uy.limits();
            Rect::new(
                xi as f64 * xd,
                yi as f64 * yd,
                xs as f64 * xd,
                ys as f64 * yd,
            )
        } else {
            self.rect.rect().unwrap_or(Rect::new(0.0, 0.0, 1.0, 1.0))
        };

        let (dx, dy) = (r.width(), r.height());
        let fx = if dx == 0.0 { 1.0 } else { 1.0 / dx };
        let fy = if dy == 0.0 { 1.0 } else { 1.0 / dy };
        self.user_trans = Affine::new([fx, 0.0, 0.0, fy, -r.x0 * fx, -r.y0 * fy]);
    }

    fn model_matrix(&self, active: Affine) -> Affine {
        active * self.user_trans
    }

    fn draw_element(item: &Item, canvas: &mut dyn Canvas, m: Affine) {
        let mut d = lock(item.drawable());
        d.apply_transform(m, matrix_scale(m).max(1.0));
        if item.outline {
            canvas.draw_outline(&mut *d, item.color);
        } else {
            canvas.draw(&mut *d, item.color);
        }
    }

    fn draw_on(&mut self, canvas: &mut dyn Canvas, layout: &mut PlotLayout, clip: Option<Rect>) {
        self.check_bounding_box();
        self.draw_legends(canvas, layout);
        if area_is_valid(layout.plot_area) {
            self.draw_axis(canvas, layout, clip);
            self.draw_elements(canvas, layout);
        } else {
            tracing::warn!("plot area too small, skipping axes and elements");
        }
    }

    /// Simplified pass used for legend sub-plots: axes and elements only.
    fn draw_simple(&mut self, canvas: &mut dyn Canvas, layout: &mut PlotLayout, clip: Option<Rect>) {
        self.check_bounding_box();
        self.draw_axis(canvas, layout, clip);
        self.draw_elements(canvas, layout);
    }

    fn draw_elements(&mut self, canvas: &mut dyn Canvas, layout: &PlotLayout) {
        let Some(active) = layout.plot_active_area else {
            return;
        };
        let m = self.model_matrix(active);

        if self.clip_flag {
            canvas.clip_box(rect_of_affine(active));
        }
        for layer in &self.layers {
            for item in layer.items() {
                Self::draw_element(item, canvas, m);
            }
        }
        canvas.reset_clipping();
    }

    fn draw_legends(&mut self, canvas: &mut dyn Canvas, layout: &PlotLayout) {
        if !self.title.is_empty() {
            let mut title = TextLabel::new(self.title.clone(), layout.title_font_size, 0.5, 0.0);
            title.set_point(layout.title_pos.x, layout.title_pos.y);
            {
                let mut metrics = lock_metrics(&self.metrics);
                title.measure_with(&mut *metrics);
            }
            title.apply_transform(Affine::IDENTITY, 1.0);
            canvas.draw(&mut title, Rgba8::BLACK);
        }

        for place in Placement::ALL {
            let k = place.index();
            let Some(area) = layout.legend_area[k] else {
                continue;
            };
            let Some(legend) = self.legends[k].as_deref_mut() else {
                continue;
            };
            canvas.begin_group(place.group_id());
            let clip = rect_of_affine(area);
            let mut sub_layout = legend.compute_layout(area, false);
            legend.draw_simple(canvas, &mut sub_layout, Some(clip));
            canvas.end_group();
        }
    }

    fn compute_layout(&mut self, canvas_mtx: Affine, do_legends: bool) -> PlotLayout {
        let [sx, _, _, sy, tx, ty] = canvas_mtx.as_coeffs();
        let ppad = CANVAS_MARGIN_PROP_SPACE / 1000.0;
        let fpad = CANVAS_MARGIN_FIXED_SPACE;

        let mut dxl = fpad + ppad * sx;
        let mut dxr = dxl;
        let mut dyb = fpad + ppad * sy;
        let mut dyt = dyb;

        let mut layout = PlotLayout {
            title_pos: Point::ZERO,
            title_font_size: 0.0,
            legend_area: [None; 4],
            plot_area: Affine::IDENTITY,
            plot_active_area: None,
        };

        if !self.title.is_empty() {
            let scale = compute_scale(canvas_mtx);
            let ptpad = AXIS_TITLE_PROP_SPACE / 1000.0;
            let title_size = default_font_size(TextClass::PlotTitle, scale);
            let th = approx_text_height(title_size);

            let p = canvas_mtx * Point::new(0.5, 1.0);
            layout.title_pos = Point::new(p.x, p.y - (ptpad + dyt + title_size));
            layout.title_font_size = title_size;

            dyt += 2.0 * ptpad + th;
        }

        if do_legends {
            for place in Placement::ALL {
                let k = place.index();
                let Some(legend) = self.legends[k].as_deref_mut() else {
                    continue;
                };

                let bb = legend.bounding_rect();
                let (bb_dx, bb_dy) = (bb.width(), bb.height());
                if bb_dx <= 0.0 || bb_dy <= 0.0 {
                    tracing::debug!(?place, "legend skipped: empty bounding box");
                    continue;
                }

                let (dx, dy, px, py);
                match place {
                    Placement::Right => {
                        dx = (sx * LEGEND_SIZE_FRAC_X).max(bb_dx);
                        dy = dx * bb_dy / bb_dx;
                        px = sx - dx - ppad * sx - dxr;
                        py = (sy - dy) / 2.0;
                        dxr += dx + 2.0 * ppad * sx;
                    }
                    Placement::Left => {
                        dx = (sx * LEGEND_SIZE_FRAC_X).max(bb_dx);
                        dy = dx * bb_dy / bb_dx;
                        px = ppad * sx + dxl;
                        py = (sy - dy) / 2.0;
                        dxl += dx + 2.0 * ppad * sx;
                    }
                    Placement::Bottom => {
                        dy = sy * LEGEND_SIZE_FRAC_Y;
                        dx = dy * bb_dx / bb_dy;
                        py = ppad * sy + dyb;
                        px = (sx - dx) / 2.0;
                        dyb += dy + 2.0 * ppad * sy;
                    }
                    Placement::Top => {
                        dy = sy * LEGEND_SIZE_FRAC_Y;
                        dx = dy * bb_dx / bb_dy;
                        py = sy - dy - ppad * sy - dyt;
                        px = (sx - dx) / 2.0;
                        dyt += dy + 2.0 * ppad * sy;
                    }
                }

                if px >= 0.0 && py >= 0.0 && px + dx < sx && py + dy < sy {
                    layout.legend_area[k] =
                        Some(Affine::new([dx, 0.0, 0.0, dy, tx + px, ty + py]));
                } else {
                    tracing::warn!(?place, "legend skipped: placement overflows destination");
                }
            }
        }

        let x0 = tx + dxl;
        let y0 = ty + dyb;
        layout.plot_area = Affine::new([sx - (dxl + dxr), 0.0, 0.0, sy - (dyb + dyt), x0, y0]);
        layout
    }

    /// Collect tick marks, grid lines and measured labels for one axis.
    /// Returns the perpendicular space (pixels) the labels occupy.
    fn collect_axis(
        &mut self,
        dir: AxisKind,
        text_size: f64,
        labels: &mut Vec<TextLabel>,
        marks: &mut PathShape,
        grid: &mut PathShape,
    ) -> f64 {
        let ppad = AXIS_LABEL_PROP_SPACE / 1000.0;
        let is_x = dir == AxisKind::X;
        let u = if is_x { self.ux } else { self.uy };

        let axis = self.axis(dir);
        let (angle, hj, vj) = (axis.labels_angle, axis.labels_hjust, axis.labels_vjust);
        let entries: Vec<(f64, String)> = if axis.use_categories {
            axis.categories
                .iter()
                .map(|(v, s)| (v, s.to_string()))
                .collect()
        } else {
            u.ticks(axis.format)
        };

        let mut reserved: f64 = 0.0;
        for (value, text) in entries {
            let p = self.user_trans
                * if is_x {
                    Point::new(value, 0.0)
                } else {
                    Point::new(0.0, value)
                };
            let q = if is_x { p.x } else { p.y };
            if q < -TICK_ACCEPT_EPS || q > 1.0 + TICK_ACCEPT_EPS {
                continue;
            }

            let (w, h) = lock_metrics(&self.metrics).measure(&text, text_size);
            let (rw, rh) = rotated_extents(w, h, angle);
            reserved = reserved.max(if is_x { rh } else { rw });

            let mut label = TextLabel::new(text, text_size, hj, vj);
            label.set_point(if is_x { q } else { -ppad }, if is_x { -ppad } else { q });
            label.set_angle(angle);
            label.set_extents(w, h);
            labels.push(label);

            if is_x {
                marks.move_to(q, 0.0).line_to(q, -0.01);
            } else {
                marks.move_to(0.0, q).line_to(-0.01, q);
            }
        }

        // Grid lines cross the full span at every internal numeric mark.
        for j in (u.begin() + 1)..u.end() {
            let uq = u.mark_value(j);
            let p = self.user_trans
                * if is_x {
                    Point::new(uq, 0.0)
                } else {
                    Point::new(0.0, uq)
                };
            let q = if is_x { p.x } else { p.y };
            if (-TICK_ACCEPT_EPS..=1.0 + TICK_ACCEPT_EPS).contains(&q) {
                if is_x {
                    grid.move_to(q, 0.0).line_to(q, 1.0);
                } else {
                    grid.move_to(0.0, q).line_to(1.0, q);
                }
            }
        }

        reserved
    }

    /// Axis pass: measure labels, fix the active area, then draw ticks,
    /// grid, frame, labels and axis titles. The two phases do not form a
    /// cycle: label content does not depend on the active area's position,
    /// only the final placement does.
    fn draw_axis(&mut self, canvas: &mut dyn Canvas, layout: &mut PlotLayout, clip: Option<Rect>) {
        if !self.use_units {
            layout.plot_active_area = Some(layout.plot_area);
            return;
        }

        let scale = compute_scale(layout.plot_area);
        if let Some(r) = clip {
            canvas.clip_box(r);
        }

        let label_text_size = default_font_size(TextClass::AxisLabels, scale);
        let title_text_size = default_font_size(TextClass::AxisTitle, scale);
        let plpad = AXIS_LABEL_PROP_SPACE / 1000.0;
        let ptpad = AXIS_TITLE_PROP_SPACE / 1000.0;

        let mut labels = Vec::new();
        let mut marks = PathShape::new();
        let mut grid = PathShape::new();

        let dy_label = self.collect_axis(AxisKind::X, label_text_size, &mut labels, &mut marks, &mut grid);
        let dx_label = self.collect_axis(AxisKind::Y, label_text_size, &mut labels, &mut marks, &mut grid);

        let mut ppad_left = plpad;
        let ppad_right = plpad;
        let mut ppad_bottom = plpad;
        let ppad_top = plpad;
        let mut dx_left = dx_label;
        let dx_right = 0.0;
        let mut dy_bottom = dy_label;
        let dy_top = 0.0;

        if !self.y_axis.title.is_empty() {
            dx_left += approx_text_height(title_text_size);
            ppad_left += ptpad;
        }
        if !self.x_axis.title.is_empty() {
            dy_bottom += approx_text_height(title_text_size);
            ppad_bottom += ptpad;
        }

        let [psx, _, _, psy, px0, py0] = layout.plot_area.as_coeffs();

        let xppad = ppad_left + ppad_right;
        let lsx = (dx_left + dx_right + xppad * psx) / (1.0 + xppad);
        let yppad = ppad_bottom + ppad_top;
        let lsy = (dy_bottom + dy_top + yppad * psy) / (1.0 + yppad);

        let sxr = psx - lsx;
        let syr = psy - lsy;
        let aax = px0 + dx_left + ppad_left * sxr;
        let aay = py0 + dy_bottom + ppad_bottom * syr;
        let active = Affine::new([sxr, 0.0, 0.0, syr, aax, aay]);
        layout.plot_active_area = Some(active);

        for mut label in labels {
            label.apply_transform(active, 1.0);
            canvas.draw(&mut label, Rgba8::BLACK);
        }

        let mscale = matrix_scale(active).max(1.0);

        let mut grid_vs = DashShape::new(grid, std_line_width(scale, 0.15));
        grid_vs.add_dash(7.0, 3.0);
        grid_vs.apply_transform(active, mscale);
        canvas.draw(&mut grid_vs, Rgba8::BLACK);

        let mut marks_vs = StrokeShape::new(marks, std_line_width(scale, 0.75));
        marks_vs.apply_transform(active, mscale);
        canvas.draw(&mut marks_vs, Rgba8::BLACK);

        let mut frame = PathShape::new();
        frame
            .move_to(0.0, 0.0)
            .line_to(0.0, 1.0)
            .line_to(1.0, 1.0)
            .line_to(1.0, 0.0)
            .close();
        let mut frame_vs = StrokeShape::new(frame, std_line_width(scale, 0.75));
        frame_vs.apply_transform(active, mscale);
        canvas.draw(&mut frame_vs, Rgba8::BLACK);

        if !self.x_axis.title.is_empty() {
            let mut t = TextLabel::new(self.x_axis.title.clone(), title_text_size, 0.5, 0.0);
            t.set_point(sxr * 0.5 + aax, py0);
            {
                let mut metrics = lock_metrics(&self.metrics);
                t.measure_with(&mut *metrics);
            }
            t.apply_transform(Affine::IDENTITY, 1.0);
            canvas.draw(&mut t, Rgba8::BLACK);
        }

        if !self.y_axis.title.is_empty() {
            let mut t = TextLabel::new(self.y_axis.title.clone(), title_text_size, 0.5, 1.0);
            t.set_point(px0, syr * 0.5 + aay);
            t.set_angle(std::f64::consts::FRAC_PI_2);
            {
                let mut metrics = lock_metrics(&self.metrics);
                t.measure_with(&mut *metrics);
            }
            t.apply_transform(Affine::IDENTITY, 1.0);
            canvas.draw(&mut t, Rgba8::BLACK);
        }

        if clip.is_some() {
            canvas.reset_clipping();
        }
    }
}

fn lock<'a>(
    drawable: &'a SharedDrawable,
) -> std::sync::MutexGuard<'a, dyn Drawable + 'static> {
    drawable.lock().unwrap_or_else(|e| e.into_inner())
}

fn lock_metrics<'a>(
    metrics: &'a Arc<Mutex<dyn TextMeasure>>,
) -> std::sync::MutexGuard<'a, dyn TextMeasure + 'static> {
    metrics.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
#[path = "../tests/unit/plot.rs"]
mod tests;
