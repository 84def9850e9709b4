use super::*;
use crate::canvas::svg::SvgCanvas;
use crate::drawable::ellipse::EllipseShape;

fn path_rect(x0: f64, y0: f64, x1: f64, y1: f64) -> PathShape {
    let mut p = PathShape::new();
    p.move_to(x0, y0)
        .line_to(x1, y0)
        .line_to(x1, y1)
        .line_to(x0, y1)
        .close();
    p
}

fn dest() -> Rect {
    Rect::new(0.0, 0.0, 480.0, 480.0)
}

fn svg_body(plot: &mut Plot) -> String {
    let mut canvas = SvgCanvas::new(480.0, 480.0);
    plot.draw(&mut canvas, dest());
    canvas.finish()
}

#[test]
fn first_add_goes_to_the_current_layer() {
    let mut plot = Plot::new(true);
    plot.add_shape(path_rect(0.0, 0.0, 10.0, 10.0), Rgba8::BLACK, false);

    assert_eq!(plot.layers.last().unwrap().len(), 1);
    assert!(plot.pending.is_empty());
    assert!(plot.need_redraw());
}

#[test]
fn fitting_add_goes_to_the_pending_queue() {
    let mut plot = Plot::new(true);
    plot.add_shape(path_rect(0.0, 0.0, 10.0, 10.0), Rgba8::BLACK, false);

    // Refresh the cached box, then add a shape strictly inside it.
    assert_eq!(plot.bounding_rect(), Rect::new(0.0, 0.0, 10.0, 10.0));
    plot.add_shape(EllipseShape::new(3.0, 3.0, 1.0, 1.0), Rgba8::RED, false);

    assert_eq!(plot.pending.len(), 1);
    assert_eq!(plot.layers.last().unwrap().len(), 1);
    assert_eq!(plot.current_layer_index(), 1);
    assert_eq!(plot.bounding_rect(), Rect::new(0.0, 0.0, 10.0, 10.0));

    plot.commit_pending_draw();
    assert!(plot.pending.is_empty());
    assert_eq!(plot.layers.last().unwrap().len(), 2);
    assert_eq!(plot.bounding_rect(), Rect::new(0.0, 0.0, 10.0, 10.0));
}

#[test]
fn add_outside_the_known_box_forces_a_full_relayout() {
    let mut plot = Plot::new(true);
    plot.add_shape(path_rect(0.0, 0.0, 10.0, 10.0), Rgba8::BLACK, false);
    let _ = plot.bounding_rect();

    plot.add_shape(path_rect(0.0, 0.0, 20.0, 20.0), Rgba8::BLACK, false);
    assert!(plot.pending.is_empty());
    assert!(plot.need_redraw());
    assert_eq!(plot.bounding_rect(), Rect::new(0.0, 0.0, 20.0, 20.0));
}

#[test]
fn auto_box_is_the_union_of_item_boxes() {
    let mut plot = Plot::new(true);
    plot.add_shape(path_rect(-5.0, 0.0, 1.0, 2.0), Rgba8::BLACK, false);
    plot.add_shape(path_rect(0.0, -3.0, 8.0, 1.0), Rgba8::RED, false);
    assert_eq!(plot.bounding_rect(), Rect::new(-5.0, -3.0, 8.0, 2.0));
}

#[test]
fn pop_on_the_root_layer_fails_without_state_change() {
    let mut plot = Plot::new(true);
    assert_eq!(plot.current_layer_index(), 1);
    assert!(!plot.pop_layer());
    assert_eq!(plot.current_layer_index(), 1);
}

#[test]
fn layer_stack_depth_is_bounded() {
    let mut plot = Plot::new(true);
    for _ in 1..MAX_LAYERS {
        assert!(plot.push_layer());
    }
    assert_eq!(plot.current_layer_index(), MAX_LAYERS);
    assert!(!plot.push_layer());
    assert_eq!(plot.current_layer_index(), MAX_LAYERS);
}

#[test]
fn push_commits_the_pending_queue_into_the_old_top() {
    let mut plot = Plot::new(true);
    plot.add_shape(path_rect(0.0, 0.0, 10.0, 10.0), Rgba8::BLACK, false);
    let _ = plot.bounding_rect();
    plot.add_shape(EllipseShape::new(5.0, 5.0, 1.0, 1.0), Rgba8::RED, false);
    assert_eq!(plot.pending.len(), 1);

    assert!(plot.push_layer());
    assert!(plot.pending.is_empty());
    assert_eq!(plot.layers[0].len(), 2);
    assert!(plot.layers[1].is_empty());
}

#[test]
fn push_then_pop_leaves_visible_content_unchanged() {
    let mut plot = Plot::new(true);
    plot.add_shape(path_rect(0.0, 0.0, 10.0, 10.0), Rgba8::BLACK, false);

    let before = svg_body(&mut plot);
    assert!(plot.push_layer());
    plot.add_shape(path_rect(2.0, 2.0, 3.0, 3.0), Rgba8::RED, false);
    assert!(plot.pop_layer());
    let after = svg_body(&mut plot);

    assert_eq!(before, after);
}

#[test]
fn clear_transfers_the_accumulated_dirty_region() {
    let mut plot = Plot::new(true);
    plot.add_shape(path_rect(0.0, 0.0, 10.0, 10.0), Rgba8::BLACK, false);

    let mut canvas = SvgCanvas::new(480.0, 480.0);
    let info = plot.draw(&mut canvas, dest());
    plot.commit_pending_draw();

    plot.add_shape(EllipseShape::new(5.0, 5.0, 2.0, 2.0), Rgba8::RED, false);
    let dirty = plot.draw_queue(&mut canvas, dest(), &info);
    assert!(dirty.is_some());
    let accumulated = plot.changes_accu.rect().unwrap();

    plot.clear_current_layer();
    assert!(plot.layers.last().unwrap().is_empty());
    assert!(plot.pending.is_empty());
    assert_eq!(plot.changes_pending.rect(), Some(accumulated));
    assert!(!plot.changes_accu.is_defined());

    plot.commit_pending_draw();
    assert!(plot.layers.last().unwrap().is_empty());
    assert!(!plot.changes_pending.is_defined());
}

#[test]
fn queued_draw_reports_the_carried_over_region_too() {
    let mut plot = Plot::new(true);
    plot.add_shape(path_rect(0.0, 0.0, 10.0, 10.0), Rgba8::BLACK, false);

    let mut canvas = SvgCanvas::new(480.0, 480.0);
    let info = plot.draw(&mut canvas, dest());
    plot.commit_pending_draw();

    plot.add_shape(EllipseShape::new(5.0, 5.0, 2.0, 2.0), Rgba8::RED, false);
    let first = plot.draw_queue(&mut canvas, dest(), &info).unwrap();
    plot.clear_current_layer();

    // No new items: the next queued draw must still report the area that
    // needs erasing.
    let carried = plot.draw_queue(&mut canvas, dest(), &info).unwrap();
    assert_eq!(carried, first);
}

#[test]
fn set_limits_round_trip_restores_the_auto_box() {
    let mut plot = Plot::new(true);
    plot.add_shape(path_rect(1.0, 2.0, 5.0, 6.0), Rgba8::BLACK, false);
    assert_eq!(plot.bounding_rect(), Rect::new(1.0, 2.0, 5.0, 6.0));

    plot.set_limits(Rect::new(0.0, 0.0, 100.0, 100.0));
    assert_eq!(plot.bounding_rect(), Rect::new(0.0, 0.0, 100.0, 100.0));

    plot.unset_limits();
    assert_eq!(plot.bounding_rect(), Rect::new(1.0, 2.0, 5.0, 6.0));
}

#[test]
fn empty_plot_reports_a_zero_bounding_rect() {
    let mut plot = Plot::new(true);
    assert_eq!(plot.bounding_rect(), Rect::ZERO);
}

#[test]
fn invalid_label_format_is_rejected_and_previous_kept() {
    let mut plot = Plot::new(true);
    plot.enable_label_format(AxisKind::X, Some("%.1f")).unwrap();
    assert!(plot.enable_label_format(AxisKind::X, Some("%z")).is_err());
    assert_eq!(
        plot.axis(AxisKind::X).label_format(),
        Some(LabelFormat::Fixed(1))
    );
    plot.enable_label_format(AxisKind::X, None).unwrap();
    assert_eq!(plot.axis(AxisKind::X).label_format(), None);
}

#[test]
fn label_angle_rederives_justification() {
    let mut plot = Plot::new(true);
    // X axis labels at angle 0 hang centered below their tick.
    let ax = plot.axis(AxisKind::X);
    assert_eq!((ax.labels_hjust, ax.labels_vjust), (0.5, 1.0));

    plot.set_axis_labels_angle(AxisKind::X, std::f64::consts::FRAC_PI_2);
    let ax = plot.axis(AxisKind::X);
    assert_eq!((ax.labels_hjust, ax.labels_vjust), (1.0, 0.5));
}

#[test]
fn legend_margins_follow_the_reservation_formula() {
    let mut plot = Plot::new(true);
    plot.add_shape(path_rect(0.0, 0.0, 10.0, 10.0), Rgba8::BLACK, false);

    let mut legend = Plot::new(false);
    legend.set_limits(Rect::new(0.0, 0.0, 2.0, 1.0)); // 2:1 aspect
    plot.add_legend(legend, Placement::Right);

    let layout = plot.compute_layout(affine_of_rect(dest()), true);

    let area = layout.legend_area[Placement::Right.index()].unwrap();
    let [dx, _, _, dy, ax, ay] = area.as_coeffs();
    // dx = max(480 * 0.125, 2) = 60, dy preserves the 2:1 aspect.
    assert!((dx - 60.0).abs() < 1e-9);
    assert!((dy - 30.0).abs() < 1e-9);
    // px = sx - dx - ppad*sx - dxr, with dxr = 4 + 0.015*480 = 11.2.
    assert!((ax - (480.0 - 60.0 - 7.2 - 11.2)).abs() < 1e-9);
    assert!((ay - 225.0).abs() < 1e-9);

    // Right margin grew by dx + 2*ppad*sx = 74.4 on top of the base 11.2.
    let [psx, _, _, _, px0, _] = layout.plot_area.as_coeffs();
    assert!((px0 - 11.2).abs() < 1e-9);
    assert!((psx - (480.0 - 11.2 - 85.6)).abs() < 1e-9);
}

#[test]
fn overflowing_legend_is_silently_skipped() {
    let mut plot = Plot::new(true);
    plot.add_shape(path_rect(0.0, 0.0, 10.0, 10.0), Rgba8::BLACK, false);

    let mut legend = Plot::new(false);
    // Wider than the whole destination: cannot be placed.
    legend.set_limits(Rect::new(0.0, 0.0, 5000.0, 10.0));
    plot.add_legend(legend, Placement::Right);

    let layout = plot.compute_layout(affine_of_rect(dest()), true);
    assert!(layout.legend_area[Placement::Right.index()].is_none());
}

#[test]
fn small_destination_skips_axes_entirely() {
    let mut plot = Plot::new(true);
    plot.add_shape(path_rect(0.0, 0.0, 10.0, 10.0), Rgba8::BLACK, false);

    let mut canvas = SvgCanvas::new(40.0, 40.0);
    let info = plot.draw(&mut canvas, Rect::new(0.0, 0.0, 40.0, 40.0));
    assert!(info.active_area.is_none());
}

#[test]
fn disabled_units_make_the_active_area_the_plot_area() {
    let mut plot = Plot::new(false);
    plot.add_shape(path_rect(0.0, 0.0, 10.0, 10.0), Rgba8::BLACK, false);

    let mut canvas = SvgCanvas::new(480.0, 480.0);
    let info = plot.draw(&mut canvas, dest());
    let active = info.active_area.unwrap();

    let mut layout = plot.compute_layout(affine_of_rect(dest()), true);
    plot.draw_axis(&mut SvgCanvas::new(480.0, 480.0), &mut layout, None);
    assert_eq!(active.as_coeffs(), layout.plot_area.as_coeffs());
}

#[test]
fn pad_mode_snaps_the_user_transform_to_tick_limits() {
    let mut plot = Plot::new(true);
    plot.set_limits(Rect::new(0.0, 0.0, 97.0, 97.0));
    plot.set_pad_mode(true);

    // Units for [0, 97] cover [0, 100]; the padded transform maps 100 to 1.
    let p = plot.user_trans * Point::new(100.0, 100.0);
    assert!((p.x - 1.0).abs() < 1e-9);
    assert!((p.y - 1.0).abs() < 1e-9);
}

#[test]
fn category_entries_replace_numeric_ticks() {
    let mut plot = Plot::new(true);
    plot.set_limits(Rect::new(0.0, 0.0, 3.0, 3.0));
    plot.enable_categories(AxisKind::X);
    plot.add_category_entry(AxisKind::X, 1.0, "one");
    plot.add_category_entry(AxisKind::X, 2.0, "two");

    let doc = svg_body(&mut plot);
    assert!(doc.contains(">one</text>"), "doc: {doc}");
    assert!(doc.contains(">two</text>"), "doc: {doc}");

    plot.disable_categories(AxisKind::X);
    assert!(plot.axis(AxisKind::X).categories.is_empty());
}

#[test]
fn degenerate_data_range_still_draws() {
    let mut plot = Plot::new(true);
    plot.add_shape(path_rect(5.0, 5.0, 5.0, 5.0), Rgba8::BLACK, false);
    let doc = svg_body(&mut plot);
    assert!(doc.contains("<svg"));
}

#[test]
fn out_of_range_ticks_are_discarded() {
    let mut plot = Plot::new(true);
    // Limits narrower than the units bracket: the bracketing marks at the
    // far ends fall outside [0, 1] and must not be drawn.
    plot.set_limits(Rect::new(0.0, 0.0, 97.0, 97.0));

    let mut labels = Vec::new();
    let mut marks = PathShape::new();
    let mut grid = PathShape::new();
    plot.collect_axis(AxisKind::X, 14.0, &mut labels, &mut marks, &mut grid);

    // Ticks at 0, 20, 40, 60, 80 survive; 100 maps past 1 + eps.
    assert_eq!(labels.len(), 5);
}
