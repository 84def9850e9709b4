use super::*;
use crate::foundation::geometry::Point;

#[test]
fn device_box_degenerates_before_measurement() {
    let span = TextSpan {
        text: "x".to_string(),
        size: 10.0,
        pos: Point::new(3.0, 4.0),
        ..TextSpan::default()
    };
    let bb = span.device_box();
    assert_eq!((bb.x0, bb.y0, bb.x1, bb.y1), (3.0, 4.0, 3.0, 4.0));
}

#[test]
fn device_box_applies_justification() {
    let span = TextSpan {
        text: "abc".to_string(),
        size: 10.0,
        pos: Point::new(100.0, 50.0),
        hjust: 1.0,
        vjust: 0.5,
        width: 20.0,
        height: 10.0,
        ..TextSpan::default()
    };
    let bb = span.device_box();
    assert_eq!((bb.x0, bb.x1), (80.0, 100.0));
    assert_eq!((bb.y0, bb.y1), (45.0, 55.0));
}

#[test]
fn rotated_extents_swap_at_quarter_turn() {
    let (w, h) = rotated_extents(20.0, 10.0, std::f64::consts::FRAC_PI_2);
    assert!((w - 10.0).abs() < 1e-9);
    assert!((h - 20.0).abs() < 1e-9);
}
