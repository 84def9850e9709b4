use super::*;
use crate::drawable::{Vertex, vertex_bounding_box};

#[test]
fn bounding_box_is_model_space() {
    let mut p = PathShape::new();
    p.move_to(1.0, 1.0).line_to(4.0, 5.0);
    assert_eq!(p.bounding_box(), Some(Rect::new(1.0, 1.0, 4.0, 5.0)));

    // The transform moves vertices but not the model-space box.
    p.apply_transform(Affine::translate((10.0, 0.0)), 1.0);
    assert_eq!(p.bounding_box(), Some(Rect::new(1.0, 1.0, 4.0, 5.0)));
    assert_eq!(
        vertex_bounding_box(&mut p),
        Some(Rect::new(11.0, 1.0, 14.0, 5.0))
    );
}

#[test]
fn empty_path_reports_undefined_box() {
    let p = PathShape::new();
    assert_eq!(p.bounding_box(), None);
}

#[test]
fn vertices_follow_the_applied_transform() {
    let mut p = PathShape::new();
    p.move_to(0.0, 0.0).line_to(1.0, 1.0);
    p.apply_transform(Affine::scale(2.0), 1.0);

    p.rewind();
    assert_eq!(p.vertex(), Vertex::MoveTo(Point::new(0.0, 0.0)));
    assert_eq!(p.vertex(), Vertex::LineTo(Point::new(2.0, 2.0)));
}
