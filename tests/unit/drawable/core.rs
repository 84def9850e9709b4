use super::*;
use crate::drawable::path::PathShape;

#[test]
fn collect_path_round_trips_commands() {
    let mut p = PathShape::new();
    p.move_to(0.0, 0.0)
        .line_to(1.0, 0.0)
        .curve3(1.5, 0.5, 2.0, 0.0)
        .curve4(2.0, 1.0, 3.0, 1.0, 3.0, 0.0)
        .close();
    p.apply_transform(Affine::IDENTITY, 1.0);

    let bez = collect_path(&mut p);
    assert_eq!(bez.elements().len(), 5);
}

#[test]
fn vertex_bounding_box_covers_control_points() {
    let mut p = PathShape::new();
    p.move_to(0.0, 0.0).curve3(5.0, 10.0, 2.0, 0.0);
    p.apply_transform(Affine::IDENTITY, 1.0);

    let bb = vertex_bounding_box(&mut p).unwrap();
    assert_eq!(bb, Rect::new(0.0, 0.0, 5.0, 10.0));
}

#[test]
fn vertex_bounding_box_of_empty_shape_is_none() {
    let mut p = PathShape::new();
    p.apply_transform(Affine::IDENTITY, 1.0);
    assert_eq!(vertex_bounding_box(&mut p), None);
}

#[test]
fn rewind_restarts_the_sequence() {
    let mut p = PathShape::new();
    p.move_to(1.0, 2.0).line_to(3.0, 4.0);
    p.apply_transform(Affine::IDENTITY, 1.0);

    assert_eq!(p.vertex(), Vertex::MoveTo(Point::new(1.0, 2.0)));
    assert_eq!(p.vertex(), Vertex::LineTo(Point::new(3.0, 4.0)));
    assert_eq!(p.vertex(), Vertex::Stop);

    p.rewind();
    assert_eq!(p.vertex(), Vertex::MoveTo(Point::new(1.0, 2.0)));
}

#[test]
fn shared_handles_alias_the_same_drawable() {
    let handle = share(PathShape::new());
    let other = handle.clone();
    other
        .lock()
        .unwrap()
        .apply_transform(Affine::IDENTITY, 1.0);
    assert_eq!(
        vertex_bounding_box(&mut *handle.lock().unwrap()),
        None
    );
}
