use super::*;
use crate::drawable::vertex_bounding_box;

#[test]
fn bounding_box_spans_the_radii() {
    let e = EllipseShape::new(3.0, 3.0, 1.0, 2.0);
    assert_eq!(e.bounding_box(), Some(Rect::new(2.0, 1.0, 4.0, 5.0)));
}

#[test]
fn transformed_vertices_stay_near_the_scaled_box() {
    let mut e = EllipseShape::new(0.0, 0.0, 1.0, 1.0);
    e.apply_transform(Affine::scale(10.0), 10.0);

    let bb = vertex_bounding_box(&mut e).unwrap();
    // Control points may poke slightly outside the circle, never past ~11.
    assert!(bb.x0 >= -11.5 && bb.x1 <= 11.5);
    assert!(bb.width() > 18.0);
}

#[test]
fn finer_approximation_scale_emits_more_segments() {
    let count = |approx: f64| {
        let mut e = EllipseShape::new(0.0, 0.0, 1.0, 1.0);
        e.apply_transform(Affine::IDENTITY, approx);
        let mut n = 0;
        e.rewind();
        while e.vertex() != Vertex::Stop {
            n += 1;
        }
        n
    };
    assert!(count(100.0) >= count(1.0));
}
