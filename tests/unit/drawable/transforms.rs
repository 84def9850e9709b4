use super::*;
use crate::drawable::path::PathShape;
use crate::drawable::vertex_bounding_box;

fn segment() -> PathShape {
    let mut p = PathShape::new();
    p.move_to(0.0, 0.0).line_to(10.0, 0.0);
    p
}

#[test]
fn stroke_expands_a_line_into_a_fillable_outline() {
    let mut s = StrokeShape::new(segment(), 2.0);
    s.apply_transform(Affine::IDENTITY, 1.0);

    let bb = vertex_bounding_box(&mut s).unwrap();
    assert!(bb.height() >= 2.0 - 1e-6);
    assert!(bb.width() >= 10.0);
}

#[test]
fn stroke_bounding_box_delegates_to_the_source() {
    let s = StrokeShape::new(segment(), 4.0);
    // The reported box does not include width growth.
    assert_eq!(s.bounding_box(), Some(Rect::new(0.0, 0.0, 10.0, 0.0)));
}

#[test]
fn dash_pattern_splits_the_outline() {
    let mut solid = StrokeShape::new(segment(), 1.0);
    solid.apply_transform(Affine::IDENTITY, 1.0);
    let solid_count = {
        let mut n = 0;
        solid.rewind();
        while solid.vertex() != Vertex::Stop {
            n += 1;
        }
        n
    };

    let mut dashed = DashShape::new(segment(), 1.0);
    dashed.add_dash(2.0, 2.0);
    dashed.apply_transform(Affine::IDENTITY, 1.0);
    let mut dash_count = 0;
    dashed.rewind();
    while dashed.vertex() != Vertex::Stop {
        dash_count += 1;
    }

    assert!(dash_count > solid_count);
}

#[test]
fn curve_approx_flattens_curves_to_lines() {
    let mut p = PathShape::new();
    p.move_to(0.0, 0.0).curve4(0.0, 10.0, 10.0, 10.0, 10.0, 0.0);

    let mut flat = CurveApprox::new(p);
    flat.apply_transform(Affine::IDENTITY, 10.0);

    flat.rewind();
    loop {
        match flat.vertex() {
            Vertex::Curve3(..) | Vertex::Curve4(..) => panic!("curve survived flattening"),
            Vertex::Stop => break,
            _ => {}
        }
    }
}

#[test]
fn fixed_ratio_scales_the_box_and_marks_resize() {
    let r = FixedRatio::new(segment(), 2.0);
    assert!(r.need_resize());
    assert_eq!(r.bounding_box(), Some(Rect::new(0.0, 0.0, 20.0, 0.0)));
}
