use super::*;
use crate::drawable::path::PathShape;
use crate::foundation::geometry::Affine;

fn filled_square(x0: f64, y0: f64, x1: f64, y1: f64) -> PathShape {
    let mut p = PathShape::new();
    p.move_to(x0, y0)
        .line_to(x1, y0)
        .line_to(x1, y1)
        .line_to(x0, y1)
        .close();
    p
}

fn pixel(frame: &FrameRGBA, x: usize, y: usize) -> [u8; 4] {
    let idx = (y * usize::from(frame.width) + x) * 4;
    frame.data[idx..idx + 4].try_into().unwrap()
}

#[test]
fn fills_cover_the_expected_pixels() {
    let mut canvas = RasterCanvas::new(64, 64, Rgba8::WHITE);
    let mut square = filled_square(8.0, 8.0, 56.0, 56.0);
    square.apply_transform(Affine::IDENTITY, 1.0);
    canvas.draw(&mut square, Rgba8::new(180, 0, 0, 255));

    let frame = canvas.finish().unwrap();
    assert_eq!((frame.width, frame.height), (64, 64));
    assert_eq!(frame.data.len(), 64 * 64 * 4);

    assert_eq!(pixel(&frame, 32, 32), [180, 0, 0, 255]);
    assert_eq!(pixel(&frame, 2, 2), [255, 255, 255, 255]);
}

#[test]
fn model_y_is_up() {
    let mut canvas = RasterCanvas::new(64, 64, Rgba8::WHITE);
    // Square hugging the model bottom edge must land in the last rows.
    let mut square = filled_square(0.0, 0.0, 64.0, 8.0);
    square.apply_transform(Affine::IDENTITY, 1.0);
    canvas.draw(&mut square, Rgba8::new(0, 0, 180, 255));

    let frame = canvas.finish().unwrap();
    assert_eq!(pixel(&frame, 32, 60), [0, 0, 180, 255]);
    assert_eq!(pixel(&frame, 32, 3), [255, 255, 255, 255]);
}

#[test]
fn clipping_limits_the_painted_area() {
    let mut canvas = RasterCanvas::new(64, 64, Rgba8::WHITE);
    canvas.clip_box(crate::foundation::geometry::Rect::new(0.0, 0.0, 32.0, 64.0));
    let mut square = filled_square(0.0, 0.0, 64.0, 64.0);
    square.apply_transform(Affine::IDENTITY, 1.0);
    canvas.draw(&mut square, Rgba8::new(0, 140, 0, 255));
    canvas.reset_clipping();

    let frame = canvas.finish().unwrap();
    assert_eq!(pixel(&frame, 8, 32), [0, 140, 0, 255]);
    assert_eq!(pixel(&frame, 56, 32), [255, 255, 255, 255]);
}

#[test]
fn outline_paints_the_edge_not_the_interior() {
    let mut canvas = RasterCanvas::new(64, 64, Rgba8::WHITE);
    let mut square = filled_square(8.0, 8.0, 56.0, 56.0);
    square.apply_transform(Affine::IDENTITY, 1.0);
    canvas.draw_outline(&mut square, Rgba8::BLACK);

    let frame = canvas.finish().unwrap();
    assert_eq!(pixel(&frame, 32, 32), [255, 255, 255, 255]);
    assert_ne!(pixel(&frame, 8, 32), [255, 255, 255, 255]);
}

#[test]
fn straight_rgba_round_trips_opaque_pixels() {
    let frame = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![10, 20, 30, 255],
    };
    assert_eq!(frame.to_straight_rgba(), vec![10, 20, 30, 255]);
}
