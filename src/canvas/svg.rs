//! SVG canvas backend.
//!
//! Produces a standalone `<svg>` document: one `<g>` per logical section,
//! `<path>` elements from the vertex stream and native `<text>` elements for
//! labels. The model origin is bottom-left, SVG's is top-left, so every
//! emitted y coordinate is flipped against the page height.

use std::fmt::Write as _;

use crate::canvas::Canvas;
use crate::drawable::{Drawable, Vertex};
use crate::foundation::color::Rgba8;
use crate::foundation::geometry::Rect;
use crate::text::TextSpan;

const OUTLINE_WIDTH: f64 = 1.5;

/// Canvas writing an SVG document into an in-memory buffer.
pub struct SvgCanvas {
    width: f64,
    height: f64,
    body: String,
    next_id: u32,
    clip_open: bool,
    group_depth: u32,
}

impl SvgCanvas {
    /// New document of the given page size in pixels.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            body: String::new(),
            next_id: 0,
            clip_open: false,
            group_depth: 0,
        }
    }

    /// Close any open sections and return the complete document.
    pub fn finish(mut self) -> String {
        self.close_clip();
        while self.group_depth > 0 {
            self.end_group();
        }
        let mut out = String::new();
        let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        );
        out.push_str(&self.body);
        out.push_str("</svg>\n");
        out
    }

    fn flip_y(&self, y: f64) -> f64 {
        self.height - y
    }

    /// Serialize the vertex stream into path data, flipping y.
    fn path_data(&self, shape: &mut dyn Drawable) -> String {
        let mut d = String::new();
        shape.rewind();
        loop {
            match shape.vertex() {
                Vertex::MoveTo(p) => {
                    let _ = write!(d, "M{} {} ", fmt(p.x), fmt(self.flip_y(p.y)));
                }
                Vertex::LineTo(p) => {
                    let _ = write!(d, "L{} {} ", fmt(p.x), fmt(self.flip_y(p.y)));
                }
                Vertex::Curve3(c, p) => {
                    let _ = write!(
                        d,
                        "Q{} {} {} {} ",
                        fmt(c.x),
                        fmt(self.flip_y(c.y)),
                        fmt(p.x),
                        fmt(self.flip_y(p.y))
                    );
                }
                Vertex::Curve4(c1, c2, p) => {
                    let _ = write!(
                        d,
                        "C{} {} {} {} {} {} ",
                        fmt(c1.x),
                        fmt(self.flip_y(c1.y)),
                        fmt(c2.x),
                        fmt(self.flip_y(c2.y)),
                        fmt(p.x),
                        fmt(self.flip_y(p.y))
                    );
                }
                Vertex::Close => d.push_str("Z "),
                Vertex::Stop => break,
            }
        }
        d.trim_end().to_string()
    }

    fn write_text(&mut self, span: &TextSpan, color: Rgba8) {
        let text = escape(&span.text);
        let style = format!("font-size:{}px", fmt(span.size));
        let paint = paint_attrs("fill", color);

        if span.angle == 0.0 {
            let x = span.pos.x - span.hjust * span.width;
            let y = self.flip_y(span.pos.y - span.vjust * span.height);
            let _ = writeln!(
                self.body,
                r#"<text x="{}" y="{}" style="{style}"{paint}>{text}</text>"#,
                fmt(x),
                fmt(y)
            );
        } else {
            // Rotated text keeps its offsets in the local frame and wraps
            // the element in a matrix transform around the anchor.
            let (s, c) = span.angle.sin_cos();
            let lx = -span.hjust * span.width;
            let ly = span.vjust * span.height;
            let _ = writeln!(
                self.body,
                r#"<text x="{}" y="{}" transform="matrix({} {} {} {} {} {})" style="{style}"{paint}>{text}</text>"#,
                fmt(lx),
                fmt(ly),
                fmt(c),
                fmt(-s),
                fmt(s),
                fmt(c),
                fmt(span.pos.x),
                fmt(self.flip_y(span.pos.y))
            );
        }
    }

    fn close_clip(&mut self) {
        if self.clip_open {
            self.body.push_str("</g>\n");
            self.clip_open = false;
        }
    }
}

impl Canvas for SvgCanvas {
    fn draw(&mut self, shape: &mut dyn Drawable, color: Rgba8) {
        if let Some(span) = shape.as_text() {
            let span = span.clone();
            self.write_text(&span, color);
            return;
        }
        let d = self.path_data(shape);
        if d.is_empty() {
            return;
        }
        let paint = paint_attrs("fill", color);
        let _ = writeln!(self.body, r#"<path d="{d}"{paint} stroke="none"/>"#);
    }

    fn draw_outline(&mut self, shape: &mut dyn Drawable, color: Rgba8) {
        if let Some(span) = shape.as_text() {
            let span = span.clone();
            self.write_text(&span, color);
            return;
        }
        let d = self.path_data(shape);
        if d.is_empty() {
            return;
        }
        let paint = paint_attrs("stroke", color);
        let _ = writeln!(
            self.body,
            r#"<path d="{d}" fill="none"{paint} stroke-width="{}"/>"#,
            fmt(OUTLINE_WIDTH)
        );
    }

    fn clip_box(&mut self, r: Rect) {
        self.close_clip();
        let id = self.next_id;
        self.next_id += 1;
        let _ = writeln!(
            self.body,
            r#"<clipPath id="clip{id}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath>"#,
            fmt(r.x0),
            fmt(self.flip_y(r.y1)),
            fmt(r.width()),
            fmt(r.height())
        );
        let _ = writeln!(self.body, r##"<g clip-path="url(#clip{id})">"##);
        self.clip_open = true;
    }

    fn reset_clipping(&mut self) {
        self.close_clip();
    }

    fn begin_group(&mut self, id: &str) {
        let _ = writeln!(self.body, r#"<g id="{}">"#, escape(id));
        self.group_depth += 1;
    }

    fn end_group(&mut self) {
        self.close_clip();
        if self.group_depth > 0 {
            self.body.push_str("</g>\n");
            self.group_depth -= 1;
        }
    }
}

fn paint_attrs(kind: &str, color: Rgba8) -> String {
    let mut out = format!(" {kind}=\"rgb({},{},{})\"", color.r, color.g, color.b);
    if color.a != 255 {
        let _ = write!(out, " {kind}-opacity=\"{}\"", fmt(f64::from(color.alpha_f32())));
    }
    out
}

fn fmt(v: f64) -> String {
    // Shortest stable representation: trim the noise a plain Display of a
    // rounded value would keep.
    let r = (v * 1000.0).round() / 1000.0;
    let mut s = format!("{r:.3}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" { "0".to_string() } else { s }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/svg.rs"]
mod tests;
