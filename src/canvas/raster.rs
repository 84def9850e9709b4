//! Pixel-buffer canvas backend powered by `vello_cpu`.

use std::path::Path;

use crate::canvas::Canvas;
use crate::drawable::{Drawable, collect_path};
use crate::foundation::color::Rgba8;
use crate::foundation::error::{PlotError, PlotResult};
use crate::foundation::geometry::{Affine, BezPath, Rect};
use crate::text::{ParleyMetrics, TextSpan};

const OUTLINE_WIDTH: f64 = 1.5;

/// A rendered frame: premultiplied RGBA8 pixels, row-major, top-left origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u16,
    /// Height in pixels.
    pub height: u16,
    /// `width * height * 4` premultiplied RGBA bytes.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Convert to straight-alpha RGBA8.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = px[3];
            if a != 0 && a != 255 {
                let a16 = u16::from(a);
                for c in px.iter_mut().take(3) {
                    *c = ((u16::from(*c) * 255 + a16 / 2) / a16).min(255) as u8;
                }
            }
        }
        out
    }

    /// Encode the frame as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> PlotResult<()> {
        let img = image::RgbaImage::from_raw(
            u32::from(self.width),
            u32::from(self.height),
            self.to_straight_rgba(),
        )
        .ok_or_else(|| PlotError::canvas("frame buffer size mismatch"))?;
        img.save(path.as_ref())
            .map_err(|e| PlotError::canvas(format!("failed to write png: {e}")))
    }
}

struct RasterFont {
    metrics: ParleyMetrics,
    font: vello_cpu::peniko::FontData,
}

/// Canvas rasterizing into a pixel buffer.
///
/// Geometry arrives in model orientation (y up) and is flipped to raster
/// rows on the way in. Text labels are drawn as glyph runs when a font has
/// been injected with [`RasterCanvas::with_font`], and skipped with a
/// warning otherwise.
pub struct RasterCanvas {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
    clip_depth: u32,
    font: Option<RasterFont>,
}

impl RasterCanvas {
    /// New canvas of the given pixel size, cleared to `bg`.
    pub fn new(width: u16, height: u16, bg: Rgba8) -> Self {
        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        ));
        Self {
            ctx,
            width,
            height,
            clip_depth: 0,
            font: None,
        }
    }

    /// Inject font bytes for glyph rendering and real text metrics.
    pub fn with_font(mut self, font_bytes: Vec<u8>) -> PlotResult<Self> {
        let metrics = ParleyMetrics::new(font_bytes.clone())?;
        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        self.font = Some(RasterFont { metrics, font });
        Ok(self)
    }

    /// Rasterize everything drawn so far into a frame.
    pub fn finish(&mut self) -> PlotResult<FrameRGBA> {
        while self.clip_depth > 0 {
            self.ctx.pop_layer();
            self.clip_depth -= 1;
        }
        self.ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.render_to_pixmap(&mut pixmap);
        Ok(FrameRGBA {
            width: self.width,
            height: self.height,
            data: pixmap.data_as_u8_slice().to_vec(),
        })
    }

    fn flip(&self) -> Affine {
        Affine::new([1.0, 0.0, 0.0, -1.0, 0.0, f64::from(self.height)])
    }

    fn fill_device_path(&mut self, path: BezPath, color: Rgba8) {
        if path.elements().is_empty() {
            return;
        }
        let cpu = bezpath_to_cpu(&(self.flip() * path));
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx.fill_path(&cpu);
    }

    fn draw_text(&mut self, span: &TextSpan, color: Rgba8) {
        let height = f64::from(self.height);
        let Some(font) = self.font.as_mut() else {
            tracing::warn!(text = %span.text, "raster text skipped: no font injected");
            return;
        };
        let layout = match font.metrics.layout_plain(&span.text, span.size) {
            Ok(l) => l,
            Err(e) => {
                tracing::warn!(error = %e, "raster text skipped: shaping failed");
                return;
            }
        };

        let w = f64::from(layout.width());
        let h = f64::from(layout.height());
        // Raster anchor, plus the unrotated offset to the text box top-left.
        let anchor = kurbo::Point::new(span.pos.x, height - span.pos.y);
        let offset = kurbo::Vec2::new(-span.hjust * w, span.vjust * h - h);
        let tr = Affine::translate(anchor.to_vec2())
            * Affine::rotate(-span.angle)
            * Affine::translate(offset);

        self.ctx.set_transform(affine_to_cpu(tr));
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&font.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }
}

impl Canvas for RasterCanvas {
    fn draw(&mut self, shape: &mut dyn Drawable, color: Rgba8) {
        if let Some(span) = shape.as_text() {
            let span = span.clone();
            self.draw_text(&span, color);
            return;
        }
        let path = collect_path(shape);
        self.fill_device_path(path, color);
    }

    fn draw_outline(&mut self, shape: &mut dyn Drawable, color: Rgba8) {
        if let Some(span) = shape.as_text() {
            let span = span.clone();
            self.draw_text(&span, color);
            return;
        }
        let path = collect_path(shape);
        if path.elements().is_empty() {
            return;
        }
        let style = kurbo::Stroke::new(OUTLINE_WIDTH).with_caps(kurbo::Cap::Round);
        let outline = kurbo::stroke(
            path.elements().iter().copied(),
            &style,
            &kurbo::StrokeOpts::default(),
            0.25,
        );
        self.fill_device_path(outline, color);
    }

    fn clip_box(&mut self, r: Rect) {
        use kurbo::Shape;
        let flipped = Rect::new(r.x0, f64::from(self.height) - r.y1, r.x1, f64::from(self.height) - r.y0);
        let cpu = bezpath_to_cpu(&flipped.to_path(0.1));
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.push_clip_layer(&cpu);
        self.clip_depth += 1;
    }

    fn reset_clipping(&mut self) {
        while self.clip_depth > 0 {
            self.ctx.pop_layer();
            self.clip_depth -= 1;
        }
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/raster.rs"]
mod tests;
