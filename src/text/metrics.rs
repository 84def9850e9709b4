use crate::foundation::error::{PlotError, PlotResult};

/// Text measurement capability injected into a plot.
///
/// Returns the `(width, height)` extent in pixels of a single-line run at
/// the given font size. Implementations must be deterministic for a given
/// input so layout stays reproducible.
pub trait TextMeasure: Send {
    /// Measure `text` rendered at `size_px`.
    fn measure(&mut self, text: &str, size_px: f64) -> (f64, f64);
}

/// Deterministic fallback metrics: a fixed advance fraction per character.
///
/// This is the default capability; it keeps layout math reproducible in
/// tests and in hosts that never inject a real font.
#[derive(Clone, Copy, Debug)]
pub struct ApproxMetrics {
    /// Horizontal advance per character as a fraction of the font size.
    pub advance_factor: f64,
}

impl Default for ApproxMetrics {
    fn default() -> Self {
        Self {
            advance_factor: 0.6,
        }
    }
}

impl TextMeasure for ApproxMetrics {
    fn measure(&mut self, text: &str, size_px: f64) -> (f64, f64) {
        let n = text.chars().count() as f64;
        (n * self.advance_factor * size_px, size_px)
    }
}

/// Brush type threaded through parley layouts. The engine colors runs at
/// draw time, so the brush carries no data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LabelBrush;

/// Parley-backed shaping engine built from host-injected font bytes.
pub struct ParleyMetrics {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<LabelBrush>,
    family: String,
    font_bytes: Vec<u8>,
    fallback: ApproxMetrics,
}

impl ParleyMetrics {
    /// Register the given font bytes and build a shaping engine around the
    /// first family they provide.
    pub fn new(font_bytes: Vec<u8>) -> PlotResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| PlotError::text("no font families registered from font bytes"))?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PlotError::text("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
            font_bytes,
            fallback: ApproxMetrics::default(),
        })
    }

    /// The raw font bytes this engine was built from.
    pub fn font_bytes(&self) -> &[u8] {
        &self.font_bytes
    }

    /// Shape and lay out a single-line run.
    pub fn layout_plain(
        &mut self,
        text: &str,
        size_px: f64,
    ) -> PlotResult<parley::Layout<LabelBrush>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PlotError::text("text size must be finite and > 0"));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px as f32));
        builder.push_default(parley::style::StyleProperty::Brush(LabelBrush));

        let mut layout: parley::Layout<LabelBrush> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

impl TextMeasure for ParleyMetrics {
    fn measure(&mut self, text: &str, size_px: f64) -> (f64, f64) {
        match self.layout_plain(text, size_px) {
            Ok(layout) if layout.width() > 0.0 => {
                (f64::from(layout.width()), f64::from(layout.height()))
            }
            _ => {
                tracing::warn!(text, "text shaping produced no extent, using approximate metrics");
                self.fallback.measure(text, size_px)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text_metrics.rs"]
mod tests;
