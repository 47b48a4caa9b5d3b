use std::borrow::Cow;

use crate::foundation::core::Rgb8;
use crate::foundation::error::{ClashError, ClashResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgb8> for TextBrushRgba8 {
    fn from(c: Rgb8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: 255,
        }
    }
}

/// A registered font: what Parley shapes with and what `vello_cpu` rasterizes with.
#[derive(Clone)]
pub(crate) struct FontHandle {
    family: String,
    data: vello_cpu::peniko::FontData,
}

impl FontHandle {
    pub(crate) fn family(&self) -> &str {
        &self.family
    }
}

pub(crate) type TextLayout = parley::Layout<TextBrushRgba8>;

/// Stateful helper for building single-line Parley layouts from registered fonts.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Register font bytes once; the returned handle is reused for every layout.
    pub(crate) fn register_font(&mut self, font_bytes: Vec<u8>) -> ClashResult<FontHandle> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            ClashError::validation("no font families registered from font bytes")
        })?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ClashError::validation("registered font family has no name"))?
            .to_string();

        Ok(FontHandle {
            family,
            data: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0),
        })
    }

    /// Shape `text` on one unbroken line.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        font: &FontHandle,
        size_px: f32,
        color: Rgb8,
    ) -> ClashResult<TextLayout> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ClashError::validation("text size_px must be finite and > 0"));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(font.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(color.into()));

        let mut layout: TextLayout = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// Draw a layout with its top-left corner at `(x, y)`.
pub(crate) fn draw_layout(
    ctx: &mut vello_cpu::RenderContext,
    layout: &TextLayout,
    font: &FontHandle,
    x: f64,
    y: f64,
) {
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            // Positioned glyphs carry the pen advance and the line baseline.
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&font.data)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
