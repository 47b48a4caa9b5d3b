use std::sync::Arc;

use crate::foundation::core::Canvas;
use crate::foundation::error::{ClashError, ClashResult};

/// A rendered frame as RGBA8 pixels.
///
/// Frames produced by [`FrameCanvas`] are premultiplied; the flag makes this explicit at API
/// boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA8 of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// The single drawing surface reused for every frame.
///
/// [`FrameCanvas::begin`] resets all drawing state, so each frame is a full redraw.
pub struct FrameCanvas {
    canvas: Canvas,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
}

impl FrameCanvas {
    /// Allocate a canvas; both dimensions must fit in `u16`.
    pub fn new(canvas: Canvas) -> ClashResult<Self> {
        let (w, h) = canvas_dims_u16(canvas)?;
        Ok(Self {
            canvas,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    /// Canvas dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Reset and hand out the render context for a new frame.
    pub fn begin(&mut self) -> &mut vello_cpu::RenderContext {
        self.ctx.reset();
        &mut self.ctx
    }

    /// Rasterize everything drawn since [`FrameCanvas::begin`] and read the pixels back.
    pub fn finish(&mut self) -> FrameRGBA {
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

fn canvas_dims_u16(canvas: Canvas) -> ClashResult<(u16, u16)> {
    if canvas.width == 0 || canvas.height == 0 {
        return Err(ClashError::validation("canvas width/height must be non-zero"));
    }
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| ClashError::validation("canvas width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| ClashError::validation("canvas height exceeds u16"))?;
    Ok((w, h))
}

/// Wrap premultiplied RGBA8 bytes as an image paint.
pub(crate) fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> ClashResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ClashResult<vello_cpu::Pixmap> {
    let canvas = Canvas { width, height };
    let (w, h) = canvas_dims_u16(canvas)?;
    if bytes.len() != canvas.rgba8_len() {
        return Err(ClashError::render("pixmap byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    let may_have_opacities = bytes.chunks_exact(4).any(|px| px[3] != 255);
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}
