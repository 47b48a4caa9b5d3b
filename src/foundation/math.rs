use crate::foundation::error::{ClashError, ClashResult};

pub(crate) fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = mul_div255(u16::from(px[0]), a) as u8;
        px[1] = mul_div255(u16::from(px[1]), a) as u8;
        px[2] = mul_div255(u16::from(px[2]), a) as u8;
    }
}

/// Composite premultiplied RGBA8 over an opaque background, producing opaque RGBA8.
pub(crate) fn flatten_premul_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src_premul: &[u8],
    bg_rgba: [u8; 4],
) -> ClashResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(ClashError::validation(
            "flatten_premul_over_bg_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = u16::from(bg_rgba[0]);
    let bg_g = u16::from(bg_rgba[1]);
    let bg_b = u16::from(bg_rgba[2]);

    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        d[0] = (u16::from(s[0]) + mul_div255(bg_r, inv)).min(255) as u8;
        d[1] = (u16::from(s[1]) + mul_div255(bg_g, inv)).min(255) as u8;
        d[2] = (u16::from(s[2]) + mul_div255(bg_b, inv)).min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
