//! Alpha flattening against an opaque background.
//!
//! Input pixels are straight (non-premultiplied) RGBA8. Per pixel:
//!
//! - `a == 0`: replaced by the background, fully opaque
//! - `a == 255`: unchanged
//! - otherwise: `c' = round(c * a/255 + bg * (1 - a/255))`, `a' = 255`
//!
//! The in-place RGBA form and the derived RGB form share [`blend_pixel`], so both produce the
//! same color values.

use crate::foundation::{
    core::RGBA_CHANNELS,
    error::{ExportError, ExportResult},
};

/// Opaque white, the default background.
pub const WHITE: [u8; 3] = [255, 255, 255];

/// Flatten one straight-alpha pixel over `bg`, returning an opaque pixel.
#[inline]
pub fn blend_pixel(px: [u8; 4], bg: [u8; 3]) -> [u8; 4] {
    match px[3] {
        0 => [bg[0], bg[1], bg[2], 255],
        255 => px,
        a => {
            let f = f32::from(a) / 255.0;
            let inv = 1.0 - f;
            let mix = |c: u8, b: u8| -> u8 {
                (f32::from(c) * f + f32::from(b) * inv)
                    .round()
                    .clamp(0.0, 255.0) as u8
            };
            [mix(px[0], bg[0]), mix(px[1], bg[1]), mix(px[2], bg[2]), 255]
        }
    }
}

/// Flatten an RGBA8 buffer in place. Every alpha byte is 255 afterwards.
pub fn flatten_rgba8_in_place(data: &mut [u8], bg: [u8; 3]) -> ExportResult<()> {
    if !data.len().is_multiple_of(RGBA_CHANNELS) {
        return Err(ExportError::validation(
            "flatten_rgba8_in_place expects a whole number of rgba8 pixels",
        ));
    }

    flatten_pixels(data, bg);
    Ok(())
}

/// Flatten every whole RGBA8 pixel of `data`. Callers guarantee the length.
pub(crate) fn flatten_pixels(data: &mut [u8], bg: [u8; 3]) {
    for px in data.chunks_exact_mut(RGBA_CHANNELS) {
        let out = blend_pixel([px[0], px[1], px[2], px[3]], bg);
        px.copy_from_slice(&out);
    }
}

/// Flatten `src` (RGBA8) into `dst` (RGB8), dropping the alpha byte.
pub fn flatten_rgba8_to_rgb8(dst: &mut [u8], src: &[u8], bg: [u8; 3]) -> ExportResult<()> {
    if !src.len().is_multiple_of(RGBA_CHANNELS) || dst.len() / 3 != src.len() / RGBA_CHANNELS {
        return Err(ExportError::validation(
            "flatten_rgba8_to_rgb8 expects matching rgba8/rgb8 pixel counts",
        ));
    }
    if !dst.len().is_multiple_of(3) {
        return Err(ExportError::validation(
            "flatten_rgba8_to_rgb8 expects a whole number of rgb8 pixels",
        ));
    }

    for (d, s) in dst.chunks_exact_mut(3).zip(src.chunks_exact(RGBA_CHANNELS)) {
        let out = blend_pixel([s[0], s[1], s[2], s[3]], bg);
        d.copy_from_slice(&out[..3]);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/composite/flatten.rs"]
mod tests;
