use anyhow::Context;
use image::{ExtendedColorType, ImageEncoder};

use crate::buffer::rgba::RgbaBuffer;
use crate::encode::format::{DEFAULT_JPEG_QUALITY, EncodeOptions, ImageMime};
use crate::foundation::error::{FimError, FimResult};
use crate::foundation::math::mul_div255_u8;

const PNG_MAGIC: [u8; 4] = [0x89, 0x50, 0x4E, 0x47];
const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Encode a straight-alpha RGBA buffer with the requested format.
///
/// JPEG has no alpha channel; pixels are flattened onto black first.
pub fn encode_rgba(pixels: &RgbaBuffer, opts: &EncodeOptions) -> FimResult<Vec<u8>> {
    let (width, height) = (pixels.width(), pixels.height());
    let mut buf = Vec::new();
    match opts.format {
        ImageMime::Png => {
            image::codecs::png::PngEncoder::new(&mut buf)
                .write_image(pixels.as_bytes(), width, height, ExtendedColorType::Rgba8)
                .map_err(|e| FimError::unsupported_format(format!("png encode failed: {e}")))?;
        }
        ImageMime::Jpeg => {
            let quality = jpeg_quality(opts.quality)?;
            let rgb = flatten_onto_black(pixels.as_bytes());
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality)
                .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
                .map_err(|e| FimError::unsupported_format(format!("jpeg encode failed: {e}")))?;
        }
    }
    tracing::debug!(
        format = %opts.format,
        width,
        height,
        bytes = buf.len(),
        "encoded image"
    );
    Ok(buf)
}

/// Decode PNG or JPEG bytes into a straight-alpha RGBA buffer.
pub fn decode_image(bytes: &[u8]) -> FimResult<RgbaBuffer> {
    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(|e| FimError::decode(format!("{e:#}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    RgbaBuffer::from_raw(width, height, rgba.into_raw())
}

/// Identify an encoded buffer by its magic number.
pub fn sniff_mime(bytes: &[u8]) -> Option<ImageMime> {
    if bytes.starts_with(&PNG_MAGIC) {
        Some(ImageMime::Png)
    } else if bytes.starts_with(&JPEG_MAGIC) {
        Some(ImageMime::Jpeg)
    } else {
        None
    }
}

/// Map a `0..=1` quality onto the encoder's `1..=100` scale.
pub(crate) fn jpeg_quality(quality: Option<f64>) -> FimResult<u8> {
    let q = quality.unwrap_or(DEFAULT_JPEG_QUALITY);
    if !q.is_finite() || !(0.0..=1.0).contains(&q) {
        return Err(FimError::unsupported_format(format!(
            "jpeg quality {q} outside 0..=1"
        )));
    }
    Ok(((q * 100.0).round() as u8).max(1))
}

fn flatten_onto_black(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let a = u16::from(px[3]);
        rgb.push(mul_div255_u8(u16::from(px[0]), a));
        rgb.push(mul_div255_u8(u16::from(px[1]), a));
        rgb.push(mul_div255_u8(u16::from(px[2]), a));
    }
    rgb
}

#[cfg(test)]
#[path = "../../tests/unit/encode/codec.rs"]
mod tests;
