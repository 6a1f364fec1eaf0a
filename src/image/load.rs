//! Image decoding into canonical pixel buffers.

use std::path::Path;

use image::{DynamicImage, GenericImageView};

use crate::error::{Error, Result};

use super::PixelBuffer;

/// Decode an image file into a [`PixelBuffer`], keeping its native channel count.
///
/// 8-bit gray, gray+alpha, RGB and RGBA images map to 1, 2, 3 and 4 channels. Deeper
/// sample types are narrowed to 8 bits with the same channel count.
///
/// # Errors
///
/// Returns [`Error::ImageLoad`] if the file cannot be opened or decoded.
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<PixelBuffer> {
    let path = path.as_ref();

    let img = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    dynamic_to_pixels(img)
}

/// Decode an encoded image held in memory.
///
/// # Errors
///
/// Returns [`Error::ImageDecode`] if the format is unknown or the data is corrupt.
pub fn decode_bytes(bytes: &[u8]) -> Result<PixelBuffer> {
    let img = image::load_from_memory(bytes).map_err(|source| Error::ImageDecode { source })?;
    dynamic_to_pixels(img)
}

/// Unwrap a decoded image into raw top-left-origin bytes.
///
/// # Errors
///
/// Only fails if the decoder produced an inconsistent buffer.
pub fn dynamic_to_pixels(img: DynamicImage) -> Result<PixelBuffer> {
    let (width, height) = img.dimensions();

    let (channels, data) = match img {
        DynamicImage::ImageLuma8(buf) => (1, buf.into_raw()),
        DynamicImage::ImageLumaA8(buf) => (2, buf.into_raw()),
        DynamicImage::ImageRgb8(buf) => (3, buf.into_raw()),
        DynamicImage::ImageRgba8(buf) => (4, buf.into_raw()),
        other => match other.color().channel_count() {
            1 => (1, other.into_luma8().into_raw()),
            2 => (2, other.into_luma_alpha8().into_raw()),
            3 => (3, other.into_rgb8().into_raw()),
            _ => (4, other.into_rgba8().into_raw()),
        },
    };

    tracing::debug!("Decoded {width}x{height} image with {channels} channel(s)");

    PixelBuffer::new(width, height, channels, data)
}
