//! Move-only image handles owned by the inference engine.

use image::{DynamicImage, GenericImageView, GrayImage, RgbImage, RgbaImage};

use crate::error::{Error, Result};
use crate::image::{byte_len, is_supported_channels};

/// Width, height and channel count of a handle. All zero for the empty handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
}

/// An image held by the inference engine.
///
/// Deliberately not `Clone`: passing a handle moves it, and [`ForeignImage::duplicate`] is
/// the only way to get a second copy. The pixel store is always 8-bit gray, RGB or RGBA so
/// [`ImageInfo::channels`] is exact.
#[derive(Debug)]
pub struct ForeignImage {
    inner: DynamicImage,
}

impl ForeignImage {
    /// The empty (0x0) handle.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            inner: DynamicImage::new_rgba8(0, 0),
        }
    }

    /// Take ownership of a decoded image.
    ///
    /// Gray+alpha is widened to RGBA and deeper sample types are narrowed to 8 bits.
    #[must_use]
    pub fn from_dynamic(img: DynamicImage) -> Self {
        let inner = match img {
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => {
                img
            }
            other => match other.color().channel_count() {
                1 => DynamicImage::ImageLuma8(other.into_luma8()),
                3 => DynamicImage::ImageRgb8(other.into_rgb8()),
                _ => DynamicImage::ImageRgba8(other.into_rgba8()),
            },
        };
        Self { inner }
    }

    /// Explicit deep copy.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.width() == 0 || self.inner.height() == 0
    }

    #[must_use]
    pub fn info(&self) -> ImageInfo {
        if self.is_empty() {
            return ImageInfo::default();
        }
        let (width, height) = self.inner.dimensions();
        ImageInfo {
            width,
            height,
            channels: u32::from(self.inner.color().channel_count()),
        }
    }

    /// Copy of the pixel bytes, row-major with a top-left origin.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        if self.is_empty() {
            return Vec::new();
        }
        self.inner.as_bytes().to_vec()
    }

    #[must_use]
    pub const fn as_dynamic(&self) -> &DynamicImage {
        &self.inner
    }

    #[must_use]
    pub fn into_dynamic(self) -> DynamicImage {
        self.inner
    }
}

/// Build a handle from raw top-left-origin bytes.
///
/// A zero width, height or channel count yields the empty handle whatever `bytes` holds.
///
/// # Errors
///
/// - [`Error::UnsupportedChannels`] for channel counts other than 1, 3 or 4.
/// - [`Error::BufferSize`] if `bytes.len() != width * height * channels`.
pub fn image_from_bytes(bytes: &[u8], width: u32, height: u32, channels: u32) -> Result<ForeignImage> {
    if width == 0 || height == 0 || channels == 0 {
        return Ok(ForeignImage::empty());
    }
    if !is_supported_channels(channels) {
        return Err(Error::UnsupportedChannels { channels });
    }

    let expected = byte_len(width, height, channels).ok_or(Error::BufferSize {
        expected: usize::MAX,
        actual: bytes.len(),
    })?;
    if bytes.len() != expected {
        return Err(Error::BufferSize {
            expected,
            actual: bytes.len(),
        });
    }

    let pixels = bytes.to_vec();
    let inner = match channels {
        1 => GrayImage::from_raw(width, height, pixels).map(DynamicImage::ImageLuma8),
        3 => RgbImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgb8),
        _ => RgbaImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgba8),
    }
    .ok_or(Error::BufferSize {
        expected,
        actual: bytes.len(),
    })?;

    Ok(ForeignImage { inner })
}

/// Copy the pixel bytes out of a handle.
#[must_use]
pub fn image_to_bytes(image: &ForeignImage) -> Vec<u8> {
    image.to_bytes()
}

#[must_use]
pub fn get_image_info(image: &ForeignImage) -> ImageInfo {
    image.info()
}

#[must_use]
pub fn is_image_empty(image: &ForeignImage) -> bool {
    image.is_empty()
}
