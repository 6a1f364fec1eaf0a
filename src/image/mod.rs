//! Canonical pixel buffers, scanline flips and decoding.

mod flip;
mod load;
mod save;

pub use flip::{flip_vertical, flip_vertical_inplace};
pub use load::{decode_bytes, decode_file, dynamic_to_pixels};
pub use save::save_image;

use crate::error::{Error, Result};

/// Channel counts accepted by the inference engine and the bridge.
pub const SUPPORTED_CHANNELS: [u32; 3] = [1, 3, 4];

/// Whether `channels` is one of [`SUPPORTED_CHANNELS`].
#[must_use]
pub fn is_supported_channels(channels: u32) -> bool {
    SUPPORTED_CHANNELS.contains(&channels)
}

/// Number of bytes in a `width * height * channels` grid, `None` on overflow.
#[must_use]
pub fn byte_len(width: u32, height: u32, channels: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(channels as usize)
}

/// Row-major 8-bit pixel grid with a top-left origin (row 0 is the topmost scanline).
///
/// `data.len() == width * height * channels` always holds. A grid with no bytes is
/// normalized to the empty sentinel (`0 x 0 x 0`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw bytes, checking the length invariant.
    ///
    /// The channel count is not gated here: the decoder may produce 2-channel buffers and
    /// it is up to the consumer to skip them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSize`] if `data` does not hold exactly
    /// `width * height * channels` bytes.
    pub fn new(width: u32, height: u32, channels: u32, data: Vec<u8>) -> Result<Self> {
        let expected = byte_len(width, height, channels).ok_or(Error::BufferSize {
            expected: usize::MAX,
            actual: data.len(),
        })?;
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        if expected == 0 {
            return Ok(Self::empty());
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// The empty sentinel.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            channels: 0,
            data: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub const fn channels(&self) -> u32 {
        self.channels
    }

    /// Length of one scanline in bytes.
    #[must_use]
    pub const fn row_len(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Whether the engine accepts this buffer's channel count.
    #[must_use]
    pub fn has_supported_channels(&self) -> bool {
        is_supported_channels(self.channels)
    }

    /// Reverse the scanline order in place.
    pub fn flip_vertical(&mut self) {
        flip_vertical_inplace(
            &mut self.data,
            self.width as usize,
            self.height as usize,
            self.channels as usize,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_length() {
        assert!(PixelBuffer::new(2, 2, 3, vec![0; 12]).is_ok());
        let err = PixelBuffer::new(2, 2, 3, vec![0; 11]).unwrap_err();
        assert!(matches!(
            err,
            Error::BufferSize {
                expected: 12,
                actual: 11
            }
        ));
    }

    #[test]
    fn test_zero_sized_normalizes_to_empty() {
        let buf = PixelBuffer::new(0, 7, 3, Vec::new()).unwrap();
        assert!(buf.is_empty());
        assert_eq!((buf.width(), buf.height(), buf.channels()), (0, 0, 0));
        assert_eq!(buf, PixelBuffer::empty());
    }

    #[test]
    fn test_supported_channels() {
        for c in [1, 3, 4] {
            assert!(is_supported_channels(c));
        }
        for c in [0, 2, 5] {
            assert!(!is_supported_channels(c));
        }
    }

    #[test]
    fn test_flip_reverses_rows() {
        let mut buf = PixelBuffer::new(1, 3, 1, vec![1, 2, 3]).unwrap();
        buf.flip_vertical();
        assert_eq!(buf.as_bytes(), &[3, 2, 1]);
    }
}
