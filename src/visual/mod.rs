//! Visualization-side images and the reader/writer capabilities.
//!
//! [`VisImage`] stores its scanlines bottom-up (row 0 is the bottommost scanline) and is
//! shared through [`VisPtr`]. `None` is the null image. Loading and saving go through the
//! [`ImageSource`] / [`ImageSink`] traits; the concrete [`Backend`] is picked at build time
//! by the `vis` feature.

#[cfg(not(feature = "vis"))]
mod absent;
#[cfg(feature = "vis")]
mod png;

#[cfg(not(feature = "vis"))]
pub use absent::AbsentBackend as Backend;
#[cfg(feature = "vis")]
pub use png::PngBackend as Backend;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::ProgressBar;

use crate::error::{Error, Result};
use crate::image::byte_len;
use crate::progress::progress_style;

/// Extension every saved visualization image must carry.
pub const SAVE_EXTENSION: &str = "png";

/// Shared handle to a visualization image.
pub type VisPtr = Arc<VisImage>;

/// 8-bit image with a bottom-left origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisImage {
    dimensions: [u32; 3],
    components: u32,
    scalars: Vec<u8>,
}

impl VisImage {
    /// Zero-filled image of the given size.
    #[must_use]
    pub fn allocate(width: u32, height: u32, components: u32) -> Self {
        let len = byte_len(width, height, components).unwrap_or(0);
        Self {
            dimensions: [width, height, 1],
            components,
            scalars: vec![0; len],
        }
    }

    /// Wrap bottom-up scalar bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSize`] if `scalars` is not `width * height * components` long.
    pub fn from_scalars(width: u32, height: u32, components: u32, scalars: Vec<u8>) -> Result<Self> {
        let expected = byte_len(width, height, components).ok_or(Error::BufferSize {
            expected: usize::MAX,
            actual: scalars.len(),
        })?;
        if scalars.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: scalars.len(),
            });
        }
        Ok(Self {
            dimensions: [width, height, 1],
            components,
            scalars,
        })
    }

    /// `[width, height, depth]`, depth is always 1.
    #[must_use]
    pub const fn dimensions(&self) -> [u32; 3] {
        self.dimensions
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.dimensions[0]
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.dimensions[1]
    }

    #[must_use]
    pub const fn scalar_components(&self) -> u32 {
        self.components
    }

    #[must_use]
    pub fn scalars(&self) -> &[u8] {
        &self.scalars
    }

    pub fn scalars_mut(&mut self) -> &mut [u8] {
        &mut self.scalars
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty()
    }
}

/// Reads image files into visualization images.
pub trait ImageSource {
    /// Load `path`, or `None` if no reader handles it or reading fails.
    fn load(&self, path: &Path) -> Option<VisPtr>;
}

/// Writes visualization images.
pub trait ImageSink {
    /// Write `image` to `path`.
    ///
    /// # Errors
    ///
    /// Implementations reject what [`check_save_target`] rejects and report write failures.
    fn save(&self, image: Option<&VisImage>, path: &Path) -> Result<()>;
}

/// Validate a save request before anything is written.
///
/// # Errors
///
/// Returns [`Error::NullImage`] for the null image and [`Error::InvalidSavePath`] unless the
/// path ends in `.png`.
pub fn check_save_target<'a>(image: Option<&'a VisImage>, path: &Path) -> Result<&'a VisImage> {
    let Some(image) = image else {
        return Err(Error::NullImage {
            path: path.to_path_buf(),
        });
    };
    if !path.extension().is_some_and(|ext| ext == SAVE_EXTENSION) {
        return Err(Error::InvalidSavePath {
            path: path.to_path_buf(),
            reason: format!("extension must be .{SAVE_EXTENSION}"),
        });
    }
    Ok(image)
}

/// Load every path through `source`, skipping missing and unreadable files.
///
/// Returns the loaded images paired with their paths, in input order.
pub fn gather_images(source: &dyn ImageSource, paths: &[PathBuf]) -> Vec<(PathBuf, VisPtr)> {
    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(progress_style());
    pb.set_message("Loading");

    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        pb.inc(1);
        if !path.exists() {
            tracing::warn!("Image not found: {}", path.display());
            continue;
        }
        let Some(image) = source.load(path) else {
            tracing::warn!("Failed to load visualization image: {}", path.display());
            continue;
        };
        tracing::debug!(
            "Loaded {}: {}x{}, components={}",
            path.display(),
            image.width(),
            image.height(),
            image.scalar_components()
        );
        images.push((path.clone(), image));
    }
    pb.finish_and_clear();

    images
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource;

    impl ImageSource for FixedSource {
        fn load(&self, path: &Path) -> Option<VisPtr> {
            (path.extension()? == "png").then(|| Arc::new(VisImage::allocate(2, 2, 3)))
        }
    }

    #[test]
    fn test_allocate_is_zeroed() {
        let img = VisImage::allocate(3, 2, 4);
        assert_eq!(img.dimensions(), [3, 2, 1]);
        assert_eq!(img.scalars().len(), 24);
        assert!(img.scalars().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_from_scalars_checks_length() {
        assert!(VisImage::from_scalars(2, 2, 1, vec![0; 4]).is_ok());
        assert!(VisImage::from_scalars(2, 2, 1, vec![0; 3]).is_err());
    }

    #[test]
    fn test_check_save_target() {
        let img = VisImage::allocate(1, 1, 3);
        assert!(check_save_target(Some(&img), Path::new("out.png")).is_ok());
        assert!(matches!(
            check_save_target(Some(&img), Path::new("out.jpg")),
            Err(Error::InvalidSavePath { .. })
        ));
        assert!(matches!(
            check_save_target(Some(&img), Path::new("out")),
            Err(Error::InvalidSavePath { .. })
        ));
        assert!(matches!(
            check_save_target(None, Path::new("out.png")),
            Err(Error::NullImage { .. })
        ));
    }

    #[test]
    fn test_gather_skips_missing_and_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let ok = dir.path().join("a.png");
        let unreadable = dir.path().join("b.bmp");
        std::fs::write(&ok, b"x").unwrap();
        std::fs::write(&unreadable, b"x").unwrap();
        let missing = dir.path().join("c.png");

        let loaded = gather_images(&FixedSource, &[ok.clone(), unreadable, missing]);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].0, ok);
    }
}
