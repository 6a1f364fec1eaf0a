//! PNG-backed visualization reader and writer.

use std::path::Path;
use std::sync::Arc;

use image::{ExtendedColorType, ImageFormat};

use crate::error::{Error, Result};
use crate::image::{dynamic_to_pixels, flip_vertical_inplace};

use super::{check_save_target, ImageSink, ImageSource, VisImage, VisPtr};

/// Reads any format the `image` crate recognises by extension; writes PNG only.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngBackend;

impl ImageSource for PngBackend {
    fn load(&self, path: &Path) -> Option<VisPtr> {
        if !path.is_file() {
            return None;
        }
        if ImageFormat::from_path(path).is_err() {
            tracing::warn!("No reader found for: {}", path.display());
            return None;
        }

        let img = match image::open(path) {
            Ok(img) => img,
            Err(err) => {
                tracing::warn!("Failed to read {}: {err}", path.display());
                return None;
            }
        };
        let pixels = dynamic_to_pixels(img).ok()?;
        if pixels.is_empty() {
            return None;
        }

        let (width, height, components) = (pixels.width(), pixels.height(), pixels.channels());
        let mut scalars = pixels.into_raw();
        flip_vertical_inplace(
            &mut scalars,
            width as usize,
            height as usize,
            components as usize,
        );
        VisImage::from_scalars(width, height, components, scalars)
            .ok()
            .map(Arc::new)
    }
}

impl ImageSink for PngBackend {
    fn save(&self, image: Option<&VisImage>, path: &Path) -> Result<()> {
        let image = check_save_target(image, path)?;

        let color = match image.scalar_components() {
            1 => ExtendedColorType::L8,
            2 => ExtendedColorType::La8,
            3 => ExtendedColorType::Rgb8,
            4 => ExtendedColorType::Rgba8,
            channels => return Err(Error::UnsupportedChannels { channels }),
        };

        // PNG scanlines run top to bottom.
        let mut rows = image.scalars().to_vec();
        flip_vertical_inplace(
            &mut rows,
            image.width() as usize,
            image.height() as usize,
            image.scalar_components() as usize,
        );

        image::save_buffer_with_format(
            path,
            &rows,
            image.width(),
            image.height(),
            color,
            ImageFormat::Png,
        )
        .map_err(|source| Error::ImageSave {
            path: path.to_path_buf(),
            source,
        })
    }
}
