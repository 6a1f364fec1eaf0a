//! Conversion between engine handles and visualization images.
//!
//! Handles store rows top-down, [`VisImage`] stores them bottom-up. Every conversion copies
//! the payload, flips the copy and builds a new object, so source and destination never
//! share storage.

use std::sync::Arc;

use crate::engine::{
    get_image_info, image_from_bytes, image_to_bytes, ForeignImage, InferResult,
};
use crate::error::Result;
use crate::image::flip_vertical_inplace;
use crate::visual::{VisImage, VisPtr};

/// How to read the annotated image out of an [`InferResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// Copy it, leaving the result untouched.
    Clone,
    /// Move it out; the result holds nothing afterwards.
    Take,
}

impl Extraction {
    #[must_use]
    pub const fn from_take(take: bool) -> Self {
        if take {
            Self::Take
        } else {
            Self::Clone
        }
    }
}

/// Convert a handle to a visualization image without consuming it.
///
/// Returns `None` for an empty handle.
#[must_use]
pub fn to_visualization(handle: &ForeignImage) -> Option<VisPtr> {
    let info = get_image_info(handle);
    let mut bytes = image_to_bytes(handle);
    if bytes.is_empty() {
        return None;
    }

    flip_vertical_inplace(
        &mut bytes,
        info.width as usize,
        info.height as usize,
        info.channels as usize,
    );

    let mut vis = VisImage::allocate(info.width, info.height, info.channels);
    vis.scalars_mut().copy_from_slice(&bytes);
    Some(Arc::new(vis))
}

/// Convert a visualization image to a new handle.
///
/// The null image (and a zero-sized one) maps to the empty handle.
///
/// # Errors
///
/// Returns [`crate::Error::UnsupportedChannels`] if the image has a component count the
/// engine does not accept.
pub fn from_visualization(image: Option<&VisImage>) -> Result<ForeignImage> {
    let Some(image) = image else {
        tracing::warn!("Visualization image is null, returning empty handle");
        return Ok(ForeignImage::empty());
    };
    if image.is_empty() {
        return Ok(ForeignImage::empty());
    }

    let [width, height, _] = image.dimensions();
    let channels = image.scalar_components();
    let mut bytes = image.scalars().to_vec();
    flip_vertical_inplace(&mut bytes, width as usize, height as usize, channels as usize);

    image_from_bytes(&bytes, width, height, channels)
}

/// Convert each handle in order. Empty handles map to `None` so indices stay aligned.
#[must_use]
pub fn batch_to_visualization(handles: &[ForeignImage]) -> Vec<Option<VisPtr>> {
    handles.iter().map(to_visualization).collect()
}

/// Convert each image in order, dropping (and logging) the ones that fail.
#[must_use]
pub fn batch_from_visualization(images: &[VisPtr]) -> Vec<ForeignImage> {
    images
        .iter()
        .enumerate()
        .filter_map(|(idx, image)| match from_visualization(Some(&**image)) {
            Ok(handle) => Some(handle),
            Err(err) => {
                tracing::warn!("Skipping visualization image {idx}: {err}");
                None
            }
        })
        .collect()
}

/// Read the annotated image out of `result`.
///
/// With [`Extraction::Take`] the result is left empty and every later extraction returns the
/// empty handle.
pub fn extract_annotated(result: &mut InferResult, mode: Extraction) -> ForeignImage {
    match mode {
        Extraction::Clone => result.annotated(),
        Extraction::Take => result.take_annotated(),
    }
}

/// Cloning read of the annotated image, as a visualization image.
#[must_use]
pub fn get_annotated(result: &InferResult) -> Option<VisPtr> {
    to_visualization(&result.annotated())
}

/// Taking read of the annotated image, as a visualization image.
pub fn take_annotated(result: &mut InferResult) -> Option<VisPtr> {
    to_visualization(&result.take_annotated())
}

/// [`get_annotated`] over a batch, one entry per result.
#[must_use]
pub fn batch_annotated(results: &[InferResult]) -> Vec<Option<VisPtr>> {
    results.iter().map(get_annotated).collect()
}
