//! Inference results and annotated-image extraction.

use image::DynamicImage;

use super::handle::ForeignImage;

/// Position of a result within its run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultMeta {
    /// Frame index (0-based).
    pub frame_idx: usize,
    /// Frames in the run.
    pub total_frames: usize,
}

/// Output of one inference call, holding at most one annotated image.
#[derive(Debug)]
pub struct InferResult {
    annotated: Option<DynamicImage>,
    meta: ResultMeta,
}

impl InferResult {
    #[must_use]
    pub const fn new(annotated: Option<DynamicImage>, meta: ResultMeta) -> Self {
        Self { annotated, meta }
    }

    #[must_use]
    pub const fn meta(&self) -> ResultMeta {
        self.meta
    }

    /// Whether an annotated image is still stored.
    #[must_use]
    pub const fn has_annotated(&self) -> bool {
        self.annotated.is_some()
    }

    /// Cloning read. The stored image is left in place.
    ///
    /// Returns the empty handle if nothing is stored.
    #[must_use]
    pub fn annotated(&self) -> ForeignImage {
        self.annotated
            .clone()
            .map_or_else(ForeignImage::empty, ForeignImage::from_dynamic)
    }

    /// Taking read. Moves the stored image out, so later reads observe the empty handle.
    pub fn take_annotated(&mut self) -> ForeignImage {
        self.annotated
            .take()
            .map_or_else(ForeignImage::empty, ForeignImage::from_dynamic)
    }
}

#[must_use]
pub fn get_result_annotated(result: &InferResult) -> ForeignImage {
    result.annotated()
}

pub fn take_result_annotated(result: &mut InferResult) -> ForeignImage {
    result.take_annotated()
}
