//! Online prediction through the visualization backend.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::bridge::{batch_annotated, batch_from_visualization, to_visualization};
use crate::engine::{ForeignImage, InferenceEngine};
use crate::error::Result;
use crate::fsutil::{clean_and_create_dir, list_image_paths};
use crate::image::is_supported_channels;
use crate::visual::{gather_images, ImageSink, ImageSource, VisPtr, SAVE_EXTENSION};

use super::DriverConfig;

/// Counts reported by [`run_visual_batch`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisualSummary {
    /// Whether the empty handle converted to the null image.
    pub empty_image_ok: bool,
    /// Image files found in the image directory.
    pub found: usize,
    /// Images the source loaded.
    pub loaded: usize,
    /// Loaded images skipped for an unsupported component count.
    pub skipped: usize,
    /// Handles handed to the engine.
    pub converted: usize,
    /// Results returned by the engine.
    pub results: usize,
    /// Results that carried an annotated image.
    pub annotated: usize,
    /// Images written by the sink.
    pub saved: usize,
    /// Save requests the sink rejected or failed.
    pub save_failures: usize,
}

impl fmt::Display for VisualSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "empty-image check {}, found {}, loaded {}, skipped {}, converted {}, results {}, \
             annotated {}, saved {}, save failures {}",
            if self.empty_image_ok { "passed" } else { "failed" },
            self.found,
            self.loaded,
            self.skipped,
            self.converted,
            self.results,
            self.annotated,
            self.saved,
            self.save_failures
        )
    }
}

/// Convert the empty handle and report whether the null image came back.
#[must_use]
pub fn check_empty_image() -> bool {
    let passed = to_visualization(&ForeignImage::empty()).is_none();
    if passed {
        tracing::info!("Empty handle converts to the null visualization image");
    } else {
        tracing::error!("Empty handle produced a visualization image");
    }
    passed
}

/// File stem for result `idx`: the source stem when results line up with `sources`,
/// `frame_<idx>` otherwise.
fn output_stem(sources: &[PathBuf], result_count: usize, idx: usize) -> String {
    if sources.len() == result_count {
        if let Some(stem) = sources.get(idx).and_then(|p| p.file_stem()) {
            return stem.to_string_lossy().into_owned();
        }
    }
    format!("frame_{idx}")
}

fn save_all(
    sink: &dyn ImageSink,
    annotated: &[Option<VisPtr>],
    sources: &[PathBuf],
    save_dir: &Path,
    summary: &mut VisualSummary,
) {
    tracing::info!("Saving annotated images to: {}", save_dir.display());
    for (idx, image) in annotated.iter().enumerate() {
        let stem = output_stem(sources, annotated.len(), idx);
        let save_path = save_dir.join(format!("{stem}.{SAVE_EXTENSION}"));
        match sink.save(image.as_deref(), &save_path) {
            Ok(()) => {
                tracing::info!("Saved: {}", save_path.display());
                summary.saved += 1;
            }
            Err(err) => {
                tracing::error!("{err}");
                summary.save_failures += 1;
            }
        }
    }
}

/// Load the image directory through `source`, bridge to engine handles, run online
/// prediction and save the annotated images through `sink`.
///
/// The save directory, when configured, is recreated empty before anything is loaded.
///
/// # Errors
///
/// Returns an error if the directories are unusable or the engine fails. Per-image load,
/// conversion and save problems are logged and counted instead.
pub fn run_visual_batch(
    engine: &dyn InferenceEngine,
    source: &dyn ImageSource,
    sink: &dyn ImageSink,
    config: &DriverConfig,
) -> Result<VisualSummary> {
    let mut summary = VisualSummary {
        empty_image_ok: check_empty_image(),
        ..VisualSummary::default()
    };

    let config_toml = config.config_toml();
    let paths = list_image_paths(&config.image_dir)?;
    summary.found = paths.len();
    tracing::info!("Found {} image files", summary.found);

    if let Some(save_dir) = &config.save_dir {
        clean_and_create_dir(save_dir)?;
    }

    let loaded = gather_images(source, &paths);
    summary.loaded = loaded.len();
    tracing::info!("Loaded {} visualization image(s)", summary.loaded);

    let (sources, images): (Vec<PathBuf>, Vec<VisPtr>) = loaded
        .into_iter()
        .filter(|(path, image)| {
            let supported = is_supported_channels(image.scalar_components());
            if !supported {
                tracing::warn!(
                    "Skipped {}: unsupported channel count {}",
                    path.display(),
                    image.scalar_components()
                );
            }
            supported
        })
        .unzip();
    summary.skipped = summary.loaded - images.len();

    let handles = batch_from_visualization(&images);
    summary.converted = handles.len();
    tracing::info!("Converted {} image(s) to engine handles", summary.converted);

    if handles.is_empty() {
        tracing::warn!("No valid images to process");
        return Ok(summary);
    }

    let results =
        engine.online_predict_from_toml(handles, &config_toml, Some(&config.project_root))?;
    summary.results = results.len();
    super::check_result_count(summary.converted, summary.results)?;

    let annotated = batch_annotated(&results);
    summary.annotated = annotated.iter().filter(|a| a.is_some()).count();
    tracing::info!("Obtained {} annotated image(s)", summary.annotated);

    if let Some(save_dir) = &config.save_dir {
        // Conversion may have dropped images, in which case names fall back to frame indices.
        let sources = if summary.converted == sources.len() {
            sources
        } else {
            Vec::new()
        };
        save_all(sink, &annotated, &sources, save_dir, &mut summary);
    }

    tracing::info!("Batch prediction completed");
    Ok(summary)
}
