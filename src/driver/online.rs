//! Online prediction from decoded image files.

use std::fmt;
use std::path::PathBuf;

use indicatif::ProgressBar;

use crate::engine::{
    get_image_info, get_result_annotated, image_from_bytes, is_image_empty, take_result_annotated,
    ForeignImage, InferenceEngine,
};
use crate::error::Result;
use crate::fsutil::list_image_paths;
use crate::image::decode_file;
use crate::progress::progress_style;

use super::DriverConfig;

/// Counts reported by [`run_online`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnlineSummary {
    /// Image files found in the image directory.
    pub found: usize,
    /// Images handed to the engine.
    pub loaded: usize,
    /// Images skipped (decode failure or unsupported channel count).
    pub skipped: usize,
    /// Results returned by the engine.
    pub results: usize,
    /// Non-empty annotated images seen through the cloning read.
    pub cloned_non_empty: usize,
    /// Non-empty annotated images seen through the taking read.
    pub taken_non_empty: usize,
}

impl fmt::Display for OnlineSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "found {}, loaded {}, skipped {}, results {}, annotated (clone) {}, annotated (take) {}",
            self.found,
            self.loaded,
            self.skipped,
            self.results,
            self.cloned_non_empty,
            self.taken_non_empty
        )
    }
}

/// Decode `paths` into engine handles.
///
/// Files that fail to decode or have a channel count other than 1, 3 or 4 are skipped with
/// a warning. Returns the handles in input order and the number skipped.
pub fn gather_handles(paths: &[PathBuf]) -> (Vec<ForeignImage>, usize) {
    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(progress_style());
    pb.set_message("Decoding");

    let mut handles = Vec::with_capacity(paths.len());
    let mut skipped = 0;
    for path in paths {
        pb.inc(1);
        let pixels = match decode_file(path) {
            Ok(pixels) => pixels,
            Err(err) => {
                tracing::warn!("{err}");
                skipped += 1;
                continue;
            }
        };

        tracing::debug!(
            "Loaded {}: {}x{}, {} channel(s)",
            path.display(),
            pixels.width(),
            pixels.height(),
            pixels.channels()
        );

        if !pixels.has_supported_channels() {
            tracing::warn!(
                "Skipped {}: unsupported channel count {}",
                path.display(),
                pixels.channels()
            );
            skipped += 1;
            continue;
        }

        match image_from_bytes(
            pixels.as_bytes(),
            pixels.width(),
            pixels.height(),
            pixels.channels(),
        ) {
            Ok(handle) => handles.push(handle),
            Err(err) => {
                tracing::warn!("Skipped {}: {err}", path.display());
                skipped += 1;
            }
        }
    }
    pb.finish_and_clear();

    (handles, skipped)
}

/// Decode the image directory, run online prediction and read every result twice: once
/// with the cloning read, then with the taking read.
///
/// # Errors
///
/// Returns an error if the image directory cannot be listed or the engine fails. Per-image
/// problems are logged and counted instead.
pub fn run_online(engine: &dyn InferenceEngine, config: &DriverConfig) -> Result<OnlineSummary> {
    let config_toml = config.config_toml();
    tracing::info!("Using config: {}", config_toml.display());
    tracing::info!("Using image directory: {}", config.image_dir.display());

    let paths = list_image_paths(&config.image_dir)?;
    let mut summary = OnlineSummary {
        found: paths.len(),
        ..OnlineSummary::default()
    };

    let (handles, skipped) = gather_handles(&paths);
    summary.loaded = handles.len();
    summary.skipped = skipped;
    tracing::info!("Total valid images gathered: {}", summary.loaded);

    if handles.is_empty() {
        tracing::warn!("No valid images to process");
        return Ok(summary);
    }

    let mut results =
        engine.online_predict_from_toml(handles, &config_toml, Some(&config.project_root))?;
    summary.results = results.len();
    super::check_result_count(summary.loaded, summary.results)?;
    tracing::info!("Prediction completed. Results count: {}", summary.results);

    for (idx, result) in results.iter().enumerate() {
        let annotated = get_result_annotated(result);
        let info = get_image_info(&annotated);
        let empty = is_image_empty(&annotated);
        tracing::info!(
            "Result[{idx}] annotated (clone): {}x{}, channels={}, empty={empty}",
            info.width,
            info.height,
            info.channels
        );
        if !empty {
            summary.cloned_non_empty += 1;
        }
    }

    for (idx, result) in results.iter_mut().enumerate() {
        let annotated = take_result_annotated(result);
        let info = get_image_info(&annotated);
        let empty = is_image_empty(&annotated);
        tracing::info!(
            "Result[{idx}] annotated (take): {}x{}, channels={}, empty={empty}",
            info.width,
            info.height,
            info.channels
        );
        if !empty {
            summary.taken_non_empty += 1;
        }
    }

    Ok(summary)
}
