//! A self-contained engine that marks each image with a border.
//!
//! It stands in for a real model so the drivers can run end to end. Only the `[predict]`
//! `source`/`save_dir`/`save_format` keys and the `[annotate]` table are read; everything
//! else in the config belongs to other engines and is ignored.

use std::path::{Path, PathBuf};

use image::{DynamicImage, Rgb};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use indicatif::ProgressBar;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::fsutil::{ensure_exists, list_image_paths};
use crate::image::save_image;
use crate::progress::progress_style;

use super::{check_config_path, ForeignImage, InferResult, InferenceEngine, ResultMeta};

/// Border drawn around every annotated image.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FrameStyle {
    /// Border thickness in pixels.
    pub thickness: u32,
    /// RGB border colour.
    pub color: [u8; 3],
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            thickness: 2,
            color: [255, 0, 0],
        }
    }
}

/// Encoding of images written by batch prediction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveFormat {
    #[default]
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
}

impl SaveFormat {
    /// File extension written for this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PredictSection {
    source: Option<PathBuf>,
    save_dir: Option<PathBuf>,
    save_format: SaveFormat,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FrameConfig {
    predict: PredictSection,
    annotate: FrameStyle,
}

impl FrameConfig {
    fn from_toml(path: &Path) -> Result<Self> {
        check_config_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Draw `style`'s border onto a copy of `img`. The result is always RGB.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn annotate_frame(img: &DynamicImage, style: &FrameStyle) -> DynamicImage {
    let mut rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return DynamicImage::ImageRgb8(rgb);
    }

    // Each ring shrinks by one pixel per side; stop before a ring would have no area.
    let rings = style
        .thickness
        .min(width.div_ceil(2))
        .min(height.div_ceil(2));
    for i in 0..rings {
        let rect = Rect::at(i as i32, i as i32).of_size(width - 2 * i, height - 2 * i);
        draw_hollow_rect_mut(&mut rgb, rect, Rgb(style.color));
    }

    DynamicImage::ImageRgb8(rgb)
}

/// Engine that annotates images with a [`FrameStyle`] border.
#[derive(Debug, Clone, Default)]
pub struct FrameEngine {
    project_root: Option<PathBuf>,
}

impl FrameEngine {
    #[must_use]
    pub const fn new() -> Self {
        Self { project_root: None }
    }

    /// Engine that resolves relative config paths against `root`.
    #[must_use]
    pub fn with_project_root<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            project_root: Some(root.into()),
        }
    }

    /// Relative paths resolve against the explicit root, then the engine's root, then the
    /// config file's directory.
    fn resolve(&self, path: &Path, root: Option<&Path>, config_toml: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        let base = root
            .or(self.project_root.as_deref())
            .or_else(|| config_toml.parent())
            .unwrap_or_else(|| Path::new("."));
        base.join(path)
    }
}

impl InferenceEngine for FrameEngine {
    fn predict_from_toml(&self, config_toml: &Path) -> Result<()> {
        let config = FrameConfig::from_toml(config_toml)?;

        let source = config
            .predict
            .source
            .as_deref()
            .ok_or_else(|| Error::InvalidConfig {
                name: "predict.source".to_string(),
                reason: "required for batch prediction".to_string(),
            })?;
        let source = self.resolve(source, None, config_toml);
        ensure_exists(&source)?;

        let paths = if source.is_dir() {
            list_image_paths(&source)?
        } else {
            vec![source]
        };

        let save_dir = config
            .predict
            .save_dir
            .as_deref()
            .map(|dir| self.resolve(dir, None, config_toml));
        if let Some(dir) = &save_dir {
            std::fs::create_dir_all(dir).map_err(|source| Error::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }

        tracing::info!("Predicting {} image(s) from {}", paths.len(), config_toml.display());

        let pb = ProgressBar::new(paths.len() as u64);
        pb.set_style(progress_style());
        pb.set_message("Predicting");

        let mut annotated_count = 0usize;
        for path in &paths {
            pb.inc(1);
            let img = match image::open(path) {
                Ok(img) => img,
                Err(err) => {
                    tracing::warn!("Skipping {}: {err}", path.display());
                    continue;
                }
            };
            let annotated = annotate_frame(&img, &config.annotate);
            annotated_count += 1;

            if let Some(dir) = &save_dir {
                let stem = path.file_stem().unwrap_or_default().to_string_lossy();
                let out = dir.join(format!("{stem}.{}", config.predict.save_format.extension()));
                if let Err(err) = save_image(&annotated, &out) {
                    tracing::warn!("{err}");
                }
            }
        }
        pb.finish_and_clear();

        tracing::info!("Annotated {annotated_count}/{} image(s)", paths.len());
        Ok(())
    }

    fn online_predict_from_toml(
        &self,
        images: Vec<ForeignImage>,
        config_toml: &Path,
        project_root: Option<&Path>,
    ) -> Result<Vec<InferResult>> {
        let config = FrameConfig::from_toml(config_toml)?;
        if let Some(root) = project_root.or(self.project_root.as_deref()) {
            tracing::debug!("Online prediction rooted at {}", root.display());
        }

        let total_frames = images.len();
        let results = images
            .into_iter()
            .enumerate()
            .map(|(frame_idx, image)| {
                let meta = ResultMeta {
                    frame_idx,
                    total_frames,
                };
                let annotated =
                    (!image.is_empty()).then(|| annotate_frame(image.as_dynamic(), &config.annotate));
                InferResult::new(annotated, meta)
            })
            .collect::<Vec<_>>();

        tracing::info!("Online prediction produced {} result(s)", results.len());
        Ok(results)
    }
}
