#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{DynamicImage, GrayAlphaImage, Rgb, RgbImage, Rgba, RgbaImage};
use pixbridge::engine::{ForeignImage, InferResult, InferenceEngine, ResultMeta};
use pixbridge::image::decode_file;
use pixbridge::visual::{check_save_target, ImageSink, ImageSource, VisImage, VisPtr};

/// Project tree with configs, a small image batch and some non-image clutter.
pub fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let configs = root.join("assets/configs");
    let images = root.join("assets/images/small-batch");
    fs::create_dir_all(&configs).unwrap();
    fs::create_dir_all(&images).unwrap();

    fs::write(
        configs.join("online-predict.toml"),
        "[predict]\nmodel = \"assets/models/yolo.onnx\"\n\n[annotate]\nthickness = 1\n",
    )
    .unwrap();
    fs::write(
        configs.join("small-batch.toml"),
        "[predict]\nsource = \"assets/images/small-batch\"\nsave_dir = \"results/offline\"\n",
    )
    .unwrap();

    // Bright top row, so the lossy copy still tells top from bottom.
    let bus = RgbImage::from_fn(4, 3, |_, y| {
        if y == 0 {
            Rgb([255, 255, 255])
        } else {
            Rgb([0, 0, 0])
        }
    });
    DynamicImage::ImageRgb8(bus).save(images.join("bus.JPG")).unwrap();
    let mut boats = RgbaImage::new(3, 5);
    boats.put_pixel(0, 0, Rgba([9, 8, 7, 255]));
    DynamicImage::ImageRgba8(boats)
        .save(images.join("boats.png"))
        .unwrap();
    DynamicImage::ImageLumaA8(GrayAlphaImage::new(2, 2))
        .save(images.join("mask.png"))
        .unwrap();
    fs::write(images.join("notes.txt"), "not an image").unwrap();
    fs::write(images.join("README"), "no extension").unwrap();

    dir
}

/// Engine that echoes each input back as its annotated image.
#[derive(Default)]
pub struct EchoEngine {
    pub online_calls: RefCell<Vec<(usize, Option<PathBuf>)>>,
    pub offline_calls: RefCell<Vec<PathBuf>>,
}

impl InferenceEngine for EchoEngine {
    fn predict_from_toml(&self, config_toml: &Path) -> pixbridge::Result<()> {
        self.offline_calls.borrow_mut().push(config_toml.to_path_buf());
        Ok(())
    }

    fn online_predict_from_toml(
        &self,
        images: Vec<ForeignImage>,
        _config_toml: &Path,
        project_root: Option<&Path>,
    ) -> pixbridge::Result<Vec<InferResult>> {
        self.online_calls
            .borrow_mut()
            .push((images.len(), project_root.map(Path::to_path_buf)));
        let total_frames = images.len();
        Ok(images
            .into_iter()
            .enumerate()
            .map(|(frame_idx, image)| {
                let annotated = (!image.is_empty()).then(|| image.into_dynamic());
                InferResult::new(
                    annotated,
                    ResultMeta {
                        frame_idx,
                        total_frames,
                    },
                )
            })
            .collect())
    }
}

/// Source that decodes with the crate's own decoder and stores rows bottom-up.
pub struct DecodingSource;

impl ImageSource for DecodingSource {
    fn load(&self, path: &Path) -> Option<VisPtr> {
        let mut pixels = decode_file(path).ok()?;
        pixels.flip_vertical();
        let (w, h, c) = (pixels.width(), pixels.height(), pixels.channels());
        VisImage::from_scalars(w, h, c, pixels.into_raw())
            .ok()
            .map(Arc::new)
    }
}

/// Sink that enforces the save contract and records accepted paths without writing.
#[derive(Default)]
pub struct RecordingSink {
    pub saved: RefCell<Vec<PathBuf>>,
}

impl ImageSink for RecordingSink {
    fn save(&self, image: Option<&VisImage>, path: &Path) -> pixbridge::Result<()> {
        check_save_target(image, path)?;
        self.saved.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}
