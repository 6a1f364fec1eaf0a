//! The inference-engine surface consumed by the bridge and the drivers.
//!
//! Image handles and results are concrete types; running a model is behind
//! [`InferenceEngine`] so real engines and test doubles plug in the same way.

mod frame;
mod handle;
mod result;

pub use frame::{annotate_frame, FrameEngine, FrameStyle, SaveFormat};
pub use handle::{
    get_image_info, image_from_bytes, image_to_bytes, is_image_empty, ForeignImage, ImageInfo,
};
pub use result::{get_result_annotated, take_result_annotated, InferResult, ResultMeta};

use std::path::Path;

use crate::error::{Error, Result};

/// A batch/online inference engine driven by a TOML config file.
pub trait InferenceEngine {
    /// Fire-and-forget run over whatever the config file names.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is unusable or the run fails as a whole.
    fn predict_from_toml(&self, config_toml: &Path) -> Result<()>;

    /// Run inference on in-memory images.
    ///
    /// Takes ownership of `images` and returns one result per image, in input order.
    /// `project_root` anchors relative paths inside the config.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is unusable or the engine fails.
    fn online_predict_from_toml(
        &self,
        images: Vec<ForeignImage>,
        config_toml: &Path,
        project_root: Option<&Path>,
    ) -> Result<Vec<InferResult>>;
}

/// Check that `path` is an existing regular file with a `.toml` extension.
///
/// # Errors
///
/// Returns [`Error::MissingPath`] if it does not exist and [`Error::InvalidConfig`] if it
/// is not a `.toml` file.
pub fn check_config_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::MissingPath {
            path: path.to_path_buf(),
        });
    }
    if !path.is_file() || !path.extension().is_some_and(|ext| ext == "toml") {
        return Err(Error::InvalidConfig {
            name: path.display().to_string(),
            reason: "not a .toml file".to_string(),
        });
    }
    Ok(())
}
