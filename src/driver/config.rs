//! Driver configuration: which experiment to run and where its inputs live.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::engine::check_config_path;
use crate::error::{Error, Result};
use crate::fsutil::ensure_exists;

/// Named experiment, each backed by one engine config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Experiment {
    OneImage,
    SmallBatch,
    LargeBatch,
    UnbatchableModel,
    #[default]
    OnlinePredict,
    /// Online prediction with images loaded and saved through the visualization backend.
    VisualBatch,
}

impl Experiment {
    /// Engine config file name inside the config directory.
    #[must_use]
    pub const fn config_file(self) -> &'static str {
        match self {
            Self::OneImage => "one-image.toml",
            Self::SmallBatch => "small-batch.toml",
            Self::LargeBatch => "large-batch.toml",
            Self::UnbatchableModel => "unbatchable-model.toml",
            Self::OnlinePredict | Self::VisualBatch => "online-predict.toml",
        }
    }

    /// Whether the driver feeds in-memory images (and so needs an image directory).
    #[must_use]
    pub const fn is_online(self) -> bool {
        matches!(self, Self::OnlinePredict | Self::VisualBatch)
    }
}

/// Paths and experiment selection for one driver run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Root that relative paths below are resolved against.
    pub project_root: PathBuf,
    /// Directory holding the engine config files.
    pub config_dir: PathBuf,
    /// Images fed to the online experiments.
    pub image_dir: PathBuf,
    /// Where annotated images are written; recreated on every run.
    pub save_dir: Option<PathBuf>,
    pub experiment: Experiment,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            config_dir: PathBuf::from("assets/configs"),
            image_dir: PathBuf::from("assets/images/small-batch"),
            save_dir: Some(PathBuf::from("results/vis-api")),
            experiment: Experiment::default(),
        }
    }
}

impl DriverConfig {
    /// Default layout under `project_root`.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(project_root: P) -> Self {
        let mut config = Self {
            project_root: project_root.into(),
            ..Self::default()
        };
        config.resolve_paths();
        config
    }

    /// Load a driver config from a TOML file.
    ///
    /// A relative `project_root` is taken relative to the file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is not a readable `.toml` file or fails to parse.
    pub fn from_toml(path: &Path) -> Result<Self> {
        check_config_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        if config.project_root.is_relative() {
            if let Some(parent) = path.parent() {
                config.project_root = parent.join(&config.project_root);
            }
        }
        config.resolve_paths();
        Ok(config)
    }

    /// Join relative directories onto `project_root`.
    pub fn resolve_paths(&mut self) {
        self.config_dir = self.rooted(&self.config_dir);
        self.image_dir = self.rooted(&self.image_dir);
        self.save_dir = self.save_dir.as_deref().map(|dir| self.rooted(dir));
    }

    /// `path` as seen from `project_root`.
    #[must_use]
    pub fn rooted(&self, path: &Path) -> PathBuf {
        if path.is_relative() {
            self.project_root.join(path)
        } else {
            path.to_path_buf()
        }
    }

    /// Replace the image directory, resolving a relative path against `project_root`.
    pub fn set_image_dir<P: AsRef<Path>>(&mut self, dir: P) {
        self.image_dir = self.rooted(dir.as_ref());
    }

    /// Replace the save directory, resolving a relative path against `project_root`.
    pub fn set_save_dir<P: AsRef<Path>>(&mut self, dir: Option<P>) {
        self.save_dir = dir.map(|dir| self.rooted(dir.as_ref()));
    }

    /// Engine config for the selected experiment.
    #[must_use]
    pub fn config_toml(&self) -> PathBuf {
        self.config_dir.join(self.experiment.config_file())
    }

    /// Check that every input the selected experiment needs exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingPath`] naming the first missing path, or
    /// [`Error::InvalidConfig`] if recreating the save directory would remove an input.
    pub fn validate(&self) -> Result<()> {
        ensure_exists(&self.project_root)?;
        ensure_exists(&self.config_dir)?;
        ensure_exists(&self.config_toml())?;
        if self.experiment.is_online() {
            ensure_exists(&self.image_dir)?;
        }

        if let Some(save_dir) = &self.save_dir {
            // The save directory is wiped; refuse anything that contains the inputs.
            let inputs = [
                &self.project_root,
                &self.config_dir,
                &self.image_dir,
            ];
            if inputs.iter().any(|input| input.starts_with(save_dir)) {
                return Err(Error::InvalidConfig {
                    name: "save_dir".to_string(),
                    reason: format!(
                        "{} would remove the project inputs when recreated",
                        save_dir.display()
                    ),
                });
            }
        }

        Ok(())
    }
}
