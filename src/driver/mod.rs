//! Experiment drivers sequencing decode, bridge and engine calls.

mod config;
mod online;
mod visual;

pub use config::{DriverConfig, Experiment};
pub use online::{gather_handles, run_online, OnlineSummary};
pub use visual::{check_empty_image, run_visual_batch, VisualSummary};

use std::fmt;

use crate::engine::{check_config_path, InferenceEngine};
use crate::error::{Error, Result};
use crate::fsutil::ensure_exists;
use crate::visual::{ImageSink, ImageSource};

/// What a driver run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Offline,
    Online(OnlineSummary),
    Visual(VisualSummary),
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offline => write!(f, "offline prediction finished"),
            Self::Online(summary) => write!(f, "online prediction: {summary}"),
            Self::Visual(summary) => write!(f, "visual batch: {summary}"),
        }
    }
}

/// Engines return exactly one result per input image.
fn check_result_count(inputs: usize, results: usize) -> Result<()> {
    if inputs == results {
        Ok(())
    } else {
        Err(Error::Engine {
            reason: format!("returned {results} result(s) for {inputs} image(s)"),
        })
    }
}

/// Hand the experiment's config file to the engine's batch entry point.
///
/// # Errors
///
/// Returns [`crate::Error::MissingPath`] if the config directory or file is missing, or
/// whatever the engine reports.
pub fn run_offline(engine: &dyn InferenceEngine, config: &DriverConfig) -> Result<()> {
    ensure_exists(&config.config_dir)?;
    let config_toml = config.config_toml();
    check_config_path(&config_toml)?;

    tracing::info!("Using config: {}", config_toml.display());
    engine.predict_from_toml(&config_toml)
}

/// Validate `config` and run its experiment.
///
/// # Errors
///
/// Returns the first missing input path, or any error the selected driver returns.
pub fn run(
    engine: &dyn InferenceEngine,
    source: &dyn ImageSource,
    sink: &dyn ImageSink,
    config: &DriverConfig,
) -> Result<Report> {
    config.validate()?;

    match config.experiment {
        Experiment::OnlinePredict => run_online(engine, config).map(Report::Online),
        Experiment::VisualBatch => run_visual_batch(engine, source, sink, config).map(Report::Visual),
        Experiment::OneImage
        | Experiment::SmallBatch
        | Experiment::LargeBatch
        | Experiment::UnbatchableModel => run_offline(engine, config).map(|()| Report::Offline),
    }
}
