//! `pixbridge` CLI - run one image-bridge experiment against the built-in engine.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pixbridge::engine::FrameEngine;
use pixbridge::visual::Backend;
use pixbridge::{driver, DriverConfig, Error, Experiment};

/// Run an image-bridge experiment.
#[derive(Parser, Debug)]
#[command(name = "pixbridge")]
#[command(version, about, long_about = None)]
struct Args {
    /// Experiment to run. Overrides the driver config file when given.
    #[arg(value_enum, value_name = "EXPERIMENT")]
    experiment: Option<Experiment>,

    /// Project root holding `assets/configs` and `assets/images` [default: .].
    #[arg(long, value_name = "DIR", conflicts_with = "config")]
    project_root: Option<PathBuf>,

    /// Driver config TOML. Its `project_root` replaces --project-root.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Image directory for the online experiments, relative to the project root.
    #[arg(long, value_name = "DIR")]
    image_dir: Option<PathBuf>,

    /// Directory for annotated images, relative to the project root. It is deleted and
    /// recreated.
    #[arg(long, value_name = "DIR")]
    save_dir: Option<PathBuf>,

    /// Do not save annotated images.
    #[arg(long, conflicts_with = "save_dir")]
    no_save: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("pixbridge={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(&args) {
        if let Some(Error::MissingPath { path }) = err.downcast_ref::<Error>() {
            eprintln!("Error: Path does not exist: {}", path.display());
        }
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(args: &Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => DriverConfig::from_toml(path)
            .with_context(|| format!("Failed to load driver config: {}", path.display()))?,
        None => DriverConfig::new(args.project_root.clone().unwrap_or_else(|| ".".into())),
    };

    if let Some(experiment) = args.experiment {
        config.experiment = experiment;
    }
    if let Some(image_dir) = &args.image_dir {
        config.set_image_dir(image_dir);
    }
    if let Some(save_dir) = &args.save_dir {
        config.set_save_dir(Some(save_dir));
    }
    if args.no_save {
        config.set_save_dir(None::<PathBuf>);
    }

    let engine = FrameEngine::with_project_root(&config.project_root);
    let backend = Backend;

    let report = driver::run(&engine, &backend, &backend, &config)
        .with_context(|| format!("Experiment {:?} failed", config.experiment))?;

    println!("{report}");
    Ok(())
}
