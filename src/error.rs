//! Custom error types for pixbridge.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the pixbridge library.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to decode an image file.
    #[error("failed to load image from {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Failed to decode in-memory image bytes.
    #[error("failed to decode image bytes: {source}")]
    ImageDecode {
        #[source]
        source: image::ImageError,
    },

    /// Failed to encode or write an image file.
    #[error("failed to save image to {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Channel count other than 1, 3 or 4.
    #[error("unsupported channel count {channels} (expected 1, 3 or 4)")]
    UnsupportedChannels { channels: u32 },

    /// Pixel payload does not match `width * height * channels`.
    #[error("pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// A required path does not exist.
    #[error("path does not exist: {}", path.display())]
    MissingPath { path: PathBuf },

    /// A path that must be a directory is something else.
    #[error("not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// Save target rejected before any writing happened.
    #[error("invalid save path {}: {reason}", path.display())]
    InvalidSavePath { path: PathBuf, reason: String },

    /// Attempted to save the null visualization image.
    #[error("cannot save null visualization image to {}", path.display())]
    NullImage { path: PathBuf },

    /// Visualization support was not compiled in.
    #[error("visualization support is disabled (build with the `vis` feature)")]
    VisualizationDisabled,

    /// Failed to read a TOML config file.
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a TOML config file.
    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Invalid configuration value.
    #[error("invalid config {name}: {reason}")]
    InvalidConfig { name: String, reason: String },

    /// Failed to create (or clear) an output directory.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The inference engine reported a failure.
    #[error("inference engine error: {reason}")]
    Engine { reason: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for pixbridge operations.
pub type Result<T> = std::result::Result<T, Error>;
