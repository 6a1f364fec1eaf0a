//! # `pixbridge`
//!
//! Bridges three image representations so an external inference engine can be driven from
//! small experiment programs:
//!
//! - [`PixelBuffer`](crate::image::PixelBuffer): decoded bytes, row-major, top-left origin.
//! - [`engine::ForeignImage`]: a move-only handle owned by the inference engine.
//! - [`visual::VisImage`]: a bottom-left-origin image owned by the visualization side.
//!
//! The [`bridge`] module converts between handles and visualization images (flipping
//! scanlines on the way) and extracts annotated images from [`engine::InferResult`]s with
//! either a cloning or a taking read.
//!
//! ## Example
//!
//! ```
//! use pixbridge::bridge::{from_visualization, to_visualization};
//! use pixbridge::engine::image_from_bytes;
//!
//! # fn main() -> pixbridge::Result<()> {
//! let handle = image_from_bytes(&[1, 2, 3, 4, 5, 6], 1, 2, 3)?;
//! let vis = to_visualization(&handle).expect("non-empty handle");
//! assert_eq!(vis.scalars(), &[4, 5, 6, 1, 2, 3]);
//!
//! let back = from_visualization(Some(&*vis))?;
//! assert_eq!(back.to_bytes(), handle.to_bytes());
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod driver;
pub mod engine;
pub mod error;
pub mod fsutil;
pub mod image;
pub mod visual;

mod progress;

pub use error::{Error, Result};
pub use driver::{DriverConfig, Experiment};
