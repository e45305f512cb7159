/// Pixel model, image buffer, sampling and configuration for pixmill.
///
/// This crate contains the shared types used across the pixmill workspace:
/// the clamped RGBA `Pixel`, the owned `Image` raster with its
/// reflection-padded accessors and `SamplingMethod`, and the TOML pipeline
/// configuration.

pub mod boundary;
pub mod config;
pub mod error;
pub mod image;
pub mod kernel;
pub mod pixel;
pub mod sampler;

pub use config::{Operation, PipelineConfig};
pub use error::CoreError;
pub use image::Image;
pub use pixel::{Channel, Pixel, PixelSum};
pub use sampler::SamplingMethod;
