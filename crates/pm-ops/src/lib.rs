pub mod convolve;
pub mod dither;
/// Image operations for pixmill.
///
/// Tonal adjustments, dithering, kernel filters and geometric resampling on
/// `pm_core::Image`, plus the step dispatcher that runs a `PipelineConfig`.
pub mod pipeline;
pub mod point;
pub mod resample;
