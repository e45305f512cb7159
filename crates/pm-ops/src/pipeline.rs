//! Step dispatcher: turns a validated [`PipelineConfig`] into calls on the
//! engine, threading the image and a single RNG through every step.

use pm_core::config::{Operation, PipelineConfig};
use pm_core::error::CoreError;
use pm_core::image::Image;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{convolve, dither, point, resample};

/// Apply one step. Geometric steps return a new image; the others mutate
/// `image` in place and hand it back.
///
/// The step is validated first, and size-dependent preconditions (scaled
/// dimensions, crop bounds) are checked against the current image, so no
/// engine assertion can fire from a user-supplied step.
///
/// # Errors
/// Returns an error if the step is invalid for this image.
///
/// # Example
/// ```
/// use pm_core::{Image, Operation, Pixel};
/// use pm_ops::pipeline::apply;
/// use rand::SeedableRng;
/// let mut rng = rand::rngs::StdRng::seed_from_u64(9);
/// let img = Image::filled(8, 8, Pixel::rgb(10, 20, 30));
/// let img = apply(img, &Operation::Scale { sx: 0.5, sy: 2.0 }, &mut rng).unwrap();
/// assert_eq!(img.dimensions(), (4, 16));
/// let bad = Operation::Crop { x: 2, y: 0, width: 4, height: 4 };
/// assert!(apply(img, &bad, &mut rng).is_err());
/// ```
pub fn apply<R: Rng + ?Sized>(
    mut image: Image,
    op: &Operation,
    rng: &mut R,
) -> Result<Image, CoreError> {
    op.validate()?;
    match *op {
        Operation::Brighten { factor } => point::brighten(&mut image, factor),
        Operation::Contrast { factor } => point::change_contrast(&mut image, factor),
        Operation::Saturation { factor } => point::change_saturation(&mut image, factor),
        Operation::Noise { factor } => point::add_noise_with(&mut image, factor, rng),
        Operation::ExtractChannel { channel } => point::extract_channel(&mut image, channel),
        Operation::Quantize { bits } => point::quantize(&mut image, bits),
        Operation::RandomDither { bits } => point::random_dither_with(&mut image, bits, rng),
        Operation::OrderedDither { bits } => dither::ordered_dither(&mut image, bits),
        Operation::FloydSteinberg { bits } => dither::floyd_steinberg_dither(&mut image, bits),
        Operation::Blur { radius } => convolve::blur(&mut image, radius),
        Operation::Sharpen { radius } => convolve::sharpen(&mut image, radius),
        Operation::EdgeDetect => convolve::edge_detect(&mut image),
        Operation::Scale { sx, sy } => {
            resample::scaled_dimensions(image.dimensions(), sx, sy)?;
            return Ok(resample::scale(&image, sx, sy));
        }
        Operation::Rotate { angle } => return Ok(resample::rotate(&image, angle)),
        Operation::Crop {
            x,
            y,
            width,
            height,
        } => {
            if !resample::crop_fits(&image, x, y, width, height) {
                return Err(CoreError::CropOutOfBounds {
                    x,
                    y,
                    width,
                    height,
                });
            }
            return Ok(resample::crop(&image, x, y, width, height));
        }
        Operation::Fun => resample::fun(&mut image),
        Operation::Sampling { method } => image.set_sampling_method(method),
    }
    Ok(image)
}

/// Run every step of `config` on `image`, in order.
///
/// The configured sampling method is set on the input first. Random steps
/// draw from one generator seeded with `config.seed`, or from entropy when
/// no seed is given.
///
/// # Errors
/// Returns the first failing step's error, prefixed with its 1-based
/// number (the one the log shows).
///
/// # Example
/// ```
/// use pm_core::{Image, Operation, Pixel, PipelineConfig};
/// use pm_ops::pipeline::run;
/// let config = PipelineConfig {
///     seed: Some(1),
///     steps: vec![Operation::Quantize { bits: 1 }],
///     ..PipelineConfig::default()
/// };
/// let out = run(Image::filled(4, 4, Pixel::rgb(128, 128, 128)), &config).unwrap();
/// assert!(out.pixels().iter().all(|&p| p == Pixel::WHITE));
/// ```
pub fn run(mut image: Image, config: &PipelineConfig) -> Result<Image, CoreError> {
    config.validate()?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::seed_from_u64(rand::random()),
    };
    image.set_sampling_method(config.sampling);
    log::info!(
        "Pipeline : {} étape(s) sur {}×{}",
        config.steps.len(),
        image.width(),
        image.height()
    );

    for (i, op) in config.steps.iter().enumerate() {
        log::info!("Étape {} : {op}", i + 1);
        image = apply(image, op, &mut rng).map_err(|e| match e {
            CoreError::Config(msg) => CoreError::Config(format!("étape {} : {msg}", i + 1)),
            other => other,
        })?;
        log::debug!("→ {}×{}", image.width(), image.height());
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pm_core::{Channel, Pixel, SamplingMethod};

    fn gradient(w: u32, h: u32) -> Image {
        let mut img = Image::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let v = ((x + y) * 255 / (w + h - 2)) as u8;
                img.set_pixel(x, y, Pixel::rgba(v, 255 - v, v / 2, 255));
            }
        }
        img
    }

    fn config(seed: Option<u64>, steps: Vec<Operation>) -> PipelineConfig {
        PipelineConfig {
            seed,
            steps,
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn empty_pipeline_is_identity() {
        let img = gradient(7, 5);
        assert_eq!(run(img.clone(), &PipelineConfig::default()).unwrap(), img);
    }

    #[test]
    fn every_operation_runs_and_stays_in_range() {
        let steps = vec![
            Operation::Brighten { factor: 1.4 },
            Operation::Contrast { factor: 100.0 },
            Operation::Saturation { factor: -100.0 },
            Operation::Noise { factor: 0.2 },
            Operation::ExtractChannel {
                channel: Channel::Red,
            },
            Operation::Quantize { bits: 4 },
            Operation::RandomDither { bits: 3 },
            Operation::OrderedDither { bits: 2 },
            Operation::FloydSteinberg { bits: 1 },
            Operation::Blur { radius: 1 },
            Operation::Sharpen { radius: 1 },
            Operation::EdgeDetect,
            Operation::Sampling {
                method: SamplingMethod::Bilinear,
            },
            Operation::Scale { sx: 1.5, sy: 0.5 },
            Operation::Rotate { angle: 0.7 },
            Operation::Crop {
                x: 1,
                y: 1,
                width: 5,
                height: 5,
            },
            Operation::Fun,
        ];
        let out = run(gradient(16, 12), &config(Some(4), steps)).unwrap();
        assert_eq!(out.dimensions(), (5, 5));
        assert_eq!(out.sampling_method(), SamplingMethod::Bilinear);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let steps = vec![
            Operation::Noise { factor: 0.3 },
            Operation::RandomDither { bits: 2 },
        ];
        let a = run(gradient(9, 9), &config(Some(42), steps.clone())).unwrap();
        let b = run(gradient(9, 9), &config(Some(42), steps)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn config_sampling_is_applied_to_input() {
        let cfg = PipelineConfig {
            sampling: SamplingMethod::Gaussian,
            ..PipelineConfig::default()
        };
        let out = run(gradient(4, 4), &cfg).unwrap();
        assert_eq!(out.sampling_method(), SamplingMethod::Gaussian);
    }

    #[test]
    fn crop_out_of_bounds_is_an_error() {
        let op = Operation::Crop {
            x: 6,
            y: 0,
            width: 4,
            height: 2,
        };
        let err = apply(gradient(8, 8), &op, &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert_eq!(
            err,
            CoreError::CropOutOfBounds {
                x: 6,
                y: 0,
                width: 4,
                height: 2
            }
        );
    }

    #[test]
    fn scale_to_empty_is_an_error() {
        let op = Operation::Scale { sx: 0.01, sy: 1.0 };
        let err = apply(gradient(8, 8), &op, &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDimensions { .. }));
    }

    #[test]
    fn invalid_step_is_reported_with_its_index() {
        let steps = vec![Operation::Blur { radius: 1 }, Operation::Quantize { bits: 9 }];
        let err = run(gradient(4, 4), &config(None, steps)).unwrap_err();
        assert!(err.to_string().contains("étape 2"), "{err}");
    }

    #[test]
    fn crop_error_mid_pipeline_uses_current_size() {
        let steps = vec![
            Operation::Scale { sx: 0.5, sy: 0.5 },
            Operation::Crop {
                x: 0,
                y: 0,
                width: 6,
                height: 6,
            },
        ];
        let err = run(gradient(10, 10), &config(Some(0), steps)).unwrap_err();
        assert!(matches!(err, CoreError::CropOutOfBounds { .. }));
    }
}
