//! Per-pixel tonal operations: brightness, contrast, saturation, channel
//! extraction, quantization and the random variants of quantization.

use pm_core::image::Image;
use pm_core::pixel::{Channel, Pixel, quant_step, quantize_value};
use rand::distr::{Distribution, StandardUniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Snap the color channels of `p` onto the `step` grid after shifting them by
/// `offset` quantization steps. Alpha is kept.
#[inline(always)]
pub(crate) fn snap(p: Pixel, step: f64, offset: f64) -> Pixel {
    Pixel {
        r: quantize_value(f64::from(p.r), step, offset),
        g: quantize_value(f64::from(p.g), step, offset),
        b: quantize_value(f64::from(p.b), step, offset),
        a: p.a,
    }
}

/// `c + (c − pivot)·k` on each color channel, clamped.
#[inline(always)]
fn push_from(p: &mut Pixel, pivot: f64, k: f64) {
    let r = f64::from(p.r);
    let g = f64::from(p.g);
    let b = f64::from(p.b);
    p.set_clamp(r + (r - pivot) * k, g + (g - pivot) * k, b + (b - pivot) * k);
}

fn entropy_rng() -> StdRng {
    StdRng::seed_from_u64(rand::random())
}

/// Scale the RGB of every pixel by `factor`. Over-bright saturates to white.
///
/// Alpha is left as is, unlike [`Pixel::scale`]: a factor of 0 gives black
/// with the original coverage, not a hole.
///
/// # Example
/// ```
/// use pm_core::{Image, Pixel};
/// use pm_ops::point::brighten;
/// let mut img = Image::filled(2, 2, Pixel::rgb(100, 150, 0));
/// brighten(&mut img, 2.0);
/// assert_eq!(img.pixel(0, 0), Pixel::rgb(200, 255, 0));
/// ```
pub fn brighten(img: &mut Image, factor: f64) {
    log::debug!("brighten ×{factor}");
    for p in img.pixels_mut() {
        *p = p.scale_rgb(factor);
    }
}

/// Mean luminance over the whole image.
#[must_use]
pub fn mean_luminance(img: &Image) -> f64 {
    let total: f64 = img.pixels().iter().map(|p| p.luminance()).sum();
    total / img.pixels().len() as f64
}

/// Push every channel away from (factor > 1) or toward (factor < 1) the
/// image's mean luminance.
pub fn change_contrast(img: &mut Image, factor: f64) {
    let mean = mean_luminance(img);
    log::debug!("contrast ×{factor}, luminance moyenne {mean:.2}");
    let k = factor - 1.0;
    for p in img.pixels_mut() {
        push_from(p, mean, k);
    }
}

/// Same as [`change_contrast`] but each pixel pivots on its own luminance,
/// so grays are unaffected.
///
/// # Example
/// ```
/// use pm_core::{Image, Pixel};
/// use pm_ops::point::change_saturation;
/// let mut img = Image::filled(1, 1, Pixel::rgb(90, 90, 90));
/// change_saturation(&mut img, 3.0);
/// assert_eq!(img.pixel(0, 0), Pixel::rgb(90, 90, 90));
/// ```
pub fn change_saturation(img: &mut Image, factor: f64) {
    log::debug!("saturation ×{factor}");
    let k = factor - 1.0;
    for p in img.pixels_mut() {
        let pivot = p.luminance();
        push_from(p, pivot, k);
    }
}

/// Zero the two color channels other than `channel`.
pub fn extract_channel(img: &mut Image, channel: Channel) {
    for p in img.pixels_mut() {
        match channel {
            Channel::Red => {
                p.g = 0;
                p.b = 0;
            }
            Channel::Green => {
                p.r = 0;
                p.b = 0;
            }
            Channel::Blue => {
                p.r = 0;
                p.g = 0;
            }
        }
    }
}

/// Snap every color channel onto the grid `step·k`, `step = 255/(2^nbits − 1)`.
///
/// # Panics
/// Panics if `nbits` is outside `1..=8`.
///
/// # Example
/// ```
/// use pm_core::{Image, Pixel};
/// use pm_ops::point::quantize;
/// let mut img = Image::filled(4, 4, Pixel::rgb(128, 128, 128));
/// quantize(&mut img, 1);
/// assert!(img.pixels().iter().all(|&p| p == Pixel::WHITE));
/// ```
pub fn quantize(img: &mut Image, nbits: u32) {
    let step = quant_step(nbits);
    log::debug!("quantize {nbits} bit(s), pas {step:.3}");
    for p in img.pixels_mut() {
        *p = snap(*p, step, 0.0);
    }
}

/// [`quantize`] with a uniform random offset in `[−step/2, step/2]/255`
/// (in quantization steps) drawn per pixel from `rng`.
///
/// # Panics
/// Panics if `nbits` is outside `1..=8`.
pub fn random_dither_with<R: Rng + ?Sized>(img: &mut Image, nbits: u32, rng: &mut R) {
    let step = quant_step(nbits);
    log::debug!("random dither {nbits} bit(s)");
    for p in img.pixels_mut() {
        let u: f64 = StandardUniform.sample(&mut *rng);
        let offset = (u - 0.5) * step / 255.0;
        *p = snap(*p, step, offset);
    }
}

/// [`random_dither_with`] seeded from entropy.
///
/// # Panics
/// Panics if `nbits` is outside `1..=8`.
pub fn random_dither(img: &mut Image, nbits: u32) {
    random_dither_with(img, nbits, &mut entropy_rng());
}

/// Add `uniform[0, 255)·factor` to each color channel, clamped. Alpha is kept.
pub fn add_noise_with<R: Rng + ?Sized>(img: &mut Image, factor: f64, rng: &mut R) {
    log::debug!("noise ×{factor}");
    for p in img.pixels_mut() {
        let mut draw = || -> f64 {
            let u: f64 = StandardUniform.sample(&mut *rng);
            u * 255.0 * factor
        };
        let (nr, ng, nb) = (draw(), draw(), draw());
        p.set_clamp(
            f64::from(p.r) + nr,
            f64::from(p.g) + ng,
            f64::from(p.b) + nb,
        );
    }
}

/// [`add_noise_with`] seeded from entropy.
pub fn add_noise(img: &mut Image, factor: f64) {
    add_noise_with(img, factor, &mut entropy_rng());
}
