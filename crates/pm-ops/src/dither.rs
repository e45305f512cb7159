//! Tramage : seuil ordonné (Bayer 4×4) et diffusion d'erreur Floyd–Steinberg.

use pm_core::image::Image;
use pm_core::pixel::quant_step;

use crate::point::snap;

/// Matrice de Bayer 4×4, 16 niveaux (0-15). Indexée `[y % 4][x % 4]`.
pub const BAYER_4X4: [[u8; 4]; 4] = [[15, 7, 13, 5], [3, 11, 1, 9], [12, 4, 14, 6], [0, 8, 2, 10]];

/// Floyd–Steinberg diffusion targets as `(dx, dy, weight)`: east, south-west,
/// south, south-east. All lie after the current pixel in raster order.
pub const FLOYD_STEINBERG: [(i64, i64, f64); 4] = [
    (1, 0, 7.0 / 16.0),
    (-1, 1, 3.0 / 16.0),
    (0, 1, 5.0 / 16.0),
    (1, 1, 1.0 / 16.0),
];

/// Threshold of the Bayer cell for `(x, y)`, centred on zero, in
/// quantization steps: `(m + 0.5)/16 − 0.5 ∈ (−0.5, 0.5)`.
#[inline(always)]
#[must_use]
pub fn bayer_threshold(x: u32, y: u32) -> f64 {
    let m = BAYER_4X4[(y % 4) as usize][(x % 4) as usize];
    (f64::from(m) + 0.5) / 16.0 - 0.5
}

/// Quantize each pixel after adding its Bayer threshold. Deterministic: the
/// same input always gives the same halftone.
///
/// # Panics
/// Panics if `nbits` is outside `1..=8`.
///
/// # Example
/// ```
/// use pm_core::{Image, Pixel};
/// use pm_ops::dither::ordered_dither;
/// let mut img = Image::filled(4, 4, Pixel::rgb(128, 128, 128));
/// ordered_dither(&mut img, 1);
/// let whites = img.pixels().iter().filter(|p| p.r == 255).count();
/// assert_eq!(whites, 8);
/// ```
pub fn ordered_dither(img: &mut Image, nbits: u32) {
    let step = quant_step(nbits);
    log::debug!("ordered dither {nbits} bit(s)");
    let (w, h) = img.dimensions();
    for y in 0..h {
        for x in 0..w {
            let p = img.pixel_mut(x, y);
            *p = snap(*p, step, bayer_threshold(x, y));
        }
    }
}

/// Sequential error diffusion.
///
/// Pixels are visited in raster order (rows top to bottom, each row left to
/// right). Each pixel is quantized, and its per-channel error
/// (`original − quantized`) is added to the east, south-west, south and
/// south-east neighbours with weights 7/16, 3/16, 5/16, 1/16. Neighbours are
/// clamped immediately, so later pixels see the diffused values. Neighbours
/// outside the image are skipped.
///
/// # Panics
/// Panics if `nbits` is outside `1..=8`.
pub fn floyd_steinberg_dither(img: &mut Image, nbits: u32) {
    let step = quant_step(nbits);
    log::debug!("floyd-steinberg {nbits} bit(s)");
    let (w, h) = img.dimensions();
    for y in 0..h {
        for x in 0..w {
            let old = img.pixel(x, y);
            let quant = snap(old, step, 0.0);
            let err = [
                f64::from(old.r) - f64::from(quant.r),
                f64::from(old.g) - f64::from(quant.g),
                f64::from(old.b) - f64::from(quant.b),
            ];
            for &(dx, dy, weight) in &FLOYD_STEINBERG {
                let nx = i64::from(x) + dx;
                let ny = i64::from(y) + dy;
                if !img.valid_coord(nx, ny) {
                    continue;
                }
                let n = img.pixel_mut(nx as u32, ny as u32);
                let (r, g, b) = (
                    f64::from(n.r) + err[0] * weight,
                    f64::from(n.g) + err[1] * weight,
                    f64::from(n.b) + err[2] * weight,
                );
                n.set_clamp(r, g, b);
            }
            img.set_pixel(x, y, quant);
        }
    }
}
