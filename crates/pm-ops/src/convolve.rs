//! Kernel filters. Every filter reads from a frozen copy of the input and
//! writes into the live buffer; taps leaving the image are reflected.

use pm_core::image::Image;
use pm_core::kernel::gaussian_kernel;

/// Laplacian 3×3, indexed `[dy + 1][dx + 1]`. Sums to zero.
pub const LAPLACIAN_3X3: [[i32; 3]; 3] = [[-1, -1, -1], [-1, 8, -1], [-1, -1, -1]];

/// Gaussian blur of standard deviation `n` (taps span `±3n`).
///
/// Each output pixel blends a horizontal and a vertical 1-D pass 0.5/0.5;
/// this is not the exact separable 2-D Gaussian. All four channels are
/// filtered.
///
/// # Panics
/// Panics if `n == 0`.
///
/// # Example
/// ```
/// use pm_core::{Image, Pixel};
/// use pm_ops::convolve::blur;
/// let mut img = Image::filled(5, 4, Pixel::rgb(12, 34, 56));
/// blur(&mut img, 2);
/// assert!(img.pixels().iter().all(|&p| p == Pixel::rgb(12, 34, 56)));
/// ```
pub fn blur(img: &mut Image, n: u32) {
    assert!(n > 0, "blur radius must be positive");
    let kernel = gaussian_kernel(n);
    log::debug!("blur σ={n}, {} taps", kernel.len());
    let snapshot = img.clone();
    let (w, h) = img.dimensions();
    for y in 0..h {
        for x in 0..w {
            let p = snapshot.separable_blend(i64::from(x), i64::from(y), &kernel);
            img.set_pixel(x, y, p);
        }
    }
}

/// Unsharp masking: each pixel is pushed away from its `blur(n)` value,
/// `lerp(original, blurred, −1)`.
///
/// # Panics
/// Panics if `n == 0`.
pub fn sharpen(img: &mut Image, n: u32) {
    let mut blurred = img.clone();
    blur(&mut blurred, n);
    log::debug!("sharpen σ={n}");
    for (p, b) in img.pixels_mut().iter_mut().zip(blurred.pixels()) {
        *p = p.lerp(*b, -1.0);
    }
}

/// Apply [`LAPLACIAN_3X3`] to the color channels. Sums are clamped into
/// [0, 255]; alpha is kept. A uniform image becomes black.
///
/// # Example
/// ```
/// use pm_core::{Image, Pixel};
/// use pm_ops::convolve::edge_detect;
/// let mut img = Image::filled(3, 3, Pixel::rgb(200, 10, 99));
/// edge_detect(&mut img);
/// assert!(img.pixels().iter().all(|&p| p == Pixel::BLACK));
/// ```
pub fn edge_detect(img: &mut Image) {
    log::debug!("edge detect (laplacien 3×3)");
    let snapshot = img.clone();
    let (w, h) = img.dimensions();
    for y in 0..h {
        for x in 0..w {
            let mut sum = [0i32; 3];
            for (ky, row) in LAPLACIAN_3X3.iter().enumerate() {
                for (kx, &k) in row.iter().enumerate() {
                    let p = snapshot.pixel_reflected(
                        i64::from(x) + kx as i64 - 1,
                        i64::from(y) + ky as i64 - 1,
                    );
                    sum[0] += i32::from(p.r) * k;
                    sum[1] += i32::from(p.g) * k;
                    sum[2] += i32::from(p.b) * k;
                }
            }
            img.pixel_mut(x, y).set_clamp(
                f64::from(sum[0]),
                f64::from(sum[1]),
                f64::from(sum[2]),
            );
        }
    }
}
