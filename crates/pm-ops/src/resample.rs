//! Geometric transforms. Every destination pixel is read back from the source
//! through [`Image::sample`], so the source's sampling method decides how
//! fractional coordinates are resolved and off-canvas reads come back
//! transparent.

use pm_core::error::CoreError;
use pm_core::image::Image;

/// Amplitude of the [`fun`] warp, in pixels.
const FUN_AMPLITUDE: f64 = 20.0;
/// Angular frequency of the [`fun`] warp across one image dimension.
const FUN_FREQUENCY: f64 = 100.0;

/// Largest image [`scale`] will produce, in pixels (1 GiB of RGBA).
pub const MAX_PIXELS: u64 = 1 << 28;

/// Output size of [`scale`]: `(⌊sx·W⌋, ⌊sy·H⌋)`.
///
/// # Errors
/// Returns [`CoreError::InvalidDimensions`] if a factor is not positive and
/// finite, or if the result is empty, does not fit in `u32` or holds more
/// than [`MAX_PIXELS`] pixels.
///
/// # Example
/// ```
/// use pm_ops::resample::scaled_dimensions;
/// assert_eq!(scaled_dimensions((10, 7), 0.5, 2.0).unwrap(), (5, 14));
/// assert!(scaled_dimensions((10, 7), 0.05, 1.0).is_err());
/// ```
pub fn scaled_dimensions((w, h): (u32, u32), sx: f64, sy: f64) -> Result<(u32, u32), CoreError> {
    let nw = (sx * f64::from(w)).floor();
    let nh = (sy * f64::from(h)).floor();
    let fits = |v: f64| (1.0..=f64::from(u32::MAX)).contains(&v);
    if sx > 0.0 && sy > 0.0 && fits(nw) && fits(nh) && nw * nh <= MAX_PIXELS as f64 {
        Ok((nw as u32, nh as u32))
    } else {
        Err(CoreError::InvalidDimensions {
            width: nw as u64,
            height: nh as u64,
        })
    }
}

/// Resample to `(⌊sx·W⌋, ⌊sy·H⌋)`; destination `(x, y)` reads the source at
/// `(x/sx, y/sy)`.
///
/// # Panics
/// Panics if the factors are not positive and finite or if the output would
/// be empty.
///
/// # Example
/// ```
/// use pm_core::{Image, Pixel};
/// use pm_ops::resample::scale;
/// let img = Image::filled(4, 3, Pixel::rgb(1, 2, 3));
/// let big = scale(&img, 2.0, 0.5);
/// assert_eq!(big.dimensions(), (8, 1));
/// assert_eq!(big.pixel(7, 0), Pixel::rgb(1, 2, 3));
/// ```
#[must_use]
pub fn scale(src: &Image, sx: f64, sy: f64) -> Image {
    let (nw, nh) = match scaled_dimensions(src.dimensions(), sx, sy) {
        Ok(dims) => dims,
        Err(e) => panic!("scale ({sx}, {sy}) : {e}"),
    };
    log::debug!(
        "scale {}×{} → {nw}×{nh} ({})",
        src.width(),
        src.height(),
        src.sampling_method()
    );
    let mut dst = src.blank_like(nw, nh);
    for y in 0..nh {
        for x in 0..nw {
            let p = src.sample(f64::from(x) / sx, f64::from(y) / sy);
            dst.set_pixel(x, y, p);
        }
    }
    dst
}

/// Axis-aligned box `(min_x, min_y, max_x, max_y)` holding the four corners
/// of a `w×h` rectangle rotated by `angle` around the origin. Corner
/// coordinates are rounded to the nearest integer and the box always
/// contains the origin.
///
/// # Example
/// ```
/// use pm_ops::resample::rotation_bounds;
/// assert_eq!(rotation_bounds(6, 4, 0.0), (0, 0, 6, 4));
/// assert_eq!(rotation_bounds(6, 4, std::f64::consts::PI), (-6, -4, 0, 0));
/// ```
#[must_use]
pub fn rotation_bounds(w: u32, h: u32, angle: f64) -> (i64, i64, i64, i64) {
    let (sin, cos) = angle.sin_cos();
    let (w, h) = (f64::from(w), f64::from(h));
    let p1 = (cos * w, sin * w);
    let p3 = (-sin * h, cos * h);
    let p2 = (p1.0 + p3.0, p1.1 + p3.1);

    let (mut min_x, mut min_y, mut max_x, mut max_y) = (0i64, 0i64, 0i64, 0i64);
    for (px, py) in [p1, p2, p3] {
        let (px, py) = (px.round() as i64, py.round() as i64);
        min_x = min_x.min(px);
        min_y = min_y.min(py);
        max_x = max_x.max(px);
        max_y = max_y.max(py);
    }
    (min_x, min_y, max_x, max_y)
}

/// Rotate by `angle` radians around the top-left corner.
///
/// The output covers [`rotation_bounds`] (at least 1×1). The centre of each
/// destination pixel is mapped back into source space by the inverse
/// rotation and sampled; pixels whose preimage falls outside the source are
/// transparent. Quarter turns are exact permutations of the source.
///
/// # Panics
/// Panics if `angle` is not finite.
///
/// # Example
/// ```
/// use pm_core::{Image, Pixel};
/// use pm_ops::resample::rotate;
/// let img = Image::filled(5, 2, Pixel::rgb(9, 9, 9));
/// assert_eq!(rotate(&img, 0.0), img);
/// ```
#[must_use]
pub fn rotate(src: &Image, angle: f64) -> Image {
    assert!(angle.is_finite(), "rotation angle must be finite");
    let (min_x, min_y, max_x, max_y) = rotation_bounds(src.width(), src.height(), angle);
    let nw = ((max_x - min_x).max(1)) as u32;
    let nh = ((max_y - min_y).max(1)) as u32;
    log::debug!(
        "rotate {angle:.4} rad : {}×{} → {nw}×{nh}, origine ({min_x}, {min_y})",
        src.width(),
        src.height()
    );

    // Inverse rotation: R(−a) = [[cos, sin], [−sin, cos]], applied to pixel
    // centres. Pixel i spans [i, i+1), so a centre lands half a pixel away
    // from any floor boundary and sin/cos rounding noise cannot shift it.
    let (sin, cos) = angle.sin_cos();
    let mut dst = src.blank_like(nw, nh);
    for y in 0..nh {
        let cy = (i64::from(y) + min_y) as f64 + 0.5;
        for x in 0..nw {
            let cx = (i64::from(x) + min_x) as f64 + 0.5;
            let u = cx * cos + cy * sin;
            let v = -cx * sin + cy * cos;
            dst.set_pixel(x, y, src.sample(u, v));
        }
    }
    dst
}

/// Whether the rectangle `(x, y, w, h)` is non-empty and lies inside `src`.
#[must_use]
pub fn crop_fits(src: &Image, x: u32, y: u32, w: u32, h: u32) -> bool {
    w > 0
        && h > 0
        && u64::from(x) + u64::from(w) <= u64::from(src.width())
        && u64::from(y) + u64::from(h) <= u64::from(src.height())
}

/// Copy the `w×h` rectangle at `(x, y)` into a new image, without
/// resampling.
///
/// # Panics
/// Panics if the rectangle is empty or does not lie inside `src`.
///
/// # Example
/// ```
/// use pm_core::{Image, Pixel};
/// use pm_ops::resample::crop;
/// let mut img = Image::new(4, 4);
/// img.set_pixel(2, 3, Pixel::WHITE);
/// let part = crop(&img, 1, 2, 2, 2);
/// assert_eq!(part.dimensions(), (2, 2));
/// assert_eq!(part.pixel(1, 1), Pixel::WHITE);
/// ```
#[must_use]
pub fn crop(src: &Image, x: u32, y: u32, w: u32, h: u32) -> Image {
    assert!(
        crop_fits(src, x, y, w, h),
        "crop ({x}, {y}) {w}×{h} outside {}×{} image",
        src.width(),
        src.height()
    );
    let mut dst = src.blank_like(w, h);
    let (sw, w, x) = (src.width() as usize, w as usize, x as usize);
    for (row, dst_row) in dst.pixels_mut().chunks_exact_mut(w).enumerate() {
        let start = (y as usize + row) * sw + x;
        dst_row.copy_from_slice(&src.pixels()[start..start + w]);
    }
    dst
}

/// Sinusoidal warp: `(x, y)` reads a snapshot at
/// `(x + 20·sin(100·x/W), y + 20·sin(100·y/H))`.
pub fn fun(img: &mut Image) {
    log::debug!("fun warp ({})", img.sampling_method());
    let snapshot = img.clone();
    let (w, h) = img.dimensions();
    let (fw, fh) = (f64::from(w), f64::from(h));
    for y in 0..h {
        let fy = f64::from(y);
        let v = fy + (fy / fh * FUN_FREQUENCY).sin() * FUN_AMPLITUDE;
        for x in 0..w {
            let fx = f64::from(x);
            let u = fx + (fx / fw * FUN_FREQUENCY).sin() * FUN_AMPLITUDE;
            img.set_pixel(x, y, snapshot.sample(u, v));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pm_core::{Pixel, SamplingMethod};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn noisy(w: u32, h: u32) -> Image {
        let mut img = Image::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let v = (x * 37 + y * 91) % 256;
                img.set_pixel(x, y, Pixel::rgba(v as u8, (v / 3) as u8, (255 - v) as u8, 255));
            }
        }
        img
    }

    #[test]
    fn scale_identity_with_point_sampling() {
        let img = noisy(13, 8);
        assert_eq!(scale(&img, 1.0, 1.0), img);
    }

    #[test]
    fn scale_floors_dimensions() {
        let img = noisy(10, 10);
        assert_eq!(scale(&img, 0.35, 1.26).dimensions(), (3, 12));
    }

    #[test]
    fn scale_up_replicates_pixels() {
        let img = noisy(3, 2);
        let big = scale(&img, 2.0, 2.0);
        assert_eq!(big.pixel(5, 3), img.pixel(2, 1));
        assert_eq!(big.pixel(4, 2), img.pixel(2, 1));
    }

    #[test]
    #[should_panic(expected = "scale")]
    fn scale_to_nothing_panics() {
        let _ = scale(&noisy(4, 4), 0.1, 1.0);
    }

    #[test]
    fn scaled_dimensions_rejects_bad_factors() {
        for (sx, sy) in [(0.0, 1.0), (-1.0, 1.0), (f64::NAN, 1.0), (1.0, f64::INFINITY)] {
            assert!(scaled_dimensions((8, 8), sx, sy).is_err(), "({sx}, {sy})");
        }
        assert!(scaled_dimensions((u32::MAX, 1), 2.0, 1.0).is_err());
    }

    #[test]
    fn scaled_dimensions_caps_pixel_count() {
        assert!(scaled_dimensions((1000, 1000), 1000.0, 1000.0).is_err());
        assert!(scaled_dimensions((1 << 14, 1 << 14), 1.0, 1.0).is_ok());
        assert!(scaled_dimensions((1 << 14, 1 << 14), 1.0, 1.01).is_err());
    }

    #[test]
    fn derived_images_inherit_sampling() {
        let mut img = noisy(6, 6);
        img.set_sampling_method(SamplingMethod::Gaussian);
        assert_eq!(scale(&img, 0.5, 0.5).sampling_method(), SamplingMethod::Gaussian);
        assert_eq!(rotate(&img, 0.3).sampling_method(), SamplingMethod::Gaussian);
        assert_eq!(crop(&img, 0, 0, 2, 2).sampling_method(), SamplingMethod::Gaussian);
    }

    #[test]
    fn rotate_zero_reproduces_source() {
        let img = noisy(11, 7);
        assert_eq!(rotate(&img, 0.0), img);
    }

    #[test]
    fn rotate_quarter_turn_swaps_dimensions() {
        let img = noisy(9, 4);
        let rotated = rotate(&img, FRAC_PI_2);
        assert_eq!(rotated.dimensions(), (4, 9));
        assert!(rotated.pixels().iter().any(|p| p.a == 255));
    }

    /// Every pixel a distinct color.
    fn labelled(w: u32, h: u32) -> Image {
        let mut img = Image::new(w, h);
        for y in 0..h {
            for x in 0..w {
                img.set_pixel(x, y, Pixel::rgba(x as u8, y as u8, 7, 255));
            }
        }
        img
    }

    #[test]
    fn quarter_turns_permute_every_pixel() {
        let (w, h) = (16u32, 8u32);
        let img = labelled(w, h);
        let turns: [(f64, (u32, u32), fn(u32, u32) -> (u32, u32)); 3] = [
            (FRAC_PI_2, (h, w), |x, y| (y, 8 - 1 - x)),
            (PI, (w, h), |x, y| (16 - 1 - x, 8 - 1 - y)),
            (3.0 * FRAC_PI_2, (h, w), |x, y| (16 - 1 - y, x)),
        ];
        for (angle, dims, source_of) in turns {
            let out = rotate(&img, angle);
            assert_eq!(out.dimensions(), dims, "{angle}");
            for y in 0..dims.1 {
                for x in 0..dims.0 {
                    let (sx, sy) = source_of(x, y);
                    assert_eq!(out.pixel(x, y), img.pixel(sx, sy), "{angle} ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn rotate_diagonal_leaves_transparent_corners() {
        let img = Image::filled(10, 10, Pixel::WHITE);
        let rotated = rotate(&img, std::f64::consts::FRAC_PI_4);
        let (w, h) = rotated.dimensions();
        assert!(w > 10 && h > 10);
        assert_eq!(rotated.pixel(0, 0), Pixel::TRANSPARENT);
        assert_eq!(rotated.pixel(w - 1, h - 1), Pixel::TRANSPARENT);
    }

    #[test]
    fn crop_then_recrop_is_identity() {
        let img = noisy(12, 9);
        let a = crop(&img, 3, 2, 5, 4);
        let b = crop(&img, 3, 2, 5, 4);
        assert_eq!(a, b);
        assert_eq!(crop(&a, 0, 0, 5, 4), a);
        assert_eq!(a.pixel(4, 3), img.pixel(7, 5));
    }

    #[test]
    fn crop_full_image_is_identity() {
        let img = noisy(5, 5);
        assert_eq!(crop(&img, 0, 0, 5, 5), img);
    }

    #[test]
    fn crop_fits_checks_every_edge() {
        let img = noisy(8, 6);
        assert!(crop_fits(&img, 7, 5, 1, 1));
        assert!(!crop_fits(&img, 7, 5, 2, 1));
        assert!(!crop_fits(&img, 0, 0, 0, 3));
        assert!(!crop_fits(&img, u32::MAX, 0, 2, 1));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn crop_outside_panics() {
        let _ = crop(&noisy(4, 4), 2, 2, 3, 1);
    }

    #[test]
    fn fun_keeps_dimensions_and_moves_pixels() {
        let mut img = noisy(40, 30);
        fun(&mut img);
        assert_eq!(img.dimensions(), (40, 30));
        assert_ne!(img, noisy(40, 30));
        // Origin has zero displacement.
        assert_eq!(img.pixel(0, 0), noisy(40, 30).pixel(0, 0));
    }
}
