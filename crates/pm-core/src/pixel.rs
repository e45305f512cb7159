use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Poids de luminance (r, g, b). L'alpha n'intervient pas.
pub const LUMA_WEIGHTS: [f64; 3] = [0.30, 0.59, 0.11];

/// Round to nearest, then clamp into [0, 255]. NaN maps to 0.
///
/// # Example
/// ```
/// use pm_core::pixel::clamp_channel;
/// assert_eq!(clamp_channel(-12.0), 0);
/// assert_eq!(clamp_channel(127.6), 128);
/// assert_eq!(clamp_channel(1e9), 255);
/// ```
#[inline(always)]
#[must_use]
pub fn clamp_channel(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

/// Quantization step for a bit depth: `255 / (2^nbits - 1)`.
///
/// # Panics
/// Panics if `nbits` is outside `1..=8`.
///
/// # Example
/// ```
/// use pm_core::pixel::quant_step;
/// assert_eq!(quant_step(1), 255.0);
/// assert_eq!(quant_step(8), 1.0);
/// ```
#[inline]
#[must_use]
pub fn quant_step(nbits: u32) -> f64 {
    assert!(
        (1..=8).contains(&nbits),
        "bit depth must be in 1..=8 (got {nbits})"
    );
    255.0 / f64::from((1u32 << nbits) - 1)
}

/// Snap `value` (in channel units, possibly out of range) onto the grid of
/// `step`, after shifting it by `offset` quantization steps.
#[inline(always)]
#[must_use]
pub fn quantize_value(value: f64, step: f64, offset: f64) -> u8 {
    clamp_channel(step * (value / step + offset + 0.5).floor())
}

/// RGBA pixel, 8 bits per channel.
///
/// # Example
/// ```
/// use pm_core::pixel::Pixel;
/// let p = Pixel::rgb(10, 20, 30);
/// assert_eq!(p.a, 255);
/// assert_eq!(Pixel::default(), Pixel::TRANSPARENT);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha, 255 = opaque.
    pub a: u8,
}

impl Pixel {
    /// Fully transparent black, the value of a blank canvas.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque pixel.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Build a pixel from real-valued channels, each rounded and clamped.
    #[inline]
    #[must_use]
    pub fn from_clamped(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
            a: clamp_channel(a),
        }
    }

    /// Overwrite the color channels with rounded, clamped values. Alpha is kept.
    ///
    /// # Example
    /// ```
    /// use pm_core::pixel::Pixel;
    /// let mut p = Pixel::rgba(0, 0, 0, 40);
    /// p.set_clamp(300.0, -5.0, 99.6);
    /// assert_eq!(p, Pixel::rgba(255, 0, 100, 40));
    /// ```
    #[inline]
    pub fn set_clamp(&mut self, r: f64, g: f64, b: f64) {
        self.r = clamp_channel(r);
        self.g = clamp_channel(g);
        self.b = clamp_channel(b);
    }

    /// Scale all four channels by `factor`, clamped.
    #[inline]
    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        Self::from_clamped(
            f64::from(self.r) * factor,
            f64::from(self.g) * factor,
            f64::from(self.b) * factor,
            f64::from(self.a) * factor,
        )
    }

    /// Scale the color channels by `factor`, clamped. Alpha is kept.
    ///
    /// # Example
    /// ```
    /// use pm_core::pixel::Pixel;
    /// let p = Pixel::rgba(100, 200, 50, 128).scale_rgb(2.0);
    /// assert_eq!(p, Pixel::rgba(200, 255, 100, 128));
    /// ```
    #[inline]
    #[must_use]
    pub fn scale_rgb(self, factor: f64) -> Self {
        let mut out = self;
        out.set_clamp(
            f64::from(self.r) * factor,
            f64::from(self.g) * factor,
            f64::from(self.b) * factor,
        );
        out
    }

    /// Linear interpolation `self·(1−t) + other·t` on all four channels.
    ///
    /// `t` outside [0, 1] extrapolates; `t = -1` pushes `self` away from
    /// `other` (unsharp masking).
    ///
    /// # Example
    /// ```
    /// use pm_core::pixel::Pixel;
    /// let p = Pixel::rgb(100, 100, 100);
    /// let q = Pixel::rgb(80, 120, 100);
    /// assert_eq!(p.lerp(q, 0.5), Pixel::rgb(90, 110, 100));
    /// assert_eq!(p.lerp(q, -1.0), Pixel::rgb(120, 80, 100));
    /// ```
    #[inline]
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let mix = |a: u8, b: u8| f64::from(a) * (1.0 - t) + f64::from(b) * t;
        Self::from_clamped(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    /// Weighted luminance of the color channels, in [0, 255].
    #[inline(always)]
    #[must_use]
    pub fn luminance(self) -> f64 {
        LUMA_WEIGHTS[0] * f64::from(self.r)
            + LUMA_WEIGHTS[1] * f64::from(self.g)
            + LUMA_WEIGHTS[2] * f64::from(self.b)
    }

    /// Snap the color channels onto the `nbits` quantization grid.
    ///
    /// # Panics
    /// Panics if `nbits` is outside `1..=8`.
    ///
    /// # Example
    /// ```
    /// use pm_core::pixel::Pixel;
    /// let p = Pixel::rgb(128, 127, 10).quantized(1);
    /// assert_eq!(p, Pixel::rgb(255, 0, 0));
    /// ```
    #[must_use]
    pub fn quantized(self, nbits: u32) -> Self {
        let step = quant_step(nbits);
        let mut out = self;
        out.r = quantize_value(f64::from(self.r), step, 0.0);
        out.g = quantize_value(f64::from(self.g), step, 0.0);
        out.b = quantize_value(f64::from(self.b), step, 0.0);
        out
    }
}

/// Component-wise sum over all four channels, saturating at 255.
impl Add for Pixel {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            r: self.r.saturating_add(rhs.r),
            g: self.g.saturating_add(rhs.g),
            b: self.b.saturating_add(rhs.b),
            a: self.a.saturating_add(rhs.a),
        }
    }
}

impl Mul<f64> for Pixel {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

/// Real-valued RGBA accumulator for kernel sums.
///
/// Taps are summed without intermediate rounding; [`PixelSum::to_pixel`]
/// rounds and clamps once at the end.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PixelSum {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl PixelSum {
    /// Add `p · weight` to the running sum.
    #[inline(always)]
    pub fn add_weighted(&mut self, p: Pixel, weight: f64) {
        self.r += f64::from(p.r) * weight;
        self.g += f64::from(p.g) * weight;
        self.b += f64::from(p.b) * weight;
        self.a += f64::from(p.a) * weight;
    }

    /// `self·(1−t) + other·t`.
    #[inline]
    #[must_use]
    pub fn blend(self, other: Self, t: f64) -> Self {
        Self {
            r: self.r * (1.0 - t) + other.r * t,
            g: self.g * (1.0 - t) + other.g * t,
            b: self.b * (1.0 - t) + other.b * t,
            a: self.a * (1.0 - t) + other.a * t,
        }
    }

    #[inline]
    #[must_use]
    pub fn to_pixel(self) -> Pixel {
        Pixel::from_clamped(self.r, self.g, self.b, self.a)
    }
}

/// Color channel selector for channel extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// Position in RGB order: red 0, green 1, blue 2.
    #[must_use]
    pub fn index(self) -> u8 {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
        }
    }
}

impl TryFrom<u8> for Channel {
    type Error = CoreError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Self::Red),
            1 => Ok(Self::Green),
            2 => Ok(Self::Blue),
            other => Err(CoreError::InvalidChannel(other)),
        }
    }
}
