use crate::boundary::reflect;
use crate::error::CoreError;
use crate::pixel::{Pixel, PixelSum};
use crate::sampler::SamplingMethod;

/// Owned RGBA raster. Row-major, one [`Pixel`] per cell, never empty.
///
/// Carries the [`SamplingMethod`] used by [`Image::sample`]; images derived
/// from this one (copies, scaled, rotated, cropped) inherit it.
///
/// # Example
/// ```
/// use pm_core::image::Image;
/// use pm_core::pixel::Pixel;
/// let mut img = Image::new(4, 3);
/// assert_eq!(img.pixel(3, 2), Pixel::TRANSPARENT);
/// img.set_pixel(1, 1, Pixel::WHITE);
/// assert_eq!(img.pixels().len(), 12);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
    sampling: SamplingMethod,
}

impl Image {
    /// Blank image filled with transparent black.
    ///
    /// # Panics
    /// Panics if `width` or `height` is zero.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        assert!(
            width > 0 && height > 0,
            "image dimensions must be positive (got {width}×{height})"
        );
        Self {
            width,
            height,
            pixels: vec![Pixel::TRANSPARENT; width as usize * height as usize],
            sampling: SamplingMethod::default(),
        }
    }

    /// Fallible counterpart of [`Image::new`] for dimensions coming from
    /// outside the engine.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] if either side is zero.
    pub fn try_new(width: u32, height: u32) -> Result<Self, CoreError> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimensions {
                width: u64::from(width),
                height: u64::from(height),
            });
        }
        Ok(Self::new(width, height))
    }

    /// Image filled with a single color.
    ///
    /// # Panics
    /// Panics if `width` or `height` is zero.
    #[must_use]
    pub fn filled(width: u32, height: u32, color: Pixel) -> Self {
        let mut img = Self::new(width, height);
        img.pixels.fill(color);
        img
    }

    /// Blank image of the given size that inherits this image's sampling method.
    ///
    /// # Panics
    /// Panics if `width` or `height` is zero.
    #[must_use]
    pub fn blank_like(&self, width: u32, height: u32) -> Self {
        let mut img = Self::new(width, height);
        img.sampling = self.sampling;
        img
    }

    /// Take ownership of a decoded RGBA8 buffer (4 bytes per pixel, row-major).
    ///
    /// # Errors
    /// Returns an error if a dimension is zero or `data.len() != width·height·4`.
    ///
    /// # Example
    /// ```
    /// use pm_core::image::Image;
    /// use pm_core::pixel::Pixel;
    /// let img = Image::from_rgba8(2, 1, &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    /// assert_eq!(img.pixel(1, 0), Pixel::rgba(5, 6, 7, 8));
    /// assert!(Image::from_rgba8(2, 2, &[0; 8]).is_err());
    /// ```
    pub fn from_rgba8(width: u32, height: u32, data: &[u8]) -> Result<Self, CoreError> {
        let mut img = Self::try_new(width, height)?;
        let expected = img.pixels.len() * 4;
        if data.len() != expected {
            return Err(CoreError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        for (px, chunk) in img.pixels.iter_mut().zip(data.chunks_exact(4)) {
            *px = Pixel::rgba(chunk[0], chunk[1], chunk[2], chunk[3]);
        }
        Ok(img)
    }

    /// Raw RGBA8 bytes, row-major, for the encoder.
    #[must_use]
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for p in &self.pixels {
            out.extend_from_slice(&[p.r, p.g, p.b, p.a]);
        }
        out
    }

    #[inline(always)]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline(always)]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    #[must_use]
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    #[inline(always)]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        y as usize * self.width as usize + x as usize
    }

    /// Pixel at `(x, y)`. The caller guarantees `x < width`, `y < height`.
    ///
    /// # Panics
    /// Panics on an out-of-range coordinate.
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Pixel {
        self.pixels[self.index(x, y)]
    }

    /// Mutable access to the pixel at `(x, y)`.
    ///
    /// # Panics
    /// Panics on an out-of-range coordinate.
    #[inline(always)]
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut Pixel {
        let idx = self.index(x, y);
        &mut self.pixels[idx]
    }

    /// # Panics
    /// Panics on an out-of-range coordinate.
    #[inline(always)]
    pub fn set_pixel(&mut self, x: u32, y: u32, p: Pixel) {
        let idx = self.index(x, y);
        self.pixels[idx] = p;
    }

    /// True when `(x, y)` addresses a pixel of this image.
    #[inline]
    #[must_use]
    pub fn valid_coord(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }

    /// Pixel at a possibly out-of-range coordinate, mirrored back inside.
    #[inline]
    #[must_use]
    pub fn pixel_reflected(&self, x: i64, y: i64) -> Pixel {
        self.pixel(reflect(x, self.width), reflect(y, self.height))
    }

    #[inline]
    #[must_use]
    pub fn sampling_method(&self) -> SamplingMethod {
        self.sampling
    }

    /// Select the strategy used by every later [`Image::sample`] call.
    pub fn set_sampling_method(&mut self, method: SamplingMethod) {
        self.sampling = method;
    }

    /// Two independent 1-D passes centred on `(x, y)`, one along the row and
    /// one along the column, blended 0.5/0.5. `weights` has odd length and is
    /// centred; taps outside the image are reflected.
    ///
    /// This is the shared core of Gaussian blur and the Bilinear/Gaussian
    /// samplers.
    ///
    /// # Example
    /// ```
    /// use pm_core::image::Image;
    /// use pm_core::pixel::Pixel;
    /// let img = Image::filled(3, 3, Pixel::rgb(40, 80, 120));
    /// assert_eq!(img.separable_blend(0, 2, &[0.25, 0.5, 0.25]), Pixel::rgb(40, 80, 120));
    /// ```
    #[must_use]
    pub fn separable_blend(&self, x: i64, y: i64, weights: &[f64]) -> Pixel {
        debug_assert!(weights.len() % 2 == 1, "kernel length must be odd");
        let half = (weights.len() / 2) as i64;
        let mut along_x = PixelSum::default();
        let mut along_y = PixelSum::default();
        for (i, &w) in weights.iter().enumerate() {
            let d = i as i64 - half;
            along_x.add_weighted(self.pixel_reflected(x + d, y), w);
            along_y.add_weighted(self.pixel_reflected(x, y + d), w);
        }
        along_x.blend(along_y, 0.5).to_pixel()
    }
}
