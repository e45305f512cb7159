//! Décodage et encodage. Le moteur ne manipule que du RGBA8 : toute
//! conversion de format se fait ici.

use std::fmt;
use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageFormat, RgbaImage};
use pm_core::image::Image;

/// JPEG quality used when saving.
pub const JPEG_QUALITY: u8 = 95;

/// Container written by [`encode`] and [`save_image`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lossy, no alpha (quality [`JPEG_QUALITY`]).
    Jpeg,
    /// Lossless, with alpha.
    Png,
    /// Truevision TGA, with alpha.
    Tga,
    /// Windows bitmap. Fallback for unknown extensions.
    Bmp,
}

impl OutputFormat {
    /// Pick the format from the file extension (case-insensitive).
    /// Anything unrecognised, including no extension, is BMP.
    ///
    /// # Example
    /// ```
    /// use pm_io::OutputFormat;
    /// use std::path::Path;
    /// assert_eq!(OutputFormat::from_path(Path::new("a.JPEG")), OutputFormat::Jpeg);
    /// assert_eq!(OutputFormat::from_path(Path::new("a.tga")), OutputFormat::Tga);
    /// assert_eq!(OutputFormat::from_path(Path::new("out")), OutputFormat::Bmp);
    /// ```
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("jpg" | "jpeg") => Self::Jpeg,
            Some("png") => Self::Png,
            Some("tga") => Self::Tga,
            _ => Self::Bmp,
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::Tga => ImageFormat::Tga,
            Self::Bmp => ImageFormat::Bmp,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Tga => "TGA",
            Self::Bmp => "BMP",
        };
        f.write_str(name)
    }
}

fn from_dynamic(img: &DynamicImage) -> Result<Image> {
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    Ok(Image::from_rgba8(w, h, rgba.as_raw())?)
}

/// Decode an in-memory PNG, JPEG, BMP, GIF or TGA file.
///
/// # Errors
/// Returns an error if the bytes are not a supported image or the image
/// is empty.
pub fn decode(bytes: &[u8]) -> Result<Image> {
    let img = image::load_from_memory(bytes).context("Décodage de l'image impossible")?;
    from_dynamic(&img)
}

/// Load an image from disk, format guessed from the content.
///
/// # Errors
/// Returns an error if the file cannot be read or decoded.
///
/// # Example
/// ```no_run
/// use pm_io::load_image;
/// use std::path::Path;
/// let img = load_image(Path::new("photo.png")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<Image> {
    let img = image::open(path)
        .with_context(|| format!("Impossible de charger {}", path.display()))?;
    let out = from_dynamic(&img)
        .with_context(|| format!("Image invalide : {}", path.display()))?;
    log::info!(
        "Chargé {} ({}×{})",
        path.display(),
        out.width(),
        out.height()
    );
    Ok(out)
}

/// Encode `img` into `format`. JPEG drops alpha.
///
/// # Errors
/// Returns an error if the encoder fails.
pub fn encode(img: &Image, format: OutputFormat) -> Result<Vec<u8>> {
    let (w, h) = img.dimensions();
    let rgba = RgbaImage::from_raw(w, h, img.to_rgba8())
        .context("Buffer RGBA incohérent avec les dimensions")?;
    let mut buffer = Cursor::new(Vec::new());
    match format {
        OutputFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(rgba).to_rgb8();
            let mut encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
            encoder
                .encode(&rgb, w, h, ExtendedColorType::Rgb8)
                .context("Échec de l'encodage JPEG")?;
        }
        other => {
            rgba.write_to(&mut buffer, other.image_format())
                .with_context(|| format!("Échec de l'encodage {other}"))?;
        }
    }
    Ok(buffer.into_inner())
}

/// Write `img` to `path`, format chosen by [`OutputFormat::from_path`].
///
/// # Errors
/// Returns an error if encoding fails or the file cannot be written.
pub fn save_image(img: &Image, path: &Path) -> Result<()> {
    let format = OutputFormat::from_path(path);
    let bytes = encode(img, format)?;
    std::fs::write(path, &bytes)
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    log::info!(
        "Écrit {} ({format}, {}×{}, {} octets)",
        path.display(),
        img.width(),
        img.height(),
        bytes.len()
    );
    Ok(())
}
