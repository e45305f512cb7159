use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::pixel::Channel;
use crate::sampler::SamplingMethod;

/// Largest accepted blur/sharpen radius (σ of the Gaussian, 6σ+1 taps).
pub const MAX_RADIUS: u32 = 256;

/// One processing step.
///
/// Serialized in TOML as a table tagged by `op`:
///
/// ```toml
/// [[steps]]
/// op = "blur"
/// radius = 2
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Scale RGB by `factor`.
    Brighten { factor: f64 },
    /// Push channels away from the image's mean luminance.
    Contrast { factor: f64 },
    /// Push channels away from each pixel's own luminance.
    Saturation { factor: f64 },
    /// Add uniform random noise scaled by `factor`.
    Noise { factor: f64 },
    /// Keep a single color channel.
    ExtractChannel { channel: Channel },
    /// Snap channels onto a `bits`-deep grid.
    Quantize { bits: u32 },
    /// Quantize with a random offset per pixel.
    RandomDither { bits: u32 },
    /// Quantize with a 4×4 Bayer threshold.
    OrderedDither { bits: u32 },
    /// Floyd–Steinberg error diffusion.
    FloydSteinberg { bits: u32 },
    /// Gaussian blur of standard deviation `radius`.
    Blur { radius: u32 },
    /// Unsharp masking against a `radius` blur.
    Sharpen { radius: u32 },
    /// 3×3 Laplacian.
    EdgeDetect,
    /// Resample to `(sx·W, sy·H)`.
    Scale { sx: f64, sy: f64 },
    /// Rotate by `angle` radians around the origin.
    Rotate { angle: f64 },
    /// Copy a sub-rectangle.
    Crop {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    /// Sinusoidal warp.
    Fun,
    /// Switch the sampling method for subsequent geometric steps.
    Sampling { method: SamplingMethod },
}

impl Operation {
    /// Short name, matching the TOML `op` tag.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Brighten { .. } => "brighten",
            Self::Contrast { .. } => "contrast",
            Self::Saturation { .. } => "saturation",
            Self::Noise { .. } => "noise",
            Self::ExtractChannel { .. } => "extract_channel",
            Self::Quantize { .. } => "quantize",
            Self::RandomDither { .. } => "random_dither",
            Self::OrderedDither { .. } => "ordered_dither",
            Self::FloydSteinberg { .. } => "floyd_steinberg",
            Self::Blur { .. } => "blur",
            Self::Sharpen { .. } => "sharpen",
            Self::EdgeDetect => "edge_detect",
            Self::Scale { .. } => "scale",
            Self::Rotate { .. } => "rotate",
            Self::Crop { .. } => "crop",
            Self::Fun => "fun",
            Self::Sampling { .. } => "sampling",
        }
    }

    /// Reject arguments that would violate an engine precondition.
    ///
    /// Checks that depend on the image size (crop bounds, scaled size) are
    /// done when the step runs.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] describing the first bad argument.
    ///
    /// # Example
    /// ```
    /// use pm_core::config::Operation;
    /// assert!(Operation::Quantize { bits: 0 }.validate().is_err());
    /// assert!(Operation::Blur { radius: 2 }.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), CoreError> {
        let name = self.name();
        match *self {
            Self::Brighten { factor }
            | Self::Contrast { factor }
            | Self::Saturation { factor }
            | Self::Noise { factor } => check_finite(name, "factor", factor),
            Self::Quantize { bits }
            | Self::RandomDither { bits }
            | Self::OrderedDither { bits }
            | Self::FloydSteinberg { bits } => {
                if (1..=8).contains(&bits) {
                    Ok(())
                } else {
                    Err(CoreError::Config(format!(
                        "{name} : profondeur {bits} hors de 1..=8"
                    )))
                }
            }
            Self::Blur { radius } | Self::Sharpen { radius } => {
                if radius == 0 {
                    Err(CoreError::Config(format!("{name} : rayon nul")))
                } else if radius > MAX_RADIUS {
                    Err(CoreError::Config(format!(
                        "{name} : rayon {radius} au-delà de {MAX_RADIUS}"
                    )))
                } else {
                    Ok(())
                }
            }
            Self::Scale { sx, sy } => {
                check_finite(name, "sx", sx)?;
                check_finite(name, "sy", sy)?;
                if sx <= 0.0 || sy <= 0.0 {
                    return Err(CoreError::Config(format!(
                        "{name} : facteurs non positifs ({sx}, {sy})"
                    )));
                }
                Ok(())
            }
            Self::Rotate { angle } => check_finite(name, "angle", angle),
            Self::Crop { width, height, .. } => {
                if width == 0 || height == 0 {
                    Err(CoreError::InvalidDimensions {
                        width: u64::from(width),
                        height: u64::from(height),
                    })
                } else {
                    Ok(())
                }
            }
            Self::ExtractChannel { .. } | Self::EdgeDetect | Self::Fun | Self::Sampling { .. } => {
                Ok(())
            }
        }
    }
}

fn check_finite(op: &str, field: &str, value: f64) -> Result<(), CoreError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CoreError::Config(format!("{op} : {field} non fini ({value})")))
    }
}

fn parse_args<T: FromStr>(op: &str, args: &str, count: usize) -> Result<Vec<T>, CoreError> {
    let values: Vec<T> = args
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            s.trim()
                .parse::<T>()
                .map_err(|_| CoreError::Config(format!("{op} : argument invalide '{s}'")))
        })
        .collect::<Result<_, _>>()?;
    if values.len() != count {
        return Err(CoreError::Config(format!(
            "{op} : {count} argument(s) attendu(s), {} reçu(s)",
            values.len()
        )));
    }
    Ok(values)
}

fn parse_one<T: FromStr>(op: &str, args: &str) -> Result<T, CoreError> {
    let mut values = parse_args::<T>(op, args, 1)?;
    values
        .pop()
        .ok_or_else(|| CoreError::Config(format!("{op} : argument manquant")))
}

/// Parse the compact command-line form `name[:arg,arg,...]`.
///
/// # Example
/// ```
/// use pm_core::config::Operation;
/// let op: Operation = "crop:0,0,16,8".parse().unwrap();
/// assert_eq!(op, Operation::Crop { x: 0, y: 0, width: 16, height: 8 });
/// assert_eq!("scale:2".parse::<Operation>().unwrap(), Operation::Scale { sx: 2.0, sy: 2.0 });
/// assert!("warp:1".parse::<Operation>().is_err());
/// ```
impl FromStr for Operation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, args) = s.split_once(':').unwrap_or((s, ""));
        let name = name.trim().to_ascii_lowercase();
        let op = match name.as_str() {
            "brighten" => Self::Brighten {
                factor: parse_one(&name, args)?,
            },
            "contrast" => Self::Contrast {
                factor: parse_one(&name, args)?,
            },
            "saturation" => Self::Saturation {
                factor: parse_one(&name, args)?,
            },
            "noise" => Self::Noise {
                factor: parse_one(&name, args)?,
            },
            "channel" | "extract_channel" => Self::ExtractChannel {
                channel: Channel::try_from(parse_one::<u8>(&name, args)?)?,
            },
            "quantize" => Self::Quantize {
                bits: parse_one(&name, args)?,
            },
            "random_dither" => Self::RandomDither {
                bits: parse_one(&name, args)?,
            },
            "ordered_dither" => Self::OrderedDither {
                bits: parse_one(&name, args)?,
            },
            "floyd_steinberg" | "fs" => Self::FloydSteinberg {
                bits: parse_one(&name, args)?,
            },
            "blur" => Self::Blur {
                radius: parse_one(&name, args)?,
            },
            "sharpen" => Self::Sharpen {
                radius: parse_one(&name, args)?,
            },
            "edge" | "edge_detect" => {
                parse_args::<f64>(&name, args, 0)?;
                Self::EdgeDetect
            }
            "scale" => {
                if args.contains(',') {
                    let v: Vec<f64> = parse_args(&name, args, 2)?;
                    Self::Scale { sx: v[0], sy: v[1] }
                } else {
                    let s = parse_one(&name, args)?;
                    Self::Scale { sx: s, sy: s }
                }
            }
            "rotate" => Self::Rotate {
                angle: parse_one(&name, args)?,
            },
            "crop" => {
                let v: Vec<u32> = parse_args(&name, args, 4)?;
                Self::Crop {
                    x: v[0],
                    y: v[1],
                    width: v[2],
                    height: v[3],
                }
            }
            "fun" => {
                parse_args::<f64>(&name, args, 0)?;
                Self::Fun
            }
            "sampling" => Self::Sampling {
                method: args.parse()?,
            },
            _ => return Err(CoreError::UnknownOperation(s.to_string())),
        };
        Ok(op)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Brighten { factor }
            | Self::Contrast { factor }
            | Self::Saturation { factor }
            | Self::Noise { factor } => write!(f, "{}:{factor}", self.name()),
            Self::ExtractChannel { channel } => write!(f, "channel:{}", channel.index()),
            Self::Quantize { bits }
            | Self::RandomDither { bits }
            | Self::OrderedDither { bits }
            | Self::FloydSteinberg { bits } => write!(f, "{}:{bits}", self.name()),
            Self::Blur { radius } | Self::Sharpen { radius } => {
                write!(f, "{}:{radius}", self.name())
            }
            Self::Scale { sx, sy } => write!(f, "scale:{sx},{sy}"),
            Self::Rotate { angle } => write!(f, "rotate:{angle}"),
            Self::Crop {
                x,
                y,
                width,
                height,
            } => write!(f, "crop:{x},{y},{width},{height}"),
            Self::Sampling { method } => write!(f, "sampling:{method}"),
            Self::EdgeDetect | Self::Fun => f.write_str(self.name()),
        }
    }
}

/// A processing pipeline: initial sampling method, optional RNG seed and
/// an ordered list of steps.
///
/// # Example
/// ```
/// use pm_core::config::PipelineConfig;
/// let config = PipelineConfig::default();
/// assert!(config.steps.is_empty());
/// assert!(config.seed.is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Sampling method set on the input image before the first step.
    pub sampling: SamplingMethod,
    /// Seed for random dither and noise. `None` = entropy.
    pub seed: Option<u64>,
    /// Steps, applied in order.
    pub steps: Vec<Operation>,
}

impl PipelineConfig {
    /// Validate every step.
    ///
    /// # Errors
    /// Returns the first step error, prefixed with its 1-based number.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (i, step) in self.steps.iter().enumerate() {
            step.validate().map_err(|e| match e {
                CoreError::Config(msg) => CoreError::Config(format!("étape {} : {msg}", i + 1)),
                other => other,
            })?;
        }
        Ok(())
    }
}

/// Structure TOML intermédiaire, sections optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    pipeline: Option<PipelineSection>,
    steps: Option<Vec<Operation>>,
}

#[derive(Deserialize)]
struct PipelineSection {
    sampling: Option<SamplingMethod>,
    seed: Option<u64>,
}

/// Parse a TOML pipeline description, merged over the defaults and validated.
///
/// # Errors
/// Returns an error if the TOML is malformed or a step is invalid.
///
/// # Example
/// ```
/// use pm_core::config::{parse_config, Operation};
/// use pm_core::sampler::SamplingMethod;
/// let config = parse_config(r#"
///     [pipeline]
///     sampling = "Gaussian"
///
///     [[steps]]
///     op = "blur"
///     radius = 2
/// "#).unwrap();
/// assert_eq!(config.sampling, SamplingMethod::Gaussian);
/// assert_eq!(config.steps, vec![Operation::Blur { radius: 2 }]);
/// ```
pub fn parse_config(content: &str) -> Result<PipelineConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = PipelineConfig::default();
    if let Some(p) = file.pipeline {
        if let Some(v) = p.sampling {
            config.sampling = v;
        }
        config.seed = p.seed;
    }
    if let Some(v) = file.steps {
        config.steps = v;
    }

    config.validate()?;
    log::debug!(
        "pipeline : {} étape(s), échantillonnage {}",
        config.steps.len(),
        config.sampling
    );
    Ok(config)
}

/// Charge un fichier TOML de pipeline.
///
/// # Errors
/// Returns an error if the file cannot be read, parsed or validated.
///
/// # Example
/// ```no_run
/// use pm_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Pipeline invalide dans {}", path.display()))
}
