use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug, PartialEq)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Invalid width/height dimensions.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u64,
        /// Height value.
        height: u64,
    },

    /// Raw buffer length does not match `width * height * 4`.
    #[error("Taille de buffer invalide : {actual} octets, {expected} attendus")]
    BufferSize {
        /// Expected byte count.
        expected: usize,
        /// Actual byte count.
        actual: usize,
    },

    /// Crop rectangle does not fit inside the source image.
    #[error("Rectangle de crop hors image : ({x}, {y}) {width}×{height}")]
    CropOutOfBounds {
        /// Left edge.
        x: u32,
        /// Top edge.
        y: u32,
        /// Rectangle width.
        width: u32,
        /// Rectangle height.
        height: u32,
    },

    /// Channel index outside 0|1|2.
    #[error("Canal invalide : {0} (attendu 0, 1 ou 2)")]
    InvalidChannel(u8),

    /// Operation name not recognised by the parser.
    #[error("Opération inconnue : {0}")]
    UnknownOperation(String),

    /// Sampling method name not recognised by the parser.
    #[error("Méthode d'échantillonnage inconnue : {0}")]
    UnknownSamplingMethod(String),
}
