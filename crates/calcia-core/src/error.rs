use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalciaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid stack dimensionality: {ndim} axes (expected time + 2 or 3 spatial axes)")]
    InvalidDimensions { ndim: usize },

    #[error("Spatial shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Scale has {got} entries but data has {ndim} axes")]
    ScaleLengthMismatch { got: usize, ndim: usize },

    #[error("Footprint has {footprint_ndim} axes but data has {ndim}")]
    FootprintMismatch { footprint_ndim: usize, ndim: usize },

    #[error("Empty frame sequence")]
    EmptySequence,
}

pub type Result<T> = std::result::Result<T, CalciaError>;
