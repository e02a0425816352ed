//! Error types for grainseg

use thiserror::Error;

/// Main error type for grainseg operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported image shape: {ndim} dimension(s), {channels} channel(s)")]
    InvalidShape { ndim: usize, channels: usize },

    #[error("Pixel buffer size mismatch: expected {expected} bytes (width*height*4), got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Raster size mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    DimensionMismatch { er: usize, ec: usize, ar: usize, ac: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Ambiguous image input: {0}")]
    InputAmbiguity(String),

    #[error("No stored result for identifier '{0}'")]
    MissingArtifact(String),

    #[error("Image has {pixels} pixels, exceeding the limit of {limit}")]
    ImageTooLarge { pixels: u64, limit: u64 },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Unknown morphology attribute: {0}")]
    UnknownAttribute(String),

    #[error("Codec error: {0}")]
    Codec(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Algorithm error: {0}")]
    Algorithm(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for grainseg operations
pub type Result<T> = std::result::Result<T, Error>;
