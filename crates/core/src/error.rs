//! Error types for verdant

use thiserror::Error;

/// Main error type for verdant operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Band shape mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    ShapeMismatch {
        er: usize,
        ec: usize,
        ar: usize,
        ac: usize,
    },

    #[error("Cannot read raster '{path}': {reason}")]
    UnreadableRaster { path: String, reason: String },

    #[error("Missing input: {0}")]
    MissingInput(&'static str),

    #[error("No valid data: every pixel is masked")]
    EmptyResult,

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Invalid classification scheme: {0}")]
    InvalidClassScheme(String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("GDAL error: {0}")]
    #[cfg(feature = "gdal")]
    Gdal(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(feature = "gdal")]
impl From<gdal::errors::GdalError> for Error {
    fn from(e: gdal::errors::GdalError) -> Self {
        Error::Gdal(e.to_string())
    }
}

/// Result type alias for verdant operations
pub type Result<T> = std::result::Result<T, Error>;
