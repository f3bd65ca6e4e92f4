//! Error taxonomy. Every variant is fatal to the current build.

use std::path::PathBuf;

use thiserror::Error;

pub type CollageResult<T> = Result<T, CollageError>;

#[derive(Debug, Error)]
pub enum CollageError {
    #[error("Missing capability: {0}")]
    MissingCapability(String),

    #[error("Unsupported output format \"{requested}\". Supported types: {supported}")]
    UnsupportedFormat { requested: String, supported: String },

    #[error("Cannot create directory {}: {source}", path.display())]
    DirectoryCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid file name: {0}")]
    InvalidFilename(String),

    #[error("Invalid asset count \"{found}\", expected exactly {expected}")]
    AssetCountMismatch { found: usize, expected: usize },

    #[error("Cannot decode {}: {source}", path.display())]
    DecodeFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(
        "Asset {} is {}x{}, expected {}x{}",
        path.display(), actual.0, actual.1, expected.0, expected.1
    )]
    AssetDimensionMismatch {
        path: PathBuf,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write response: {0}")]
    Response(#[source] std::io::Error),

    #[error("Encoding error: {0}")]
    Encode(String),
}

impl CollageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
