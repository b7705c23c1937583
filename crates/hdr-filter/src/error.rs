//! Error types for filtering.

use thiserror::Error;

/// Error type for filter construction and application.
#[derive(Error, Debug)]
pub enum FilterError {
    /// A sigma or tolerance is out of its domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Stack layers do not share the same bounds.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Input samples cannot be normalized (infinite dynamic range).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Buffer construction failed.
    #[error(transparent)]
    Buffer(#[from] hdr_core::Error),
}

/// Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;
