//! Error types for buffer construction, color conversion and decoding.
//!
//! Pixel access is not part of this taxonomy: reading outside a
//! buffer's bounds yields the zero color and writing there does nothing, so
//! neighbourhood code can probe past image edges without checks.
//!
//! # Usage
//!
//! ```rust
//! use hdr_core::{Error, Result};
//!
//! fn need(bytes: &[u8], n: usize) -> Result<&[u8]> {
//!     if bytes.len() < n {
//!         return Err(Error::out_of_range(n, bytes.len()));
//!     }
//!     Ok(&bytes[..n])
//! }
//!
//! assert!(need(&[0u8; 4], 12).unwrap_err().is_range_error());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the HDR data model and codecs.
#[derive(Debug, Error)]
pub enum Error {
    /// A byte or sample range is shorter than the operation requires.
    ///
    /// Raised by the triple codec when fewer than 12 bytes are available, by
    /// indexed decoding past the end of a stream, and when externally supplied
    /// storage cannot hold the declared bounds.
    #[error("out of range: need {needed} elements, only {available} available")]
    OutOfRange {
        /// Elements required
        needed: usize,
        /// Elements present
        available: usize,
    },

    /// A color value cannot be represented in the target buffer's space.
    #[error("unsupported color: {reason}")]
    UnsupportedColor {
        /// Why the conversion failed
        reason: String,
    },

    /// Row stride is too small for the declared width.
    #[error("stride {stride} is less than minimum {min_stride} for width {width}")]
    InvalidStride {
        /// Provided stride, in samples
        stride: usize,
        /// Minimum stride (`3 * width`)
        min_stride: usize,
        /// Bounds width
        width: usize,
    },
}

impl Error {
    /// Creates an [`Error::OutOfRange`] error.
    #[inline]
    pub fn out_of_range(needed: usize, available: usize) -> Self {
        Self::OutOfRange { needed, available }
    }

    /// Creates an [`Error::UnsupportedColor`] error.
    #[inline]
    pub fn unsupported_color(reason: impl Into<String>) -> Self {
        Self::UnsupportedColor {
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::InvalidStride`] error.
    #[inline]
    pub fn invalid_stride(stride: usize, width: usize) -> Self {
        Self::InvalidStride {
            stride,
            min_stride: width.saturating_mul(3),
            width,
        }
    }

    /// Returns `true` for [`Error::OutOfRange`].
    #[inline]
    pub fn is_range_error(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }

    /// Returns `true` for [`Error::UnsupportedColor`].
    #[inline]
    pub fn is_color_error(&self) -> bool {
        matches!(self, Self::UnsupportedColor { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = Error::out_of_range(12, 7);
        let msg = err.to_string();
        assert!(msg.contains("12"));
        assert!(msg.contains("7"));
        assert!(err.is_range_error());
        assert!(!err.is_color_error());
    }

    #[test]
    fn test_invalid_stride() {
        let err = Error::invalid_stride(5, 4);
        match err {
            Error::InvalidStride { min_stride, .. } => assert_eq!(min_stride, 12),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_unsupported_color() {
        let err = Error::unsupported_color("2 channels");
        assert!(err.is_color_error());
        assert!(err.to_string().contains("2 channels"));
    }
}
