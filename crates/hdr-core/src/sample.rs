//! Floating-point sample precisions.
//!
//! A buffer stores every channel with one static precision, chosen by its
//! [`Sample`] type parameter. Values travel through the rest of the pipeline as
//! `f64`; storing narrows, loading widens.

/// Sample storage precision of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    /// IEEE-754 binary32
    F32,
    /// IEEE-754 binary64
    F64,
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Precision::F32 => f.write_str("f32"),
            Precision::F64 => f.write_str("f64"),
        }
    }
}

/// Trait for per-channel sample types (`f32`, `f64`).
///
/// # Example
///
/// ```
/// use hdr_core::{Precision, Sample};
///
/// let s = <f32 as Sample>::from_f64(0.1);
/// assert_eq!(s.to_f64(), 0.1f32 as f64);
/// assert_eq!(<f64 as Sample>::PRECISION, Precision::F64);
/// ```
pub trait Sample: Copy + Default + PartialEq + PartialOrd + Send + Sync + std::fmt::Debug + 'static {
    /// Bits per sample.
    const BITS: u32;

    /// Precision tag.
    const PRECISION: Precision;

    /// Zero sample.
    const ZERO: Self;

    /// Narrows (or copies) an `f64` into this precision.
    fn from_f64(v: f64) -> Self;

    /// Widens this sample to `f64`. Exact for both precisions.
    fn to_f64(self) -> f64;
}

impl Sample for f32 {
    const BITS: u32 = 32;
    const PRECISION: Precision = Precision::F32;
    const ZERO: Self = 0.0;

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Sample for f64 {
    const BITS: u32 = 64;
    const PRECISION: Precision = Precision::F64;
    const ZERO: Self = 0.0;

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}
