//! Display encoding curves.
//!
//! Both curves take linear light and return an encoded display value. Input is
//! expected in `[0, 1]`; callers that tone map first are already there.
//!
//! # Reference
//!
//! IEC 61966-2-1:1999 (sRGB)

use crate::saturate;

/// Linear threshold below which sRGB encoding is a straight line.
pub const SRGB_LINEAR_CUTOFF: f64 = 0.0031308;

/// sRGB OETF: encodes linear light to sRGB.
///
/// # Formula
///
/// ```text
/// if L < 0.0031308:
///     V = L * 12.92
/// else:
///     V = 1.055 * sat(L)^(1/2.4) - 0.055
/// ```
///
/// The power segment clamps its input to `[0, 1]` first, so HDR values above
/// one encode as white.
///
/// # Example
///
/// ```rust
/// use hdr_math::transfer::srgb_oetf;
///
/// assert!((srgb_oetf(0.214) - 0.5).abs() < 0.01);
/// assert!((srgb_oetf(1.0) - 1.0).abs() < 1e-12);
/// assert!((srgb_oetf(4.0) - 1.0).abs() < 1e-12);
/// ```
#[inline]
pub fn srgb_oetf(l: f64) -> f64 {
    if l < SRGB_LINEAR_CUTOFF {
        l * 12.92
    } else {
        1.055 * saturate(l).powf(1.0 / 2.4) - 0.055
    }
}

/// Pure gamma encoding: `l^(1/gamma)`.
///
/// No clamping: negative input yields NaN and `gamma == 0` yields infinities,
/// mirroring plain `powf`.
///
/// ```rust
/// use hdr_math::transfer::gamma_encode;
///
/// assert!((gamma_encode(0.218, 2.2) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn gamma_encode(l: f64, gamma: f64) -> f64 {
    l.powf(1.0 / gamma)
}
