//! Fitted ACES tone mapping.
//!
//! A rational approximation of the ACES RRT + sRGB ODT, evaluated in a
//! pre-rotated working space:
//!
//! ```text
//! rgb -> INPUT_MAT -> rrt_and_odt_fit -> OUTPUT_MAT -> saturate
//!     -> * exposure_bias -> sRGB OETF -> * 65535
//! ```
//!
//! The exposure bias scales the saturated result, not the HDR input. Biases
//! above one push highlights into the clip of the transfer curve.
//!
//! # Reference
//!
//! Stephen Hill's fit, as used in MJP's BakingLab (`ACES.hlsl`).

use hdr_core::{Rgba16, RANGE_MAX};
use hdr_math::transfer::srgb_oetf;
use hdr_math::{saturate_vec, Mat3, Vec3};

/// sRGB => XYZ => D65_2_D60 => AP1 => RRT_SAT
pub const ACES_INPUT_MAT: Mat3 = Mat3::from_rows([
    [0.59719, 0.35458, 0.04823],
    [0.07600, 0.90834, 0.01566],
    [0.02840, 0.13383, 0.83777],
]);

/// ODT_SAT => XYZ => D60_2_D65 => sRGB
pub const ACES_OUTPUT_MAT: Mat3 = Mat3::from_rows([
    [1.60475, -0.53108, -0.07367],
    [-0.10208, 1.10813, -0.00605],
    [-0.00327, -0.07276, 1.07602],
]);

/// Rational fit of the combined RRT and ODT curve, per component.
///
/// ```text
/// (x * (x + 0.0245786) - 0.000090537) / (x * (0.983729 * x + 0.4329510) + 0.238081)
/// ```
#[inline]
pub fn rrt_and_odt_fit(v: Vec3) -> Vec3 {
    let a = v * (v + 0.0245786) - 0.000090537;
    let b = v * (0.983729 * v + 0.4329510) + 0.238081;
    a / b
}

/// Full ACES fit of a linear RGB triplet, saturated to `[0, 1]`.
///
/// # Example
///
/// ```rust
/// use hdr_math::Vec3;
/// use hdr_tmo::aces::aces_fitted;
///
/// assert_eq!(aces_fitted(Vec3::ZERO), Vec3::ZERO);
/// let white = aces_fitted(Vec3::splat(1e6));
/// assert!(white.min_element() > 0.99);
/// ```
#[inline]
pub fn aces_fitted(rgb: Vec3) -> Vec3 {
    let v = ACES_INPUT_MAT * rgb;
    let v = rrt_and_odt_fit(v);
    saturate_vec(ACES_OUTPUT_MAT * v)
}

/// Parameters of the ACES operator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AcesParams {
    /// Multiplier applied to the saturated fit before display encoding
    pub exposure_bias: f64,
}

impl AcesParams {
    /// Default exposure bias.
    pub const DEFAULT_EXPOSURE_BIAS: f64 = 1.8;

    /// Creates parameters with the given exposure bias.
    #[inline]
    pub const fn new(exposure_bias: f64) -> Self {
        Self { exposure_bias }
    }

    /// Maps one normalized HDR quad to a display pixel.
    #[inline]
    pub fn map(&self, q: [f64; 4]) -> Rgba16 {
        let c = aces_fitted(Vec3::new(q[0], q[1], q[2])) * self.exposure_bias;
        Rgba16::opaque(encode(c.x), encode(c.y), encode(c.z))
    }
}

impl Default for AcesParams {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EXPOSURE_BIAS)
    }
}

/// sRGB-encodes a linear value and quantizes to 16 bits.
#[inline]
fn encode(linear: f64) -> u16 {
    (srgb_oetf(linear) * RANGE_MAX as f64) as u16
}
