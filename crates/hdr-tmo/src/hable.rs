//! Hable (Uncharted 2) filmic tone mapping.
//!
//! ```text
//! curve(x) = (x(Ax + CB) + DE) / (x(Ax + B) + DF) - E/F
//! out      = (curve(v * 16 * bias) / curve(W))^(1/gamma) * 65536
//! ```
//!
//! Channels are mapped independently. There is no clamp before quantizing:
//! inputs bright enough to pass the white point overshoot and clip to 65535.
//!
//! # Reference
//!
//! <http://filmicworlds.com/blog/filmic-tonemapping-operators/>

use hdr_core::Rgba16;
use hdr_math::transfer::gamma_encode;

/// Shoulder strength.
pub const A: f64 = 0.15;
/// Linear strength.
pub const B: f64 = 0.50;
/// Linear angle.
pub const C: f64 = 0.10;
/// Toe strength.
pub const D: f64 = 0.20;
/// Toe numerator.
pub const E: f64 = 0.02;
/// Toe denominator.
pub const F: f64 = 0.30;
/// Linear white point.
pub const W: f64 = 11.2;

/// The filmic curve.
///
/// `curve(0) == 0`; the curve rises monotonically for positive input.
#[inline]
pub const fn curve(x: f64) -> f64 {
    ((x * (A * x + C * B) + D * E) / (x * (A * x + B) + D * F)) - E / F
}

/// Normalization that maps the white point to 1: `1 / curve(W)`.
pub const WHITE_SCALE: f64 = 1.0 / curve(W);

/// Input pre-scale applied before the exposure bias.
const INPUT_SCALE: f64 = 16.0;

/// Output scale, `1 << 16`.
const OUTPUT_SCALE: f64 = 65536.0;

/// Parameters of the Hable operator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HableParams {
    /// Input exposure multiplier
    pub exposure_bias: f64,
    /// Display gamma; the output is raised to `1 / gamma`
    pub gamma: f64,
}

impl HableParams {
    /// Default exposure bias.
    pub const DEFAULT_EXPOSURE_BIAS: f64 = 2.0;
    /// Default display gamma.
    pub const DEFAULT_GAMMA: f64 = 2.2;

    /// Creates parameters.
    #[inline]
    pub const fn new(exposure_bias: f64, gamma: f64) -> Self {
        Self {
            exposure_bias,
            gamma,
        }
    }

    /// Maps one channel value to 16 bits.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hdr_tmo::HableParams;
    ///
    /// let p = HableParams::default();
    /// assert_eq!(p.channel(0.0), 0);
    /// assert_eq!(p.channel(0.05), 44507);
    /// assert_eq!(p.channel(1.0), 65535);
    /// ```
    #[inline]
    pub fn channel(&self, v: f64) -> u16 {
        let x = v * INPUT_SCALE * self.exposure_bias;
        let col = gamma_encode(curve(x) * WHITE_SCALE, self.gamma);
        (col * OUTPUT_SCALE) as u16
    }

    /// Maps one normalized HDR quad to a display pixel.
    #[inline]
    pub fn map(&self, q: [f64; 4]) -> Rgba16 {
        Rgba16::opaque(self.channel(q[0]), self.channel(q[1]), self.channel(q[2]))
    }
}

impl Default for HableParams {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EXPOSURE_BIAS, Self::DEFAULT_GAMMA)
    }
}
