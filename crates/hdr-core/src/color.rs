//! HDR color values and the generic color accepted by buffers.
//!
//! Two peer color spaces are supported:
//!
//! - [`Rgb`] - linear RGB
//! - [`Xyz`] - CIE XYZ tristimulus
//!
//! Components are unbounded `f64`: HDR values exceed 1.0 and may be negative.
//!
//! # Normalized Quad
//!
//! Every color exposes [`HdrColor::hdr_rgba`], a 4-component `(r, g, b, a)`
//! quad with `a == OPAQUE`. It is the common currency between spaces and the
//! display encoding. The XYZ quad carries X, Y, Z in the r, g, b slots
//! unchanged: no colorimetric transform happens at the storage layer.
//!
//! ```
//! use hdr_core::{HdrColor, Rgb, Xyz, OPAQUE};
//!
//! let xyz = Xyz::new(0.25, 2.0, -0.5);
//! assert_eq!(xyz.hdr_rgba(), [0.25, 2.0, -0.5, OPAQUE]);
//!
//! // Conversion goes through the quad and is total.
//! let rgb = Rgb::from_quad(xyz.hdr_rgba());
//! assert_eq!(rgb, Rgb::new(0.25, 2.0, -0.5));
//! ```

use crate::display::{Rgba16, RANGE_MAX};
use crate::{Error, Result};
use std::fmt;

/// Fourth component of a normalized quad: fully opaque.
pub const OPAQUE: f64 = 1.0;

/// Color space tag of a color value or buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    /// Linear RGB
    Rgb,
    /// CIE XYZ
    Xyz,
}

impl ColorSpace {
    /// Short name of the space.
    pub const fn name(&self) -> &'static str {
        match self {
            ColorSpace::Rgb => "RGB",
            ColorSpace::Xyz => "XYZ",
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A 3-component color in one of the supported spaces.
///
/// Implemented by [`Rgb`] and [`Xyz`]; a buffer's color type parameter picks
/// its space.
pub trait HdrColor: Copy + Default + PartialEq + Send + Sync + fmt::Debug + 'static {
    /// Space of this color type.
    const SPACE: ColorSpace;

    /// Builds a color from its three components, in storage order.
    fn from_components(c: [f64; 3]) -> Self;

    /// Returns the three components, in storage order.
    fn components(&self) -> [f64; 3];

    /// Returns the normalized `(r, g, b, a)` quad.
    #[inline]
    fn hdr_rgba(&self) -> [f64; 4] {
        let [a, b, c] = self.components();
        [a, b, c, OPAQUE]
    }

    /// Builds a color from a normalized quad, ignoring alpha.
    #[inline]
    fn from_quad(q: [f64; 4]) -> Self {
        Self::from_components([q[0], q[1], q[2]])
    }

    /// Converts a generic [`Color`] into this space.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedColor`] if the value has no quad representation.
    #[inline]
    fn convert(color: &Color) -> Result<Self> {
        color.hdr_rgba().map(Self::from_quad)
    }
}

/// Linear RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    /// Red
    pub r: f64,
    /// Green
    pub g: f64,
    /// Blue
    pub b: f64,
}

impl Rgb {
    /// Creates an RGB color.
    #[inline]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Creates a gray with all components equal to `v`.
    #[inline]
    pub const fn splat(v: f64) -> Self {
        Self::new(v, v, v)
    }
}

impl HdrColor for Rgb {
    const SPACE: ColorSpace = ColorSpace::Rgb;

    #[inline]
    fn from_components(c: [f64; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }

    #[inline]
    fn components(&self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RGB({}, {}, {})", self.r, self.g, self.b)
    }
}

/// CIE XYZ tristimulus color.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Xyz {
    /// X
    pub x: f64,
    /// Y (luminance)
    pub y: f64,
    /// Z
    pub z: f64,
}

impl Xyz {
    /// Creates an XYZ color.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl HdrColor for Xyz {
    const SPACE: ColorSpace = ColorSpace::Xyz;

    #[inline]
    fn from_components(c: [f64; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }

    #[inline]
    fn components(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl fmt::Display for Xyz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "XYZ({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Any color value a buffer can be asked to store.
///
/// [`HdrBuffer::set_color`](crate::HdrBuffer::set_color) converts it into the
/// buffer's own space first.
#[derive(Debug, Clone, PartialEq)]
pub enum Color {
    /// Linear RGB value
    Rgb(Rgb),
    /// CIE XYZ value
    Xyz(Xyz),
    /// 16-bit display pixel, normalized by [`RANGE_MAX`]
    Display(Rgba16),
    /// Raw channel samples from an external decoder.
    ///
    /// Three channels are read as `(c0, c1, c2)`, four as a full quad. Any
    /// other count is unsupported.
    Channels(Vec<f64>),
}

impl Color {
    /// Returns the normalized quad of this value.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedColor`] for [`Color::Channels`] with a channel count
    /// other than 3 or 4.
    pub fn hdr_rgba(&self) -> Result<[f64; 4]> {
        match self {
            Color::Rgb(c) => Ok(c.hdr_rgba()),
            Color::Xyz(c) => Ok(c.hdr_rgba()),
            Color::Display(p) => {
                let max = RANGE_MAX as f64;
                Ok([
                    p.r as f64 / max,
                    p.g as f64 / max,
                    p.b as f64 / max,
                    p.a as f64 / max,
                ])
            }
            Color::Channels(ch) => match ch.as_slice() {
                [a, b, c] => Ok([*a, *b, *c, OPAQUE]),
                [a, b, c, d] => Ok([*a, *b, *c, *d]),
                other => Err(Error::unsupported_color(format!(
                    "{} channel sample cannot be mapped to a 3-component color",
                    other.len()
                ))),
            },
        }
    }
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::Rgb(c)
    }
}

impl From<Xyz> for Color {
    fn from(c: Xyz) -> Self {
        Color::Xyz(c)
    }
}

impl From<Rgba16> for Color {
    fn from(p: Rgba16) -> Self {
        Color::Display(p)
    }
}
