//! Operator dispatch and the row driver shared by all operators.

use crate::{AcesParams, HableParams};
use hdr_core::{DisplayImage, HdrBuffer, HdrColor, HdrImage, Rgba16, Sample, DISPLAY_CHANNELS};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A tone mapping operator with its parameters.
///
/// # Example
///
/// ```rust
/// use hdr_tmo::{HableParams, ToneMap};
///
/// let op: ToneMap = "hable".parse().unwrap();
/// assert_eq!(op, ToneMap::Hable(HableParams::default()));
/// assert_eq!(ToneMap::default().name(), "aces");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "operator", rename_all = "lowercase"))]
pub enum ToneMap {
    /// Fitted ACES with sRGB output
    Aces(AcesParams),
    /// Hable / Uncharted 2 filmic curve
    Hable(HableParams),
}

impl ToneMap {
    /// Lowercase operator name.
    pub const fn name(&self) -> &'static str {
        match self {
            ToneMap::Aces(_) => "aces",
            ToneMap::Hable(_) => "hable",
        }
    }

    /// Maps every pixel of `src` into a new display image with the same bounds.
    pub fn perform<I: HdrImage + Sync + ?Sized>(&self, src: &I) -> DisplayImage {
        let bounds = src.bounds();
        debug!(
            operator = self.name(),
            width = bounds.width(),
            height = bounds.height(),
            space = %src.color_space(),
            "Tone mapping"
        );
        match self {
            ToneMap::Aces(p) => map_rows(src, |q| p.map(q)),
            ToneMap::Hable(p) => map_rows(src, |q| p.map(q)),
        }
    }
}

impl Default for ToneMap {
    fn default() -> Self {
        ToneMap::Aces(AcesParams::default())
    }
}

impl From<AcesParams> for ToneMap {
    fn from(p: AcesParams) -> Self {
        ToneMap::Aces(p)
    }
}

impl From<HableParams> for ToneMap {
    fn from(p: HableParams) -> Self {
        ToneMap::Hable(p)
    }
}

impl fmt::Display for ToneMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing an unknown operator name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tone map operator '{0}', expected 'aces' or 'hable'")]
pub struct UnknownOperator(pub String);

impl FromStr for ToneMap {
    type Err = UnknownOperator;

    /// Parses an operator name, case-insensitively, with default parameters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aces" => Ok(ToneMap::Aces(AcesParams::default())),
            "hable" | "uncharted2" => Ok(ToneMap::Hable(HableParams::default())),
            _ => Err(UnknownOperator(s.to_string())),
        }
    }
}

/// Tone maps `src` with `op`.
///
/// Same as [`ToneMap::perform`].
#[inline]
pub fn perform<I: HdrImage + Sync + ?Sized>(op: &ToneMap, src: &I) -> DisplayImage {
    op.perform(src)
}

/// Runs `f` over every pixel, writing output rows independently.
fn map_rows<I, F>(src: &I, f: F) -> DisplayImage
where
    I: HdrImage + Sync + ?Sized,
    F: Fn([f64; 4]) -> Rgba16 + Sync,
{
    let bounds = src.bounds();
    let mut out = DisplayImage::new(bounds);
    if bounds.is_empty() {
        trace!(%bounds, "empty source, nothing to map");
        return out;
    }
    let stride = out.stride();

    let map_row = |(row, line): (usize, &mut [u16])| {
        let y = bounds.min_y + row as i32;
        for (col, px) in line.chunks_exact_mut(DISPLAY_CHANNELS).enumerate() {
            let x = bounds.min_x + col as i32;
            px.copy_from_slice(&f(src.hdr_at(x, y)).to_array());
        }
    };

    #[cfg(feature = "parallel")]
    out.as_raw_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(map_row);

    #[cfg(not(feature = "parallel"))]
    out.as_raw_mut()
        .chunks_mut(stride)
        .enumerate()
        .for_each(map_row);

    out
}

/// A source buffer bound to an operator.
///
/// Immutable: it only borrows the buffer, and [`perform`](Self::perform) can
/// run any number of times.
///
/// ```rust
/// use hdr_core::{Rect, Rgb, Rgb32};
/// use hdr_tmo::ToneMapper;
///
/// let mut img = Rgb32::new(Rect::from_size(4, 4));
/// img.fill(Rgb::splat(0.18));
///
/// let mapper = ToneMapper::aces(&img, 1.8);
/// let out = mapper.perform();
/// assert_eq!(out.get(2, 2).r, 31010);
/// ```
#[derive(Debug)]
pub struct ToneMapper<'a, C: HdrColor, S: Sample> {
    source: &'a HdrBuffer<C, S>,
    op: ToneMap,
}

impl<'a, C: HdrColor, S: Sample> ToneMapper<'a, C, S> {
    /// Binds `source` to an operator.
    pub fn new(source: &'a HdrBuffer<C, S>, op: impl Into<ToneMap>) -> Self {
        Self {
            source,
            op: op.into(),
        }
    }

    /// ACES with the given exposure bias.
    pub fn aces(source: &'a HdrBuffer<C, S>, exposure_bias: f64) -> Self {
        Self::new(source, AcesParams::new(exposure_bias))
    }

    /// ACES with exposure bias 1.8.
    pub fn default_aces(source: &'a HdrBuffer<C, S>) -> Self {
        Self::new(source, AcesParams::default())
    }

    /// Hable with the given exposure bias and gamma.
    pub fn hable(source: &'a HdrBuffer<C, S>, exposure_bias: f64, gamma: f64) -> Self {
        Self::new(source, HableParams::new(exposure_bias, gamma))
    }

    /// Hable with exposure bias 2.0 and gamma 2.2.
    pub fn default_hable(source: &'a HdrBuffer<C, S>) -> Self {
        Self::new(source, HableParams::default())
    }

    /// The bound operator.
    pub fn op(&self) -> &ToneMap {
        &self.op
    }

    /// The bound source.
    pub fn source(&self) -> &'a HdrBuffer<C, S> {
        self.source
    }

    /// Tone maps the source into a new display image.
    ///
    /// The source is read-locked for the whole pass.
    pub fn perform(&self) -> DisplayImage {
        let reader = self.source.read();
        self.op.perform(&reader)
    }
}
