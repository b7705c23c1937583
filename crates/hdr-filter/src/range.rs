//! Constant-time bilateral filtering with a raised-cosine range kernel.
//!
//! The bilateral filter weights each neighbour by a spatial Gaussian and by a
//! range kernel on the intensity difference. Here intensities are first
//! normalized to `s` in `[0, 1]` by the dynamic range `t = max - min` of the
//! input, and the range Gaussian of width `sigma_r` is replaced by
//!
//! ```text
//! g(d) = cos(gamma * d / (rho * sqrt(N)))^N,   gamma = pi/2, rho = gamma * sigma_r
//! ```
//!
//! which tends to `exp(-d^2 / (2 sigma_r^2))` as `N` grows and stays positive
//! over `[-1, 1]` once `N >= 1 / rho^2`. Expanding the power,
//!
//! ```text
//! g(s_x - s_y) = sum_n c_n [cos(w_n s_x) cos(w_n s_y) + sin(w_n s_x) sin(w_n s_y)]
//! c_n = C(N, n) / 2^N,   w_n = (2n - N) * gamma / (rho * sqrt(N))
//! ```
//!
//! so the filter becomes a sum of ordinary spatial blurs:
//!
//! ```text
//! P = sum_n c_n [cos(w_n s) B(cos(w_n s) s) + sin(w_n s) B(sin(w_n s) s)]
//! Q = sum_n c_n [cos(w_n s) B(cos(w_n s))   + sin(w_n s) B(sin(w_n s))]
//! out = (P / Q) * t + min
//! ```
//!
//! `B` is the box-approximated Gaussian of [`gauss`](crate::gauss). Terms `n`
//! and `N - n` are identical, and binomial tails whose mass is below the
//! tolerance are dropped.
//!
//! # Reference
//!
//! K. N. Chaudhury, D. Sage, M. Unser, "Fast O(1) bilateral filtering using
//! trigonometric range kernels", IEEE TIP 2011.

use crate::gauss::SpatialBlur;
use crate::{FilterError, FilterResult};
use hdr_core::{HdrBuffer, HdrColor, PixelReader, Sample, CHANNELS};
use std::f64::consts::FRAC_PI_2;
use std::ops::RangeInclusive;
use tracing::{debug, trace};

/// Default total mass of dropped range terms.
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Largest raised-cosine power a filter may use, reached near `sigma_r = 0.0064`.
pub const MAX_ORDER: usize = 10_000;

const GAMMA: f64 = FRAC_PI_2;
const MIN_ORDER: usize = 3;
/// Normalization weights at or below this keep the input sample.
const MIN_WEIGHT: f64 = 1e-12;

/// Edge-aware smoothing filter.
///
/// - `sigma_r` - range falloff, in units of the input's dynamic range
/// - `sigma_x`, `sigma_y` - spatial falloff in pixels
/// - `sigma_z` - falloff across the layers of a stack
///
/// A spatial sigma of zero disables blurring along that axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeFilter {
    sigma_r: f64,
    sigma_x: f64,
    sigma_y: f64,
    sigma_z: f64,
    tolerance: f64,
}

/// Kernel power for `sigma_r`, in `f64` so tiny sigmas cannot wrap.
fn order_of(sigma_r: f64) -> f64 {
    if sigma_r > 1.0 / (GAMMA * GAMMA) {
        return MIN_ORDER as f64;
    }
    let rho = GAMMA * sigma_r;
    (1.0 / (rho * rho)).ceil().max(MIN_ORDER as f64)
}

fn check_spatial(name: &str, v: f64) -> FilterResult<f64> {
    if v.is_finite() && v >= 0.0 {
        Ok(v)
    } else {
        Err(FilterError::InvalidParameter(format!(
            "{name} must be finite and >= 0, got {v}"
        )))
    }
}

impl RangeFilter {
    /// Creates a filter.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidParameter`] if `sigma_r` is not finite and
    /// positive or so small its order would pass [`MAX_ORDER`], or a spatial
    /// sigma is negative or not finite.
    pub fn new(sigma_r: f64, sigma_x: f64, sigma_y: f64, sigma_z: f64) -> FilterResult<Self> {
        if !(sigma_r.is_finite() && sigma_r > 0.0) {
            return Err(FilterError::InvalidParameter(format!(
                "sigma_r must be finite and > 0, got {sigma_r}"
            )));
        }
        if order_of(sigma_r) > MAX_ORDER as f64 {
            return Err(FilterError::InvalidParameter(format!(
                "sigma_r {sigma_r} needs a kernel order above {MAX_ORDER}"
            )));
        }
        Ok(Self {
            sigma_r,
            sigma_x: check_spatial("sigma_x", sigma_x)?,
            sigma_y: check_spatial("sigma_y", sigma_y)?,
            sigma_z: check_spatial("sigma_z", sigma_z)?,
            tolerance: DEFAULT_TOLERANCE,
        })
    }

    /// Sets the total binomial mass that may be dropped from the expansion.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidParameter`] unless `0 <= eps < 1`.
    pub fn with_tolerance(mut self, eps: f64) -> FilterResult<Self> {
        if !(0.0..1.0).contains(&eps) {
            return Err(FilterError::InvalidParameter(format!(
                "tolerance must be in [0, 1), got {eps}"
            )));
        }
        self.tolerance = eps;
        Ok(self)
    }

    /// Range sigma.
    pub fn sigma_r(&self) -> f64 {
        self.sigma_r
    }

    /// Spatial sigmas `(x, y, z)`.
    pub fn sigma_spatial(&self) -> (f64, f64, f64) {
        (self.sigma_x, self.sigma_y, self.sigma_z)
    }

    /// Dropped-mass tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn rho(&self) -> f64 {
        GAMMA * self.sigma_r
    }

    /// Power `N` of the raised-cosine kernel.
    ///
    /// `3` for `sigma_r > 1 / gamma^2`, else `max(3, ceil(1 / rho^2))`.
    /// Never above [`MAX_ORDER`].
    ///
    /// ```rust
    /// use hdr_filter::RangeFilter;
    ///
    /// assert_eq!(RangeFilter::new(0.5, 1.0, 1.0, 0.0).unwrap().order(), 3);
    /// assert_eq!(RangeFilter::new(0.1, 1.0, 1.0, 0.0).unwrap().order(), 41);
    /// ```
    pub fn order(&self) -> usize {
        order_of(self.sigma_r) as usize
    }

    /// Indices `n` of the expansion terms that are kept.
    ///
    /// Symmetric around `N / 2`; each dropped tail holds at most half the
    /// tolerance.
    pub fn terms(&self) -> RangeInclusive<usize> {
        let order = self.order();
        let weights = binomial_weights(order);
        let half = self.tolerance / 2.0;
        let mut lo = 0;
        let mut tail = 0.0;
        while lo < order / 2 && tail + weights[lo] <= half {
            tail += weights[lo];
            lo += 1;
        }
        lo..=order - lo
    }

    /// Filters one buffer in 2-D.
    ///
    /// Channels are filtered independently, normalized by the dynamic range
    /// over all three. The result is a new buffer with the same bounds.
    /// Constant inputs come back as an unchanged copy. NaN samples are left
    /// out of the dynamic range but spread to their neighbourhood.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidInput`] if the samples span an infinite range.
    pub fn apply<C: HdrColor, S: Sample>(&self, src: &HdrBuffer<C, S>) -> FilterResult<HdrBuffer<C, S>> {
        let mut out = self.apply_stack(std::slice::from_ref(src))?;
        Ok(out.pop().unwrap_or_else(|| src.deep_copy()))
    }

    /// Filters a stack of equally-bounded buffers in 3-D.
    ///
    /// Layer `i` of the stack is `z = i`; `sigma_z` blurs across layers. The
    /// dynamic range covers every layer.
    ///
    /// # Errors
    ///
    /// - [`FilterError::DimensionMismatch`] if the layers differ in bounds
    /// - [`FilterError::InvalidInput`] if the samples span an infinite range
    pub fn apply_stack<C: HdrColor, S: Sample>(
        &self,
        stack: &[HdrBuffer<C, S>],
    ) -> FilterResult<Vec<HdrBuffer<C, S>>> {
        let Some(first) = stack.first() else {
            return Ok(Vec::new());
        };
        let bounds = first.bounds();
        if let Some((i, layer)) = stack.iter().enumerate().find(|(_, b)| b.bounds() != bounds) {
            return Err(FilterError::DimensionMismatch(format!(
                "layer {i} has bounds {}, expected {bounds}",
                layer.bounds()
            )));
        }

        let readers: Vec<PixelReader<'_, C, S>> = stack.iter().map(|b| b.read()).collect();
        let range = readers
            .iter()
            .filter_map(dynamic_range)
            .reduce(|(a, b), (c, d)| (a.min(c), b.max(d)));
        let Some((min, max)) = range else {
            trace!(%bounds, "no samples, copying input");
            drop(readers);
            return Ok(stack.iter().map(|b| b.deep_copy()).collect());
        };
        let t = max - min;
        if !t.is_finite() {
            return Err(FilterError::InvalidInput(format!(
                "sample range [{min}, {max}] is not finite"
            )));
        }
        if t == 0.0 {
            trace!(%bounds, value = min, "constant input, copying");
            drop(readers);
            return Ok(stack.iter().map(|b| b.deep_copy()).collect());
        }

        let (width, height, depth) = (bounds.width(), bounds.height(), stack.len());
        let plane = width * height;
        let order = self.order();
        let terms = self.terms();
        debug!(
            width,
            height,
            depth,
            sigma_r = self.sigma_r,
            order,
            terms = terms.end() - terms.start() + 1,
            "Applying range filter"
        );
        trace!(min, max, "dynamic range");

        let blur = SpatialBlur::new(self.sigma_x, self.sigma_y, self.sigma_z);
        let weights = binomial_weights(order);
        let mut layers = vec![vec![0.0f64; plane * CHANNELS]; depth];

        for c in 0..CHANNELS {
            let mut s = Vec::with_capacity(plane * depth);
            for reader in &readers {
                for y in bounds.min_y..bounds.max_y {
                    s.extend(reader.row(y).iter().skip(c).step_by(CHANNELS).map(|v| (v.to_f64() - min) / t));
                }
            }
            let filtered = self.filter_channel(&s, (width, height, depth), &blur, &terms, &weights);
            for (z, layer) in layers.iter_mut().enumerate() {
                let src = &filtered[z * plane..(z + 1) * plane];
                for (i, v) in src.iter().enumerate() {
                    layer[i * CHANNELS + c] = v * t + min;
                }
            }
        }
        drop(readers);

        layers
            .into_iter()
            .map(|layer| {
                let samples = layer.into_iter().map(S::from_f64).collect();
                HdrBuffer::from_samples(samples, width * CHANNELS, bounds).map_err(FilterError::from)
            })
            .collect()
    }

    /// Filters one normalized channel volume.
    fn filter_channel(
        &self,
        s: &[f64],
        dims: (usize, usize, usize),
        blur: &SpatialBlur,
        terms: &RangeInclusive<usize>,
        weights: &[f64],
    ) -> Vec<f64> {
        let order = self.order();
        let scale = GAMMA / (self.rho() * (order as f64).sqrt());
        let mut p = vec![0.0; s.len()];
        let mut q = vec![0.0; s.len()];

        for n in *terms.start()..=order / 2 {
            // Term N - n mirrors term n
            let weight = if 2 * n == order { weights[n] } else { 2.0 * weights[n] };
            let omega = (2.0 * n as f64 - order as f64) * scale;

            let cos: Vec<f64> = s.iter().map(|v| (omega * v).cos()).collect();
            let sin: Vec<f64> = s.iter().map(|v| (omega * v).sin()).collect();
            let mut cos_s: Vec<f64> = cos.iter().zip(s).map(|(a, v)| a * v).collect();
            let mut sin_s: Vec<f64> = sin.iter().zip(s).map(|(a, v)| a * v).collect();
            let mut cos_b = cos.clone();
            let mut sin_b = sin.clone();
            blur.apply(&mut cos_s, dims);
            blur.apply(&mut sin_s, dims);
            blur.apply(&mut cos_b, dims);
            blur.apply(&mut sin_b, dims);

            for i in 0..s.len() {
                p[i] += weight * (cos[i] * cos_s[i] + sin[i] * sin_s[i]);
                q[i] += weight * (cos[i] * cos_b[i] + sin[i] * sin_b[i]);
            }
        }

        s.iter()
            .zip(p.iter().zip(&q))
            .map(|(&v, (&num, &den))| if den > MIN_WEIGHT { num / den } else { v })
            .collect()
    }
}

/// Binomial weights `C(N, n) / 2^N` for `n in 0..=N`, computed in log space.
fn binomial_weights(order: usize) -> Vec<f64> {
    let mut ln_c = -(order as f64) * std::f64::consts::LN_2;
    let mut out = Vec::with_capacity(order + 1);
    for n in 0..=order {
        out.push(ln_c.exp());
        ln_c += ((order - n) as f64 / (n + 1) as f64).ln();
    }
    out
}

/// Smallest and largest non-NaN sample, or `None` for an empty input.
pub fn dynamic_range<C: HdrColor, S: Sample>(reader: &PixelReader<'_, C, S>) -> Option<(f64, f64)> {
    reader.sample_range()
}
