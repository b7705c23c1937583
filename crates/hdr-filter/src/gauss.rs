//! Gaussian blur approximated by three successive box filters.
//!
//! Box widths follow Kovesi's scheme: two widths `wl` and `wu = wl + 2`
//! (both odd), with `m` passes of `wl` chosen so the summed box variance is
//! closest to `sigma^2`. Each box pass is a running sum, so the cost per
//! sample does not depend on sigma.
//!
//! Edges are clamped: samples past either end repeat the end value, which
//! keeps constant fields constant.
//!
//! # Reference
//!
//! P. Kovesi, "Fast Almost-Gaussian Filtering", DICTA 2010.

use rayon::prelude::*;
use tracing::trace;

/// Number of box passes per axis.
pub const PASSES: usize = 3;

/// Odd box widths whose cascade approximates a Gaussian of `sigma`.
///
/// `sigma <= 0` gives unit widths (identity).
///
/// # Example
///
/// ```rust
/// use hdr_filter::gauss::box_sizes;
///
/// assert_eq!(box_sizes(0.0), [1, 1, 1]);
/// assert_eq!(box_sizes(2.0), [3, 3, 5]);
/// ```
pub fn box_sizes(sigma: f64) -> [usize; PASSES] {
    if !(sigma > 0.0) {
        return [1; PASSES];
    }
    let n = PASSES as f64;
    let var12 = 12.0 * sigma * sigma;
    let w_ideal = (var12 / n + 1.0).sqrt();
    let mut wl = w_ideal.floor() as usize;
    if wl % 2 == 0 {
        wl = wl.saturating_sub(1).max(1);
    }
    let wu = wl + 2;
    let wlf = wl as f64;
    let m_ideal = (var12 - n * wlf * wlf - 4.0 * n * wlf - 3.0 * n) / (-4.0 * wlf - 4.0);
    let m = m_ideal.round().clamp(0.0, n) as usize;

    let mut sizes = [wu; PASSES];
    for s in sizes.iter_mut().take(m) {
        *s = wl;
    }
    sizes
}

/// Box radii (`(size - 1) / 2`) for [`box_sizes`].
#[inline]
pub fn box_radii(sigma: f64) -> [usize; PASSES] {
    box_sizes(sigma).map(|s| (s - 1) / 2)
}

/// One edge-clamped box pass of radius `r` from `src` into `dst`.
///
/// # Panics
///
/// Panics if the slices differ in length.
pub fn box_line(src: &[f64], dst: &mut [f64], r: usize) {
    assert_eq!(src.len(), dst.len(), "box_line slices differ in length");
    let n = src.len();
    if n == 0 {
        return;
    }
    if r == 0 {
        dst.copy_from_slice(src);
        return;
    }
    let last = n as isize - 1;
    let ri = r as isize;
    let at = |i: isize| src[i.clamp(0, last) as usize];
    let inv = 1.0 / (2 * r + 1) as f64;

    let mut sum: f64 = (-ri..=ri).map(at).sum();
    for (i, out) in dst.iter_mut().enumerate() {
        *out = sum * inv;
        let i = i as isize;
        sum += at(i + ri + 1) - at(i - ri);
    }
}

/// Runs all box passes over one line in place; `tmp` must match its length.
fn blur_line(line: &mut [f64], tmp: &mut [f64], radii: &[usize; PASSES]) {
    for &r in radii.iter().filter(|&&r| r > 0) {
        box_line(line, tmp, r);
        line.copy_from_slice(tmp);
    }
}

/// Separable spatial blur over a `width x height x depth` volume.
///
/// Volumes are `f64` slices indexed `(z * height + y) * width + x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpatialBlur {
    x: [usize; PASSES],
    y: [usize; PASSES],
    z: [usize; PASSES],
}

impl SpatialBlur {
    /// Creates a blur with per-axis standard deviations, in pixels (layers for z).
    pub fn new(sigma_x: f64, sigma_y: f64, sigma_z: f64) -> Self {
        let blur = Self {
            x: box_radii(sigma_x),
            y: box_radii(sigma_y),
            z: box_radii(sigma_z),
        };
        trace!(x = ?blur.x, y = ?blur.y, z = ?blur.z, "box radii");
        blur
    }

    /// Box radii along x, y and z.
    pub fn radii(&self) -> [[usize; PASSES]; 3] {
        [self.x, self.y, self.z]
    }

    /// Returns `true` if no axis blurs.
    pub fn is_identity(&self) -> bool {
        self.radii().iter().flatten().all(|&r| r == 0)
    }

    /// Blurs `data` in place.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != width * height * depth`.
    pub fn apply(&self, data: &mut [f64], (width, height, depth): (usize, usize, usize)) {
        assert_eq!(data.len(), width * height * depth, "volume size mismatch");
        if data.is_empty() {
            return;
        }

        if self.x.iter().any(|&r| r > 0) {
            data.par_chunks_mut(width)
                .for_each_init(|| vec![0.0; width], |tmp, row| blur_line(row, tmp, &self.x));
        }

        if height > 1 && self.y.iter().any(|&r| r > 0) {
            data.par_chunks_mut(width * height).for_each(|slice| {
                let cols: Vec<Vec<f64>> = (0..width)
                    .into_par_iter()
                    .map(|x| {
                        let mut col: Vec<f64> = (0..height).map(|y| slice[y * width + x]).collect();
                        let mut tmp = vec![0.0; height];
                        blur_line(&mut col, &mut tmp, &self.y);
                        col
                    })
                    .collect();
                for (x, col) in cols.iter().enumerate() {
                    for (y, v) in col.iter().enumerate() {
                        slice[y * width + x] = *v;
                    }
                }
            });
        }

        if depth > 1 && self.z.iter().any(|&r| r > 0) {
            let plane = width * height;
            let data_ref: &[f64] = data;
            let lines: Vec<Vec<f64>> = (0..plane)
                .into_par_iter()
                .map(|i| {
                    let mut line: Vec<f64> = (0..depth).map(|z| data_ref[z * plane + i]).collect();
                    let mut tmp = vec![0.0; depth];
                    blur_line(&mut line, &mut tmp, &self.z);
                    line
                })
                .collect();
            for (i, line) in lines.iter().enumerate() {
                for (z, v) in line.iter().enumerate() {
                    data[z * plane + i] = *v;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sizes() {
        assert_eq!(box_sizes(0.0), [1, 1, 1]);
        assert_eq!(box_sizes(-1.0), [1, 1, 1]);
        assert_eq!(box_sizes(f64::NAN), [1, 1, 1]);
        assert_eq!(box_sizes(1.0), [1, 1, 3]);
        assert_eq!(box_sizes(2.0), [3, 3, 5]);
        assert_eq!(box_radii(2.0), [1, 1, 2]);
        for s in box_sizes(7.5) {
            assert_eq!(s % 2, 1);
        }
    }

    #[test]
    fn test_variance_tracks_sigma() {
        for sigma in [3.0, 5.0, 10.0] {
            let var: f64 = box_sizes(sigma)
                .iter()
                .map(|&w| ((w * w) as f64 - 1.0) / 12.0)
                .sum();
            assert_relative_eq!(var.sqrt(), sigma, max_relative = 0.1);
        }
    }

    #[test]
    fn test_box_line_interior() {
        let src = [0.0, 0.0, 3.0, 0.0, 0.0];
        let mut dst = [0.0; 5];
        box_line(&src, &mut dst, 1);
        assert_relative_eq!(dst[1], 1.0);
        assert_relative_eq!(dst[2], 1.0);
        assert_relative_eq!(dst[3], 1.0);
        assert_relative_eq!(dst[0], 0.0);
    }

    #[test]
    fn test_box_line_clamps_edges() {
        let src = [3.0, 0.0, 0.0];
        let mut dst = [0.0; 3];
        box_line(&src, &mut dst, 1);
        // Window at 0 is [3, 3, 0]
        assert_relative_eq!(dst[0], 2.0);
        assert_relative_eq!(dst[1], 1.0);
        assert_relative_eq!(dst[2], 0.0);
    }

    #[test]
    fn test_box_line_radius_exceeds_length() {
        let src = [1.0, 5.0];
        let mut dst = [0.0; 2];
        box_line(&src, &mut dst, 4);
        // 9-wide window, ends repeated: 5 ones and 4 fives at i=0
        assert_relative_eq!(dst[0], (5.0 * 1.0 + 4.0 * 5.0) / 9.0, epsilon = 1e-12);
        assert_relative_eq!(dst[1], (4.0 * 1.0 + 5.0 * 5.0) / 9.0, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_volume_unchanged() {
        let blur = SpatialBlur::new(2.0, 3.0, 1.0);
        let dims = (7, 5, 3);
        let mut data = vec![0.75; 7 * 5 * 3];
        blur.apply(&mut data, dims);
        for v in data {
            assert_relative_eq!(v, 0.75, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_impulse_is_symmetric() {
        let blur = SpatialBlur::new(2.0, 2.0, 0.0);
        let (w, h) = (21, 21);
        let mut data = vec![0.0; w * h];
        data[10 * w + 10] = 1.0;
        blur.apply(&mut data, (w, h, 1));
        let total: f64 = data.iter().sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-9);
        assert_relative_eq!(data[10 * w + 8], data[10 * w + 12], epsilon = 1e-12);
        assert_relative_eq!(data[8 * w + 10], data[12 * w + 10], epsilon = 1e-12);
        assert_relative_eq!(data[10 * w + 8], data[8 * w + 10], epsilon = 1e-12);
        assert!(data[10 * w + 10] > data[10 * w + 11]);
    }

    #[test]
    fn test_z_axis_only() {
        let blur = SpatialBlur::new(0.0, 0.0, 1.0);
        let mut data = vec![0.0, 0.0, 3.0, 3.0, 0.0, 0.0];
        blur.apply(&mut data, (2, 1, 3));
        // z radii [0, 0, 1]; line per (x, y) is [0, 3, 0]
        assert_relative_eq!(data[2], 1.0, epsilon = 1e-12);
        assert_relative_eq!(data[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(data[4], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_identity() {
        let blur = SpatialBlur::new(0.0, 0.0, 0.0);
        assert!(blur.is_identity());
        let mut data = vec![1.0, 2.0, 3.0];
        blur.apply(&mut data, (3, 1, 1));
        assert_eq!(data, vec![1.0, 2.0, 3.0]);
    }
}
