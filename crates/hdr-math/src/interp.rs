//! Clamping helpers.

/// Clamps a value to `[min, max]`.
///
/// NaN passes through unchanged.
///
/// # Example
///
/// ```rust
/// use hdr_math::clamp;
///
/// assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
/// assert_eq!(clamp(-0.5, 0.0, 1.0), 0.0);
/// ```
#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Clamps a value to `[0, 1]`.
///
/// ```rust
/// use hdr_math::saturate;
///
/// assert_eq!(saturate(2.0), 1.0);
/// assert_eq!(saturate(0.25), 0.25);
/// ```
#[inline]
pub fn saturate(value: f64) -> f64 {
    clamp(value, 0.0, 1.0)
}

/// Clamps each component of a vector to `[0, 1]`.
#[inline]
pub fn saturate_vec(v: crate::Vec3) -> crate::Vec3 {
    crate::Vec3::new(saturate(v.x), saturate(v.y), saturate(v.z))
}
