//! # hdr-math
//!
//! Math utilities for HDR color processing.
//!
//! - [`Mat3`] - 3x3 matrices for color space transformations
//! - [`Vec3`] - 3D vectors for RGB/XYZ triplets ([`glam::DVec3`])
//! - [`saturate`], [`clamp`] - range clamping
//! - [`transfer`] - display encoding curves (sRGB, pure gamma)
//!
//! All math runs in `f64`, the precision colors travel in.
//!
//! # Design
//!
//! Matrices are **row-major** with **column vectors**:
//!
//! ```text
//! result = matrix * vector
//! ```
//!
//! # Usage
//!
//! ```rust
//! use hdr_math::{Mat3, Vec3};
//!
//! let m = Mat3::from_rows([[2.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.5]]);
//! let v = m * Vec3::new(1.0, 1.0, 1.0);
//! assert_eq!(v, Vec3::new(2.0, 1.0, 0.5));
//! ```
//!
//! # Dependencies
//!
//! - [`glam`] - vector type
//!
//! # Used By
//!
//! - `hdr-tmo` - ACES matrices, saturation and display transfer

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod interp;
mod mat3;
pub mod transfer;

pub use interp::*;
pub use mat3::*;

/// 3D double-precision vector for color triplets.
///
/// For RGB: x=R, y=G, z=B. For XYZ: x=X, y=Y, z=Z.
pub type Vec3 = glam::DVec3;
