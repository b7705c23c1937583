//! # hdr-filter
//!
//! Edge-aware smoothing of HDR buffers.
//!
//! - [`RangeFilter`] - constant-time bilateral filter (raised-cosine range
//!   kernel over Gaussian spatial blurs), in 2-D or over a stack of buffers
//! - [`gauss`] - Gaussian blur approximated by three box passes
//!
//! Cost per pixel is independent of the spatial sigmas; it grows with the
//! number of range terms, which shrinks as `sigma_r` widens.
//!
//! # Example
//!
//! ```rust
//! use hdr_core::{Rect, Rgb, Rgb64};
//! use hdr_filter::RangeFilter;
//!
//! let mut img = Rgb64::new(Rect::from_size(16, 16));
//! for (x, y) in img.bounds().iter_coords() {
//!     let v = if x < 8 { 0.1 } else { 4.0 };
//!     img.set(x, y, Rgb::splat(v));
//! }
//!
//! let filter = RangeFilter::new(0.1, 2.0, 2.0, 0.0).unwrap();
//! let out = filter.apply(&img).unwrap();
//! assert!(out.get(7, 8).r < 0.2);
//! assert!(out.get(8, 8).r > 3.9);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod gauss;
pub mod range;

pub use error::{FilterError, FilterResult};
pub use gauss::SpatialBlur;
pub use range::{dynamic_range, RangeFilter, DEFAULT_TOLERANCE, MAX_ORDER};
