//! # hdr-tmo
//!
//! Tone mapping operators: HDR buffers in, 16-bit display images out.
//!
//! # Operators
//!
//! - [`aces`] - fitted ACES RRT + ODT with sRGB output (default)
//! - [`hable`] - Uncharted 2 filmic curve with pure gamma output
//!
//! Operators form a closed set, [`ToneMap`]. Dispatch happens once per pass,
//! never per pixel.
//!
//! # Example
//!
//! ```rust
//! use hdr_core::{Rect, Rgb, Rgb64, Rgba16};
//! use hdr_tmo::ToneMapper;
//!
//! let mut img = Rgb64::new(Rect::from_size(2, 2));
//! img.set(0, 0, Rgb::new(1.0, 1.0, 1.0));
//!
//! let out = ToneMapper::default_hable(&img).perform();
//! assert_eq!(out.get(0, 0), Rgba16::opaque(65535, 65535, 65535));
//! assert_eq!(out.get(1, 1), Rgba16::opaque(0, 0, 0));
//! ```
//!
//! # Contract
//!
//! A pass never mutates its source and never fails. Every pixel in the source
//! bounds is visited once and written to the same coordinate of a fresh
//! [`DisplayImage`](hdr_core::DisplayImage); opacity is always full.
//! Channel values are converted with saturating float casts, so overshoot
//! clips to 65535 and NaN or negative results become 0.
//!
//! # Feature Flags
//!
//! - `parallel` - map rows concurrently with rayon (enabled by default)
//! - `serde` - serialize operator parameters for pipeline configs

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod aces;
pub mod hable;
mod operator;

pub use aces::AcesParams;
pub use hable::HableParams;
pub use operator::{perform, ToneMap, ToneMapper, UnknownOperator};
