//! # hdr-core
//!
//! Core types for HDR image processing.
//!
//! This crate provides the data model shared by every other crate:
//!
//! - [`HdrBuffer`] - Reference-counted HDR pixel buffer with zero-copy views
//! - [`Rgb`], [`Xyz`] - HDR color values, [`Color`] for generic input
//! - [`Sample`] - Storage precision (`f32` or `f64`)
//! - [`DisplayImage`], [`Rgba16`] - 16-bit display output of tone mapping
//! - [`Rect`] - Pixel bounds
//!
//! ## Crate Structure
//!
//! ```text
//! hdr-core (this crate)
//!    ^
//!    |
//!    +-- hdr-math (matrices, transfer curves)
//!    +-- hdr-io (float-triple codec, raw persistence)
//!    +-- hdr-tmo (tone mapping operators)
//!    +-- hdr-filter (edge-aware filters)
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Enable serialization for [`Rect`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod color;
pub mod display;
pub mod error;
pub mod rect;
pub mod sample;

pub use buffer::*;
pub use color::*;
pub use display::*;
pub use error::*;
pub use rect::*;
pub use sample::*;

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use hdr_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::buffer::{HdrBuffer, HdrImage, PixelReader, Rgb32, Rgb64, Xyz32, Xyz64};
    pub use crate::color::{Color, ColorSpace, HdrColor, Rgb, Xyz, OPAQUE};
    pub use crate::display::{DisplayImage, Rgba16, RANGE_MAX};
    pub use crate::error::{Error, Result};
    pub use crate::rect::Rect;
    pub use crate::sample::{Precision, Sample};
}
