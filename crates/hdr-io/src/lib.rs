//! # hdr-io
//!
//! Binary interchange for HDR pixel data.
//!
//! - [`codec`] - the 12-byte float triple: three IEEE-754 binary32 values,
//!   little-endian, in channel order
//! - [`raw`] - whole buffers as headerless streams of triples
//!
//! Container formats (EXR, Radiance HDR, PNG) are out of scope; they sit on
//! top of these primitives or on [`DisplayImage`](hdr_core::DisplayImage).
//!
//! # Example
//!
//! ```rust
//! use hdr_core::{Rect, Rgb, Rgb32};
//! use hdr_io::raw;
//!
//! let mut img = Rgb32::new(Rect::from_size(2, 1));
//! img.set(1, 0, Rgb::new(0.5, 2.0, 8.0));
//!
//! let bytes = raw::write_buffer(&img);
//! assert_eq!(bytes.len(), 24);
//!
//! let back: Rgb32 = raw::read_buffer(&bytes, img.bounds()).unwrap();
//! assert_eq!(back.get(1, 0), Rgb::new(0.5, 2.0, 8.0));
//! ```
//!
//! # Dependencies
//!
//! - `hdr-core` - buffers and [`Error`](hdr_core::Error)
//! - `tracing` - diagnostics

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod codec;
pub mod raw;

pub use codec::{decode, decode_at, encode, encode_into, TRIPLE_LEN};
