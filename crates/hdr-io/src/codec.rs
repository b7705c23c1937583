//! Float triple codec.
//!
//! # Wire Format
//!
//! ```text
//! offset  0      4      8      12
//!         [ c1  ][ c2  ][ c3  ]
//!          f32 LE f32 LE f32 LE
//! ```
//!
//! Values are narrowed from `f64` on encode and widened on decode. Nothing is
//! validated: NaN and infinities keep their bit patterns.

use hdr_core::{Error, Result};

/// Encoded size of one triple.
pub const TRIPLE_LEN: usize = 12;

const F32_LEN: usize = 4;

/// Encodes three values as 12 bytes.
///
/// # Example
///
/// ```rust
/// use hdr_io::encode;
///
/// let bytes = encode(1.0, 0.0, -2.0);
/// assert_eq!(&bytes[0..4], &[0x00, 0x00, 0x80, 0x3f]);
/// assert_eq!(&bytes[8..12], &[0x00, 0x00, 0x00, 0xc0]);
/// ```
#[inline]
pub fn encode(c1: f64, c2: f64, c3: f64) -> [u8; TRIPLE_LEN] {
    let mut out = [0u8; TRIPLE_LEN];
    out[0..4].copy_from_slice(&(c1 as f32).to_le_bytes());
    out[4..8].copy_from_slice(&(c2 as f32).to_le_bytes());
    out[8..12].copy_from_slice(&(c3 as f32).to_le_bytes());
    out
}

/// Appends one encoded triple to `out`.
#[inline]
pub fn encode_into(out: &mut Vec<u8>, c1: f64, c2: f64, c3: f64) {
    out.extend_from_slice(&encode(c1, c2, c3));
}

#[inline]
fn read_f32(bytes: &[u8], at: usize) -> f64 {
    let mut b = [0u8; F32_LEN];
    b.copy_from_slice(&bytes[at..at + F32_LEN]);
    f32::from_le_bytes(b) as f64
}

/// Decodes the first 12 bytes as a triple.
///
/// Bytes past the first 12 are ignored.
///
/// # Errors
///
/// [`Error::OutOfRange`] if fewer than 12 bytes are supplied.
///
/// # Example
///
/// ```rust
/// use hdr_io::{decode, encode};
///
/// let (a, b, c) = decode(&encode(0.1, 1e6, -3.5)).unwrap();
/// assert_eq!(a, 0.1f32 as f64);
/// assert_eq!((b, c), (1e6, -3.5));
///
/// assert!(decode(&[0u8; 11]).is_err());
/// ```
pub fn decode(bytes: &[u8]) -> Result<(f64, f64, f64)> {
    if bytes.len() < TRIPLE_LEN {
        return Err(Error::out_of_range(TRIPLE_LEN, bytes.len()));
    }
    Ok((read_f32(bytes, 0), read_f32(bytes, 4), read_f32(bytes, 8)))
}

/// Decodes the `index`-th triple of a packed stream.
///
/// # Errors
///
/// [`Error::OutOfRange`] if the stream ends before the triple does.
pub fn decode_at(bytes: &[u8], index: usize) -> Result<(f64, f64, f64)> {
    let end = index
        .checked_add(1)
        .and_then(|n| n.checked_mul(TRIPLE_LEN))
        .ok_or_else(|| Error::out_of_range(usize::MAX, bytes.len()))?;
    if bytes.len() < end {
        return Err(Error::out_of_range(end, bytes.len()));
    }
    decode(&bytes[end - TRIPLE_LEN..end])
}
