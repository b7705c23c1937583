//! Raw buffer streams.
//!
//! A raw stream is the pixels of a buffer's bounds, row-major, one
//! [`TRIPLE_LEN`]-byte triple per pixel, with no header. Bounds and color
//! space travel out of band: the reader supplies both.
//!
//! Views are written compacted: row padding and pixels outside the view never
//! reach the stream.

use crate::codec::{decode, encode_into, TRIPLE_LEN};
use hdr_core::{Error, HdrBuffer, HdrColor, Rect, Result, Sample};
use tracing::trace;

/// Number of whole triples in `bytes`.
#[inline]
pub fn triple_count(bytes: &[u8]) -> usize {
    bytes.len() / TRIPLE_LEN
}

/// Serializes every pixel in bounds.
///
/// Returns `size() * 12` bytes. 64-bit buffers are narrowed to 32-bit floats.
pub fn write_buffer<C: HdrColor, S: Sample>(buf: &HdrBuffer<C, S>) -> Vec<u8> {
    let bounds = buf.bounds();
    trace!(%bounds, space = %buf.color_space(), "writing raw buffer");

    let mut out = Vec::with_capacity(buf.size() * TRIPLE_LEN);
    let reader = buf.read();
    for y in bounds.min_y..bounds.max_y {
        for px in reader.row(y).chunks_exact(3) {
            encode_into(&mut out, px[0].to_f64(), px[1].to_f64(), px[2].to_f64());
        }
    }
    out
}

/// Reads a buffer covering `bounds` from a raw stream.
///
/// Bytes past the last pixel are ignored.
///
/// # Errors
///
/// [`Error::OutOfRange`] if `bytes` is shorter than `bounds.area() * 12`.
pub fn read_buffer<C: HdrColor, S: Sample>(bytes: &[u8], bounds: Rect) -> Result<HdrBuffer<C, S>> {
    let needed = bounds
        .area()
        .checked_mul(TRIPLE_LEN)
        .ok_or_else(|| Error::out_of_range(usize::MAX, bytes.len()))?;
    if bytes.len() < needed {
        return Err(Error::out_of_range(needed, bytes.len()));
    }
    trace!(%bounds, triples = bounds.area(), "reading raw buffer");

    let mut buf = HdrBuffer::try_new(bounds)?;
    for ((x, y), chunk) in bounds.iter_coords().zip(bytes.chunks_exact(TRIPLE_LEN)) {
        let (a, b, c) = decode(chunk)?;
        buf.set(x, y, C::from_components([a, b, c]));
    }
    Ok(buf)
}
