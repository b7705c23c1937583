//! Display-ready 16-bit images produced by tone mapping.
//!
//! A [`DisplayImage`] is a rectangular grid of `R G B A` pixels with 16 bits
//! per channel, laid out row-major:
//!
//! ```text
//! [R G B A R G B A ...]  <- row min_y
//! [R G B A R G B A ...]  <- row min_y + 1
//! ```
//!
//! It is what a tone-map pass hands to an external encoder (PNG writer,
//! display surface). Each pass allocates a fresh one; the caller owns it.

use crate::Rect;

/// Largest 16-bit channel value; also the opacity of every tone-mapped pixel.
pub const RANGE_MAX: u16 = u16::MAX;

/// Channels per display pixel.
pub const DISPLAY_CHANNELS: usize = 4;

/// A 16-bit RGBA pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba16 {
    /// Red
    pub r: u16,
    /// Green
    pub g: u16,
    /// Blue
    pub b: u16,
    /// Alpha
    pub a: u16,
}

impl Rgba16 {
    /// Creates a pixel.
    #[inline]
    pub const fn new(r: u16, g: u16, b: u16, a: u16) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a fully opaque pixel.
    #[inline]
    pub const fn opaque(r: u16, g: u16, b: u16) -> Self {
        Self::new(r, g, b, RANGE_MAX)
    }

    /// Returns `[r, g, b, a]`.
    #[inline]
    pub const fn to_array(self) -> [u16; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Row-major 16-bit RGBA image with explicit bounds.
#[derive(Clone, PartialEq, Eq)]
pub struct DisplayImage {
    pix: Vec<u16>,
    stride: usize,
    bounds: Rect,
}

impl DisplayImage {
    /// Allocates a zeroed (fully transparent black) image.
    ///
    /// # Panics
    ///
    /// Panics if the sample count of `bounds` overflows `usize`.
    pub fn new(bounds: Rect) -> Self {
        let size = bounds
            .width()
            .checked_mul(DISPLAY_CHANNELS)
            .and_then(|stride| Some((stride, stride.checked_mul(bounds.height())?)));
        let Some((stride, len)) = size else {
            panic!("display image {bounds} overflows the sample count");
        };
        Self {
            pix: vec![0; len],
            stride,
            bounds,
        }
    }

    /// Image bounds.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.bounds.width()
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.bounds.height()
    }

    /// Samples between vertically adjacent pixels.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Index of the first channel of `(x, y)`, or `None` outside bounds.
    #[inline]
    pub fn pix_offset(&self, x: i32, y: i32) -> Option<usize> {
        if !self.bounds.contains(x, y) {
            return None;
        }
        let row = (y as i64 - self.bounds.min_y as i64) as usize;
        let col = (x as i64 - self.bounds.min_x as i64) as usize;
        Some(row * self.stride + col * DISPLAY_CHANNELS)
    }

    /// Returns the pixel at `(x, y)`, or transparent black outside bounds.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Rgba16 {
        match self.pix_offset(x, y) {
            Some(i) => Rgba16::new(self.pix[i], self.pix[i + 1], self.pix[i + 2], self.pix[i + 3]),
            None => Rgba16::default(),
        }
    }

    /// Writes the pixel at `(x, y)`; does nothing outside bounds.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, px: Rgba16) {
        if let Some(i) = self.pix_offset(x, y) {
            self.pix[i..i + DISPLAY_CHANNELS].copy_from_slice(&px.to_array());
        }
    }

    /// Raw interleaved samples.
    #[inline]
    pub fn as_raw(&self) -> &[u16] {
        &self.pix
    }

    /// Mutable raw samples; rows are `stride()` long.
    #[inline]
    pub fn as_raw_mut(&mut self) -> &mut [u16] {
        &mut self.pix
    }

    /// Consumes the image and returns its samples.
    #[inline]
    pub fn into_raw(self) -> Vec<u16> {
        self.pix
    }

    /// Iterates over pixels with their coordinates, row-major.
    pub fn pixels(&self) -> impl Iterator<Item = (i32, i32, Rgba16)> + '_ {
        self.bounds.iter_coords().map(move |(x, y)| (x, y, self.get(x, y)))
    }

    /// Serializes samples as 16-bit big-endian RGBA, the layout of 16-bit PNG.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        self.pix.iter().flat_map(|v| v.to_be_bytes()).collect()
    }
}

impl std::fmt::Debug for DisplayImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayImage")
            .field("bounds", &self.bounds)
            .field("stride", &self.stride)
            .finish()
    }
}
