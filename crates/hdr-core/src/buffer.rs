//! HDR pixel buffers with zero-copy sub-region views.
//!
//! [`HdrBuffer<C, S>`] stores 3 channel samples per pixel in a flat,
//! row-major, channel-interleaved array:
//!
//! ```text
//! offset ─┐
//!         [c0 c1 c2 c0 c1 c2 ... (padding)]  <- row min_y      ┐
//!         [c0 c1 c2 c0 c1 c2 ... (padding)]  <- row min_y + 1  ┘ stride apart
//! ```
//!
//! The pixel `(x, y)` starts at
//! `offset + (y - min_y) * stride + (x - min_x) * 3`.
//!
//! - `C: HdrColor` - color space ([`Rgb`] or [`Xyz`])
//! - `S: Sample` - storage precision (`f32` or `f64`)
//!
//! The four supported combinations have aliases: [`Rgb32`], [`Rgb64`],
//! [`Xyz32`], [`Xyz64`].
//!
//! # Views
//!
//! Sample storage is reference counted. [`HdrBuffer::subregion`] returns a
//! buffer that shares storage with its parent, keeps the parent's stride and
//! coordinates, and only narrows the bounds. Writes through either handle are
//! visible through the other; the storage is freed when the last handle goes.
//!
//! ```rust
//! use hdr_core::{Rect, Rgb, Rgb64};
//!
//! let parent = Rgb64::new(Rect::from_size(10, 10));
//! let mut view = parent.subregion(Rect::new(2, 2, 6, 6));
//! view.set(3, 3, Rgb::new(1.0, 2.0, 3.0));
//! assert_eq!(parent.get(3, 3), Rgb::new(1.0, 2.0, 3.0));
//! ```
//!
//! # Bounds Policy
//!
//! Access outside `bounds` is not an error: [`get`](HdrBuffer::get) returns
//! the zero color and [`set`](HdrBuffer::set) does nothing. Filters can probe
//! neighbours near the edges without clamping at each call site.
//!
//! # Locking
//!
//! Storage sits behind an `RwLock` so buffers are `Send + Sync`. Bulk passes
//! take the lock once through [`HdrBuffer::read`]; while a [`PixelReader`] is
//! alive, writes through any handle sharing its storage block. On the thread
//! that owns the reader such a write could never proceed, so debug builds
//! panic on it instead of deadlocking.

use crate::{Color, ColorSpace, Error, HdrColor, Precision, Rect, Result, Rgb, Sample, Xyz};
use std::marker::PhantomData;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Samples per pixel.
pub const CHANNELS: usize = 3;

type Storage<S> = Arc<RwLock<Vec<S>>>;

/// Storages read-locked by live [`PixelReader`]s of the current thread.
#[cfg(debug_assertions)]
mod held {
    use std::cell::RefCell;

    thread_local! {
        static READERS: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
    }

    pub(super) fn enter(id: usize) {
        READERS.with(|r| r.borrow_mut().push(id));
    }

    pub(super) fn leave(id: usize) {
        READERS.with(|r| {
            let mut r = r.borrow_mut();
            if let Some(i) = r.iter().rposition(|&v| v == id) {
                r.swap_remove(i);
            }
        });
    }

    pub(super) fn is_held(id: usize) -> bool {
        READERS.with(|r| r.borrow().contains(&id))
    }
}

#[cfg(debug_assertions)]
#[inline]
fn storage_id<S>(storage: &Storage<S>) -> usize {
    Arc::as_ptr(storage) as *const () as usize
}

/// Linear RGB, 32-bit samples.
pub type Rgb32 = HdrBuffer<Rgb, f32>;
/// Linear RGB, 64-bit samples.
pub type Rgb64 = HdrBuffer<Rgb, f64>;
/// CIE XYZ, 32-bit samples.
pub type Xyz32 = HdrBuffer<Xyz, f32>;
/// CIE XYZ, 64-bit samples.
pub type Xyz64 = HdrBuffer<Xyz, f64>;

/// Anything that can be read as a grid of HDR colors.
///
/// This is the input boundary of tone mapping. Out-of-bounds coordinates must
/// return the zero color's quad.
pub trait HdrImage {
    /// Valid coordinate domain.
    fn bounds(&self) -> Rect;

    /// Color space of the stored values.
    fn color_space(&self) -> ColorSpace;

    /// Normalized `(r, g, b, a)` quad at `(x, y)`.
    fn hdr_at(&self, x: i32, y: i32) -> [f64; 4];

    /// Number of pixels.
    fn size(&self) -> usize {
        self.bounds().area()
    }
}

/// HDR pixel buffer or view; see the [module docs](self).
pub struct HdrBuffer<C: HdrColor, S: Sample> {
    /// Shared samples; `None` for detached empty buffers
    storage: Option<Storage<S>>,
    /// Index of the first sample of pixel (min_x, min_y)
    offset: usize,
    /// Samples between vertically adjacent pixels
    stride: usize,
    bounds: Rect,
    _color: PhantomData<C>,
}

#[inline]
fn load<C: HdrColor, S: Sample>(pix: &[S], i: usize) -> C {
    match pix.get(i..i + CHANNELS) {
        Some(p) => C::from_components([p[0].to_f64(), p[1].to_f64(), p[2].to_f64()]),
        None => C::default(),
    }
}

#[inline]
fn store<C: HdrColor, S: Sample>(pix: &mut [S], i: usize, c: C) {
    if let Some(p) = pix.get_mut(i..i + CHANNELS) {
        let [a, b, d] = c.components();
        p[0] = S::from_f64(a);
        p[1] = S::from_f64(b);
        p[2] = S::from_f64(d);
    }
}

/// Stride and sample count of a compact layout over `bounds`, `None` on overflow.
#[inline]
fn compact_len(bounds: Rect) -> Option<(usize, usize)> {
    let stride = bounds.width().checked_mul(CHANNELS)?;
    Some((stride, stride.checked_mul(bounds.height())?))
}

/// Offset of `(x, y)` for a layout, `None` outside bounds.
#[inline]
fn offset_of(bounds: Rect, offset: usize, stride: usize, x: i32, y: i32) -> Option<usize> {
    if !bounds.contains(x, y) {
        return None;
    }
    let row = (y as i64 - bounds.min_y as i64) as usize;
    let col = (x as i64 - bounds.min_x as i64) as usize;
    Some(offset + row * stride + col * CHANNELS)
}

impl<C: HdrColor, S: Sample> HdrBuffer<C, S> {
    /// Allocates a zeroed buffer covering `bounds`.
    ///
    /// Holds `3 * width * height` samples with stride `3 * width`. Empty or
    /// inverted bounds give zero-length storage.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hdr_core::{Rect, Rgb, Rgb32};
    ///
    /// let img = Rgb32::new(Rect::new(0, 0, 4, 3));
    /// assert_eq!(img.size(), 12);
    /// assert_eq!(img.stride(), 12);
    /// assert_eq!(img.get(3, 2), Rgb::default());
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the sample count of `bounds` overflows `usize`; see
    /// [`try_new`](Self::try_new).
    pub fn new(bounds: Rect) -> Self {
        match Self::try_new(bounds) {
            Ok(buf) => buf,
            Err(_) => panic!("buffer {bounds} overflows the sample count"),
        }
    }

    /// Like [`new`](Self::new), but reports oversized bounds.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if `3 * width * height` overflows `usize`.
    pub fn try_new(bounds: Rect) -> Result<Self> {
        let (stride, len) = compact_len(bounds).ok_or_else(|| Error::out_of_range(usize::MAX, 0))?;
        Ok(Self {
            storage: Some(Arc::new(RwLock::new(vec![S::ZERO; len]))),
            offset: 0,
            stride,
            bounds,
            _color: PhantomData,
        })
    }

    /// Wraps caller-supplied samples laid out with `stride` over `bounds`.
    ///
    /// Only what the declared layout implies is checked: the stride must fit a
    /// row and the last pixel must fit the slice. Sample values are not
    /// inspected.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidStride`] if `stride < 3 * width`
    /// - [`Error::OutOfRange`] if `samples` is too short for `bounds`
    ///
    /// # Example
    ///
    /// ```rust
    /// use hdr_core::{Rect, Rgb, Rgb64};
    ///
    /// // 1x2 image with one padding sample per row
    /// let samples = vec![1.0, 2.0, 3.0, -1.0, 4.0, 5.0, 6.0];
    /// let img = Rgb64::from_samples(samples, 4, Rect::from_size(1, 2)).unwrap();
    /// assert_eq!(img.get(0, 1), Rgb::new(4.0, 5.0, 6.0));
    /// ```
    pub fn from_samples(samples: Vec<S>, stride: usize, bounds: Rect) -> Result<Self> {
        let width = bounds.width();
        let row_len = width
            .checked_mul(CHANNELS)
            .ok_or_else(|| Error::invalid_stride(stride, width))?;
        if stride < row_len {
            return Err(Error::invalid_stride(stride, width));
        }
        let needed = if bounds.is_empty() {
            0
        } else {
            (bounds.height() - 1)
                .checked_mul(stride)
                .and_then(|v| v.checked_add(row_len))
                .ok_or_else(|| Error::out_of_range(usize::MAX, samples.len()))?
        };
        if samples.len() < needed {
            return Err(Error::out_of_range(needed, samples.len()));
        }
        Ok(Self {
            storage: Some(Arc::new(RwLock::new(samples))),
            offset: 0,
            stride,
            bounds,
            _color: PhantomData,
        })
    }

    /// An empty buffer with no storage at all.
    fn detached() -> Self {
        Self {
            storage: None,
            offset: 0,
            stride: 0,
            bounds: Rect::ZERO,
            _color: PhantomData,
        }
    }

    /// Valid coordinate domain.
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

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn size(&self) -> usize {
        self.bounds.area()
    }

    /// Returns `true` if the buffer has no pixel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Color space of this buffer.
    #[inline]
    pub fn color_space(&self) -> ColorSpace {
        C::SPACE
    }

    /// Sample precision of this buffer.
    #[inline]
    pub fn precision(&self) -> Precision {
        S::PRECISION
    }

    /// Returns `true` for the storage-less buffer of an empty sub-region.
    #[inline]
    pub fn is_detached(&self) -> bool {
        self.storage.is_none()
    }

    /// Returns `true` if both handles alias the same sample storage.
    pub fn shares_storage(&self, other: &Self) -> bool {
        match (&self.storage, &other.storage) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Index of the first sample of `(x, y)`, or `None` outside bounds.
    #[inline]
    pub fn pix_offset(&self, x: i32, y: i32) -> Option<usize> {
        offset_of(self.bounds, self.offset, self.stride, x, y)
    }

    fn read_lock(&self) -> Option<RwLockReadGuard<'_, Vec<S>>> {
        self.storage
            .as_ref()
            .map(|s| s.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn write_lock(&self) -> Option<RwLockWriteGuard<'_, Vec<S>>> {
        self.storage.as_ref().map(|s| {
            #[cfg(debug_assertions)]
            if held::is_held(storage_id(s)) {
                panic!("buffer written while a PixelReader on its storage is alive on this thread");
            }
            s.write().unwrap_or_else(PoisonError::into_inner)
        })
    }

    /// Returns the color at `(x, y)`, or the zero color outside bounds.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> C {
        let Some(i) = self.pix_offset(x, y) else {
            return C::default();
        };
        match self.read_lock() {
            Some(pix) => load(&pix, i),
            None => C::default(),
        }
    }

    /// Stores `c` at `(x, y)`, narrowed to the buffer precision.
    ///
    /// Does nothing outside bounds.
    ///
    /// # Panics
    ///
    /// In debug builds, if this thread holds a [`PixelReader`] on the same
    /// storage (release builds deadlock).
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, c: C) {
        let Some(i) = self.pix_offset(x, y) else {
            return;
        };
        if let Some(mut pix) = self.write_lock() {
            store(&mut pix, i, c);
        }
    }

    /// Converts a generic color into this buffer's space and stores it.
    ///
    /// Conversion is validated even when `(x, y)` is outside bounds, where
    /// the store itself is a no-op.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedColor`] if `color` has no quad representation.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hdr_core::{Color, Rect, Xyz, Xyz64, Rgb};
    ///
    /// let mut img = Xyz64::new(Rect::from_size(2, 2));
    /// img.set_color(0, 0, &Color::Rgb(Rgb::new(0.5, 1.0, 2.0))).unwrap();
    /// assert_eq!(img.get(0, 0), Xyz::new(0.5, 1.0, 2.0));
    /// assert!(img.set_color(0, 0, &Color::Channels(vec![1.0])).is_err());
    /// ```
    pub fn set_color(&mut self, x: i32, y: i32, color: &Color) -> Result<()> {
        let c = C::convert(color)?;
        self.set(x, y, c);
        Ok(())
    }

    /// Returns a view of the part of this buffer inside `rect`.
    ///
    /// The view shares storage, stride and coordinates with `self`. If `rect`
    /// does not overlap the bounds, a detached empty buffer is returned.
    pub fn subregion(&self, rect: Rect) -> Self {
        let Some(r) = self.bounds.intersect(&rect) else {
            return Self::detached();
        };
        let Some(offset) = self.pix_offset(r.min_x, r.min_y) else {
            return Self::detached();
        };
        Self {
            storage: self.storage.clone(),
            offset,
            stride: self.stride,
            bounds: r,
            _color: PhantomData,
        }
    }

    /// Sets every pixel in bounds to `c`.
    ///
    /// Same reader restriction as [`set`](Self::set).
    pub fn fill(&mut self, c: C) {
        let bounds = self.bounds;
        let (offset, stride) = (self.offset, self.stride);
        if let Some(mut pix) = self.write_lock() {
            for (x, y) in bounds.iter_coords() {
                if let Some(i) = offset_of(bounds, offset, stride, x, y) {
                    store(&mut pix, i, c);
                }
            }
        }
    }

    /// Locks the storage for reading and returns a lock-free pixel accessor.
    ///
    /// Drop the reader before writing through any handle that shares this
    /// storage.
    pub fn read(&self) -> PixelReader<'_, C, S> {
        #[cfg(debug_assertions)]
        let id = self.storage.as_ref().map(storage_id);
        #[cfg(debug_assertions)]
        if let Some(id) = id {
            held::enter(id);
        }
        PixelReader {
            #[cfg(debug_assertions)]
            id,
            pix: self.read_lock(),
            offset: self.offset,
            stride: self.stride,
            bounds: self.bounds,
            _color: PhantomData,
        }
    }

    /// Copies the pixels in bounds into a new, unshared buffer.
    ///
    /// The copy has compact stride and the same bounds. Detached buffers stay
    /// detached.
    pub fn deep_copy(&self) -> Self {
        if self.is_detached() {
            return Self::detached();
        }
        let samples = self.to_vec();
        let stride = CHANNELS * self.width();
        Self {
            storage: Some(Arc::new(RwLock::new(samples))),
            offset: 0,
            stride,
            bounds: self.bounds,
            _color: PhantomData,
        }
    }

    /// Returns the samples in bounds, row-major, without row padding.
    pub fn to_vec(&self) -> Vec<S> {
        let reader = self.read();
        let mut out = Vec::with_capacity(self.size() * CHANNELS);
        for y in self.bounds.min_y..self.bounds.max_y {
            out.extend_from_slice(reader.row(y));
        }
        out
    }
}

impl<C: HdrColor, S: Sample> Clone for HdrBuffer<C, S> {
    /// Returns another handle to the same storage and bounds.
    ///
    /// Use [`HdrBuffer::deep_copy`] for independent samples.
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            offset: self.offset,
            stride: self.stride,
            bounds: self.bounds,
            _color: PhantomData,
        }
    }
}

impl<C: HdrColor, S: Sample> HdrImage for HdrBuffer<C, S> {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn color_space(&self) -> ColorSpace {
        C::SPACE
    }

    fn hdr_at(&self, x: i32, y: i32) -> [f64; 4] {
        self.get(x, y).hdr_rgba()
    }
}

impl<C: HdrColor, S: Sample> std::fmt::Debug for HdrBuffer<C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HdrBuffer")
            .field("bounds", &self.bounds)
            .field("stride", &self.stride)
            .field("offset", &self.offset)
            .field("space", &C::SPACE)
            .field("precision", &S::PRECISION)
            .field("detached", &self.storage.is_none())
            .finish()
    }
}

/// Read access to a buffer with its storage lock held.
///
/// Created by [`HdrBuffer::read`]. Pixel reads go straight to the samples.
///
/// # Deadlocks
///
/// While the reader is alive, [`HdrBuffer::set`] and [`HdrBuffer::fill`] on
/// any handle sharing its storage block until it is dropped. From the same
/// thread that never happens: debug builds panic, release builds hang.
pub struct PixelReader<'a, C: HdrColor, S: Sample> {
    #[cfg(debug_assertions)]
    id: Option<usize>,
    pix: Option<RwLockReadGuard<'a, Vec<S>>>,
    offset: usize,
    stride: usize,
    bounds: Rect,
    _color: PhantomData<C>,
}

impl<C: HdrColor, S: Sample> PixelReader<'_, C, S> {
    /// Returns the color at `(x, y)`, or the zero color outside bounds.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> C {
        match (&self.pix, offset_of(self.bounds, self.offset, self.stride, x, y)) {
            (Some(pix), Some(i)) => load(pix, i),
            _ => C::default(),
        }
    }

    /// The `3 * width` samples of row `y`; empty outside bounds.
    pub fn row(&self, y: i32) -> &[S] {
        let (Some(pix), Some(start)) = (
            &self.pix,
            offset_of(self.bounds, self.offset, self.stride, self.bounds.min_x, y),
        ) else {
            return &[];
        };
        pix.get(start..start + CHANNELS * self.bounds.width())
            .unwrap_or(&[])
    }

    /// Smallest and largest sample in bounds, or `None` if there is none.
    ///
    /// NaN samples are skipped.
    pub fn sample_range(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for y in self.bounds.min_y..self.bounds.max_y {
            for v in self.row(y).iter().map(|s| s.to_f64()).filter(|v| !v.is_nan()) {
                range = Some(match range {
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                    None => (v, v),
                });
            }
        }
        range
    }
}

#[cfg(debug_assertions)]
impl<C: HdrColor, S: Sample> Drop for PixelReader<'_, C, S> {
    fn drop(&mut self) {
        if let Some(id) = self.id {
            held::leave(id);
        }
    }
}

impl<C: HdrColor, S: Sample> HdrImage for PixelReader<'_, C, S> {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn color_space(&self) -> ColorSpace {
        C::SPACE
    }

    fn hdr_at(&self, x: i32, y: i32) -> [f64; 4] {
        self.get(x, y).hdr_rgba()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OPAQUE;

    #[test]
    fn test_new_layout() {
        let img = Rgb64::new(Rect::new(0, 0, 4, 3));
        assert_eq!(img.width(), 4);
        assert_eq!(img.height(), 3);
        assert_eq!(img.stride(), 12);
        assert_eq!(img.size(), 12);
        assert_eq!(img.to_vec().len(), 36);
        assert_eq!(img.pix_offset(3, 2), Some(2 * 12 + 3 * 3));
    }

    #[test]
    fn test_bounds_policy() {
        let mut img = Rgb32::new(Rect::new(0, 0, 4, 3));
        let c = Rgb::new(0.5, 1.5, 100.0);
        img.set(3, 2, c);
        assert_eq!(img.get(3, 2), c);
        assert_eq!(img.get(4, 0), Rgb::default());
        assert_eq!(img.get(-1, 0), Rgb::default());
        assert_eq!(img.get(0, 3), Rgb::default());

        img.set(4, 0, c);
        img.set(-1, -1, c);
        assert_eq!(img.to_vec().iter().filter(|&&v| v != 0.0).count(), 3);
    }

    #[test]
    fn test_offset_bounds() {
        let mut img = Xyz64::new(Rect::new(-5, 10, -3, 12));
        img.set(-4, 11, Xyz::new(1.0, 2.0, 3.0));
        assert_eq!(img.get(-4, 11), Xyz::new(1.0, 2.0, 3.0));
        assert_eq!(img.pix_offset(-5, 10), Some(0));
        assert_eq!(img.pix_offset(-4, 11), Some(6 + 3));
    }

    #[test]
    fn test_narrowing_32() {
        let mut img = Xyz32::new(Rect::from_size(1, 1));
        img.set(0, 0, Xyz::new(0.1, 1e-3, 3.0));
        let got = img.get(0, 0);
        assert_eq!(got.x, 0.1f32 as f64);
        assert_eq!(got.y, 1e-3f32 as f64);
        assert_eq!(got.z, 3.0);
    }

    #[test]
    fn test_subregion_aliasing() {
        let mut parent = Rgb64::new(Rect::from_size(10, 10));
        let mut sub = parent.subregion(Rect::new(2, 2, 6, 6));
        assert!(sub.shares_storage(&parent));
        assert_eq!(sub.bounds(), Rect::new(2, 2, 6, 6));
        assert_eq!(sub.stride(), parent.stride());

        let c = Rgb::new(1.0, 0.25, 8.0);
        sub.set(3, 3, c);
        assert_eq!(parent.get(3, 3), c);

        parent.set(5, 5, Rgb::splat(2.0));
        assert_eq!(sub.get(5, 5), Rgb::splat(2.0));

        // Outside the view but inside the parent
        sub.set(7, 7, c);
        assert_eq!(parent.get(7, 7), Rgb::default());
        assert_eq!(sub.get(7, 7), Rgb::default());
    }

    #[test]
    fn test_subregion_clips_to_bounds() {
        let img = Rgb64::new(Rect::from_size(4, 4));
        let sub = img.subregion(Rect::new(2, -10, 100, 1));
        assert_eq!(sub.bounds(), Rect::new(2, 0, 4, 1));
        assert_eq!(sub.size(), 2);
    }

    #[test]
    fn test_nested_subregion() {
        let mut img = Rgb32::new(Rect::from_size(8, 8));
        let a = img.subregion(Rect::new(1, 1, 7, 7));
        let mut b = a.subregion(Rect::new(3, 3, 5, 5));
        b.set(4, 4, Rgb::splat(9.0));
        assert_eq!(img.get(4, 4), Rgb::splat(9.0));
        img.set(3, 3, Rgb::splat(1.0));
        assert_eq!(b.get(3, 3), Rgb::splat(1.0));
        assert_eq!(b.to_vec().len(), 12);
    }

    #[test]
    fn test_empty_intersection_is_detached() {
        let img = Rgb64::new(Rect::from_size(10, 10));
        let mut sub = img.subregion(Rect::new(20, 20, 30, 30));
        assert!(sub.is_detached());
        assert_eq!(sub.size(), 0);
        assert!(!sub.shares_storage(&img));
        assert_eq!(sub.get(20, 20), Rgb::default());
        assert_eq!(sub.get(0, 0), Rgb::default());
        sub.set(0, 0, Rgb::splat(1.0));
        sub.fill(Rgb::splat(1.0));
        assert_eq!(img.get(0, 0), Rgb::default());
        assert!(sub.to_vec().is_empty());
        assert!(sub.deep_copy().is_detached());
    }

    #[test]
    fn test_zero_sized() {
        let mut img = Xyz64::new(Rect::new(0, 0, 0, 5));
        assert_eq!(img.size(), 0);
        assert!(img.is_empty());
        assert!(!img.is_detached());
        img.set(0, 0, Xyz::new(1.0, 1.0, 1.0));
        assert_eq!(img.get(0, 0), Xyz::default());
        assert!(img.to_vec().is_empty());
    }

    #[test]
    fn test_from_samples_validation() {
        let err = Rgb64::from_samples(vec![0.0; 12], 5, Rect::from_size(2, 2)).unwrap_err();
        assert!(matches!(err, Error::InvalidStride { min_stride: 6, .. }));

        let err = Rgb64::from_samples(vec![0.0; 11], 6, Rect::from_size(2, 2)).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { needed: 12, available: 11 }));

        // Last row needs no padding
        let img = Rgb64::from_samples(vec![0.0; 14], 8, Rect::from_size(2, 2)).unwrap();
        assert_eq!(img.size(), 4);

        let empty = Rgb64::from_samples(Vec::new(), 0, Rect::ZERO).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_from_samples_padded_view() {
        let samples: Vec<f32> = (0..16).map(|v| v as f32).collect();
        let img = Rgb32::from_samples(samples, 8, Rect::new(5, 5, 7, 7)).unwrap();
        assert_eq!(img.get(5, 5), Rgb::new(0.0, 1.0, 2.0));
        assert_eq!(img.get(6, 6), Rgb::new(11.0, 12.0, 13.0));
        assert_eq!(img.to_vec(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0]);
    }

    #[test]
    fn test_set_color() {
        let mut img = Rgb64::new(Rect::from_size(2, 1));
        img.set_color(0, 0, &Color::Xyz(Xyz::new(0.2, 0.4, 0.6))).unwrap();
        assert_eq!(img.get(0, 0), Rgb::new(0.2, 0.4, 0.6));

        let err = img.set_color(1, 0, &Color::Channels(vec![1.0, 2.0])).unwrap_err();
        assert!(err.is_color_error());
        assert_eq!(img.get(1, 0), Rgb::default());

        // Out of bounds with a valid color is a silent no-op
        assert!(img.set_color(9, 9, &Color::Rgb(Rgb::splat(1.0))).is_ok());
        // Out of bounds with an invalid color still reports it
        assert!(img.set_color(9, 9, &Color::Channels(vec![])).is_err());
    }

    #[test]
    fn test_fill_view_only() {
        let img = Rgb64::new(Rect::from_size(4, 4));
        let mut view = img.subregion(Rect::new(1, 1, 3, 3));
        view.fill(Rgb::splat(0.5));
        assert_eq!(img.get(1, 1), Rgb::splat(0.5));
        assert_eq!(img.get(2, 2), Rgb::splat(0.5));
        assert_eq!(img.get(0, 0), Rgb::default());
        assert_eq!(img.get(3, 3), Rgb::default());
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let mut img = Rgb64::new(Rect::from_size(3, 3));
        img.set(1, 1, Rgb::splat(4.0));
        let view = img.subregion(Rect::new(1, 1, 3, 3));
        let mut copy = view.deep_copy();
        assert!(!copy.shares_storage(&img));
        assert_eq!(copy.bounds(), Rect::new(1, 1, 3, 3));
        assert_eq!(copy.stride(), 6);
        assert_eq!(copy.get(1, 1), Rgb::splat(4.0));
        copy.set(1, 1, Rgb::splat(0.0));
        assert_eq!(img.get(1, 1), Rgb::splat(4.0));
    }

    #[test]
    fn test_clone_aliases_and_storage_release() {
        let img = Rgb64::new(Rect::from_size(2, 2));
        let storage = img.storage.clone().unwrap();
        let mut other = img.clone();
        other.set(0, 0, Rgb::splat(1.0));
        assert_eq!(img.get(0, 0), Rgb::splat(1.0));

        let sub = img.subregion(Rect::new(1, 1, 2, 2));
        assert_eq!(Arc::strong_count(&storage), 4);
        drop(img);
        drop(other);
        assert_eq!(Arc::strong_count(&storage), 2);
        drop(sub);
        assert_eq!(Arc::strong_count(&storage), 1);
    }

    #[test]
    fn test_reader() {
        let mut img = Rgb32::new(Rect::new(1, 1, 3, 2));
        img.set(1, 1, Rgb::new(-2.0, 0.0, 1.0));
        img.set(2, 1, Rgb::new(0.0, 7.5, f64::NAN));
        let reader = img.read();
        assert_eq!(reader.get(1, 1), Rgb::new(-2.0, 0.0, 1.0));
        assert_eq!(reader.get(0, 0), Rgb::default());
        assert_eq!(reader.row(1).len(), 6);
        assert!(reader.row(5).is_empty());
        assert_eq!(reader.sample_range(), Some((-2.0, 7.5)));
        assert_eq!(reader.hdr_at(1, 1), [-2.0, 0.0, 1.0, OPAQUE]);
        assert_eq!(reader.size(), 2);
    }

    #[test]
    fn test_write_after_reader_dropped() {
        let img = Rgb64::new(Rect::from_size(2, 2));
        let mut view = img.subregion(Rect::new(1, 1, 2, 2));
        {
            let reader = img.read();
            assert_eq!(reader.get(1, 1), Rgb::default());
        }
        view.set(1, 1, Rgb::splat(4.0));
        view.fill(Rgb::splat(5.0));
        assert_eq!(img.get(1, 1), Rgb::splat(5.0));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "PixelReader on its storage is alive")]
    fn test_write_under_own_reader_panics() {
        let img = Rgb64::new(Rect::from_size(2, 2));
        let mut alias = img.clone();
        let _reader = img.read();
        alias.set(0, 0, Rgb::splat(1.0));
    }

    #[test]
    fn test_other_thread_write_waits_for_reader() {
        let img = Rgb64::new(Rect::from_size(1, 1));
        let mut alias = img.clone();
        let reader = img.read();
        std::thread::scope(|s| {
            let writer = s.spawn(move || alias.set(0, 0, Rgb::splat(2.0)));
            std::thread::sleep(std::time::Duration::from_millis(20));
            assert_eq!(reader.get(0, 0), Rgb::default());
            drop(reader);
            writer.join().unwrap();
        });
        assert_eq!(img.get(0, 0), Rgb::splat(2.0));
    }

    #[test]
    fn test_try_new_rejects_overflow() {
        let huge = Rect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        let err = Rgb64::try_new(huge).unwrap_err();
        assert!(err.is_range_error());
        assert_eq!(Rgb32::try_new(Rect::from_size(2, 3)).unwrap().stride(), 6);
    }

    #[test]
    #[should_panic(expected = "overflows the sample count")]
    fn test_new_panics_on_overflow() {
        let _ = Xyz32::new(Rect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX));
    }

    #[test]
    fn test_hdr_image_out_of_bounds_quad() {
        let img = Xyz64::new(Rect::from_size(1, 1));
        assert_eq!(img.hdr_at(5, 5), [0.0, 0.0, 0.0, OPAQUE]);
        assert_eq!(HdrImage::color_space(&img), ColorSpace::Xyz);
    }

    #[test]
    fn test_buffers_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Rgb32>();
        assert_send_sync::<Xyz64>();
    }
}
