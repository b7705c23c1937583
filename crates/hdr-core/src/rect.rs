//! Integer rectangles describing pixel bounds.
//!
//! Every [`HdrBuffer`](crate::HdrBuffer) and [`DisplayImage`](crate::DisplayImage)
//! carries a [`Rect`] that defines its valid coordinate domain. Bounds are not
//! required to start at the origin: a sub-region keeps the coordinates it had
//! in its parent, so `(x, y)` addresses the same pixel through both.
//!
//! # Coordinate System
//!
//! ```text
//! (min_x, min_y) ─────────► X
//!       │  ┌──────────────┐
//!       │  │   bounds     │
//!       │  └──────────────┘ (max_x, max_y)  <- exclusive
//!       ▼
//!       Y
//! ```
//!
//! Rectangles are half-open: `min` is inside, `max` is not.
//!
//! # Usage
//!
//! ```rust
//! use hdr_core::Rect;
//!
//! let r = Rect::new(0, 0, 4, 3);
//! assert_eq!(r.width(), 4);
//! assert!(r.contains(3, 2));
//! assert!(!r.contains(4, 0));
//!
//! let inner = r.intersect(&Rect::new(2, 2, 10, 10)).unwrap();
//! assert_eq!(inner, Rect::new(2, 2, 4, 3));
//! ```

/// An axis-aligned integer rectangle `[min_x, max_x) x [min_y, max_y)`.
///
/// A rectangle whose `max` does not exceed its `min` on either axis is empty.
/// Inverted rectangles are legal values; their width/height saturate at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left edge (inclusive)
    pub min_x: i32,
    /// Top edge (inclusive)
    pub min_y: i32,
    /// Right edge (exclusive)
    pub max_x: i32,
    /// Bottom edge (exclusive)
    pub max_y: i32,
}

impl Rect {
    /// The zero rectangle, at the origin with no area.
    pub const ZERO: Rect = Rect::new(0, 0, 0, 0);

    /// Creates a rectangle from its corners.
    #[inline]
    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates a rectangle at the origin with the given size.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hdr_core::Rect;
    ///
    /// assert_eq!(Rect::from_size(2, 2), Rect::new(0, 0, 2, 2));
    /// ```
    #[inline]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Width in pixels, zero for inverted rectangles.
    #[inline]
    pub const fn width(&self) -> usize {
        if self.max_x > self.min_x {
            (self.max_x as i64 - self.min_x as i64) as usize
        } else {
            0
        }
    }

    /// Height in pixels, zero for inverted rectangles.
    #[inline]
    pub const fn height(&self) -> usize {
        if self.max_y > self.min_y {
            (self.max_y as i64 - self.min_y as i64) as usize
        } else {
            0
        }
    }

    /// Number of pixels covered, saturating at `usize::MAX`.
    #[inline]
    pub const fn area(&self) -> usize {
        self.width().saturating_mul(self.height())
    }

    /// Returns `true` if the rectangle covers no pixel.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.min_x >= self.max_x || self.min_y >= self.max_y
    }

    /// Returns `true` if `(x, y)` lies inside the rectangle.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hdr_core::Rect;
    ///
    /// let r = Rect::new(10, 10, 20, 20);
    /// assert!(r.contains(10, 10));
    /// assert!(r.contains(19, 19));
    /// assert!(!r.contains(20, 19));
    /// ```
    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x < self.max_x && y >= self.min_y && y < self.max_y
    }

    /// Returns the overlap of two rectangles, or `None` if they share no pixel.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hdr_core::Rect;
    ///
    /// let a = Rect::new(0, 0, 10, 10);
    /// assert_eq!(a.intersect(&Rect::new(5, 5, 20, 20)), Some(Rect::new(5, 5, 10, 10)));
    /// assert_eq!(a.intersect(&Rect::new(10, 0, 20, 10)), None);
    /// ```
    #[inline]
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let r = Rect::new(
            self.min_x.max(other.min_x),
            self.min_y.max(other.min_y),
            self.max_x.min(other.max_x),
            self.max_y.min(other.max_y),
        );
        if r.is_empty() { None } else { Some(r) }
    }

    /// Iterates over all coordinates, row by row.
    ///
    /// ```rust
    /// use hdr_core::Rect;
    ///
    /// let coords: Vec<_> = Rect::new(1, 1, 3, 2).iter_coords().collect();
    /// assert_eq!(coords, vec![(1, 1), (2, 1)]);
    /// ```
    #[inline]
    pub fn iter_coords(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let r = *self;
        (r.min_y..r.max_y).flat_map(move |y| (r.min_x..r.max_x).map(move |x| (x, y)))
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_dimensions() {
        let r = Rect::new(2, 3, 6, 10);
        assert_eq!(r.width(), 4);
        assert_eq!(r.height(), 7);
        assert_eq!(r.area(), 28);
    }

    #[test]
    fn test_inverted_rect_is_empty() {
        let r = Rect::new(5, 5, 1, 1);
        assert!(r.is_empty());
        assert_eq!(r.width(), 0);
        assert_eq!(r.area(), 0);
        assert!(!r.contains(3, 3));
    }

    #[test]
    fn test_rect_contains_negative_origin() {
        let r = Rect::new(-2, -2, 2, 2);
        assert!(r.contains(-2, -2));
        assert!(r.contains(1, 1));
        assert!(!r.contains(2, 0));
    }

    #[test]
    fn test_rect_intersect() {
        let a = Rect::from_size(10, 10);
        assert_eq!(a.intersect(&Rect::new(2, 2, 6, 6)), Some(Rect::new(2, 2, 6, 6)));
        assert_eq!(a.intersect(&Rect::new(8, -4, 30, 3)), Some(Rect::new(8, 0, 10, 3)));
        assert!(a.intersect(&Rect::new(20, 20, 30, 30)).is_none());
        assert!(a.intersect(&Rect::ZERO).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(Rect::new(0, 0, 4, 3).to_string(), "(0,0)-(4,3)");
    }
}
