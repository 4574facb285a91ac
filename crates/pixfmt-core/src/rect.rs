//! Integer rectangles in raster coordinate space.
//!
//! Raster coordinates may be negative (a raster can be translated anywhere),
//! so [`Rect`] uses `i32` origins. Edge arithmetic is done in `i64` to stay
//! overflow-safe near `i32::MAX`.
//!
//! ```rust
//! use pixfmt_core::Rect;
//!
//! let rect = Rect::new(10, 20, 100, 50);
//! assert!(rect.contains(15, 25));
//! assert!(!rect.contains(5, 25));
//!
//! let other = Rect::new(50, 40, 100, 50);
//! let overlap = rect.intersect(&other).unwrap();
//! assert_eq!((overlap.width, overlap.height), (60, 30));
//! ```

/// Axis-aligned rectangle with an `i32` origin and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
}

impl Rect {
    /// Creates a rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    #[inline]
    pub const fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exclusive bottom edge.
    #[inline]
    pub const fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// True if width or height is not positive.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// True if `(x, y)` lies inside.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && (x as i64) < self.right() && (y as i64) < self.bottom()
    }

    /// True if `other` lies entirely inside.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        !other.is_empty()
            && other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Overlapping area, or `None` if the rectangles are disjoint.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 <= x0 as i64 || y1 <= y0 as i64 {
            return None;
        }
        Some(Rect::new(x0, y0, (x1 - x0 as i64) as i32, (y1 - y0 as i64) as i32))
    }

    /// Same size, moved by `(dx, dy)`. Returns `None` on overflow.
    pub fn translate(&self, dx: i32, dy: i32) -> Option<Rect> {
        Some(Rect::new(
            self.x.checked_add(dx)?,
            self.y.checked_add(dy)?,
            self.width,
            self.height,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_edges() {
        let r = Rect::new(-2, -2, 4, 4);
        assert!(r.contains(-2, -2));
        assert!(r.contains(1, 1));
        assert!(!r.contains(2, 1));
        assert!(r.contains_rect(&Rect::new(-1, -1, 3, 3)));
        assert!(!r.contains_rect(&Rect::new(-1, -1, 4, 3)));
    }

    #[test]
    fn test_intersect_disjoint() {
        let a = Rect::new(0, 0, 10, 10);
        assert_eq!(a.intersect(&Rect::new(10, 0, 5, 5)), None);
        assert_eq!(a.intersect(&Rect::new(5, 5, 10, 10)), Some(Rect::new(5, 5, 5, 5)));
    }

    #[test]
    fn test_edges_near_max() {
        let r = Rect::new(i32::MAX - 1, 0, 1, 1);
        assert_eq!(r.right(), i32::MAX as i64);
        assert!(r.translate(2, 0).is_none());
    }
}
