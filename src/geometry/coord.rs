//! Typed integer pixel coordinates using PhantomData for compile-time safety.

use std::marker::PhantomData;

/// A 2D pixel coordinate with a type-level marker for its frame.
///
/// The `TFrame` parameter should be either [`Absolute`](super::Absolute) or
/// [`Local`](super::Local).
#[derive(PartialEq, Eq, Hash)]
pub struct Coord<TFrame> {
    pub x: i64,
    pub y: i64,
    _frame: PhantomData<TFrame>,
}

impl<TFrame> Coord<TFrame> {
    /// Creates a new coordinate with the given x and y values.
    #[inline]
    pub fn new(x: i64, y: i64) -> Self {
        Self {
            x,
            y,
            _frame: PhantomData,
        }
    }

    /// Returns the coordinate relative to `origin`, in a local frame.
    #[inline]
    pub fn relative_to<TOther>(&self, origin: Coord<TFrame>) -> Coord<TOther> {
        Coord::new(self.x - origin.x, self.y - origin.y)
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(&self, other: &Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(&self, other: &Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }
}

// Manual impls: a derive would require `TFrame: Copy`, which generic code
// over the frame cannot assume.
impl<TFrame> Clone for Coord<TFrame> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<TFrame> Copy for Coord<TFrame> {}

impl<TFrame> std::fmt::Debug for Coord<TFrame> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coord")
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}

impl<TFrame> Default for Coord<TFrame> {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
