//! Axis-aligned regions of interest and their intersection.

use serde::{Deserialize, Serialize};

use super::coord::Coord;
use super::space::{Absolute, Local};
use crate::error::SynaptrackError;

/// An axis-aligned half-open pixel box `[min, max)` over the two in-plane axes.
///
/// Unlike a raw pair of corners, a `Roi` always satisfies `min < max` on
/// both axes: the only way to build one is through [`Roi::try_new`] (or one
/// of its wrappers), which rejects empty and inverted boxes.
#[derive(PartialEq, Eq, Hash)]
pub struct Roi<TFrame> {
    min: Coord<TFrame>,
    max: Coord<TFrame>,
}

impl<TFrame> Roi<TFrame> {
    /// Creates a box from its minimum (inclusive) and maximum (exclusive) corners.
    ///
    /// # Errors
    /// Returns [`SynaptrackError::Geometry`] if `min >= max` on either axis,
    /// or if an extent does not fit in an `i64`.
    pub fn try_new(min: Coord<TFrame>, max: Coord<TFrame>) -> Result<Self, SynaptrackError> {
        let extents_fit = max.x.checked_sub(min.x).is_some() && max.y.checked_sub(min.y).is_some();
        if min.x >= max.x || min.y >= max.y || !extents_fit {
            return Err(SynaptrackError::Geometry {
                xmin: min.x,
                ymin: min.y,
                xmax: max.x,
                ymax: max.y,
            });
        }
        Ok(Self { min, max })
    }

    /// Creates a box from explicit coordinates.
    pub fn from_xyxy(xmin: i64, ymin: i64, xmax: i64, ymax: i64) -> Result<Self, SynaptrackError> {
        Self::try_new(Coord::new(xmin, ymin), Coord::new(xmax, ymax))
    }

    #[inline]
    pub fn min(&self) -> Coord<TFrame> {
        self.min
    }

    #[inline]
    pub fn max(&self) -> Coord<TFrame> {
        self.max
    }

    /// Returns the extent along x. Always positive.
    #[inline]
    pub fn width(&self) -> usize {
        (self.max.x - self.min.x) as usize
    }

    /// Returns the extent along y. Always positive.
    #[inline]
    pub fn height(&self) -> usize {
        (self.max.y - self.min.y) as usize
    }

    /// Returns the number of pixels covered by the box.
    #[inline]
    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    /// Translates the box into the frame whose origin is `origin`.
    #[inline]
    pub fn relative_to<TOther>(&self, origin: Coord<TFrame>) -> Roi<TOther> {
        Roi {
            min: self.min.relative_to(origin),
            max: self.max.relative_to(origin),
        }
    }
}

impl<TFrame> Clone for Roi<TFrame> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<TFrame> Copy for Roi<TFrame> {}

impl<TFrame> std::fmt::Debug for Roi<TFrame> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Roi")
            .field("xmin", &self.min.x)
            .field("ymin", &self.min.y)
            .field("xmax", &self.max.x)
            .field("ymax", &self.max.y)
            .finish()
    }
}

/// The window one 2D slice was computed over: an absolute in-plane box plus
/// the slice's index along the out-of-plane axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SliceRoi {
    pub area: Roi<Absolute>,
    pub plane: i64,
}

impl SliceRoi {
    pub fn new(area: Roi<Absolute>, plane: i64) -> Self {
        Self { area, plane }
    }

    /// Creates a slice ROI from explicit coordinates.
    pub fn from_xyxy_z(
        xmin: i64,
        ymin: i64,
        xmax: i64,
        ymax: i64,
        plane: i64,
    ) -> Result<Self, SynaptrackError> {
        Ok(Self::new(Roi::from_xyxy(xmin, ymin, xmax, ymax)?, plane))
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.area.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.area.height()
    }
}

impl From<SliceRoi> for RoiBounds {
    fn from(roi: SliceRoi) -> Self {
        Self {
            xmin: roi.area.min().x,
            ymin: roi.area.min().y,
            xmax: roi.area.max().x,
            ymax: roi.area.max().y,
            z: roi.plane,
        }
    }
}

/// Unvalidated slice window bounds, as they arrive from outside the crate.
///
/// Bounds can describe an empty or inverted box; [`RoiBounds::to_slice_roi`]
/// is where such a box is rejected, so the failure is attributed to the one
/// node that carried it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiBounds {
    pub xmin: i64,
    pub ymin: i64,
    pub xmax: i64,
    pub ymax: i64,
    pub z: i64,
}

impl RoiBounds {
    /// Validates the bounds.
    pub fn to_slice_roi(&self) -> Result<SliceRoi, SynaptrackError> {
        SliceRoi::from_xyxy_z(self.xmin, self.ymin, self.xmax, self.ymax, self.z)
    }
}

/// The overlap of two boxes, expressed in three frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Intersection {
    /// The overlap in absolute coordinates.
    pub absolute: Roi<Absolute>,
    /// The overlap relative to the first input's minimum corner.
    pub within_a: Roi<Local>,
    /// The overlap relative to the second input's minimum corner.
    pub within_b: Roi<Local>,
}

/// Computes the overlap of `a` and `b`.
///
/// Returns `None` when the boxes are disjoint on either axis, including the
/// case where they only touch along an edge (a zero-width overlap).
pub fn intersect(a: &Roi<Absolute>, b: &Roi<Absolute>) -> Option<Intersection> {
    let min = a.min.max(&b.min);
    let max = a.max.min(&b.max);
    if min.x >= max.x || min.y >= max.y {
        return None;
    }

    let absolute = Roi { min, max };
    Some(Intersection {
        absolute,
        within_a: absolute.relative_to(a.min),
        within_b: absolute.relative_to(b.min),
    })
}
