//! Coordinate frame marker types.
//!
//! These are zero-sized types (ZSTs) used as type parameters to distinguish
//! absolute volume coordinates from coordinates relative to one ROI's
//! origin, so that a local box can never be fed where an absolute one is
//! expected.

use std::fmt;

/// Marker type for absolute pixel coordinates in the volume.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Absolute {}

/// Marker type for coordinates relative to the minimum corner of some ROI.
///
/// Local coordinates index directly into the pixel data computed over that
/// ROI.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Local {}

impl fmt::Debug for Absolute {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl fmt::Debug for Local {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}
