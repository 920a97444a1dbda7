//! ROI geometry for synaptrack.
//!
//! Slices are computed over axis-aligned integer windows that can shift
//! between nodes. This module provides those windows in two coordinate
//! frames (absolute volume coordinates and coordinates local to one window)
//! and the intersection that lets two slices' pixel data be compared
//! directly.
//!
//! # Example
//!
//! ```
//! use synaptrack::geometry::{intersect, Absolute, Roi};
//!
//! let a: Roi<Absolute> = Roi::from_xyxy(0, 0, 10, 10)?;
//! let b: Roi<Absolute> = Roi::from_xyxy(6, 4, 16, 14)?;
//! let overlap = intersect(&a, &b).expect("boxes overlap");
//! assert_eq!(overlap.absolute.width(), 4);
//! assert_eq!(overlap.within_b.min().x, 0);
//! # Ok::<(), synaptrack::SynaptrackError>(())
//! ```

mod coord;
mod roi;
mod space;

pub use coord::Coord;
pub use roi::{intersect, Intersection, Roi, RoiBounds, SliceRoi};
pub use space::{Absolute, Local};
