//! Label and probability arrays for one slice.
//!
//! A slice's raw connected-component labeling, its normalized (globally
//! consistent) labeling and the class probabilities it was thresholded from
//! all share the pixel extent of the slice's ROI.

mod kind;
mod probability;
mod slice;

pub use kind::{Normalized, Raw};
pub use probability::ProbabilitySlice;
pub use slice::{LabelSlice, NormalizedLabelSlice, RawLabelSlice};
