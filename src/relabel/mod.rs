//! Cross-slice identity reconciliation.
//!
//! The connected-component labels coming out of thresholding are only
//! unique within one slice. [`SliceRelabeler`] turns them into global
//! synapse ids: an object that overlaps an object of the immediately
//! preceding slice inherits that object's id, everything else gets a fresh
//! id from a counter owned by the relabeler.
//!
//! Continuity is only attempted between slices on adjacent planes whose
//! ROIs overlap (see [`continuity_eligible`]). Anything else, including the
//! jump from the end of one skeleton branch to the start of the next, starts
//! a fresh labeling. An empty slice breaks the chain as well.
//!
//! # Example
//!
//! ```
//! use synaptrack::geometry::SliceRoi;
//! use synaptrack::labels::RawLabelSlice;
//! use synaptrack::relabel::SliceRelabeler;
//!
//! let mut relabeler = SliceRelabeler::new();
//! let first = RawLabelSlice::from_rows(&[[0u32, 7, 7], [0, 0, 4]])?;
//! let second = RawLabelSlice::from_rows(&[[0u32, 2, 0], [5, 0, 0]])?;
//!
//! let a = relabeler.normalize(&first, &SliceRoi::from_xyxy_z(0, 0, 3, 2, 10)?)?;
//! let b = relabeler.normalize(&second, &SliceRoi::from_xyxy_z(0, 0, 3, 2, 11)?)?;
//!
//! assert_eq!(a.get(1, 0), b.get(1, 0));
//! assert_eq!(b.get(0, 1), 3);
//! assert_eq!(relabeler.global_max_label(), 3);
//! # Ok::<(), synaptrack::SynaptrackError>(())
//! ```

mod policy;

pub use policy::MergePolicy;

use std::collections::{BTreeMap, HashMap};

use log::debug;

use crate::error::SynaptrackError;
use crate::geometry::{intersect, Intersection, SliceRoi};
use crate::labels::{NormalizedLabelSlice, RawLabelSlice};

/// Returns the overlap through which identities can be carried from the
/// `previous` slice to the `current` one, if any.
///
/// The intersection's `within_a` frame is local to `current`, `within_b` to
/// `previous`. Continuity requires the planes to be exactly one step apart
/// and the in-plane boxes to overlap.
pub fn continuity_overlap(previous: &SliceRoi, current: &SliceRoi) -> Option<Intersection> {
    if current.plane.abs_diff(previous.plane) != 1 {
        return None;
    }
    intersect(&current.area, &previous.area)
}

/// Returns true if labels of a slice over `current` may inherit ids from
/// the slice over `previous`.
pub fn continuity_eligible(previous: &SliceRoi, current: &SliceRoi) -> bool {
    continuity_overlap(previous, current).is_some()
}

/// How a slice was labeled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelabelMode {
    /// No continuity with the previous slice; every object got a new id.
    Fresh,
    /// Ids were carried over from the previous slice where objects overlap.
    Continued,
    /// The slice had no objects. The continuity chain is broken.
    Empty,
}

/// What a single `normalize` call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelabelSummary {
    pub mode: RelabelMode,
    /// Raw labels that inherited an id from the previous slice.
    pub carried: usize,
    /// Raw labels that received a brand-new id.
    pub new_objects: usize,
    /// Raw labels overlapping more than one previous object.
    pub merges: usize,
    /// Previous ids now shared by more than one raw label.
    pub splits: usize,
}

impl RelabelSummary {
    fn empty() -> Self {
        Self {
            mode: RelabelMode::Empty,
            carried: 0,
            new_objects: 0,
            merges: 0,
            splits: 0,
        }
    }
}

#[derive(Clone, Debug)]
struct PreviousSlice {
    slice: NormalizedLabelSlice,
    roi: SliceRoi,
}

/// A raw-to-global label mapping that has not been committed yet.
struct RelabelPlan {
    mapping: HashMap<u32, u32>,
    max_label: u32,
    summary: RelabelSummary,
}

/// Stateful converter from per-slice labels to global synapse ids.
///
/// Slices must be fed in traversal order by a single owner; the relabeler
/// only ever compares a slice against the one normalized right before it.
#[derive(Clone, Debug, Default)]
pub struct SliceRelabeler {
    policy: MergePolicy,
    global_max_label: u32,
    previous: Option<PreviousSlice>,
}

impl SliceRelabeler {
    /// Creates a relabeler using the default [`MergePolicy`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a relabeler resolving merge events with `policy`.
    pub fn with_policy(policy: MergePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// The largest global id handed out so far (0 before the first object).
    #[inline]
    pub fn global_max_label(&self) -> u32 {
        self.global_max_label
    }

    /// Returns the ROI of the slice that the next call may continue from.
    pub fn previous_roi(&self) -> Option<&SliceRoi> {
        self.previous.as_ref().map(|p| &p.roi)
    }

    /// Relabels `raw` (computed over `roi`) to global ids.
    ///
    /// See [`SliceRelabeler::normalize_with_summary`].
    pub fn normalize(
        &mut self,
        raw: &RawLabelSlice,
        roi: &SliceRoi,
    ) -> Result<NormalizedLabelSlice, SynaptrackError> {
        self.normalize_with_summary(raw, roi)
            .map(|(normalized, _)| normalized)
    }

    /// Relabels `raw` (computed over `roi`) to global ids and reports what
    /// happened.
    ///
    /// # Errors
    /// Returns a contract violation if the slice dimensions do not match
    /// the ROI or if the global label space is exhausted. A failed call
    /// leaves the relabeler untouched.
    pub fn normalize_with_summary(
        &mut self,
        raw: &RawLabelSlice,
        roi: &SliceRoi,
    ) -> Result<(NormalizedLabelSlice, RelabelSummary), SynaptrackError> {
        if raw.width() != roi.width() || raw.height() != roi.height() {
            return Err(SynaptrackError::ContractViolation(format!(
                "raw slice is {}x{} but its ROI {:?} is {}x{}",
                raw.width(),
                raw.height(),
                roi.area,
                roi.width(),
                roi.height()
            )));
        }

        let continuation = self.previous.as_ref().and_then(|previous| {
            continuity_overlap(&previous.roi, roi).map(|overlap| (previous, overlap))
        });
        let plan = match continuation {
            Some((previous, overlap)) => continuity_plan(
                raw,
                &previous.slice,
                &overlap,
                self.policy,
                self.global_max_label,
            )?,
            None => fresh_plan(raw, self.global_max_label)?,
        };

        let normalized: NormalizedLabelSlice =
            raw.map_labels(|label| plan.mapping.get(&label).copied().unwrap_or(0));

        self.global_max_label = plan.max_label;
        self.previous = match plan.summary.mode {
            RelabelMode::Empty => None,
            RelabelMode::Fresh | RelabelMode::Continued => Some(PreviousSlice {
                slice: normalized.clone(),
                roi: *roi,
            }),
        };

        debug!(
            "plane {}: {:?}, {} carried, {} new, {} merge(s), {} split(s), max label {}",
            roi.plane,
            plan.summary.mode,
            plan.summary.carried,
            plan.summary.new_objects,
            plan.summary.merges,
            plan.summary.splits,
            self.global_max_label
        );

        Ok((normalized, plan.summary))
    }
}

/// Reserves `count` ids after `max_label`, returning the new maximum.
fn allocate(max_label: u32, count: usize) -> Result<u32, SynaptrackError> {
    u32::try_from(count)
        .ok()
        .and_then(|count| max_label.checked_add(count))
        .ok_or_else(|| {
            SynaptrackError::ContractViolation(format!(
                "global label space exhausted: cannot allocate {} id(s) after {}",
                count, max_label
            ))
        })
}

fn fresh_plan(raw: &RawLabelSlice, max_label: u32) -> Result<RelabelPlan, SynaptrackError> {
    let labels = raw.distinct_labels();
    if labels.is_empty() {
        return Ok(RelabelPlan {
            mapping: HashMap::new(),
            max_label,
            summary: RelabelSummary::empty(),
        });
    }

    let new_max = allocate(max_label, labels.len())?;
    let mapping = labels.iter().copied().zip(max_label + 1..=new_max).collect();
    Ok(RelabelPlan {
        mapping,
        max_label: new_max,
        summary: RelabelSummary {
            mode: RelabelMode::Fresh,
            carried: 0,
            new_objects: labels.len(),
            merges: 0,
            splits: 0,
        },
    })
}

fn continuity_plan(
    raw: &RawLabelSlice,
    previous: &NormalizedLabelSlice,
    overlap: &Intersection,
    policy: MergePolicy,
    max_label: u32,
) -> Result<RelabelPlan, SynaptrackError> {
    // raw label -> (previous id -> overlapping pixels)
    let mut overlaps: BTreeMap<u32, BTreeMap<u32, usize>> = BTreeMap::new();
    let current_window = raw.window(&overlap.within_a);
    let previous_window = previous.window(&overlap.within_b);
    for (current, prev) in current_window.zip(previous_window) {
        if current != 0 && prev != 0 {
            *overlaps
                .entry(current)
                .or_default()
                .entry(prev)
                .or_default() += 1;
        }
    }

    let mut mapping = HashMap::new();
    let mut claims: BTreeMap<u32, usize> = BTreeMap::new();
    let mut merges = 0;
    for (&current, candidates) in &overlaps {
        if candidates.len() > 1 {
            merges += 1;
        }
        if let Some(id) = policy.resolve(candidates) {
            mapping.insert(current, id);
            *claims.entry(id).or_default() += 1;
        }
    }
    let carried = mapping.len();
    let splits = claims.values().filter(|&&n| n > 1).count();

    let unclaimed: Vec<u32> = raw
        .distinct_labels()
        .into_iter()
        .filter(|label| !mapping.contains_key(label))
        .collect();
    let new_max = allocate(max_label, unclaimed.len())?;
    mapping.extend(
        unclaimed
            .iter()
            .copied()
            .zip(max_label.saturating_add(1)..=new_max),
    );

    Ok(RelabelPlan {
        mapping,
        max_label: new_max,
        summary: RelabelSummary {
            mode: RelabelMode::Continued,
            carried,
            new_objects: unclaimed.len(),
            merges,
            splits,
        },
    })
}
