//! Resolution of merge events.
//!
//! A merge happens when one raw object in the current slice overlaps two or
//! more objects of the previous slice. Only one previous id can survive; the
//! policy decides which.

use std::collections::BTreeMap;

/// How a raw label overlapping several previous objects picks its id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum MergePolicy {
    /// The id met last when walking previous ids in ascending order, i.e.
    /// the largest overlapping previous id.
    #[default]
    LastPrevious,
    /// The smallest overlapping previous id.
    SmallestPrevious,
    /// The previous id sharing the most pixels with the raw label. Ties go
    /// to the larger id.
    LargestOverlap,
}

impl MergePolicy {
    /// Picks the surviving id from `candidates` (previous id to overlapping
    /// pixel count). Returns `None` only for an empty candidate set.
    pub fn resolve(&self, candidates: &BTreeMap<u32, usize>) -> Option<u32> {
        match self {
            MergePolicy::LastPrevious => candidates.keys().next_back().copied(),
            MergePolicy::SmallestPrevious => candidates.keys().next().copied(),
            MergePolicy::LargestOverlap => candidates
                .iter()
                .max_by_key(|&(&id, &pixels)| (pixels, id))
                .map(|(&id, _)| id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> BTreeMap<u32, usize> {
        BTreeMap::from([(4, 10), (9, 2), (6, 10)])
    }

    #[test]
    fn test_last_previous_takes_largest_id() {
        assert_eq!(MergePolicy::LastPrevious.resolve(&candidates()), Some(9));
    }

    #[test]
    fn test_smallest_previous() {
        assert_eq!(MergePolicy::SmallestPrevious.resolve(&candidates()), Some(4));
    }

    #[test]
    fn test_largest_overlap_breaks_ties_upward() {
        assert_eq!(MergePolicy::LargestOverlap.resolve(&candidates()), Some(6));
    }

    #[test]
    fn test_empty_candidates() {
        assert_eq!(MergePolicy::default().resolve(&BTreeMap::new()), None);
    }
}
