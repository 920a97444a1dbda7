use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use synaptrack::geometry::{intersect, SliceRoi};
use synaptrack::relabel::{RelabelMode, SliceRelabeler};

mod common;
mod proptest_helpers;

use common::Object;
use proptest_helpers::{ObjectSpec, WindowSpec};

fn objects_from(specs: &[ObjectSpec]) -> Vec<Object> {
    specs
        .iter()
        .map(|s| Object {
            cell: s.cell,
            z_start: s.z_start,
            z_end: s.z_start + s.z_len,
        })
        .collect()
}

fn windows_to_rois(windows: &[WindowSpec]) -> Vec<SliceRoi> {
    let mut z = 0;
    windows
        .iter()
        .map(|w| {
            let roi = SliceRoi::from_xyxy_z(
                w.x,
                w.y,
                w.x + w.width as i64,
                w.y + w.height as i64,
                z,
            )
            .expect("positive extent");
            z += w.z_step;
            roi
        })
        .collect()
}

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn intersect_is_symmetric(a in proptest_helpers::arb_roi(), b in proptest_helpers::arb_roi()) {
        let ab = intersect(&a, &b);
        let ba = intersect(&b, &a);
        prop_assert_eq!(ab.is_some(), ba.is_some());
        if let (Some(ab), Some(ba)) = (ab, ba) {
            prop_assert_eq!(ab.absolute, ba.absolute);
            prop_assert_eq!(ab.within_a, ab.absolute.relative_to(a.min()));
            prop_assert_eq!(ab.within_b, ab.absolute.relative_to(b.min()));
            prop_assert_eq!(ab.within_a, ba.within_b);
        }
    }

    #[test]
    fn distinct_objects_never_share_an_id(
        specs in proptest_helpers::arb_objects(),
        windows in proptest_helpers::arb_windows(12),
    ) {
        let objects = objects_from(&specs);
        let mut relabeler = SliceRelabeler::new();
        let mut owner: BTreeMap<u32, usize> = BTreeMap::new();

        for (roi, window) in windows_to_rois(&windows).iter().zip(&windows) {
            let (raw, truth) = common::render(&objects, roi, window.label_shift);
            let normalized = relabeler.normalize(&raw, roi).expect("valid input");

            for (&id, object) in normalized.as_slice().iter().zip(&truth) {
                match object {
                    None => prop_assert_eq!(id, 0),
                    Some(object) => {
                        prop_assert!(id != 0);
                        prop_assert!(id <= relabeler.global_max_label());
                        let first = *owner.entry(id).or_insert(*object);
                        prop_assert_eq!(first, *object, "id {} labels two objects", id);
                    }
                }
            }
        }
    }

    #[test]
    fn max_label_is_monotonic_and_counts_new_objects(
        specs in proptest_helpers::arb_objects(),
        windows in proptest_helpers::arb_windows(12),
    ) {
        let objects = objects_from(&specs);
        let mut relabeler = SliceRelabeler::new();

        for (roi, window) in windows_to_rois(&windows).iter().zip(&windows) {
            let before = relabeler.global_max_label();
            let (raw, _) = common::render(&objects, roi, window.label_shift);
            let (normalized, summary) = relabeler.normalize_with_summary(&raw, roi).expect("valid input");
            let after = relabeler.global_max_label();

            prop_assert!(after >= before);
            prop_assert_eq!((after - before) as usize, summary.new_objects);
            prop_assert_eq!(summary.carried + summary.new_objects, raw.distinct_labels().len());
            prop_assert_eq!(summary.merges, 0);
            prop_assert_eq!(summary.splits, 0);

            // Fresh ids are exactly the block just allocated.
            let fresh: BTreeSet<u32> = normalized
                .distinct_labels()
                .into_iter()
                .filter(|&id| id > before)
                .collect();
            let expected: BTreeSet<u32> = (before + 1..=after).collect();
            prop_assert_eq!(fresh, expected);
        }
    }

    #[test]
    fn fully_visible_objects_keep_their_id(
        specs in proptest_helpers::arb_objects(),
        z_steps in proptest::collection::vec(1i64..3, 2..10),
    ) {
        // Every window covers the whole scene, so an object seen on two
        // adjacent planes must keep its id.
        let objects = objects_from(&specs);
        let mut relabeler = SliceRelabeler::new();
        let mut last_seen: BTreeMap<usize, (i64, u32)> = BTreeMap::new();
        let extent = common::GRID * common::CELL;

        let mut z = 0;
        for (i, step) in z_steps.iter().enumerate() {
            let roi = SliceRoi::from_xyxy_z(0, 0, extent, extent, z).expect("valid roi");
            let (raw, truth) = common::render(&objects, &roi, i as u32);
            let (normalized, summary) = relabeler.normalize_with_summary(&raw, &roi).expect("valid input");

            if raw.is_background() {
                prop_assert_ne!(summary.mode, RelabelMode::Fresh);
            }

            for (&id, object) in normalized.as_slice().iter().zip(&truth) {
                if let Some(object) = object {
                    if let Some(&(plane, previous_id)) = last_seen.get(object) {
                        if plane == z - 1 {
                            prop_assert_eq!(id, previous_id);
                        }
                    }
                }
            }
            for (&id, object) in normalized.as_slice().iter().zip(&truth) {
                if let Some(object) = object {
                    last_seen.insert(*object, (z, id));
                }
            }
            z += step;
        }
    }
}
