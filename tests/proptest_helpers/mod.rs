#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use synaptrack::geometry::{Absolute, Roi};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn arb_roi() -> impl Strategy<Value = Roi<Absolute>> {
    (-50i64..50, -50i64..50, 1i64..40, 1i64..40)
        .prop_map(|(x, y, w, h)| Roi::from_xyxy(x, y, x + w, y + h).expect("positive extent"))
}

/// One static object of a synthetic scene, by grid cell: visible on the
/// planes `[z_start, z_start + z_len)`.
#[derive(Clone, Debug)]
pub struct ObjectSpec {
    pub cell: usize,
    pub z_start: i64,
    pub z_len: i64,
}

/// A slice window plus the per-slice shift used to scramble raw labels.
#[derive(Clone, Debug)]
pub struct WindowSpec {
    pub x: i64,
    pub y: i64,
    pub width: usize,
    pub height: usize,
    pub z_step: i64,
    pub label_shift: u32,
}

pub fn arb_objects() -> impl Strategy<Value = Vec<ObjectSpec>> {
    proptest::collection::vec(proptest::option::of((0i64..8, 1i64..6)), 16).prop_map(|cells| {
        cells
            .into_iter()
            .enumerate()
            .filter_map(|(cell, spec)| {
                spec.map(|(z_start, z_len)| ObjectSpec {
                    cell,
                    z_start,
                    z_len,
                })
            })
            .collect()
    })
}

pub fn arb_windows(max_slices: usize) -> impl Strategy<Value = Vec<WindowSpec>> {
    proptest::collection::vec(
        (0i64..10, 0i64..10, 6usize..16, 6usize..16, 1i64..3, 0u32..16),
        1..max_slices,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .map(|(x, y, width, height, z_step, label_shift)| WindowSpec {
                x,
                y,
                width,
                height,
                z_step,
                label_shift,
            })
            .collect()
    })
}
