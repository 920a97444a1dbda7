//! Fuzz target for recorded node JSON parsing and replay.
//!
//! Parsed documents are also replayed through the locate pipeline, so
//! arbitrary arrays and ROIs reach the relabeler and feature extraction.
//!
//! Run with:
//!   cargo +nightly fuzz run node_json_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use synaptrack::io::nodes_json::from_node_json_slice;
use synaptrack::model::SynapseRecord;
use synaptrack::pipeline::{locate_synapses, LocateOptions};

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    let Ok(mut run) = from_node_json_slice(data) else {
        return;
    };
    let mut records: Vec<SynapseRecord> = Vec::new();
    let _ = locate_synapses(
        &run.branches,
        &mut run.source,
        &mut records,
        &LocateOptions::default(),
        |_| {},
    );
});
