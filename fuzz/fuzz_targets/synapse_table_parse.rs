//! Fuzz target for synapse table parsing.
//!
//! Run with:
//!   cargo +nightly fuzz run synapse_table_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use synaptrack::io::tsv::from_synapse_table_slice;
use synaptrack::merge::merge_synapse_ids;

fuzz_target!(|data: &[u8]| {
    // 10MB is generous for a synapse table.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(records) = from_synapse_table_slice(data) {
        let _ = merge_synapse_ids(&records);
    }
});
