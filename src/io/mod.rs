//! Reading and writing synaptrack's file formats.
//!
//! - [`tsv`]: the tab-separated synapse table (and its merged variant)
//! - [`nodes_json`]: recorded per-node classifier output, replayable
//!   through the locate pipeline

pub mod nodes_json;
pub mod tsv;
