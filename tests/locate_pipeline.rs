//! Library-level locate runs: recorded JSON in, synapse table out.

use std::path::Path;

use synaptrack::io::nodes_json::{from_node_json_str, read_node_json};
use synaptrack::io::tsv::{
    from_merged_table_str, read_synapse_table, to_merged_table_string, SynapseTableWriter,
};
use synaptrack::merge::merge_synapse_ids;
use synaptrack::model::{NodeId, SynapseId, SynapseRecord};
use synaptrack::pipeline::{locate_synapses, LocateOptions, ProgressInfo};
use synaptrack::relabel::MergePolicy;
use tempfile::tempdir;

#[test]
fn recorded_run_streams_to_table_on_disk() {
    let mut run = read_node_json(Path::new("tests/fixtures/branch_with_failure.json")).unwrap();
    let temp = tempdir().expect("create temp dir");
    let path = temp.path().join("synapses.tsv");

    let mut sink = SynapseTableWriter::create(&path).unwrap();
    let mut seen: Vec<ProgressInfo> = Vec::new();
    let summary = locate_synapses(
        &run.branches,
        &mut run.source,
        &mut sink,
        &LocateOptions::default(),
        |info| seen.push(*info),
    )
    .unwrap();
    sink.into_inner().unwrap();

    assert_eq!(summary.nodes_total, 3);
    assert_eq!(summary.nodes_processed, 2);
    assert_eq!(summary.records_written, 3);
    assert_eq!(summary.max_label, 2);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].node_id, NodeId::new(3));

    // Progress is reported for every node, the skipped one included.
    assert_eq!(seen.len(), 3);
    assert!((seen[2].fraction_done() - 1.0).abs() < f64::EPSILON);
    assert_eq!(seen[2].max_label, 2);

    let records = read_synapse_table(&path).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].node_id, NodeId::new(1));
    assert_eq!(records[1].synapse_id, records[0].synapse_id);
    assert_eq!(records[2].synapse_id, SynapseId::new(2));
    assert_eq!((records[2].x_px, records[2].y_px, records[2].z_px), (4, 1, 1));
}

#[test]
fn merge_policy_decides_which_id_survives_a_merge() {
    // Two objects on plane 0 touch one object on plane 1.
    let json = r#"{
        "branches": [[
            {
                "node": {"id": 1, "x_px": 1, "y_px": 0, "z_px": 0},
                "roi": {"xmin": 0, "ymin": 0, "xmax": 4, "ymax": 1, "z": 0},
                "labels": [[1, 0, 2, 2]],
                "probabilities": [[[0.9, 0.1], [0.9, 0.1], [0.9, 0.1], [0.9, 0.1]]]
            },
            {
                "node": {"id": 2, "x_px": 1, "y_px": 0, "z_px": 1},
                "roi": {"xmin": 0, "ymin": 0, "xmax": 4, "ymax": 1, "z": 1},
                "labels": [[6, 6, 6, 6]],
                "probabilities": [[[0.9, 0.1], [0.9, 0.1], [0.9, 0.1], [0.9, 0.1]]]
            }
        ]]
    }"#;

    let id_on_second_plane = |policy: MergePolicy| -> u32 {
        let mut run = from_node_json_str(json).unwrap();
        let mut records: Vec<SynapseRecord> = Vec::new();
        let opts = LocateOptions {
            merge_policy: policy,
        };
        locate_synapses(&run.branches, &mut run.source, &mut records, &opts, |_| {}).unwrap();
        assert_eq!(records.len(), 3);
        records[2].synapse_id.as_u32()
    };

    assert_eq!(id_on_second_plane(MergePolicy::LastPrevious), 2);
    assert_eq!(id_on_second_plane(MergePolicy::SmallestPrevious), 1);
    assert_eq!(id_on_second_plane(MergePolicy::LargestOverlap), 2);
}

#[test]
fn merged_table_reads_back() {
    let records = read_synapse_table(Path::new("tests/fixtures/synapses.tsv")).unwrap();
    let merged = merge_synapse_ids(&records);
    let text = to_merged_table_string(&merged).unwrap();
    let parsed = from_merged_table_str(&text).unwrap();
    assert_eq!(parsed, merged);
    assert_eq!(parsed[0].node_count, 3);
    assert_eq!(parsed[1].node_count, 1);
}
