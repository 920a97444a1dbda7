//! The node processing driver.
//!
//! A locate run walks the skeleton branch by branch. For every node the
//! external classifier produces a raw labeling and its probabilities over
//! the node's ROI; the driver then relabels the slice for consistency with
//! the previous one, extracts one record per synapse and hands the records
//! to a sink.
//!
//! Nodes are processed strictly in the order given. Errors that only concern
//! one node (a malformed ROI, a failed classification, mismatched arrays)
//! are logged and the node is skipped; the relabeler is only updated by
//! nodes that get through relabeling, so a skipped node never disturbs the
//! ids of its neighbours. Sink errors abort the run.

mod progress;

pub use progress::ProgressInfo;

use std::time::Instant;

use log::{debug, info, warn};

use crate::error::SynaptrackError;
use crate::features::{check_probabilities, extract_synapses};
use crate::geometry::{RoiBounds, SliceRoi};
use crate::labels::{ProbabilitySlice, RawLabelSlice};
use crate::model::{NodeId, SkeletonNode, SynapseRecord};
use crate::relabel::{MergePolicy, SliceRelabeler};

/// The classifier output for one node.
#[derive(Clone, Debug)]
pub struct NodeSlices {
    pub labels: RawLabelSlice,
    pub probabilities: ProbabilitySlice,
}

/// A skeleton node together with the window to classify around it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlannedNode {
    pub node: SkeletonNode,
    pub bounds: RoiBounds,
}

impl PlannedNode {
    pub fn new(node: SkeletonNode, roi: SliceRoi) -> Self {
        Self {
            node,
            bounds: roi.into(),
        }
    }
}

/// Produces the raw labeling and class probabilities for a node's ROI.
///
/// This is the seam to the pixel classifier and the thresholding step.
pub trait SliceSource {
    fn classify(
        &mut self,
        node: &SkeletonNode,
        roi: &SliceRoi,
    ) -> Result<NodeSlices, SynaptrackError>;
}

/// Receives the records of one node at a time.
pub trait RecordSink {
    fn append(&mut self, records: &[SynapseRecord]) -> Result<(), SynaptrackError>;
}

impl RecordSink for Vec<SynapseRecord> {
    fn append(&mut self, records: &[SynapseRecord]) -> Result<(), SynaptrackError> {
        self.extend_from_slice(records);
        Ok(())
    }
}

/// Options for a locate run.
#[derive(Clone, Debug, Default)]
pub struct LocateOptions {
    /// How to pick an id when one object overlaps several previous ones.
    pub merge_policy: MergePolicy,
}

/// A node that was skipped, and why.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeFailure {
    pub node_id: NodeId,
    pub message: String,
}

/// The outcome of a locate run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocateSummary {
    pub nodes_total: usize,
    pub nodes_processed: usize,
    pub records_written: usize,
    pub max_label: u32,
    pub failures: Vec<NodeFailure>,
}

/// Runs every node of `branches`, in order, through classification,
/// relabeling and feature extraction.
///
/// `progress` is called after every node, including skipped ones.
///
/// # Errors
/// Only errors that are not local to a node (see
/// [`SynaptrackError::is_node_local`]) are returned; in practice these come
/// from the sink.
pub fn locate_synapses<S, K, P>(
    branches: &[Vec<PlannedNode>],
    source: &mut S,
    sink: &mut K,
    opts: &LocateOptions,
    mut progress: P,
) -> Result<LocateSummary, SynaptrackError>
where
    S: SliceSource + ?Sized,
    K: RecordSink + ?Sized,
    P: FnMut(&ProgressInfo),
{
    let mut relabeler = SliceRelabeler::with_policy(opts.merge_policy);
    let mut summary = LocateSummary {
        nodes_total: branches.iter().map(Vec::len).sum(),
        ..LocateSummary::default()
    };

    let mut node_overall_index = 0;
    for (branch_index, branch) in branches.iter().enumerate() {
        for (node_index_in_branch, planned) in branch.iter().enumerate() {
            debug!(
                "node {} at ({}, {}, {})",
                planned.node.id, planned.node.x_px, planned.node.y_px, planned.node.z_px
            );

            let started = Instant::now();
            match process_node(&mut relabeler, source, planned) {
                Ok(records) => {
                    sink.append(&records)?;
                    summary.nodes_processed += 1;
                    summary.records_written += records.len();
                }
                Err(err) if err.is_node_local() => {
                    warn!("skipping node {}: {}", planned.node.id, err);
                    summary.failures.push(NodeFailure {
                        node_id: planned.node.id,
                        message: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }

            let node_elapsed = started.elapsed();
            debug!("node {} took {:?}", planned.node.id, node_elapsed);

            progress(&ProgressInfo {
                node_overall_index,
                node_count: summary.nodes_total,
                branch_index,
                branch_count: branches.len(),
                node_index_in_branch,
                branch_node_count: branch.len(),
                max_label: relabeler.global_max_label(),
                node_elapsed,
            });
            node_overall_index += 1;
        }
    }

    summary.max_label = relabeler.global_max_label();
    info!(
        "processed {}/{} node(s), {} record(s), max synapse id {}",
        summary.nodes_processed, summary.nodes_total, summary.records_written, summary.max_label
    );
    Ok(summary)
}

fn process_node<S>(
    relabeler: &mut SliceRelabeler,
    source: &mut S,
    planned: &PlannedNode,
) -> Result<Vec<SynapseRecord>, SynaptrackError>
where
    S: SliceSource + ?Sized,
{
    let roi = planned.bounds.to_slice_roi()?;
    let slices = source.classify(&planned.node, &roi)?;
    // Reject unusable probabilities before the relabeler commits this slice.
    check_probabilities(
        &slices.probabilities,
        slices.labels.width(),
        slices.labels.height(),
    )?;
    let normalized = relabeler.normalize(&slices.labels, &roi)?;
    extract_synapses(&normalized, &slices.probabilities, &roi, &planned.node)
}
