//! Recorded classifier output in JSON.
//!
//! The pixel classifier and the thresholding step live outside this crate.
//! Their output for a whole skeleton can be recorded into one JSON document
//! and replayed through the locate pipeline:
//!
//! ```json
//! {
//!   "branches": [
//!     [
//!       {
//!         "node": { "id": 1, "x_px": 5, "y_px": 5, "z_px": 3 },
//!         "roi": { "xmin": 4, "ymin": 4, "xmax": 6, "ymax": 6, "z": 3 },
//!         "labels": [[0, 1], [0, 1]],
//!         "probabilities": [[[0.9, 0.1], [0.2, 0.8]], [[0.9, 0.1], [0.3, 0.7]]]
//!       }
//!     ]
//!   ]
//! }
//! ```
//!
//! A node may appear more than once (a branch point listed at the end of one
//! branch and the start of the next), but every entry for the same id must
//! carry identical recorded output; conflicting duplicates are rejected.
//!
//! `labels` is indexed `[y][x]`, `probabilities` `[y][x][channel]`. A node
//! without `labels` or `probabilities` stands for a failed classification;
//! an optional `error` string explains why. Array problems (negative labels,
//! ragged rows) are not parse errors: they surface when the node is
//! classified, so only that node is skipped.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SynaptrackError;
use crate::geometry::{RoiBounds, SliceRoi};
use crate::labels::{ProbabilitySlice, RawLabelSlice};
use crate::model::{NodeId, SkeletonNode};
use crate::pipeline::{NodeSlices, PlannedNode, SliceSource};

// ============================================================================
// JSON schema types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct NodeDocument {
    branches: Vec<Vec<NodeEntry>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeEntry {
    node: SkeletonNode,
    roi: RoiBounds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    labels: Option<Vec<Vec<i64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    probabilities: Option<Vec<Vec<Vec<f32>>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
struct RecordedSlices {
    labels: Option<Vec<Vec<i64>>>,
    probabilities: Option<Vec<Vec<Vec<f32>>>>,
    error: Option<String>,
}

// ============================================================================
// Public API
// ============================================================================

/// A replayable skeleton run: the traversal plan and the recorded slices.
#[derive(Clone, Debug)]
pub struct RecordedRun {
    pub branches: Vec<Vec<PlannedNode>>,
    pub source: RecordedSource,
}

/// A [`SliceSource`] serving recorded classifier output by node id.
#[derive(Clone, Debug, Default)]
pub struct RecordedSource {
    slices: HashMap<NodeId, RecordedSlices>,
}

impl SliceSource for RecordedSource {
    fn classify(
        &mut self,
        node: &SkeletonNode,
        _roi: &SliceRoi,
    ) -> Result<NodeSlices, SynaptrackError> {
        let failed = |message: String| SynaptrackError::ClassificationFailed {
            node_id: node.id,
            message,
        };
        let recorded = self
            .slices
            .get(&node.id)
            .ok_or_else(|| failed("no recorded output".to_string()))?;

        let (labels, probabilities) = match (&recorded.labels, &recorded.probabilities) {
            (Some(labels), Some(probabilities)) => (labels, probabilities),
            _ => {
                return Err(failed(
                    recorded
                        .error
                        .clone()
                        .unwrap_or_else(|| "labels or probabilities missing".to_string()),
                ))
            }
        };

        Ok(NodeSlices {
            labels: signed_rows_to_slice(labels)?,
            probabilities: ProbabilitySlice::from_nested(probabilities)?,
        })
    }
}

/// Reads a recorded run from a JSON file.
pub fn read_node_json(path: &Path) -> Result<RecordedRun, SynaptrackError> {
    let file = File::open(path).map_err(SynaptrackError::Io)?;
    let reader = BufReader::new(file);
    let doc: NodeDocument =
        serde_json::from_reader(reader).map_err(|source| SynaptrackError::NodeJsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    document_to_run(doc, path)
}

/// Reads a recorded run from a JSON string.
///
/// Useful for testing without file I/O.
pub fn from_node_json_str(json: &str) -> Result<RecordedRun, SynaptrackError> {
    from_node_json_slice(json.as_bytes())
}

/// Reads a recorded run from JSON bytes.
///
/// Useful for fuzzing and processing raw bytes without requiring UTF-8 upfront.
pub fn from_node_json_slice(bytes: &[u8]) -> Result<RecordedRun, SynaptrackError> {
    let doc: NodeDocument =
        serde_json::from_slice(bytes).map_err(|source| SynaptrackError::NodeJsonParse {
            path: Path::new("<bytes>").to_path_buf(),
            source,
        })?;
    document_to_run(doc, Path::new("<bytes>"))
}

// ============================================================================
// Conversion
// ============================================================================

fn document_to_run(doc: NodeDocument, path: &Path) -> Result<RecordedRun, SynaptrackError> {
    let mut source = RecordedSource::default();
    let mut branches: Vec<Vec<PlannedNode>> = Vec::with_capacity(doc.branches.len());
    for (branch_index, branch) in doc.branches.into_iter().enumerate() {
        let mut planned = Vec::with_capacity(branch.len());
        for entry in branch {
            let recorded = RecordedSlices {
                labels: entry.labels,
                probabilities: entry.probabilities,
                error: entry.error,
            };
            match source.slices.entry(entry.node.id) {
                Entry::Vacant(slot) => {
                    slot.insert(recorded);
                }
                Entry::Occupied(existing) if *existing.get() == recorded => {}
                Entry::Occupied(_) => {
                    return Err(SynaptrackError::NodeJsonInvalid {
                        path: path.to_path_buf(),
                        message: format!(
                            "node {} in branch {} repeats an earlier node id with different recorded output",
                            entry.node.id, branch_index
                        ),
                    });
                }
            }
            planned.push(PlannedNode {
                node: entry.node,
                bounds: entry.roi,
            });
        }
        branches.push(planned);
    }
    Ok(RecordedRun { branches, source })
}

fn signed_rows_to_slice(rows: &[Vec<i64>]) -> Result<RawLabelSlice, SynaptrackError> {
    let width = rows.first().map_or(0, Vec::len);
    if let Some((y, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
        return Err(SynaptrackError::ContractViolation(format!(
            "ragged label rows: row {} has {} values, expected {}",
            y,
            row.len(),
            width
        )));
    }
    let values: Vec<i64> = rows.iter().flatten().copied().collect();
    RawLabelSlice::from_signed(width, rows.len(), &values)
}
