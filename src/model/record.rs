//! Skeleton nodes and the per-slice synapse records emitted for them.

use serde::{Deserialize, Serialize};

use super::ids::{NodeId, SynapseId};

/// A skeleton node, positioned in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkeletonNode {
    pub id: NodeId,
    pub x_px: i64,
    pub y_px: i64,
    pub z_px: i64,
}

impl SkeletonNode {
    pub fn new(id: impl Into<NodeId>, x_px: i64, y_px: i64, z_px: i64) -> Self {
        Self {
            id: id.into(),
            x_px,
            y_px,
            z_px,
        }
    }
}

/// One detected object in one slice.
///
/// Field order matches the column order of the synapse table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SynapseRecord {
    pub synapse_id: SynapseId,
    /// Centroid x in absolute pixel coordinates.
    pub x_px: i64,
    /// Centroid y in absolute pixel coordinates.
    pub y_px: i64,
    /// The slice's plane index.
    pub z_px: i64,
    /// Number of pixels covered by the object in this slice.
    pub size_px: u64,
    /// `1 - mean(top - second)` class-probability margin over the object.
    pub detection_uncertainty: f64,
    pub node_id: NodeId,
    pub node_x_px: i64,
    pub node_y_px: i64,
    pub node_z_px: i64,
}
