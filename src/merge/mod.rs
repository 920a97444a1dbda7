//! Collapsing per-node synapse rows into one row per synapse.
//!
//! A synapse that stays visible over several consecutive nodes appears once
//! per node in the synapse table, always with the same id. Merging folds
//! those rows together:
//!
//! - `x_px`, `y_px`, `z_px` become the (rounded) mean position
//! - `size_px` is the sum over all rows
//! - `detection_uncertainty` is the size-weighted mean
//! - the node columns come from a representative row: the first one lying on
//!   the mean plane, or the one closest to it
//! - `node_count` tells how many rows were merged
//!
//! Output order follows the first appearance of each id.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{NodeId, SynapseId, SynapseRecord};

/// One synapse after merging all of its per-node rows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MergedSynapse {
    pub synapse_id: SynapseId,
    pub x_px: i64,
    pub y_px: i64,
    pub z_px: i64,
    pub size_px: u64,
    pub detection_uncertainty: f64,
    pub node_id: NodeId,
    pub node_x_px: i64,
    pub node_y_px: i64,
    pub node_z_px: i64,
    /// Number of synapse-table rows folded into this one.
    pub node_count: usize,
}

fn mean_rounded(values: impl Iterator<Item = i64>, count: usize) -> i64 {
    let sum: f64 = values.map(|v| v as f64).sum();
    (sum / count as f64 + 0.5).floor() as i64
}

fn merge_group(rows: &[&SynapseRecord]) -> Option<MergedSynapse> {
    let first = rows.first()?;
    let n = rows.len();

    let x_px = mean_rounded(rows.iter().map(|r| r.x_px), n);
    let y_px = mean_rounded(rows.iter().map(|r| r.y_px), n);
    let z_px = mean_rounded(rows.iter().map(|r| r.z_px), n);

    // min_by_key keeps the first of equally close rows.
    let representative = rows
        .iter()
        .min_by_key(|r| r.z_px.abs_diff(z_px))
        .unwrap_or(first);

    let size_px = rows
        .iter()
        .fold(0u64, |total, r| total.saturating_add(r.size_px));
    let detection_uncertainty = if size_px == 0 {
        rows.iter().map(|r| r.detection_uncertainty).sum::<f64>() / n as f64
    } else {
        rows.iter()
            .map(|r| r.detection_uncertainty * r.size_px as f64)
            .sum::<f64>()
            / size_px as f64
    };

    Some(MergedSynapse {
        synapse_id: first.synapse_id,
        x_px,
        y_px,
        z_px,
        size_px,
        detection_uncertainty,
        node_id: representative.node_id,
        node_x_px: representative.node_x_px,
        node_y_px: representative.node_y_px,
        node_z_px: representative.node_z_px,
        node_count: n,
    })
}

/// Merges all rows sharing a synapse id.
pub fn merge_synapse_ids(records: &[SynapseRecord]) -> Vec<MergedSynapse> {
    let mut order: Vec<SynapseId> = Vec::new();
    let mut groups: HashMap<SynapseId, Vec<&SynapseRecord>> = HashMap::new();
    for record in records {
        groups
            .entry(record.synapse_id)
            .or_insert_with(|| {
                order.push(record.synapse_id);
                Vec::new()
            })
            .push(record);
    }

    order
        .iter()
        .filter_map(|id| groups.get(id).and_then(|rows| merge_group(rows)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u32, x: i64, z: i64, size: u64, uncertainty: f64, node: u64) -> SynapseRecord {
        SynapseRecord {
            synapse_id: SynapseId(id),
            x_px: x,
            y_px: 100,
            z_px: z,
            size_px: size,
            detection_uncertainty: uncertainty,
            node_id: NodeId(node),
            node_x_px: x + 1,
            node_y_px: 101,
            node_z_px: z,
        }
    }

    #[test]
    fn test_single_row_passes_through() {
        let merged = merge_synapse_ids(&[record(4, 10, 3, 7, 0.2, 1)]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].node_count, 1);
        assert_eq!(merged[0].x_px, 10);
        assert_eq!(merged[0].size_px, 7);
        assert_eq!(merged[0].node_id, NodeId(1));
    }

    #[test]
    fn test_rows_are_aggregated() {
        let merged = merge_synapse_ids(&[
            record(2, 10, 4, 10, 0.1, 1),
            record(2, 13, 5, 30, 0.5, 2),
            record(2, 16, 6, 10, 0.3, 3),
        ]);
        assert_eq!(merged.len(), 1);
        let m = &merged[0];
        assert_eq!((m.x_px, m.y_px, m.z_px), (13, 100, 5));
        assert_eq!(m.size_px, 50);
        assert!((m.detection_uncertainty - 0.38).abs() < 1e-12);
        assert_eq!(m.node_id, NodeId(2));
        assert_eq!(m.node_count, 3);
    }

    #[test]
    fn test_representative_falls_back_to_closest_plane() {
        // Mean z is 5.5, rounded to 6; no row is on plane 6.
        let merged = merge_synapse_ids(&[record(1, 0, 4, 1, 0.0, 1), record(1, 0, 7, 1, 0.0, 2)]);
        assert_eq!(merged[0].z_px, 6);
        assert_eq!(merged[0].node_id, NodeId(2));
    }

    #[test]
    fn test_output_follows_first_appearance() {
        let merged = merge_synapse_ids(&[
            record(9, 0, 0, 1, 0.0, 1),
            record(3, 0, 0, 1, 0.0, 1),
            record(9, 0, 1, 1, 0.0, 2),
        ]);
        let ids: Vec<u32> = merged.iter().map(|m| m.synapse_id.as_u32()).collect();
        assert_eq!(ids, vec![9, 3]);
        assert_eq!(merged[0].node_count, 2);
    }
}
