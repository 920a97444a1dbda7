//! Progress reporting for a locate run.

use std::fmt;
use std::time::Duration;

/// Where a locate run stands after finishing one node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressInfo {
    /// Zero-based index of the node across all branches.
    pub node_overall_index: usize,
    pub node_count: usize,
    pub branch_index: usize,
    pub branch_count: usize,
    pub node_index_in_branch: usize,
    pub branch_node_count: usize,
    /// The relabeler's current maximum synapse id.
    pub max_label: u32,
    /// Wall time spent on the node just finished.
    pub node_elapsed: Duration,
}

impl ProgressInfo {
    /// Fraction of nodes done, in `[0, 1]`.
    pub fn fraction_done(&self) -> f64 {
        if self.node_count == 0 {
            return 1.0;
        }
        (self.node_overall_index + 1) as f64 / self.node_count as f64
    }
}

impl fmt::Display for ProgressInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "node {}/{} (branch {}/{}, node {}/{}), max synapse id {}",
            self.node_overall_index + 1,
            self.node_count,
            self.branch_index + 1,
            self.branch_count,
            self.node_index_in_branch + 1,
            self.branch_node_count,
            self.max_label
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_display_is_one_based() {
        let info = ProgressInfo {
            node_overall_index: 4,
            node_count: 10,
            branch_index: 1,
            branch_count: 3,
            node_index_in_branch: 0,
            branch_node_count: 6,
            max_label: 12,
            node_elapsed: Duration::from_millis(40),
        };
        assert_eq!(
            info.to_string(),
            "node 5/10 (branch 2/3, node 1/6), max synapse id 12"
        );
        assert!((info.fraction_done() - 0.5).abs() < 1e-12);
    }
}
