use std::path::PathBuf;
use thiserror::Error;

use crate::model::NodeId;

/// The main error type for synaptrack operations.
#[derive(Debug, Error)]
pub enum SynaptrackError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed ROI [{xmin}, {xmax}) x [{ymin}, {ymax}): min must be below max on every axis")]
    Geometry {
        xmin: i64,
        ymin: i64,
        xmax: i64,
        ymax: i64,
    },

    #[error("Contract violation: {0}")]
    ContractViolation(String),

    #[error("Classification failed for node {node_id}: {message}")]
    ClassificationFailed { node_id: NodeId, message: String },

    #[error("Failed to parse synapse table from {path}: {source}")]
    TsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write synapse table to {path}: {source}")]
    TsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid synapse table {path}: {message}")]
    TsvInvalid { path: PathBuf, message: String },

    #[error("Failed to parse node JSON from {path}: {source}")]
    NodeJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid node JSON {path}: {message}")]
    NodeJsonInvalid { path: PathBuf, message: String },

    #[error("Logger initialization failed: {0}")]
    Logger(#[from] flexi_logger::FlexiLoggerError),

    #[error("{failed} of {total} node(s) could not be processed")]
    NodeFailures { failed: usize, total: usize },
}

impl SynaptrackError {
    /// Returns true if the error only invalidates the node being processed.
    ///
    /// The driver skips such nodes and keeps going; anything else (sink I/O,
    /// output encoding) aborts the whole run.
    pub fn is_node_local(&self) -> bool {
        matches!(
            self,
            SynaptrackError::Geometry { .. }
                | SynaptrackError::ContractViolation(_)
                | SynaptrackError::ClassificationFailed { .. }
        )
    }
}
