//! Error taxonomy of the boolean engine.
//!
//! None of these abort an operation from the caller's point of view: the
//! entry points log the failure and return the input (or the intersected
//! mesh) unchanged. The error values are the vocabulary used by validation
//! helpers and by the log lines.

use thiserror::Error;

/// Failures of the topological phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BooleanError {
    /// The bipartite patch/cell graph is not connected, e.g. because the
    /// input has several components that never meet.
    #[error("patch/cell graph is not connected")]
    GraphDisconnected,

    /// A patch side or an index is missing or out of range after cell
    /// construction.
    #[error("patch/cell graph validation failed: {0}")]
    InvalidGraph(String),

    /// No unbounded cell could be identified; the input is likely not a
    /// closed volume.
    #[error("ambient cell not found")]
    AmbientCellNotFound,

    /// Cell construction derived that two distinct cells are the same
    /// volume. Merging is not supported.
    #[error("cells {0} and {1} would have to be merged")]
    CellMergeRequired(usize, usize),
}
