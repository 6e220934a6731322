//! Error type for the tracker facade.

use thiserror::Error;

/// Errors surfaced by the tracker. Targets appearing or disappearing are
/// normal outcomes and never reported here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackerError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Dimension mismatch: vector {index} has length {got}, expected {expected}")]
    DimensionMismatch {
        expected: usize,
        got: usize,
        index: usize,
    },

    #[error("Operation on a null tracker instance")]
    NullTrackerUse,

    #[error("Index {index} out of range for last frame of {len} vectors")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Result type for tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;
