//! Error types for graph construction and layout configuration.
//!
//! Degenerate geometry (coincident nodes) is never an error; it is resolved
//! inside the force laws. Everything here is rejected before the first
//! iteration runs.

use crate::graph::NodeId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("iteration count must be positive")]
    InvalidIterations,

    #[error("{name} must be a positive finite number, got {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    #[error("parallel execution requested but the `parallel` feature is disabled")]
    ParallelUnavailable,

    #[error("unsupported dimensionality {0}; expected 2 or 3")]
    UnsupportedDimensions(u32),

    #[error("self-loop on {0} rejected by graph options")]
    SelfLoop(NodeId),

    #[error("edge buffer has odd length {0}; expected [source, target] pairs")]
    OddEdgeBuffer(usize),

    #[error("position buffer has length {actual}, expected {expected}")]
    PositionBufferLength { expected: usize, actual: usize },

    #[error("{0} is not referenced by any edge")]
    UnknownNode(NodeId),
}

pub type Result<T> = std::result::Result<T, Error>;
