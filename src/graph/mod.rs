//! Graph data structures for layout runs.
//!
//! The graph is built once from an edge list: petgraph holds the topology and
//! a dense arena of fixed-size node records holds positions and force
//! accumulators.

mod edge;
mod engine;
mod node;

pub use edge::{DuplicateEdgePolicy, Edge, GraphOptions, SelfLoopPolicy};
pub use engine::LayoutGraph;
pub use node::{Node, NodeId, NodeState};

pub(crate) use engine::bounds_of;
