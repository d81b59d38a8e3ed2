//! Edge type and construction policies.
//!
//! Edges are immutable pairs of node identifiers. The policies decide what
//! happens to self-loops and repeated pairs when the graph is built; by
//! default both are kept and every occurrence contributes a spring.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::node::NodeId;

/// A connection between two nodes, as supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// First endpoint.
    pub source: NodeId,
    /// Second endpoint.
    pub target: NodeId,
}

impl Edge {
    /// Create a new edge.
    #[inline]
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target }
    }

    /// Check whether both endpoints are the same node.
    #[inline]
    pub fn is_self_loop(self) -> bool {
        self.source == self.target
    }

    /// Endpoints ordered so that (a, b) and (b, a) compare equal.
    #[inline]
    pub fn unordered_key(self) -> (NodeId, NodeId) {
        if self.source <= self.target {
            (self.source, self.target)
        } else {
            (self.target, self.source)
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Edge({} -> {})", self.source.0, self.target.0)
    }
}

impl From<(u32, u32)> for Edge {
    #[inline]
    fn from((source, target): (u32, u32)) -> Self {
        Self::new(NodeId(source), NodeId(target))
    }
}

/// What to do with an edge whose endpoints are the same node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelfLoopPolicy {
    /// Keep the edge. Its spring always takes the degenerate path and the
    /// two equal-and-opposite contributions cancel on the same node, up to
    /// float rounding. Each kept loop still draws a perturbation vector every
    /// iteration, which shifts the stream seen by later pairs.
    #[default]
    Keep,
    /// Discard the edge. The node itself is still created.
    Drop,
    /// Fail graph construction.
    Reject,
}

/// What to do with repeated edges, including reciprocal pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DuplicateEdgePolicy {
    /// Apply a spring once per occurrence; (a, b) and (b, a) pull twice.
    #[default]
    Keep,
    /// Keep only the first occurrence of each unordered pair.
    Collapse,
}

/// Options applied while building a [`LayoutGraph`](super::LayoutGraph).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphOptions {
    /// Self-loop handling.
    pub self_loops: SelfLoopPolicy,
    /// Duplicate edge handling.
    pub duplicate_edges: DuplicateEdgePolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_display() {
        let edge = Edge::from((3, 4));
        assert_eq!(format!("{}", edge), "Edge(3 -> 4)");
    }

    #[test]
    fn test_self_loop_detection() {
        assert!(Edge::from((2, 2)).is_self_loop());
        assert!(!Edge::from((2, 3)).is_self_loop());
    }

    #[test]
    fn test_unordered_key_matches_reciprocal() {
        let forward = Edge::from((0, 1));
        let backward = Edge::from((1, 0));
        assert_eq!(forward.unordered_key(), backward.unordered_key());
        assert_eq!(forward.unordered_key(), (NodeId(0), NodeId(1)));
    }

    #[test]
    fn test_default_options_keep_everything() {
        let options = GraphOptions::default();
        assert_eq!(options.self_loops, SelfLoopPolicy::Keep);
        assert_eq!(options.duplicate_edges, DuplicateEdgePolicy::Keep);
    }
}
