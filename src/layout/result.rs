//! Final node positions handed to the caller.

use std::collections::BTreeMap;

use crate::graph::{LayoutGraph, NodeId, bounds_of};

/// Final position of every node referenced by the input edge list.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult<const D: usize> {
    /// Positions keyed by node id, in ascending id order.
    pub positions: BTreeMap<NodeId, [f32; D]>,
}

impl<const D: usize> LayoutResult<D> {
    /// Snapshot the current positions of a graph.
    pub fn from_graph(graph: &LayoutGraph<D>) -> Self {
        Self {
            positions: graph
                .nodes()
                .iter()
                .map(|node| (node.id, node.position))
                .collect(),
        }
    }

    /// Position of one node.
    pub fn get(&self, id: NodeId) -> Option<[f32; D]> {
        self.positions.get(&id).copied()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the layout has no nodes.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Node ids in ascending order.
    pub fn node_ids(&self) -> Vec<u32> {
        self.positions.keys().map(|id| id.0).collect()
    }

    /// Positions flattened as `[x0, y0, (z0,) x1, ...]` in [`node_ids`](Self::node_ids) order.
    pub fn interleaved(&self) -> Vec<f32> {
        let mut flat = Vec::with_capacity(self.positions.len() * D);
        for position in self.positions.values() {
            flat.extend_from_slice(position);
        }
        flat
    }

    /// Per-axis bounding box as (min, max).
    pub fn bounds(&self) -> Option<([f32; D], [f32; D])> {
        bounds_of(self.positions.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphOptions;

    fn sample() -> LayoutResult<2> {
        let mut graph: LayoutGraph<2> =
            LayoutGraph::from_edges(&[(5, 1), (1, 3)], &GraphOptions::default()).unwrap();
        graph.set_position(NodeId(5), [5.0, -5.0]).unwrap();
        graph.set_position(NodeId(1), [1.0, 10.0]).unwrap();
        graph.set_position(NodeId(3), [-3.0, 3.0]).unwrap();
        LayoutResult::from_graph(&graph)
    }

    #[test]
    fn test_covers_exactly_the_referenced_ids() {
        let result = sample();
        assert_eq!(result.len(), 3);
        assert_eq!(result.node_ids(), vec![1, 3, 5]);
        assert_eq!(result.get(NodeId(2)), None);
    }

    #[test]
    fn test_interleaved_follows_id_order() {
        let result = sample();
        assert_eq!(
            result.interleaved(),
            vec![1.0, 10.0, -3.0, 3.0, 5.0, -5.0]
        );
    }

    #[test]
    fn test_bounds() {
        let result = sample();
        assert_eq!(result.bounds(), Some(([-3.0, -5.0], [5.0, 10.0])));
    }

    #[test]
    fn test_empty() {
        let graph: LayoutGraph<3> =
            LayoutGraph::from_edges::<(u32, u32)>(&[], &GraphOptions::default()).unwrap();
        let result = LayoutResult::from_graph(&graph);
        assert!(result.is_empty());
        assert!(result.interleaved().is_empty());
        assert_eq!(result.bounds(), None);
    }
}
