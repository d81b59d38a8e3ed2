//! LayoutGraph - the graph model a layout run operates on.
//!
//! Topology lives in a petgraph `Graph` (parallel edges and self-loops are
//! allowed, insertion order is preserved). Node records live in a dense arena
//! whose slot `i` belongs to `NodeIndex::new(i)`, so force phases can address
//! nodes by plain `usize` indices.

use log::{debug, warn};
use petgraph::Directed;
use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

use super::edge::{DuplicateEdgePolicy, Edge, GraphOptions, SelfLoopPolicy};
use super::node::{Node, NodeId};
use crate::error::{Error, Result};
use crate::layout::LayoutResult;

/// Graph model for a single layout run.
///
/// The node set is derived from the edge list: every id referenced by an edge
/// gets exactly one node, and there is no way to add an isolated node. Dense
/// indices follow the order in which ids first appear in the edge list.
#[derive(Debug, Clone)]
pub struct LayoutGraph<const D: usize> {
    /// Topology. Node weights are the external ids.
    topology: Graph<NodeId, (), Directed>,

    /// Map from external NodeId to petgraph NodeIndex
    node_id_to_index: HashMap<NodeId, NodeIndex>,

    /// Node records, indexed by `NodeIndex::index()`
    nodes: Vec<Node<D>>,
}

impl<const D: usize> LayoutGraph<D> {
    fn with_capacity(node_capacity: usize, edge_capacity: usize) -> Self {
        Self {
            topology: Graph::with_capacity(node_capacity, edge_capacity),
            node_id_to_index: HashMap::with_capacity(node_capacity),
            nodes: Vec::with_capacity(node_capacity),
        }
    }

    /// Build the graph from an edge list.
    ///
    /// All nodes start at the origin with zeroed forces. Self-loops and
    /// repeated pairs are handled according to `options`; an endpoint of a
    /// dropped edge still gets its node.
    pub fn from_edges<E>(edges: &[E], options: &GraphOptions) -> Result<Self>
    where
        E: Into<Edge> + Copy,
    {
        let mut graph = Self::with_capacity(edges.len(), edges.len());
        let mut seen: HashSet<(NodeId, NodeId)> = HashSet::new();
        let mut dropped_loops = 0usize;
        let mut collapsed = 0usize;

        for &raw in edges {
            let edge: Edge = raw.into();
            let source = graph.ensure_node(edge.source);
            let target = graph.ensure_node(edge.target);

            if edge.is_self_loop() {
                match options.self_loops {
                    SelfLoopPolicy::Keep => {}
                    SelfLoopPolicy::Drop => {
                        dropped_loops += 1;
                        continue;
                    }
                    SelfLoopPolicy::Reject => {
                        warn!("rejecting self-loop on {}", edge.source);
                        return Err(Error::SelfLoop(edge.source));
                    }
                }
            }

            if options.duplicate_edges == DuplicateEdgePolicy::Collapse
                && !seen.insert(edge.unordered_key())
            {
                collapsed += 1;
                continue;
            }

            graph.topology.add_edge(source, target, ());
        }

        if dropped_loops > 0 {
            warn!("dropped {dropped_loops} self-loop edge(s)");
        }
        debug!(
            "built layout graph: {} nodes, {} edges ({} duplicate(s) collapsed)",
            graph.node_count(),
            graph.edge_count(),
            collapsed
        );

        Ok(graph)
    }

    /// Build the graph from a flat pair buffer `[s0, t0, s1, t1, ...]`.
    pub fn from_flat_pairs(pairs: &[u32], options: &GraphOptions) -> Result<Self> {
        if pairs.len() % 2 != 0 {
            return Err(Error::OddEdgeBuffer(pairs.len()));
        }
        let edges: Vec<(u32, u32)> = pairs
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
            .collect();
        Self::from_edges(&edges, options)
    }

    fn ensure_node(&mut self, id: NodeId) -> NodeIndex {
        if let Some(&index) = self.node_id_to_index.get(&id) {
            return index;
        }
        let index = self.topology.add_node(id);
        debug_assert_eq!(index.index(), self.nodes.len());
        self.node_id_to_index.insert(id, index);
        self.nodes.push(Node::new(id));
        index
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Get the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of edges that will receive a spring.
    pub fn edge_count(&self) -> usize {
        self.topology.edge_count()
    }

    /// Check whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Dense arena index of a node.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.node_id_to_index.get(&id).map(|index| index.index())
    }

    /// Get a node record by id.
    pub fn node(&self, id: NodeId) -> Option<&Node<D>> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    /// Get a node's position.
    pub fn position(&self, id: NodeId) -> Option<[f32; D]> {
        self.node(id).map(|node| node.position)
    }

    /// All node records in dense order.
    pub fn nodes(&self) -> &[Node<D>] {
        &self.nodes
    }

    /// Edges in insertion order, after policy filtering.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.topology
            .edge_references()
            .map(|e| Edge::new(self.topology[e.source()], self.topology[e.target()]))
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Set a node's position.
    pub fn set_position(&mut self, id: NodeId, position: [f32; D]) -> Result<()> {
        let i = self.index_of(id).ok_or(Error::UnknownNode(id))?;
        self.nodes[i].position = position;
        Ok(())
    }

    /// Set every position from a flat buffer in dense order.
    ///
    /// The buffer must hold exactly `node_count() * D` values.
    pub fn set_positions_from_slice(&mut self, positions: &[f32]) -> Result<()> {
        let expected = self.nodes.len() * D;
        if positions.len() != expected {
            return Err(Error::PositionBufferLength {
                expected,
                actual: positions.len(),
            });
        }
        for (node, chunk) in self.nodes.iter_mut().zip(positions.chunks_exact(D)) {
            node.position.copy_from_slice(chunk);
        }
        Ok(())
    }

    /// Pin a node (its position is not integrated).
    pub fn pin(&mut self, id: NodeId) -> Result<()> {
        let i = self.index_of(id).ok_or(Error::UnknownNode(id))?;
        self.nodes[i].state.set_pinned(true);
        Ok(())
    }

    /// Unpin a node.
    pub fn unpin(&mut self, id: NodeId) -> Result<()> {
        let i = self.index_of(id).ok_or(Error::UnknownNode(id))?;
        self.nodes[i].state.set_pinned(false);
        Ok(())
    }

    /// Check if a node is pinned.
    pub fn is_pinned(&self, id: NodeId) -> bool {
        self.node(id)
            .map(|node| node.state.is_pinned())
            .unwrap_or(false)
    }

    /// Mutable node arena together with edge endpoints as dense indices.
    pub(crate) fn arena_and_edges(
        &mut self,
    ) -> (&mut [Node<D>], impl Iterator<Item = (usize, usize)> + '_) {
        let Self {
            topology, nodes, ..
        } = self;
        let edges = topology
            .edge_references()
            .map(|e| (e.source().index(), e.target().index()));
        (nodes.as_mut_slice(), edges)
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node<D>] {
        &mut self.nodes
    }

    // =========================================================================
    // Utilities
    // =========================================================================

    /// Get the per-axis bounding box of all nodes as (min, max).
    pub fn bounds(&self) -> Option<([f32; D], [f32; D])> {
        bounds_of(self.nodes.iter().map(|node| &node.position))
    }

    /// Consume the graph, keeping only the node positions.
    pub fn into_result(self) -> LayoutResult<D> {
        LayoutResult::from_graph(&self)
    }
}

/// Per-axis bounding box of a set of positions.
pub(crate) fn bounds_of<'a, const D: usize>(
    positions: impl Iterator<Item = &'a [f32; D]>,
) -> Option<([f32; D], [f32; D])> {
    let mut min = [f32::INFINITY; D];
    let mut max = [f32::NEG_INFINITY; D];
    let mut any = false;

    for position in positions {
        any = true;
        for axis in 0..D {
            min[axis] = min[axis].min(position[axis]);
            max[axis] = max[axis].max(position[axis]);
        }
    }

    any.then_some((min, max))
}
