//! Node type and related structures.
//!
//! Nodes are the vertices in the graph. Each node has:
//! - A stable unique identifier taken from the edge list
//! - Position in layout space (D components)
//! - A force accumulator, zeroed between iterations
//! - Pinned state (excluded from integration when true)

use std::fmt;

/// Stable node identifier.
///
/// This is the id the caller used in the edge list, not the dense arena
/// index. It wraps a u32 for efficient storage and WebAssembly interop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<NodeId> for u32 {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// Node state flags packed into a single byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeState {
    flags: u8,
}

impl NodeState {
    const PINNED: u8 = 0b0000_0001;

    /// Create a new default node state.
    #[inline]
    pub fn new() -> Self {
        Self { flags: 0 }
    }

    /// Check if the node is pinned (excluded from integration).
    #[inline]
    pub fn is_pinned(self) -> bool {
        self.flags & Self::PINNED != 0
    }

    /// Set the pinned state.
    #[inline]
    pub fn set_pinned(&mut self, pinned: bool) {
        if pinned {
            self.flags |= Self::PINNED;
        } else {
            self.flags &= !Self::PINNED;
        }
    }
}

/// A node record in the layout arena.
///
/// Records are stored contiguously and indexed by dense position, so the
/// force phases can address two nodes by index without aliasing borrows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node<const D: usize> {
    /// External identifier.
    pub id: NodeId,
    /// Current position.
    pub position: [f32; D],
    /// Running force sum for the current iteration.
    pub force: [f32; D],
    /// Pinned flag.
    pub state: NodeState,
}

impl<const D: usize> Node<D> {
    /// Create a node at the origin with a zeroed force accumulator.
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            position: [0.0; D],
            force: [0.0; D],
            state: NodeState::new(),
        }
    }

    /// Zero the force accumulator.
    #[inline]
    pub fn reset_force(&mut self) {
        self.force = [0.0; D];
    }
}
