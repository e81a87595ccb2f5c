//! Node storage for the skip list.
//!
//! Nodes live in a grow-only [`NodeArena`] and refer to each other through
//! [`NodeId`] handles. Nothing is ever removed from the arena, so a handle
//! handed out once stays valid until the arena itself is dropped, and
//! dropping the arena frees every node exactly once.
//!
//! Slot 0 always holds the sentinel head.

use std::fmt as StdFmt;

use crate::node::Node;

// ============================================================================
//  NodeId
// ============================================================================

/// Handle to a node in a [`NodeArena`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The sentinel head.
    pub const HEAD: Self = Self(0);

    /// Handle for arena slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not fit in a `u32`.
    #[inline]
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        match u32::try_from(index) {
            Ok(raw) => Self(raw),
            Err(_) => panic!("node arena exhausted: index {index} exceeds u32::MAX"),
        }
    }

    /// Arena slot of this handle.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether this is [`NodeId::HEAD`].
    #[inline]
    #[must_use]
    pub const fn is_head(self) -> bool {
        self.0 == 0
    }
}

impl StdFmt::Debug for NodeId {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        if self.is_head() {
            write!(f, "NodeId(HEAD)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

// ============================================================================
//  NodeArena
// ============================================================================

/// Grow-only pool of skip list nodes.
///
/// `Vec<Node>` may reallocate as it grows, which is fine: nodes are only
/// ever reached through [`NodeId`] indices, never through references kept
/// across an allocation.
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    /// Create an arena holding only a sentinel head with `max_level` lanes.
    #[must_use]
    pub fn new(max_level: usize) -> Self {
        Self {
            nodes: vec![Node::sentinel(max_level)],
        }
    }

    /// Store `node` and return its handle.
    ///
    /// # Panics
    ///
    /// Panics if the arena already holds `u32::MAX` nodes.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Borrow a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not returned by this arena.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Mutably borrow a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not returned by this arena.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// The sentinel head.
    #[inline]
    #[must_use]
    pub fn head(&self) -> &Node {
        self.get(NodeId::HEAD)
    }

    /// Number of real nodes (the head is not counted).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Whether only the head is present.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over real nodes in allocation order (not key order).
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, node)| (NodeId::from_index(i), node))
    }
}

impl StdFmt::Debug for NodeArena {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        f.debug_struct("NodeArena")
            .field("len", &self.len())
            .field("head_height", &self.head().height())
            .finish()
    }
}
