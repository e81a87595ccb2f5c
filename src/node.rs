//! Skip list nodes.
//!
//! A node owns its key and value and holds one forward link per level it
//! participates in. Links are [`NodeId`] handles into the
//! [`NodeArena`](crate::alloc::NodeArena) rather than pointers, so a node
//! can never outlive its target.
//!
//! ```text
//!             forward[2] ──────────────────────────► ...
//!             forward[1] ──────────► ...
//!   node ──── forward[0] ──► next node in key order
//! ```

use std::fmt as StdFmt;

use crate::alloc::NodeId;

/// One entry of the skip list, or the sentinel head.
pub struct Node {
    /// Empty for the sentinel head.
    key: Box<[u8]>,

    /// Overwritten in place on update.
    value: Vec<u8>,

    /// `forward[i]` is the next node at level `i`. Its length is the
    /// node's height and never changes.
    forward: Box<[Option<NodeId>]>,
}

impl Node {
    /// Create a node of the given height (number of levels, at least 1).
    #[must_use]
    pub fn new(key: &[u8], value: Vec<u8>, height: usize) -> Self {
        debug_assert!(height >= 1, "node height must be at least 1");

        Self {
            key: key.into(),
            value,
            forward: vec![None; height].into_boxed_slice(),
        }
    }

    /// Create the keyless sentinel head with `max_level` lanes.
    #[must_use]
    pub fn sentinel(max_level: usize) -> Self {
        Self {
            key: Box::default(),
            value: Vec::new(),
            forward: vec![None; max_level].into_boxed_slice(),
        }
    }

    /// Key bytes (empty for the sentinel).
    #[inline]
    #[must_use]
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Stored value bytes.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Number of levels this node participates in.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.forward.len()
    }

    /// Successor at `level`, or `None` at the end of that lane.
    ///
    /// # Panics
    ///
    /// Panics if `level >= self.height()`.
    #[inline]
    #[must_use]
    pub fn next(&self, level: usize) -> Option<NodeId> {
        self.forward[level]
    }

    /// Point this node's `level` lane at `next`.
    ///
    /// # Panics
    ///
    /// Panics if `level >= self.height()`.
    #[inline]
    pub fn set_next(&mut self, level: usize, next: Option<NodeId>) {
        self.forward[level] = next;
    }

    /// Swap in a new value and return the old one.
    #[inline]
    pub fn replace_value(&mut self, value: Vec<u8>) -> Vec<u8> {
        std::mem::replace(&mut self.value, value)
    }
}

impl StdFmt::Debug for Node {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("value_len", &self.value.len())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_has_no_successors() {
        let node = Node::new(b"k", b"v".to_vec(), 3);

        assert_eq!(node.key(), b"k");
        assert_eq!(node.value(), b"v");
        assert_eq!(node.height(), 3);
        for level in 0..3 {
            assert!(node.next(level).is_none());
        }
    }

    #[test]
    fn test_sentinel_shape() {
        let head = Node::sentinel(12);

        assert!(head.key().is_empty());
        assert!(head.value().is_empty());
        assert_eq!(head.height(), 12);
    }

    #[test]
    fn test_links_and_value_replace() {
        let mut node = Node::new(b"k", b"old".to_vec(), 2);

        node.set_next(1, Some(NodeId::from_index(5)));
        assert_eq!(node.next(1), Some(NodeId::from_index(5)));
        assert!(node.next(0).is_none());

        let old = node.replace_value(b"new".to_vec());
        assert_eq!(old, b"old");
        assert_eq!(node.value(), b"new");
        assert_eq!(node.height(), 2);
    }

    #[test]
    #[should_panic]
    fn test_next_above_height_panics() {
        let node = Node::new(b"k", Vec::new(), 1);
        let _ = node.next(1);
    }
}
