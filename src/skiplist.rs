//! Filepath: src/skiplist.rs
//!
//! The skip list engine.
//!
//! ```text
//! Level 3:  HEAD ──────────────────────────────────────► 30 ───────────────► None
//! Level 2:  HEAD ─────────► 10 ────────────────────────► 30 ───────────────► None
//! Level 1:  HEAD ─────────► 10 ─────────► 20 ──────────► 30 ───────────────► None
//! Level 0:  HEAD ─────────► 10 ─────────► 20 ──────────► 30 ─────► 40 ─────► None
//! ```
//!
//! # Invariants
//!
//! 1. Every lane is sorted in strictly increasing key order.
//! 2. A node of height `h` is linked into lanes `0..h` and no others, and `h <= max_level`.
//! 3. Keys are unique; inserting an existing key overwrites its value.
//! 4. `current_level` is the highest level ever drawn. It never shrinks.
//! 5. Nodes are never removed before the list is dropped.
//!
//! # Locking
//!
//! The arena (head and every node) and `current_level` sit behind a single
//! [`parking_lot::RwLock`]. `insert` holds the write lock for the whole
//! walk-and-splice, lookups hold the read lock for the whole walk-and-read.
//! Readers therefore never observe a half-linked node, and any number of
//! lookups can run together while no insert is in progress.

use std::fmt as StdFmt;

use parking_lot::RwLock;

use crate::alloc::{NodeArena, NodeId};
use crate::config::{Config, ConfigError, MAX_LEVEL_LIMIT};
use crate::key;
use crate::level;
use crate::node::Node;
use crate::tracing_helpers::{debug_log, trace_log};

// ============================================================================
//  InvariantError
// ============================================================================

/// A structural violation reported by [`SkipList::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    /// Two neighbours in a lane are not in strictly increasing order.
    OutOfOrder {
        /// Lane where the violation was found.
        level: usize,
        /// Key of the earlier node.
        prev: Vec<u8>,
        /// Key of the later node.
        next: Vec<u8>,
    },

    /// A node is linked into a lane at or above its own height.
    LinkAboveHeight {
        /// Lane where the node was reached.
        level: usize,
        /// Key of the offending node.
        key: Vec<u8>,
        /// Height of the offending node.
        height: usize,
    },

    /// A lane does not hold exactly the nodes tall enough for it.
    LaneCount {
        /// Lane that was counted.
        level: usize,
        /// Nodes reachable along the lane.
        linked: usize,
        /// Nodes whose height exceeds `level`.
        expected: usize,
    },

    /// A node is taller than the lanes reserved in the head.
    AboveMaxLevel {
        /// Key of the offending node.
        key: Vec<u8>,
        /// Height of the offending node.
        height: usize,
        /// Configured max level.
        max_level: usize,
    },

    /// A node is taller than `current_level + 1`.
    AboveCurrentLevel {
        /// Key of the offending node.
        key: Vec<u8>,
        /// Height of the offending node.
        height: usize,
        /// Recorded current level.
        current_level: usize,
    },
}

impl StdFmt::Display for InvariantError {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        match self {
            Self::OutOfOrder { level, prev, next } => {
                write!(f, "level {level}: {prev:?} is not less than {next:?}")
            }

            Self::LinkAboveHeight { level, key, height } => {
                write!(f, "node {key:?} of height {height} linked at level {level}")
            }

            Self::LaneCount {
                level,
                linked,
                expected,
            } => {
                write!(f, "level {level}: {linked} nodes linked, expected {expected}")
            }

            Self::AboveMaxLevel {
                key,
                height,
                max_level,
            } => {
                write!(f, "node {key:?} has height {height} above max level {max_level}")
            }

            Self::AboveCurrentLevel {
                key,
                height,
                current_level,
            } => {
                write!(
                    f,
                    "node {key:?} has height {height} above current level {current_level}"
                )
            }
        }
    }
}

impl std::error::Error for InvariantError {}

// ============================================================================
//  SkipListStats
// ============================================================================

/// Point-in-time shape of a [`SkipList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipListStats {
    /// Number of distinct keys.
    pub len: usize,

    /// Highest level drawn so far.
    pub current_level: usize,

    /// Number of lanes reserved in the head.
    pub max_level: usize,

    /// `nodes_per_level[i]` counts the nodes linked into lane `i`, i.e. the
    /// nodes whose height exceeds `i`.
    pub nodes_per_level: Vec<usize>,
}

// ============================================================================
//  SkipList
// ============================================================================

/// State guarded by the list-wide lock.
struct Inner {
    arena: NodeArena,
    current_level: usize,
}

impl Inner {
    /// Walk from the head down to level 0, moving right while the next key
    /// is less than `key`. `visit(level, pred)` is called with the last node
    /// whose key is below `key` at each level. Returns the level-0
    /// predecessor.
    #[inline]
    fn walk(&self, key: &[u8], mut visit: impl FnMut(usize, NodeId)) -> NodeId {
        let mut current = NodeId::HEAD;

        for level in (0..=self.current_level).rev() {
            while let Some(next) = self.arena.get(current).next(level) {
                if !key::less(self.arena.get(next).key(), key) {
                    break;
                }
                current = next;
            }
            visit(level, current);
        }

        current
    }

    /// Node holding exactly `key`, if any.
    fn find(&self, key: &[u8]) -> Option<NodeId> {
        let pred = self.walk(key, |_, _| {});
        let candidate = self.arena.get(pred).next(0)?;

        key::equal(self.arena.get(candidate).key(), key).then_some(candidate)
    }

    /// Nodes along lane 0, in key order.
    fn base_lane(&self) -> impl Iterator<Item = &Node> {
        let arena = &self.arena;
        let mut cursor = arena.head().next(0);

        std::iter::from_fn(move || {
            let id = cursor?;
            let node = arena.get(id);
            cursor = node.next(0);
            Some(node)
        })
    }
}

/// A thread-safe ordered map from byte keys to byte values.
///
/// `SkipList` is `Send + Sync`; share it between threads with
/// [`Arc`](std::sync::Arc).
///
/// # Example
///
/// ```rust
/// use byteskip::SkipList;
///
/// let list = SkipList::new(16, 0.5).unwrap();
/// list.insert(b"banana", b"yellow".to_vec());
/// list.insert(b"apple", b"red".to_vec());
///
/// assert_eq!(list.search(b"apple"), b"red");
/// assert!(list.search(b"cherry").is_empty());
/// assert_eq!(list.keys(), vec![b"apple".to_vec(), b"banana".to_vec()]);
/// ```
pub struct SkipList {
    config: Config,
    inner: RwLock<Inner>,
}

impl SkipList {
    /// Create an empty list with `max_level` lanes and the given promotion
    /// probability.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if `probability` is not strictly inside `(0, 1)` or
    /// `max_level` is out of range.
    pub fn new(max_level: usize, probability: f64) -> Result<Self, ConfigError> {
        Ok(Self::with_config(Config::new(max_level, probability)?))
    }

    /// Create an empty list from an already validated [`Config`].
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        debug_log!(
            max_level = config.max_level(),
            probability = config.probability(),
            "skiplist: created"
        );

        Self {
            config,
            inner: RwLock::new(Inner {
                arena: NodeArena::new(config.max_level()),
                current_level: 0,
            }),
        }
    }

    /// Insert `key` or overwrite its value.
    ///
    /// Returns the previous value if the key was already present. An
    /// existing key keeps its node, position and height.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            level = "trace",
            skip_all,
            fields(key_len = key.len(), value_len = value.len())
        )
    )]
    pub fn insert(&self, key: &[u8], value: Vec<u8>) -> Option<Vec<u8>> {
        let mut guard = self.inner.write();
        let inner = &mut *guard;

        let new_level = level::random_level(self.config.probability(), self.config.max_level());
        if new_level > inner.current_level {
            debug_log!(
                from = inner.current_level,
                to = new_level,
                "skiplist: current level raised"
            );
            inner.current_level = new_level;
        }

        let mut update = [NodeId::HEAD; MAX_LEVEL_LIMIT];
        let pred = inner.walk(key, |level, id| update[level] = id);

        if let Some(next) = inner.arena.get(pred).next(0) {
            if key::equal(inner.arena.get(next).key(), key) {
                trace_log!(node = ?next, "skiplist: value overwritten");
                return Some(inner.arena.get_mut(next).replace_value(value));
            }
        }

        let id = inner.arena.alloc(Node::new(key, value, new_level + 1));
        for (level, &pred) in update.iter().enumerate().take(new_level + 1) {
            let succ = inner.arena.get(pred).next(level);
            inner.arena.get_mut(id).set_next(level, succ);
            inner.arena.get_mut(pred).set_next(level, Some(id));
        }

        trace_log!(node = ?id, height = new_level + 1, "skiplist: node spliced");
        None
    }

    /// Value stored under `key`, or an empty vector if the key is absent.
    ///
    /// A stored empty value is indistinguishable from absence here; use
    /// [`SkipList::get`] when that matters.
    #[must_use]
    pub fn search(&self, key: &[u8]) -> Vec<u8> {
        self.get(key).unwrap_or_default()
    }

    /// Value stored under `key`, or `None` if the key is absent.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "trace", skip_all, fields(key_len = key.len()))
    )]
    #[must_use]
    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        let inner = self.inner.read();
        let found = inner.find(key).map(|id| inner.arena.get(id).value().to_vec());

        trace_log!(hit = found.is_some(), "skiplist: lookup");
        found
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains(&self, key: &[u8]) -> bool {
        self.inner.read().find(key).is_some()
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().arena.len()
    }

    /// Whether no key has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Highest level drawn so far (0 for a new list).
    #[must_use]
    pub fn current_level(&self) -> usize {
        self.inner.read().current_level
    }

    /// Number of lanes reserved in the head.
    #[inline]
    #[must_use]
    pub const fn max_level(&self) -> usize {
        self.config.max_level()
    }

    /// Promotion probability.
    #[inline]
    #[must_use]
    pub const fn probability(&self) -> f64 {
        self.config.probability()
    }

    /// The configuration this list was built with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Snapshot of all entries in key order.
    #[must_use]
    pub fn entries(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
        let inner = self.inner.read();
        inner
            .base_lane()
            .map(|node| (node.key().to_vec(), node.value().to_vec()))
            .collect()
    }

    /// Snapshot of all keys in order.
    #[must_use]
    pub fn keys(&self) -> Vec<Vec<u8>> {
        let inner = self.inner.read();
        inner.base_lane().map(|node| node.key().to_vec()).collect()
    }

    /// Current shape of the list.
    #[must_use]
    pub fn stats(&self) -> SkipListStats {
        let inner = self.inner.read();

        let mut nodes_per_level = vec![0; self.max_level()];
        for (_, node) in inner.arena.iter() {
            for count in nodes_per_level.iter_mut().take(node.height()) {
                *count += 1;
            }
        }

        SkipListStats {
            len: inner.arena.len(),
            current_level: inner.current_level,
            max_level: self.max_level(),
            nodes_per_level,
        }
    }

    /// Check the structural invariants listed in the module docs.
    ///
    /// # Errors
    ///
    /// The first [`InvariantError`] found.
    pub fn validate(&self) -> Result<(), InvariantError> {
        let inner = self.inner.read();
        let arena = &inner.arena;

        let mut tall_enough = vec![0usize; self.max_level()];
        for (_, node) in arena.iter() {
            if node.height() > self.max_level() {
                return Err(InvariantError::AboveMaxLevel {
                    key: node.key().to_vec(),
                    height: node.height(),
                    max_level: self.max_level(),
                });
            }
            if node.height() > inner.current_level + 1 {
                return Err(InvariantError::AboveCurrentLevel {
                    key: node.key().to_vec(),
                    height: node.height(),
                    current_level: inner.current_level,
                });
            }
            for count in tall_enough.iter_mut().take(node.height()) {
                *count += 1;
            }
        }

        for (level, &expected) in tall_enough.iter().enumerate() {
            let mut linked = 0;
            let mut prev: Option<&Node> = None;
            let mut cursor = arena.head().next(level);

            while let Some(id) = cursor {
                let node = arena.get(id);
                if node.height() <= level {
                    return Err(InvariantError::LinkAboveHeight {
                        level,
                        key: node.key().to_vec(),
                        height: node.height(),
                    });
                }
                if let Some(prev) = prev {
                    if !key::less(prev.key(), node.key()) {
                        return Err(InvariantError::OutOfOrder {
                            level,
                            prev: prev.key().to_vec(),
                            next: node.key().to_vec(),
                        });
                    }
                }

                linked += 1;
                if linked > expected {
                    break;
                }
                prev = Some(node);
                cursor = node.next(level);
            }

            if linked != expected {
                return Err(InvariantError::LaneCount {
                    level,
                    linked,
                    expected,
                });
            }
        }

        Ok(())
    }
}

impl Default for SkipList {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl StdFmt::Debug for SkipList {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        let mut out = f.debug_struct("SkipList");
        out.field("config", &self.config);

        match self.inner.try_read() {
            Some(inner) => out
                .field("len", &inner.arena.len())
                .field("current_level", &inner.current_level),
            None => out.field("inner", &"<locked>"),
        };

        out.finish()
    }
}

#[cfg(feature = "tracing")]
impl Drop for SkipList {
    fn drop(&mut self) {
        let inner = self.inner.get_mut();
        tracing::debug!(
            len = inner.arena.len(),
            current_level = inner.current_level,
            "skiplist: dropped"
        );
    }
}

// ============================================================================
//  Tests
// ============================================================================
