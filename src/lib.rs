//! # `byteskip`
//!
//! An in-memory, thread-safe, ordered key-value store over byte keys,
//! built on a probabilistic skip list.
//!
//! | Operation | Cost (expected) | Lock |
//! |-----------|-----------------|------|
//! | `put` / `insert` | O(log n) | exclusive |
//! | `get` / `search` | O(log n) | shared |
//! | delete | not supported | - |
//!
//! ## Thread Safety
//!
//! [`ByteStore`] and [`SkipList`] are `Send + Sync`. A single readers-writer
//! lock guards the whole structure: any number of lookups proceed together,
//! inserts run one at a time and exclude lookups while they splice. Each
//! operation is atomic with respect to every other.
//!
//! ```rust
//! use byteskip::ByteStore;
//!
//! let store = ByteStore::new(16, 0.5).unwrap();
//! store.put(b"key", b"value");
//!
//! assert_eq!(store.get(b"key"), b"value");
//! assert!(store.get(b"missing").is_empty());
//! assert_eq!(store.lookup(b"missing"), None);
//! ```
//!
//! ## Key Order
//!
//! Keys sort lexicographically by unsigned byte, shorter prefixes first; see
//! [`key`].
//!
//! ## Design
//!
//! Nodes live in a grow-only arena and link to each other by index
//! ([`alloc::NodeId`]). Since nothing is ever removed, a handle never dangles
//! and dropping the list frees every node exactly once. Node heights come
//! from a per-thread random generator ([`level`]).

#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]

pub mod alloc;
pub mod config;
pub mod key;
pub mod level;
pub mod node;
pub mod skiplist;
pub mod store;

mod tracing_helpers;

pub use config::{Config, ConfigError};
pub use skiplist::{InvariantError, SkipList, SkipListStats};
pub use store::ByteStore;
