//! `ByteStore` - the `put`/`get` front end.
//!
//! Every call runs synchronously on the caller's thread and goes straight to
//! the underlying [`SkipList`]; there is no buffering and no background work.
//! A `get` issued after a `put` returns on the same thread (or after a
//! `join`/channel handoff from the writing thread) always sees that `put`.

use std::fmt as StdFmt;

use crate::config::{Config, ConfigError};
use crate::skiplist::SkipList;

/// Thread-safe ordered byte store.
///
/// # Example
///
/// ```rust
/// use byteskip::ByteStore;
/// use std::sync::Arc;
/// use std::thread;
///
/// let store = Arc::new(ByteStore::new(16, 0.5).unwrap());
///
/// let writer = {
///     let store = Arc::clone(&store);
///     thread::spawn(move || store.put(b"answer", b"42"))
/// };
/// writer.join().unwrap();
///
/// assert_eq!(store.get(b"answer"), b"42");
/// assert!(store.get(b"question").is_empty());
/// ```
pub struct ByteStore {
    list: SkipList,
}

impl ByteStore {
    /// Create an empty store.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if `probability` is not strictly inside `(0, 1)` or
    /// `max_level` is out of range.
    pub fn new(max_level: usize, probability: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            list: SkipList::new(max_level, probability)?,
        })
    }

    /// Create an empty store from an already validated [`Config`].
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            list: SkipList::with_config(config),
        }
    }

    /// Store `value` under `key`, replacing any previous value.
    #[inline]
    pub fn put(&self, key: &[u8], value: &[u8]) {
        self.list.insert(key, value.to_vec());
    }

    /// Value stored under `key`, or an empty vector if absent.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &[u8]) -> Vec<u8> {
        self.list.search(key)
    }

    /// Value stored under `key`, or `None` if absent.
    ///
    /// Unlike [`ByteStore::get`], a stored empty value comes back as
    /// `Some(vec![])`.
    #[inline]
    #[must_use]
    pub fn lookup(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.list.get(key)
    }

    /// Whether `key` is present.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &[u8]) -> bool {
        self.list.contains(key)
    }

    /// Number of distinct keys.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Whether the store is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// The underlying skip list.
    #[inline]
    #[must_use]
    pub const fn skiplist(&self) -> &SkipList {
        &self.list
    }
}

impl Default for ByteStore {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl StdFmt::Debug for ByteStore {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        f.debug_struct("ByteStore")
            .field("list", &self.list)
            .finish()
    }
}
