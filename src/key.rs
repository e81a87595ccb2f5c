//! Filepath: src/key.rs
//!
//! Byte-key ordering used by the [`SkipList`](crate::SkipList).
//!
//! Keys are compared lexicographically with unsigned-byte semantics:
//!
//! - the first differing byte decides, each byte read as `0..=255`
//! - a proper prefix sorts before every extension of itself
//! - the empty key sorts before everything else
//!
//! ```rust
//! use byteskip::key;
//!
//! assert!(key::less(b"", &[0x00]));
//! assert!(key::less(&[0x7F], &[0xFF]));
//! assert!(key::less(&[1, 2], &[1, 2, 3]));
//! assert!(!key::less(b"same", b"same"));
//! ```

use std::cmp::Ordering;

/// Returns `true` if `a` sorts strictly before `b`.
#[inline]
#[must_use]
pub fn less(a: &[u8], b: &[u8]) -> bool {
    compare(a, b) == Ordering::Less
}

/// Returns `true` if `a` and `b` have the same length and the same bytes.
#[inline]
#[must_use]
pub fn equal(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}

/// Total order over byte keys.
///
/// Walks the common prefix byte by byte; if no byte differs the shorter key
/// is less. Agrees with `<[u8] as Ord>::cmp`.
#[inline]
#[must_use]
pub fn compare(a: &[u8], b: &[u8]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match x.cmp(y) {
            Ordering::Equal => {}
            decided => return decided,
        }
    }

    a.len().cmp(&b.len())
}
