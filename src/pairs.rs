//! Pair deduplicator.
//!
//! Two objects that share `K` cells are seen `K` times while walking buckets; the set
//! keeps one normalised `(smaller, larger)` entry per unordered pair.

use rustc_hash::FxHashSet;

use crate::Handle;

/// Set of unordered handle pairs.
#[derive(Clone, Debug, Default)]
pub struct PairSet {
    pairs: FxHashSet<(Handle, Handle)>,
}

/// Orders a pair so the smaller handle comes first.
#[inline]
pub fn normalize(a: Handle, b: Handle) -> (Handle, Handle) {
    if a <= b { (a, b) } else { (b, a) }
}

impl PairSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty set with room for `pairs` entries.
    pub fn with_capacity(pairs: usize) -> Self {
        let mut set = FxHashSet::default();
        set.reserve(pairs);
        Self { pairs: set }
    }

    /// Records the unordered pair `{a, b}`.
    ///
    /// Returns `true` the first time a pair is seen. Self-pairs are never recorded.
    #[inline]
    pub fn insert(&mut self, a: Handle, b: Handle) -> bool {
        if a == b {
            return false;
        }
        self.pairs.insert(normalize(a, b))
    }

    /// Whether `{a, b}` was recorded, in either order.
    #[inline]
    pub fn contains(&self, a: Handle, b: Handle) -> bool {
        self.pairs.contains(&normalize(a, b))
    }

    /// Number of distinct pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether no pairs were recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Forgets every pair, keeping the allocation.
    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    /// Iterates over normalised pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, Handle)> + '_ {
        self.pairs.iter().copied()
    }

    /// Normalised pairs sorted ascending.
    pub fn into_sorted_vec(self) -> Vec<(Handle, Handle)> {
        let mut pairs: Vec<(Handle, Handle)> = self.pairs.into_iter().collect();
        pairs.sort_unstable();
        pairs
    }
}
