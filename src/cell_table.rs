//! Cell table: occupied cell → bucket of handles.
//!
//! Buckets are keyed by the full [`CellCoord`] and hashed with
//! [`hash_key`](crate::hasher::hash_key), so two cells whose keys collide still get
//! separate buckets. Empty buckets are evicted immediately; memory stays proportional
//! to the number of occupied cells.

use std::collections::HashMap;

use crate::Handle;
use crate::hasher::{CellBuildHasher, CellCoord};

/// Map from occupied cells to the handles whose registered bounds touch them.
#[derive(Clone, Debug, Default)]
pub struct CellTable {
    buckets: HashMap<CellCoord, Vec<Handle>, CellBuildHasher>,
    /// Bucket adds plus bucket removes since construction
    writes: u64,
}

impl CellTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table with room for `cells` buckets.
    pub fn with_capacity(cells: usize) -> Self {
        Self {
            buckets: HashMap::with_capacity_and_hasher(cells, CellBuildHasher::default()),
            writes: 0,
        }
    }

    /// Adds `id` to the bucket of `cell`, creating the bucket if needed.
    ///
    /// Returns the bucket length after the add. Callers guarantee `id` is not already
    /// in the bucket.
    pub(crate) fn add(&mut self, cell: CellCoord, id: Handle) -> usize {
        let bucket = self.buckets.entry(cell).or_default();
        debug_assert!(!bucket.contains(&id), "handle {id} already in bucket {cell:?}");
        bucket.push(id);
        self.writes += 1;
        bucket.len()
    }

    /// Removes `id` from the bucket of `cell`, evicting the bucket once it is empty.
    ///
    /// Returns `false` if the handle was not in that bucket.
    pub(crate) fn remove(&mut self, cell: CellCoord, id: Handle) -> bool {
        let Some(bucket) = self.buckets.get_mut(&cell) else {
            return false;
        };
        let Some(pos) = bucket.iter().position(|&h| h == id) else {
            return false;
        };
        let _ = bucket.swap_remove(pos);
        self.writes += 1;
        if bucket.is_empty() {
            let _ = self.buckets.remove(&cell);
        }
        true
    }

    /// Drops every bucket. The write counter is kept.
    pub(crate) fn clear(&mut self) {
        self.buckets.clear();
    }

    /// Handles registered in `cell`; empty for unoccupied cells.
    pub fn bucket(&self, cell: CellCoord) -> &[Handle] {
        self.buckets.get(&cell).map_or(&[], Vec::as_slice)
    }

    /// Iterates over occupied cells and their buckets in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &[Handle])> + '_ {
        self.buckets.iter().map(|(&cell, bucket)| (cell, bucket.as_slice()))
    }

    /// Number of occupied cells.
    pub fn occupied_cells(&self) -> usize {
        self.buckets.len()
    }

    /// Length of the longest bucket, 0 when empty.
    pub fn max_chain_length(&self) -> usize {
        self.buckets.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Number of occupied cells whose hash key is shared with another occupied cell.
    pub fn key_collisions(&self) -> usize {
        let mut keys: Vec<u64> = self.buckets.keys().map(|c| c.key()).collect();
        keys.sort_unstable();
        let mut colliding = 0;
        let mut i = 0;
        while i < keys.len() {
            let mut j = i + 1;
            while j < keys.len() && keys[j] == keys[i] {
                j += 1;
            }
            if j - i > 1 {
                colliding += j - i;
            }
            i = j;
        }
        colliding
    }

    /// Bucket adds plus removes performed since construction.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Whether any bucket contains `id`. Linear in the table size; meant for checks.
    pub fn contains_handle(&self, id: Handle) -> bool {
        self.buckets.values().any(|bucket| bucket.contains(&id))
    }
}
