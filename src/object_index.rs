//! Object index: per-handle bounds and the cells the handle currently occupies.
//!
//! The spanned cells of a box always form a rectangle, so a record stores the inclusive
//! corner cells ([`CellSpan`]) instead of an explicit key list. The span is the exact
//! set of buckets that hold the handle; objects on the large-object list hold none.

use std::fmt;

use glam::DVec2;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::aabb::Aabb;
use crate::hasher::{CellCoord, cell_of};

/// Opaque identifier of a caller-owned object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Handle(pub u32);

impl From<u32> for Handle {
    #[inline]
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Inclusive rectangle of cells, `min` through `max` on both axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSpan {
    /// Lowest column and row
    pub min: CellCoord,
    /// Highest column and row
    pub max: CellCoord,
}

impl CellSpan {
    /// Cells touched by `bounds` after shrinking it inward by `epsilon`.
    ///
    /// The shrink never crosses the box centre: an axis narrower than `2 * epsilon`
    /// collapses to its midpoint.
    pub fn covering(bounds: &Aabb, cell_size: f64, epsilon: f64) -> Self {
        let (min, max) = if epsilon > 0.0 {
            shrink(bounds, epsilon)
        } else {
            (bounds.min, bounds.max)
        };
        Self {
            min: cell_of(min, cell_size),
            max: cell_of(max, cell_size),
        }
    }

    /// Number of columns spanned.
    #[inline]
    pub fn width(&self) -> u64 {
        (i64::from(self.max.x) - i64::from(self.min.x) + 1) as u64
    }

    /// Number of rows spanned.
    #[inline]
    pub fn height(&self) -> u64 {
        (i64::from(self.max.y) - i64::from(self.min.y) + 1) as u64
    }

    /// Total cell count.
    #[inline]
    pub fn cell_count(&self) -> u64 {
        self.width().saturating_mul(self.height())
    }

    /// Whether `cell` lies inside the span.
    #[inline]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.x >= self.min.x && cell.x <= self.max.x && cell.y >= self.min.y && cell.y <= self.max.y
    }

    /// Row-major iteration over every cell in the span.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + use<> {
        let Self { min, max } = *self;
        (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| CellCoord::new(x, y)))
    }

    /// Cells of `self` that are not in `other`.
    pub fn cells_outside(&self, other: &Self) -> impl Iterator<Item = CellCoord> + use<> {
        let other = *other;
        self.cells().filter(move |&c| !other.contains(c))
    }
}

fn shrink(bounds: &Aabb, epsilon: f64) -> (DVec2, DVec2) {
    let center = bounds.center();
    let e = DVec2::splat(epsilon);
    let min = (bounds.min + e).min(center);
    let max = (bounds.max - e).max(center);
    (min, max)
}

/// Where a tracked object lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Placement {
    /// Registered in every bucket of the span.
    Cells(CellSpan),
    /// On the large-object list; no buckets.
    Large,
}

/// Everything the grid knows about one handle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObjectRecord {
    /// Bounds from the most recent insert/update
    pub bounds: Aabb,
    /// Bounds the placement was computed from. Equals `bounds` unless hysteresis is on,
    /// in which case it is an inflated box that still contains `bounds`.
    pub registered: Aabb,
    /// Bucket span or large-object tier
    pub placement: Placement,
}

impl ObjectRecord {
    /// Whether the object is tracked on the large-object list.
    #[inline]
    pub fn is_large(&self) -> bool {
        matches!(self.placement, Placement::Large)
    }

    /// Cell span if the object is bucketed.
    #[inline]
    pub fn span(&self) -> Option<CellSpan> {
        match self.placement {
            Placement::Cells(span) => Some(span),
            Placement::Large => None,
        }
    }
}

/// Handle → record map.
#[derive(Clone, Debug, Default)]
pub struct ObjectIndex {
    records: FxHashMap<Handle, ObjectRecord>,
}

impl ObjectIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty index with room for `objects` records.
    pub fn with_capacity(objects: usize) -> Self {
        let mut records = FxHashMap::default();
        records.reserve(objects);
        Self { records }
    }

    /// Record for `id`.
    #[inline]
    pub fn get(&self, id: Handle) -> Option<&ObjectRecord> {
        self.records.get(&id)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: Handle) -> Option<&mut ObjectRecord> {
        self.records.get_mut(&id)
    }

    /// Stores a record, returning the previous one for `id` if present.
    pub(crate) fn put(&mut self, id: Handle, record: ObjectRecord) -> Option<ObjectRecord> {
        self.records.insert(id, record)
    }

    pub(crate) fn take(&mut self, id: Handle) -> Option<ObjectRecord> {
        self.records.remove(&id)
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }

    /// Whether `id` is tracked.
    #[inline]
    pub fn contains(&self, id: Handle) -> bool {
        self.records.contains_key(&id)
    }

    /// Number of tracked objects.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no objects are tracked.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over records in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &ObjectRecord)> + '_ {
        self.records.iter().map(|(&id, rec)| (id, rec))
    }

    /// All tracked handles, ascending.
    pub fn sorted_handles(&self) -> Vec<Handle> {
        let mut handles: Vec<Handle> = self.records.keys().copied().collect();
        handles.sort_unstable();
        handles
    }
}
