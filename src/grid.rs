//! Broadphase grid: incremental insert/update/remove and the candidate-pair pass.
//!
//! Each tracked object is registered in every cell its (optionally inflated) bounds
//! touch. Objects spanning more than [`GridConfig::large_object_cells`] cells on an axis
//! skip the buckets entirely and are matched by direct AABB tests instead.
//!
//! The grid is single-threaded per step: mutate first, then query. Query methods take
//! `&self`, so a finished grid can be shared across threads for read-only passes.

use glam::DVec2;
use log::{debug, trace, warn};
use serde::Serialize;

use crate::aabb::Aabb;
use crate::cell_table::CellTable;
use crate::config::{GridConfig, validate_cell_size};
use crate::error::{GridError, Result};
use crate::hasher::CellCoord;
use crate::object_index::{CellSpan, Handle, ObjectIndex, ObjectRecord, Placement};
use crate::pairs::PairSet;

/// Snapshot of table health.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Number of non-empty buckets
    pub occupied_cells: usize,
    /// Longest bucket
    pub max_chain_length: usize,
    /// Tracked objects, bucketed and large
    pub object_count: usize,
    /// Objects on the large-object list
    pub large_object_count: usize,
    /// Occupied cells whose hash key collides with another occupied cell
    pub key_collisions: usize,
    /// Bucket adds plus removes since the grid was created
    pub bucket_writes: u64,
    /// Longest bucket is past the configured `chain_warning_threshold`
    pub degraded: bool,
}

impl Diagnostics {
    /// Whether the longest bucket is past `threshold`: either the cell size is badly
    /// chosen or many objects are clustered in one place.
    pub fn is_degraded(&self, threshold: usize) -> bool {
        self.max_chain_length > threshold
    }
}

/// Spatial-hash broadphase over caller-owned objects identified by [`Handle`].
#[derive(Clone, Debug)]
pub struct SpatialGrid {
    config: GridConfig,
    cells: CellTable,
    objects: ObjectIndex,
    /// Handles whose placement is [`Placement::Large`]
    large: Vec<Handle>,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self {
            config: GridConfig::default(),
            cells: CellTable::new(),
            objects: ObjectIndex::new(),
            large: Vec::new(),
        }
    }
}

impl SpatialGrid {
    /// Creates a grid with the default configuration and the given cell size.
    ///
    /// # Errors
    /// [`GridError::InvalidCellSize`] if `cell_size` is not finite and positive.
    pub fn new(cell_size: f64) -> Result<Self> {
        Self::with_config(GridConfig::new(cell_size))
    }

    /// Creates a grid from a configuration.
    ///
    /// # Errors
    /// Any error from [`GridConfig::validate`].
    pub fn with_config(config: GridConfig) -> Result<Self> {
        Self::with_capacity(config, 0)
    }

    /// Creates a grid with room for `objects` records.
    ///
    /// # Errors
    /// Any error from [`GridConfig::validate`].
    pub fn with_capacity(config: GridConfig, objects: usize) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cells: CellTable::with_capacity(objects),
            objects: ObjectIndex::with_capacity(objects),
            large: Vec::new(),
        })
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Starts tracking `id` with bounds `aabb`.
    ///
    /// # Errors
    /// [`GridError::InvalidBounds`] for an invalid box, [`GridError::DuplicateId`] if
    /// `id` is already tracked. The grid is unchanged on error.
    pub fn insert(&mut self, id: Handle, aabb: Aabb) -> Result<()> {
        aabb.validate()?;
        if self.objects.contains(id) {
            return Err(GridError::DuplicateId(id));
        }
        let registered = self.registered_for(&aabb);
        let placement = self.placement_for(&registered);
        self.attach(id, placement);
        trace!("insert {id}: {placement:?}");
        let _ = self.objects.put(id, ObjectRecord {
            bounds: aabb,
            registered,
            placement,
        });
        Ok(())
    }

    /// Moves `id` to new bounds, touching only cells that were left or entered.
    ///
    /// When the new bounds span the same cells as before no bucket is written. With
    /// hysteresis enabled, bounds that stay inside the registered box skip the cell
    /// computation altogether.
    ///
    /// # Errors
    /// [`GridError::InvalidBounds`] for an invalid box, [`GridError::UnknownId`] if `id`
    /// is not tracked. The grid is unchanged on error.
    pub fn update(&mut self, id: Handle, aabb: Aabb) -> Result<()> {
        aabb.validate()?;
        let Some(old) = self.objects.get(id).copied() else {
            return Err(GridError::UnknownId(id));
        };

        if self.config.hysteresis > 0.0 && old.registered.contains_aabb(&aabb) {
            if let Some(record) = self.objects.get_mut(id) {
                record.bounds = aabb;
            }
            return Ok(());
        }

        let registered = self.registered_for(&aabb);
        let placement = self.placement_for(&registered);
        match (old.placement, placement) {
            (Placement::Cells(from), Placement::Cells(to)) => {
                if from != to {
                    for cell in from.cells_outside(&to) {
                        let removed = self.cells.remove(cell, id);
                        debug_assert!(removed, "{id} missing from bucket {cell:?}");
                    }
                    for cell in to.cells_outside(&from) {
                        let len = self.cells.add(cell, id);
                        self.note_chain(cell, len);
                    }
                    trace!("update {id}: {from:?} -> {to:?}");
                }
            }
            (Placement::Large, Placement::Large) => {}
            (from, to) => {
                self.detach(id, from);
                self.attach(id, to);
                debug!(
                    "{id} {} the large-object list",
                    if to == Placement::Large { "joined" } else { "left" }
                );
            }
        }

        let _ = self.objects.put(id, ObjectRecord {
            bounds: aabb,
            registered,
            placement,
        });
        Ok(())
    }

    /// Inserts `id`, or updates it if already tracked.
    ///
    /// # Errors
    /// [`GridError::InvalidBounds`] for an invalid box.
    pub fn insert_or_update(&mut self, id: Handle, aabb: Aabb) -> Result<()> {
        if self.objects.contains(id) {
            self.update(id, aabb)
        } else {
            self.insert(id, aabb)
        }
    }

    /// Stops tracking `id`, removing it from every bucket it occupied.
    ///
    /// # Errors
    /// [`GridError::UnknownId`] if `id` is not tracked.
    pub fn remove(&mut self, id: Handle) -> Result<()> {
        let record = self.objects.take(id).ok_or(GridError::UnknownId(id))?;
        self.detach(id, record.placement);
        trace!("remove {id}");
        Ok(())
    }

    /// Drops every object and bucket. Configuration and the write counter are kept.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.objects.clear();
        self.large.clear();
    }

    /// Changes the cell size and re-buckets every tracked object.
    ///
    /// # Errors
    /// [`GridError::InvalidCellSize`] for a non-finite or non-positive size, or
    /// [`GridError::InvalidConfig`] if the current boundary epsilon would no longer fit
    /// inside half a cell. The grid is unchanged on error.
    pub fn set_cell_size(&mut self, cell_size: f64) -> Result<()> {
        validate_cell_size(cell_size)?;
        let config = self.config.with_cell_size(cell_size);
        config.validate()?;
        self.config = config;

        self.cells.clear();
        self.large.clear();
        for id in self.objects.sorted_handles() {
            let Some(old) = self.objects.get(id).copied() else {
                continue;
            };
            let registered = self.registered_for(&old.bounds);
            let placement = self.placement_for(&registered);
            self.attach(id, placement);
            let _ = self.objects.put(id, ObjectRecord {
                bounds: old.bounds,
                registered,
                placement,
            });
        }
        debug!(
            "re-bucketed {} objects at cell size {cell_size}: {} cells, {} large",
            self.objects.len(),
            self.cells.occupied_cells(),
            self.large.len()
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Handles registered in any cell the region touches, plus large objects whose
    /// registered bounds overlap it. Sorted ascending, no duplicates.
    ///
    /// The result is a superset of true overlaps; narrow-phase test it. An invalid
    /// region yields no handles.
    pub fn query_region(&self, region: &Aabb) -> Vec<Handle> {
        let mut results = Vec::new();
        self.query_region_into(region, &mut results);
        results
    }

    /// Like [`query_region`](Self::query_region), reusing `results` (cleared first).
    pub fn query_region_into(&self, region: &Aabb, results: &mut Vec<Handle>) {
        results.clear();
        if let Err(e) = region.validate() {
            debug!("query_region ignored: {e}");
            return;
        }

        let span = CellSpan::covering(region, self.config.cell_size, 0.0);
        // Sparse table under a huge region: walk occupied cells instead of the span
        if span.cell_count() > self.cells.occupied_cells() as u64 {
            for (cell, bucket) in self.cells.iter() {
                if span.contains(cell) {
                    results.extend_from_slice(bucket);
                }
            }
        } else {
            for cell in span.cells() {
                results.extend_from_slice(self.cells.bucket(cell));
            }
        }

        for &id in &self.large {
            if let Some(record) = self.objects.get(id) {
                if record.registered.overlaps(region) {
                    results.push(id);
                }
            }
        }

        results.sort_unstable();
        results.dedup();
    }

    /// Like [`query_region`](Self::query_region), but reports an invalid region.
    ///
    /// # Errors
    /// [`GridError::InvalidBounds`] if `region` has `min > max` on an axis or a
    /// non-finite component.
    pub fn try_query_region(&self, region: &Aabb) -> Result<Vec<Handle>> {
        region.validate()?;
        Ok(self.query_region(region))
    }

    /// Handles whose cells contain `point`.
    pub fn query_point(&self, point: DVec2) -> Vec<Handle> {
        self.query_region(&Aabb::from_point(point))
    }

    /// Handles whose cells touch the bounding box of the circle. A negative or
    /// non-finite radius yields no handles.
    pub fn query_circle(&self, center: DVec2, radius: f64) -> Vec<Handle> {
        if !radius.is_finite() || radius < 0.0 {
            return Vec::new();
        }
        self.query_region(&Aabb::from_center_half_extents(center, DVec2::splat(radius)))
    }

    /// Every unordered pair of handles that share a cell, plus large objects paired with
    /// every object whose registered bounds they overlap.
    ///
    /// Each pair appears once as `(smaller, larger)`; pairs come out sorted.
    pub fn candidate_pairs(&self) -> std::vec::IntoIter<(Handle, Handle)> {
        let mut pairs = Vec::new();
        self.candidate_pairs_into(&mut pairs);
        pairs.into_iter()
    }

    /// Like [`candidate_pairs`](Self::candidate_pairs), reusing `pairs` (cleared first).
    pub fn candidate_pairs_into(&self, pairs: &mut Vec<(Handle, Handle)>) {
        pairs.clear();
        let mut seen = PairSet::with_capacity(self.objects.len());

        for (_, bucket) in self.cells.iter() {
            for (i, &a) in bucket.iter().enumerate() {
                for &b in &bucket[i + 1..] {
                    let _ = seen.insert(a, b);
                }
            }
        }

        for &big in &self.large {
            let Some(big_record) = self.objects.get(big) else {
                continue;
            };
            for (other, record) in self.objects.iter() {
                if other != big && big_record.registered.overlaps(&record.registered) {
                    let _ = seen.insert(big, other);
                }
            }
        }

        pairs.extend(seen.into_sorted_vec());
    }

    /// Candidate pairs kept by a caller-supplied narrow-phase predicate, which receives
    /// each handle with its latest bounds.
    pub fn overlapping_pairs<F>(&self, mut overlaps: F) -> Vec<(Handle, Handle)>
    where
        F: FnMut(Handle, &Aabb, Handle, &Aabb) -> bool,
    {
        self.candidate_pairs()
            .filter(|&(a, b)| match (self.objects.get(a), self.objects.get(b)) {
                (Some(ra), Some(rb)) => overlaps(a, &ra.bounds, b, &rb.bounds),
                _ => false,
            })
            .collect()
    }

    /// Candidate pairs whose latest bounds actually overlap.
    pub fn overlapping_aabb_pairs(&self) -> Vec<(Handle, Handle)> {
        self.overlapping_pairs(|_, a, _, b| a.overlaps(b))
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Number of tracked objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether no objects are tracked.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Whether `id` is tracked.
    pub fn contains(&self, id: Handle) -> bool {
        self.objects.contains(id)
    }

    /// Latest bounds of `id`.
    pub fn bounds(&self, id: Handle) -> Option<Aabb> {
        self.objects.get(id).map(|record| record.bounds)
    }

    /// Cells whose buckets hold `id`; empty for large objects.
    pub fn cells_of(&self, id: Handle) -> Option<Vec<CellCoord>> {
        self.objects
            .get(id)
            .map(|record| record.span().map_or_else(Vec::new, |span| span.cells().collect()))
    }

    /// All tracked handles, ascending.
    pub fn handles(&self) -> Vec<Handle> {
        self.objects.sorted_handles()
    }

    /// Handles currently on the large-object list.
    pub fn large_objects(&self) -> &[Handle] {
        &self.large
    }

    /// Current cell size.
    pub fn cell_size(&self) -> f64 {
        self.config.cell_size
    }

    /// Current configuration.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Read-only view of the buckets.
    pub fn cell_table(&self) -> &CellTable {
        &self.cells
    }

    /// Read-only view of the per-object records.
    pub fn object_index(&self) -> &ObjectIndex {
        &self.objects
    }

    /// Table health snapshot.
    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            occupied_cells: self.cells.occupied_cells(),
            max_chain_length: self.cells.max_chain_length(),
            object_count: self.objects.len(),
            large_object_count: self.large.len(),
            key_collisions: self.cells.key_collisions(),
            bucket_writes: self.cells.writes(),
            degraded: self.is_degraded(),
        }
    }

    /// Whether the longest bucket is past the configured chain warning threshold.
    pub fn is_degraded(&self) -> bool {
        self.cells.max_chain_length() > self.config.chain_warning_threshold
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn registered_for(&self, bounds: &Aabb) -> Aabb {
        let margin = self.config.hysteresis_margin();
        if margin > 0.0 { bounds.expanded(margin) } else { *bounds }
    }

    fn placement_for(&self, registered: &Aabb) -> Placement {
        let span = CellSpan::covering(registered, self.config.cell_size, self.config.boundary_epsilon);
        let limit = u64::from(self.config.large_object_cells);
        if span.width() > limit || span.height() > limit {
            Placement::Large
        } else {
            Placement::Cells(span)
        }
    }

    fn attach(&mut self, id: Handle, placement: Placement) {
        match placement {
            Placement::Cells(span) => {
                for cell in span.cells() {
                    let len = self.cells.add(cell, id);
                    self.note_chain(cell, len);
                }
            }
            Placement::Large => self.large.push(id),
        }
    }

    fn detach(&mut self, id: Handle, placement: Placement) {
        match placement {
            Placement::Cells(span) => {
                for cell in span.cells() {
                    let removed = self.cells.remove(cell, id);
                    debug_assert!(removed, "{id} missing from bucket {cell:?}");
                }
            }
            Placement::Large => {
                if let Some(pos) = self.large.iter().position(|&h| h == id) {
                    let _ = self.large.swap_remove(pos);
                }
            }
        }
    }

    /// Warns when a bucket grows past the chain threshold.
    fn note_chain(&self, cell: CellCoord, len: usize) {
        let threshold = self.config.chain_warning_threshold;
        if threshold.checked_add(1) == Some(len) {
            warn!(
                "cell ({}, {}) holds {len} handles, past the chain threshold of {threshold}; \
                 cell size {} may be too large or objects are clustered",
                cell.x, cell.y, self.config.cell_size
            );
        }
    }
}
