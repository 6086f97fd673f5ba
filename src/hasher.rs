//! Coordinate hasher: world positions to integer cells, cells to 64-bit keys.
//!
//! The grid is unbounded, so negative space is as valid as positive space. Cell
//! coordinates always come from `floor`, never truncation: `-0.5` with a cell size of
//! `1.0` lands in cell `-1`, not `0`.

use std::hash::{BuildHasherDefault, Hash, Hasher};

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Multiplier applied to the x cell coordinate.
pub const P1: u64 = 0x9E37_79B9_7F4A_7C15;
/// Multiplier applied to the y cell coordinate.
pub const P2: u64 = 0xC2B2_AE3D_27D4_EB4F;

/// Integer coordinate of one grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl CellCoord {
    /// Creates a cell coordinate.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Hash key of this cell, see [`hash_key`].
    #[inline]
    pub fn key(self) -> u64 {
        hash_key(self.x, self.y)
    }
}

impl Hash for CellCoord {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.key());
    }
}

/// Maps a world position to the cell containing it.
///
/// Components outside the `i32` range saturate.
#[inline]
pub fn cell_of(position: DVec2, cell_size: f64) -> CellCoord {
    CellCoord {
        x: axis_cell(position.x, cell_size),
        y: axis_cell(position.y, cell_size),
    }
}

#[inline]
#[allow(clippy::cast_possible_truncation, reason = "float to int casts saturate")]
fn axis_cell(value: f64, cell_size: f64) -> i32 {
    (value / cell_size).floor() as i32
}

/// Mixes a cell coordinate into a 64-bit key.
///
/// Equal coordinates always produce equal keys. Distinct coordinates may collide; the
/// cell table resolves that by comparing full coordinates inside a hash bucket.
#[inline]
pub fn hash_key(cx: i32, cy: i32) -> u64 {
    (i64::from(cx) as u64).wrapping_mul(P1) ^ (i64::from(cy) as u64).wrapping_mul(P2)
}

/// Pass-through hasher for keys already mixed by [`hash_key`].
///
/// Only `write_u64` is expected. Other writes fold bytes in so the hasher stays total.
#[derive(Clone, Copy, Debug, Default)]
pub struct CellHasher(u64);

impl Hasher for CellHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    #[inline]
    fn write_u64(&mut self, key: u64) {
        self.0 ^= key;
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = (self.0.rotate_left(5) ^ u64::from(b)).wrapping_mul(P1);
        }
    }
}

/// Build hasher for maps keyed by [`CellCoord`].
pub type CellBuildHasher = BuildHasherDefault<CellHasher>;
