//! # Gridphase - Spatial-Hash Broadphase
//!
//! A uniform-grid broadphase for dynamic 2D axis-aligned bounding boxes. Given a
//! population of boxes that move every simulation step, it produces the candidate set of
//! object pairs that might collide in roughly linear time, instead of testing every
//! object against every other.
//!
//! ## Features
//!
//! - **Unbounded grid**: cells are hashed from integer coordinates, negative space included
//! - **Incremental updates**: moving an object only touches the cells it left or entered
//! - **Deduplicated pairs**: each unordered pair is reported once, however many cells it shares
//! - **Edge-case policies**: large-object list, boundary epsilon, hysteresis, chain diagnostics
//!
//! ## Quick Start
//!
//! ```rust
//! use gridphase::prelude::*;
//!
//! let mut grid = SpatialGrid::new(64.0).unwrap();
//!
//! grid.insert(Handle(1), Aabb::from_coords(0.0, 0.0, 32.0, 32.0)).unwrap();
//! grid.insert(Handle(2), Aabb::from_coords(40.0, 40.0, 100.0, 100.0)).unwrap();
//! grid.insert(Handle(3), Aabb::from_coords(500.0, 500.0, 510.0, 510.0)).unwrap();
//!
//! // Objects 1 and 2 share cell (0, 0); object 3 is alone
//! let pairs: Vec<_> = grid.candidate_pairs().collect();
//! assert_eq!(pairs, vec![(Handle(1), Handle(2))]);
//!
//! // Move object 2 away and ask what is near the origin
//! grid.update(Handle(2), Aabb::from_coords(200.0, 200.0, 210.0, 210.0)).unwrap();
//! assert_eq!(grid.query_region(&Aabb::from_coords(0.0, 0.0, 10.0, 10.0)), vec![Handle(1)]);
//! ```
//!
//! ## How It Works
//!
//! A position maps to cell `floor(position / cell_size)` per axis. Each occupied cell
//! owns a bucket of handles; each handle remembers the rectangle of cells it sits in, so
//! update and removal cost is proportional to the cells involved, not the table size.
//!
//! The grid never owns caller objects. It is an index keyed by [`Handle`]s; the caller
//! keeps the handle → object lookup and runs the exact narrow-phase test on candidates.

pub mod aabb;
pub mod cell_table;
pub mod config;
pub mod error;
pub mod grid;
pub mod hasher;
pub mod object_index;
pub mod pairs;
pub mod prelude;


pub use aabb::Aabb;
pub use cell_table::CellTable;
pub use config::GridConfig;
pub use error::{GridError, Result};
pub use grid::{Diagnostics, SpatialGrid};
pub use hasher::{CellCoord, cell_of, hash_key};
pub use object_index::{CellSpan, Handle, ObjectIndex, ObjectRecord, Placement};
pub use pairs::PairSet;

pub use glam::DVec2;
