//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from the crate.
//! Users can import everything they need with:
//!
//! ```
//! use gridphase::prelude::*;
//! ```

pub use crate::{Aabb, Diagnostics, GridConfig, GridError, Handle, SpatialGrid};
pub use glam::DVec2;
