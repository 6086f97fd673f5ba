//! Error taxonomy for grid operations.
//!
//! Every error is returned synchronously from the call that caused it. The grid never
//! repairs bad input on the caller's behalf; a rejected call leaves the grid untouched.

use glam::DVec2;
use thiserror::Error;

use crate::Handle;

/// Errors raised by [`SpatialGrid`](crate::SpatialGrid) and [`GridConfig`](crate::GridConfig).
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum GridError {
    /// `insert` was called with a handle the grid already tracks.
    #[error("handle {0} is already tracked by the grid")]
    DuplicateId(Handle),
    /// `update`/`remove` was called with a handle the grid does not track.
    #[error("handle {0} is not tracked by the grid")]
    UnknownId(Handle),
    /// Box with `min > max` on an axis, or a non-finite component.
    #[error("invalid bounds: min {min} max {max}")]
    InvalidBounds {
        /// Rejected minimum corner.
        min: DVec2,
        /// Rejected maximum corner.
        max: DVec2,
    },
    /// Cell size that is zero, negative, NaN or infinite.
    #[error("invalid cell size {0}: must be finite and positive")]
    InvalidCellSize(f64),
    /// A configuration field is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// Configuration text could not be deserialized.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),
}

/// Result alias used across the crate.
pub type Result<T, E = GridError> = std::result::Result<T, E>;
