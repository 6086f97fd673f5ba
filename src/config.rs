//! Grid configuration.
//!
//! Loaded from JSON (missing fields fall back to defaults) or built in code with the
//! `with_*` setters. Every grid constructor validates the configuration first.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Default cell edge length in world units.
pub const DEFAULT_CELL_SIZE: f64 = 64.0;
/// Default large-object threshold in cells per axis.
pub const DEFAULT_LARGE_OBJECT_CELLS: u32 = 4;
/// Default bucket length past which the chain is reported as degraded.
pub const DEFAULT_CHAIN_WARNING_THRESHOLD: usize = 20;
/// Ratio between recommended cell size and average object extent.
pub const CELL_SIZE_PER_EXTENT: f64 = 1.5;

/// Tunables for [`SpatialGrid`](crate::SpatialGrid).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Edge length of one square cell
    pub cell_size: f64,
    /// Objects spanning more cells than this on either axis skip the buckets and go to
    /// the large-object list
    pub large_object_cells: u32,
    /// Bucket length that marks the table as degraded
    pub chain_warning_threshold: usize,
    /// Inward shrink applied to bounds before computing spanned cells
    pub boundary_epsilon: f64,
    /// Re-bucketing margin as a fraction of `cell_size`; 0 disables hysteresis
    pub hysteresis: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            large_object_cells: DEFAULT_LARGE_OBJECT_CELLS,
            chain_warning_threshold: DEFAULT_CHAIN_WARNING_THRESHOLD,
            boundary_epsilon: 0.0,
            hysteresis: 0.0,
        }
    }
}

impl GridConfig {
    /// Default configuration with the given cell size.
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            ..Self::default()
        }
    }

    /// Cell size recommended for a population whose average object extent is
    /// `average_extent`: 1.5 times that extent.
    pub fn recommended_cell_size(average_extent: f64) -> f64 {
        average_extent * CELL_SIZE_PER_EXTENT
    }

    /// Sets the cell size.
    #[must_use]
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Sets the large-object threshold.
    #[must_use]
    pub fn with_large_object_cells(mut self, cells: u32) -> Self {
        self.large_object_cells = cells;
        self
    }

    /// Sets the degraded-chain threshold.
    #[must_use]
    pub fn with_chain_warning_threshold(mut self, threshold: usize) -> Self {
        self.chain_warning_threshold = threshold;
        self
    }

    /// Sets the boundary epsilon.
    #[must_use]
    pub fn with_boundary_epsilon(mut self, epsilon: f64) -> Self {
        self.boundary_epsilon = epsilon;
        self
    }

    /// Sets the hysteresis fraction.
    #[must_use]
    pub fn with_hysteresis(mut self, fraction: f64) -> Self {
        self.hysteresis = fraction;
        self
    }

    /// Hysteresis margin in world units.
    #[inline]
    pub fn hysteresis_margin(&self) -> f64 {
        self.hysteresis * self.cell_size
    }

    /// Checks every field.
    ///
    /// # Errors
    /// [`GridError::InvalidCellSize`] for a non-finite or non-positive cell size,
    /// [`GridError::InvalidConfig`] for any other field out of range.
    pub fn validate(&self) -> Result<()> {
        validate_cell_size(self.cell_size)?;
        if self.large_object_cells == 0 {
            return Err(GridError::InvalidConfig("large_object_cells must be at least 1"));
        }
        if self.chain_warning_threshold == 0 {
            return Err(GridError::InvalidConfig("chain_warning_threshold must be at least 1"));
        }
        if !self.boundary_epsilon.is_finite() || self.boundary_epsilon < 0.0 {
            return Err(GridError::InvalidConfig("boundary_epsilon must be finite and non-negative"));
        }
        if self.boundary_epsilon * 2.0 >= self.cell_size {
            return Err(GridError::InvalidConfig("boundary_epsilon must be below half a cell"));
        }
        if !self.hysteresis.is_finite() || !(0.0..=1.0).contains(&self.hysteresis) {
            return Err(GridError::InvalidConfig("hysteresis must be within [0, 1]"));
        }
        Ok(())
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    /// [`GridError::ConfigParse`] for malformed JSON, otherwise any error from
    /// [`GridConfig::validate`].
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| GridError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes to pretty-printed JSON.
    ///
    /// # Errors
    /// [`GridError::ConfigParse`] if serialization fails (non-finite floats).
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| GridError::ConfigParse(e.to_string()))
    }
}

pub(crate) fn validate_cell_size(cell_size: f64) -> Result<()> {
    if cell_size.is_finite() && cell_size > 0.0 {
        Ok(())
    } else {
        Err(GridError::InvalidCellSize(cell_size))
    }
}
