//! Axis-aligned bounding box in world units.
//!
//! Boxes are closed on both ends: two boxes that share only an edge overlap, and a
//! degenerate box (`min == max`) is a point.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Axis-aligned bounding box: minimum and maximum corners.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner (`min_x`, `min_y`)
    pub min: DVec2,
    /// Maximum corner (`max_x`, `max_y`)
    pub max: DVec2,
}

impl Aabb {
    /// Creates a box from its corners. The box is not validated here; grid operations
    /// reject invalid boxes with [`GridError::InvalidBounds`].
    #[inline]
    pub const fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Creates a box from scalar coordinates in `(min_x, min_y, max_x, max_y)` order.
    #[inline]
    pub const fn from_coords(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min: DVec2::new(min_x, min_y),
            max: DVec2::new(max_x, max_y),
        }
    }

    /// Degenerate box covering a single point.
    #[inline]
    pub const fn from_point(point: DVec2) -> Self {
        Self { min: point, max: point }
    }

    /// Box centred on `center` reaching `half_extents` along each axis.
    #[inline]
    pub fn from_center_half_extents(center: DVec2, half_extents: DVec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Checks that every component is finite and `min <= max` on both axes.
    ///
    /// # Errors
    /// Returns [`GridError::InvalidBounds`] when either condition fails. The box is
    /// never normalized by swapping corners.
    pub fn validate(&self) -> Result<()> {
        let finite = self.min.is_finite() && self.max.is_finite();
        if !finite || self.min.x > self.max.x || self.min.y > self.max.y {
            return Err(GridError::InvalidBounds {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Default narrow-phase predicate: closed-interval overlap on both axes.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Whether `point` lies inside or on the boundary.
    #[inline]
    pub fn contains_point(&self, point: DVec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Whether `other` lies entirely within this box.
    #[inline]
    pub fn contains_aabb(&self, other: &Self) -> bool {
        other.min.x >= self.min.x
            && other.max.x <= self.max.x
            && other.min.y >= self.min.y
            && other.max.y <= self.max.y
    }

    /// Smallest box covering both boxes. Useful for building a swept box from the
    /// previous and current bounds of a fast-moving object.
    #[inline]
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Box grown outward by `margin` on every side (shrunk for negative margins).
    #[inline]
    #[must_use]
    pub fn expanded(&self, margin: f64) -> Self {
        let m = DVec2::splat(margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// Width and height.
    #[inline]
    pub fn extent(&self) -> DVec2 {
        self.max - self.min
    }

    /// Centre point.
    #[inline]
    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_degenerate_box() {
        let b = Aabb::from_point(DVec2::new(3.0, -2.0));
        assert!(b.validate().is_ok(), "Point boxes are valid");
    }

    #[test]
    fn test_validate_rejects_inverted_axis() {
        let b = Aabb::from_coords(10.0, 0.0, 5.0, 1.0);
        assert_eq!(
            b.validate(),
            Err(GridError::InvalidBounds {
                min: DVec2::new(10.0, 0.0),
                max: DVec2::new(5.0, 1.0),
            }),
            "min.x > max.x must be rejected, not swapped"
        );
        let b = Aabb::from_coords(0.0, 3.0, 1.0, 2.0);
        assert!(b.validate().is_err(), "min.y > max.y must be rejected");
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        assert!(Aabb::from_coords(f64::NAN, 0.0, 1.0, 1.0).validate().is_err());
        assert!(Aabb::from_coords(0.0, 0.0, f64::INFINITY, 1.0).validate().is_err());
    }

    #[test]
    fn test_overlap_is_closed() {
        let a = Aabb::from_coords(0.0, 0.0, 1.0, 1.0);
        let b = Aabb::from_coords(1.0, 1.0, 2.0, 2.0);
        let c = Aabb::from_coords(1.1, 0.0, 2.0, 1.0);
        assert!(a.overlaps(&b), "Touching corners overlap");
        assert!(b.overlaps(&a), "Overlap is symmetric");
        assert!(!a.overlaps(&c), "Separated boxes do not overlap");
    }

    #[test]
    fn test_union_and_expanded() {
        let a = Aabb::from_coords(0.0, 0.0, 1.0, 1.0);
        let b = Aabb::from_coords(5.0, -2.0, 6.0, 0.5);
        let u = a.union(&b);
        assert_eq!(u, Aabb::from_coords(0.0, -2.0, 6.0, 1.0));
        assert!(u.contains_aabb(&a) && u.contains_aabb(&b), "Union covers both inputs");

        let e = a.expanded(0.5);
        assert_eq!(e, Aabb::from_coords(-0.5, -0.5, 1.5, 1.5));
        assert_eq!(e.extent(), DVec2::new(2.0, 2.0));
        assert_eq!(e.center(), DVec2::new(0.5, 0.5));
    }

    #[test]
    fn test_contains_point_on_boundary() {
        let a = Aabb::from_center_half_extents(DVec2::ZERO, DVec2::splat(2.0));
        assert!(a.contains_point(DVec2::new(2.0, -2.0)), "Corner is inside");
        assert!(!a.contains_point(DVec2::new(2.01, 0.0)), "Outside on x");
    }
}
