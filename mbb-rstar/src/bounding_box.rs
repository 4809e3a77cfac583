use serde::{Deserialize, Serialize};
use std::hash::Hash;

use crate::geometry::Point3;
use crate::rtree::{SpatialIndexError, SpatialResult};
use crate::tolerance::Tolerance;

/// A 3D axis-aligned minimum bounding box (MBB).
///
/// `BoundingBox` is defined by its minimum and maximum corners. Every
/// component of `max` is strictly greater than the matching component of
/// `min`; constructing a degenerate or inverted box is an error, never
/// silently corrected.
///
/// All derived operations are pure. Predicates take a [`Tolerance`] and
/// compare coordinates through it.
///
/// # Examples
///
/// ```rust
/// use mbb_rstar::{BoundingBox, Point3, Tolerance};
///
/// let tol = Tolerance::default();
/// let a = BoundingBox::from_coords(0.0, 0.0, 0.0, 2.0, 2.0, 2.0).unwrap();
/// let b = BoundingBox::from_coords(1.0, 1.0, 1.0, 3.0, 3.0, 3.0).unwrap();
///
/// assert!(a.intersects(&b, &tol));
/// assert_eq!(a.union(&b).volume(), 27.0);
/// assert!(a.contains_point(&Point3::new(1.0, 1.0, 1.0), &tol));
/// ```
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(try_from = "BoxRepr", into = "BoxRepr")]
pub struct BoundingBox {
    min: Point3,
    max: Point3,
}

#[derive(Serialize, Deserialize)]
struct BoxRepr {
    min: Point3,
    max: Point3,
}

impl TryFrom<BoxRepr> for BoundingBox {
    type Error = SpatialIndexError;

    fn try_from(repr: BoxRepr) -> Result<Self, Self::Error> {
        BoundingBox::new(repr.min, repr.max)
    }
}

impl From<BoundingBox> for BoxRepr {
    fn from(bbox: BoundingBox) -> Self {
        BoxRepr {
            min: bbox.min,
            max: bbox.max,
        }
    }
}

impl Eq for BoundingBox {}

impl Hash for BoundingBox {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        for axis in 0..3 {
            self.min.coord(axis).to_bits().hash(state);
            self.max.coord(axis).to_bits().hash(state);
        }
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BoundingBox({} - {})", self.min, self.max)
    }
}

impl BoundingBox {
    /// Creates a new bounding box from its corners.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialIndexError::InvalidBoundingBox`] if a coordinate is not
    /// finite or if `max` is not strictly greater than `min` on every axis.
    pub fn new(min: Point3, max: Point3) -> SpatialResult<BoundingBox> {
        if !min.is_finite() || !max.is_finite() {
            log::error!("Rejected bounding box with non-finite corner {} - {}", min, max);
            return Err(SpatialIndexError::InvalidBoundingBox(format!(
                "corners must be finite, got {} - {}",
                min, max
            )));
        }
        for axis in 0..3 {
            if max.coord(axis) <= min.coord(axis) {
                log::error!("Rejected bounding box {} - {} on axis {}", min, max, axis);
                return Err(SpatialIndexError::InvalidBoundingBox(format!(
                    "max must be strictly greater than min on axis {}, got {} - {}",
                    axis, min, max
                )));
            }
        }
        Ok(BoundingBox { min, max })
    }

    /// Creates a new bounding box from six coordinates.
    pub fn from_coords(
        min_x: f64,
        min_y: f64,
        min_z: f64,
        max_x: f64,
        max_y: f64,
        max_z: f64,
    ) -> SpatialResult<BoundingBox> {
        BoundingBox::new(
            Point3::new(min_x, min_y, min_z),
            Point3::new(max_x, max_y, max_z),
        )
    }

    /// Returns the minimum corner.
    #[inline]
    pub fn min(&self) -> &Point3 {
        &self.min
    }

    /// Returns the maximum corner.
    #[inline]
    pub fn max(&self) -> &Point3 {
        &self.max
    }

    /// Edge length along `axis`.
    #[inline]
    pub fn extent(&self, axis: usize) -> f64 {
        self.max.coord(axis) - self.min.coord(axis)
    }

    /// Returns the volume of the box.
    pub fn volume(&self) -> f64 {
        self.extent(0) * self.extent(1) * self.extent(2)
    }

    /// Returns the sum of the lengths of the twelve edges.
    pub fn margin(&self) -> f64 {
        4.0 * (self.extent(0) + self.extent(1) + self.extent(2))
    }

    /// Returns the center point of the box.
    pub fn center(&self) -> Point3 {
        Point3::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }

    /// Returns the smallest box enclosing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Returns the overlap region, or `None` when the boxes share no volume.
    ///
    /// Touching boxes have no intersection box since a degenerate box is not
    /// a valid MBB.
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let min = Point3::new(
            self.min.x.max(other.min.x),
            self.min.y.max(other.min.y),
            self.min.z.max(other.min.z),
        );
        let max = Point3::new(
            self.max.x.min(other.max.x),
            self.max.y.min(other.max.y),
            self.max.z.min(other.max.z),
        );
        if (0..3).all(|axis| min.coord(axis) < max.coord(axis)) {
            Some(BoundingBox { min, max })
        } else {
            None
        }
    }

    /// Volume of the overlap region, zero when disjoint or touching.
    pub fn intersection_volume(&self, other: &BoundingBox) -> f64 {
        let mut volume = 1.0;
        for axis in 0..3 {
            let lo = self.min.coord(axis).max(other.min.coord(axis));
            let hi = self.max.coord(axis).min(other.max.coord(axis));
            if hi <= lo {
                return 0.0;
            }
            volume *= hi - lo;
        }
        volume
    }

    /// Minimum squared distance from `point` to any point of the box
    /// (MINDIST). Zero when the point is inside.
    pub fn min_dist_squared(&self, point: &Point3) -> f64 {
        (0..3)
            .map(|axis| {
                let p = point.coord(axis);
                let closest = p.clamp(self.min.coord(axis), self.max.coord(axis));
                let d = p - closest;
                d * d
            })
            .sum()
    }

    /// Closed-box intersection test: touching boxes intersect.
    pub fn intersects(&self, other: &BoundingBox, tol: &Tolerance) -> bool {
        (0..3).all(|axis| {
            tol.less_or_equal(self.min.coord(axis), other.max.coord(axis))
                && tol.less_or_equal(other.min.coord(axis), self.max.coord(axis))
        })
    }

    /// Interior intersection test: the boxes overlap by more than epsilon on
    /// every axis.
    pub fn intersects_strict(&self, other: &BoundingBox, tol: &Tolerance) -> bool {
        (0..3).all(|axis| {
            tol.less_than(self.min.coord(axis), other.max.coord(axis))
                && tol.less_than(other.min.coord(axis), self.max.coord(axis))
        })
    }

    /// Checks if `other` lies within this box; shared boundaries allowed.
    pub fn contains(&self, other: &BoundingBox, tol: &Tolerance) -> bool {
        (0..3).all(|axis| {
            tol.less_or_equal(self.min.coord(axis), other.min.coord(axis))
                && tol.greater_or_equal(self.max.coord(axis), other.max.coord(axis))
        })
    }

    /// Checks if `other` lies within the interior of this box.
    pub fn contains_strict(&self, other: &BoundingBox, tol: &Tolerance) -> bool {
        (0..3).all(|axis| {
            tol.less_than(self.min.coord(axis), other.min.coord(axis))
                && tol.greater_than(self.max.coord(axis), other.max.coord(axis))
        })
    }

    /// Checks if this box lies within `other`; shared boundaries allowed.
    pub fn inside(&self, other: &BoundingBox, tol: &Tolerance) -> bool {
        other.contains(self, tol)
    }

    /// Checks if this box lies within the interior of `other`.
    pub fn inside_strict(&self, other: &BoundingBox, tol: &Tolerance) -> bool {
        other.contains_strict(self, tol)
    }

    /// Checks if the point is inside the box or on its boundary.
    pub fn contains_point(&self, point: &Point3, tol: &Tolerance) -> bool {
        (0..3).all(|axis| {
            tol.less_or_equal(self.min.coord(axis), point.coord(axis))
                && tol.less_or_equal(point.coord(axis), self.max.coord(axis))
        })
    }

    /// Tolerant equality of all six coordinates.
    pub fn equals(&self, other: &BoundingBox, tol: &Tolerance) -> bool {
        (0..3).all(|axis| {
            tol.equal(self.min.coord(axis), other.min.coord(axis))
                && tol.equal(self.max.coord(axis), other.max.coord(axis))
        })
    }
}
