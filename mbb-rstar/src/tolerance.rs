//! Tolerant scalar comparison.
//!
//! Every numeric comparison performed by the index (box predicates, split
//! cost comparisons, subtree selection tie-breaks) goes through a
//! [`Tolerance`] instead of raw `f64` operators.

use std::cmp::Ordering;

use crate::rtree::{SpatialIndexError, SpatialResult};

/// Default epsilon used when no tolerance is configured.
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Compares doubles within a fixed epsilon.
///
/// # Examples
///
/// ```rust
/// use mbb_rstar::Tolerance;
///
/// let tol = Tolerance::new(1e-6).unwrap();
/// assert!(tol.equal(1.0, 1.0 + 1e-7));
/// assert!(tol.less_than(1.0, 1.1));
/// assert!(!tol.less_than(1.0, 1.0 + 1e-7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tolerance {
    epsilon: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl Tolerance {
    /// Creates a comparator with the given epsilon.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialIndexError::InvalidTolerance`] if `epsilon` is negative,
    /// NaN or infinite.
    pub fn new(epsilon: f64) -> SpatialResult<Self> {
        if !epsilon.is_finite() || epsilon < 0.0 {
            log::error!("Rejected tolerance epsilon {}", epsilon);
            return Err(SpatialIndexError::InvalidTolerance(format!(
                "epsilon must be finite and non-negative, got {}",
                epsilon
            )));
        }
        Ok(Tolerance { epsilon })
    }

    /// Returns the epsilon.
    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    #[inline]
    pub fn equal(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.epsilon
    }

    #[inline]
    pub fn less_than(&self, a: f64, b: f64) -> bool {
        a < b - self.epsilon
    }

    #[inline]
    pub fn greater_than(&self, a: f64, b: f64) -> bool {
        a > b + self.epsilon
    }

    #[inline]
    pub fn less_or_equal(&self, a: f64, b: f64) -> bool {
        !self.greater_than(a, b)
    }

    #[inline]
    pub fn greater_or_equal(&self, a: f64, b: f64) -> bool {
        !self.less_than(a, b)
    }

    /// Three-way comparison where values within epsilon are `Equal`.
    ///
    /// Not transitive across chains of near-equal values; callers that sort
    /// with it get a deterministic but tolerance-dependent order.
    pub fn compare(&self, a: f64, b: f64) -> Ordering {
        if self.less_than(a, b) {
            Ordering::Less
        } else if self.greater_than(a, b) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}
