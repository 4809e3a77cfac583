//! Configuration for the R*-tree.

use crate::rtree::rtree_constants::{
    DEFAULT_MAX_ENTRIES, DEFAULT_MIN_FILL_RATIO, DEFAULT_REINSERT_RATIO, MIN_FILL_FLOOR,
    MIN_NODE_CAPACITY,
};
use crate::rtree::{SpatialIndexError, SpatialResult};
use crate::tolerance::Tolerance;

/// Validated tree parameters.
///
/// Built through [`RStarConfig::builder`]; the derived counts (`m_min` and
/// the forced-reinsertion count `p`) are fixed at build time.
///
/// # Examples
///
/// ```rust
/// use mbb_rstar::{RStarConfig, Tolerance};
///
/// let config = RStarConfig::builder()
///     .max_entries(8)
///     .tolerance(Tolerance::new(1e-6).unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(config.max_entries(), 8);
/// assert_eq!(config.min_entries(), 3);
/// assert_eq!(config.forced_reinsert_count(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RStarConfig {
    max_entries: usize,
    min_entries: usize,
    forced_reinsert_count: usize,
    tolerance: Tolerance,
}

impl Default for RStarConfig {
    fn default() -> Self {
        RStarConfig {
            max_entries: DEFAULT_MAX_ENTRIES,
            min_entries: min_entries_for(DEFAULT_MAX_ENTRIES, DEFAULT_MIN_FILL_RATIO),
            forced_reinsert_count: reinsert_count_for(DEFAULT_MAX_ENTRIES, DEFAULT_REINSERT_RATIO),
            tolerance: Tolerance::default(),
        }
    }
}

impl RStarConfig {
    /// Starts a builder with default values.
    pub fn builder() -> RStarConfigBuilder {
        RStarConfigBuilder::new()
    }

    /// Maximum entries per node (`m_max`).
    #[inline]
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Minimum entries per non-root node (`m_min`).
    #[inline]
    pub fn min_entries(&self) -> usize {
        self.min_entries
    }

    /// Number of entries evicted by a forced reinsertion (`p`); zero disables
    /// forced reinsertion.
    #[inline]
    pub fn forced_reinsert_count(&self) -> usize {
        self.forced_reinsert_count
    }

    #[inline]
    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }
}

/// Builder for [`RStarConfig`].
#[derive(Debug, Clone)]
pub struct RStarConfigBuilder {
    max_entries: usize,
    min_fill_ratio: f64,
    reinsert_ratio: f64,
    tolerance: Tolerance,
}

impl Default for RStarConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RStarConfigBuilder {
    pub fn new() -> Self {
        RStarConfigBuilder {
            max_entries: DEFAULT_MAX_ENTRIES,
            min_fill_ratio: DEFAULT_MIN_FILL_RATIO,
            reinsert_ratio: DEFAULT_REINSERT_RATIO,
            tolerance: Tolerance::default(),
        }
    }

    #[inline]
    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    #[inline]
    pub fn min_fill_ratio(mut self, ratio: f64) -> Self {
        self.min_fill_ratio = ratio;
        self
    }

    #[inline]
    pub fn reinsert_ratio(mut self, ratio: f64) -> Self {
        self.reinsert_ratio = ratio;
        self
    }

    #[inline]
    pub fn tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Validates the parameters and derives `m_min` and `p`.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialIndexError::InvalidCapacity`] if `max_entries < 4`,
    /// if a ratio is out of range, or if the derived counts would let a node
    /// drop below `m_min` after a split or a forced reinsertion.
    pub fn build(self) -> SpatialResult<RStarConfig> {
        if self.max_entries < MIN_NODE_CAPACITY {
            log::error!("Rejected node capacity {}", self.max_entries);
            return Err(SpatialIndexError::InvalidCapacity(format!(
                "max entries must be at least {}, got {}",
                MIN_NODE_CAPACITY, self.max_entries
            )));
        }
        if !(self.min_fill_ratio > 0.0 && self.min_fill_ratio <= 0.5) {
            log::error!("Rejected min fill ratio {}", self.min_fill_ratio);
            return Err(SpatialIndexError::InvalidCapacity(format!(
                "min fill ratio must be in (0, 0.5], got {}",
                self.min_fill_ratio
            )));
        }
        if !(self.reinsert_ratio >= 0.0 && self.reinsert_ratio < 1.0) {
            log::error!("Rejected reinsert ratio {}", self.reinsert_ratio);
            return Err(SpatialIndexError::InvalidCapacity(format!(
                "reinsert ratio must be in [0, 1), got {}",
                self.reinsert_ratio
            )));
        }

        let min_entries = min_entries_for(self.max_entries, self.min_fill_ratio);
        if min_entries > self.max_entries / 2 {
            log::error!(
                "Min entries {} exceed half of max entries {}",
                min_entries,
                self.max_entries
            );
            return Err(SpatialIndexError::InvalidCapacity(format!(
                "min entries {} cannot exceed half of max entries {}",
                min_entries, self.max_entries
            )));
        }

        let forced_reinsert_count = reinsert_count_for(self.max_entries, self.reinsert_ratio);
        if self.max_entries + 1 - forced_reinsert_count < min_entries {
            log::error!(
                "Forced reinsertion of {} entries would underflow a node of {}",
                forced_reinsert_count,
                self.max_entries
            );
            return Err(SpatialIndexError::InvalidCapacity(format!(
                "forced reinsertion of {} entries leaves fewer than {} entries",
                forced_reinsert_count, min_entries
            )));
        }

        Ok(RStarConfig {
            max_entries: self.max_entries,
            min_entries,
            forced_reinsert_count,
            tolerance: self.tolerance,
        })
    }
}

fn min_entries_for(max_entries: usize, ratio: f64) -> usize {
    ((max_entries as f64 * ratio).floor() as usize).max(MIN_FILL_FLOOR)
}

fn reinsert_count_for(max_entries: usize, ratio: f64) -> usize {
    if ratio <= 0.0 {
        return 0;
    }
    ((max_entries as f64 * ratio).floor() as usize).max(1)
}
