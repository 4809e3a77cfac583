//! Constants for the R*-tree.

/// Smallest accepted node capacity (`m_max`).
pub const MIN_NODE_CAPACITY: usize = 4;

/// Default maximum number of entries per node.
pub const DEFAULT_MAX_ENTRIES: usize = 16;

/// Default minimum fill, as a fraction of `m_max` (R*-tree paper: 40%).
pub const DEFAULT_MIN_FILL_RATIO: f64 = 0.4;

/// Default share of an overflowing node that is force-reinserted (30%).
pub const DEFAULT_REINSERT_RATIO: f64 = 0.3;

/// Lower bound on `m_min` regardless of the fill ratio.
pub const MIN_FILL_FLOOR: usize = 2;
