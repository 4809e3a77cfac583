//! In-memory R*-tree over 3D bounding boxes.
//!
//! The tree keeps its nodes in an arena and follows the R*-tree algorithms:
//! - overlap-aware subtree selection
//! - forced reinsertion before the first split on each level
//! - margin/overlap driven node splits
//! - condense-and-reinsert removal
//!
//! Queries cover the predicate family, point containment, k-nearest
//! neighbours, distance ranges and joins between two trees.

pub mod rtree_constants;
pub mod rtree_types;
mod insertion;
mod integrity;
mod join;
mod nearest;
mod query;
mod removal;
mod rtree_impl;
mod shared_rtree;
mod split;

pub use integrity::IntegrityReport;
pub use rtree_impl::RStarTree;
pub use rtree_types::{
    Neighbor, NodeId, Predicate, RTreeStats, Sameness, SpatialIndexError, SpatialResult,
};
pub use shared_rtree::{SharedRStarTree, SpatialIndex};
