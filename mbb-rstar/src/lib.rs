//! # MBB R*-tree - In-Memory Spatial Index over 3D Bounding Boxes
//!
//! This crate provides an R*-tree keyed by axis-aligned 3D bounding boxes
//! (minimum bounding boxes, MBBs). Any type implementing
//! [`IndexedObject`] can be stored.
//!
//! ## Features
//!
//! - **R\* Insertion**: overlap-aware subtree choice, forced reinsertion and
//!   margin/overlap driven splits
//! - **Tolerant Geometry**: every comparison goes through a configurable
//!   epsilon ([`Tolerance`])
//! - **Predicate Queries**: strict and closed intersects, contains, inside,
//!   equals, and point containment
//! - **Nearest Neighbours**: branch-and-bound k-NN and distance ranges
//! - **Joins**: intersection and equality joins between two trees
//! - **Thread Safe Handle**: [`SharedRStarTree`] for concurrent readers and
//!   a single writer
//!
//! ## Quick Start
//!
//! ```rust
//! use mbb_rstar::{BoundingBox, Point3, RStarTree, Tolerance};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tree = RStarTree::new(16, Tolerance::default())?;
//!
//! tree.insert(BoundingBox::from_coords(0.0, 0.0, 0.0, 10.0, 10.0, 10.0)?)?;
//! tree.insert(BoundingBox::from_coords(20.0, 0.0, 0.0, 25.0, 5.0, 5.0)?)?;
//!
//! let query = BoundingBox::from_coords(5.0, 5.0, 5.0, 15.0, 15.0, 15.0)?;
//! assert_eq!(tree.intersects(&query).len(), 1);
//!
//! let nearest = tree.nearest(1, &Point3::new(30.0, 0.0, 0.0));
//! assert_eq!(nearest[0].distance, 5.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Objects
//!
//! ```rust
//! use mbb_rstar::{BoundingBox, IndexedObject, RStarTree, Tolerance};
//!
//! #[derive(Debug, Clone)]
//! struct Part {
//!     id: u64,
//!     extent: BoundingBox,
//! }
//!
//! impl IndexedObject for Part {
//!     fn bounding_box(&self) -> Option<BoundingBox> {
//!         Some(self.extent)
//!     }
//!
//!     fn identity_equal(&self, other: &Self) -> bool {
//!         self.id == other.id
//!     }
//! }
//!
//! let mut tree = RStarTree::new(8, Tolerance::default()).unwrap();
//! let extent = BoundingBox::from_coords(0.0, 0.0, 0.0, 1.0, 1.0, 1.0).unwrap();
//! assert!(tree.insert(Part { id: 1, extent }).unwrap());
//! assert!(!tree.insert(Part { id: 1, extent }).unwrap());
//! assert_eq!(tree.count(), 1);
//! ```

// Geometry modules
pub mod bounding_box;
pub mod geometry;
pub mod hilbert;
pub mod tolerance;

// Index modules
pub mod config;
pub mod indexed;
pub mod rtree;

// Re-export geometry types
pub use bounding_box::BoundingBox;
pub use geometry::Point3;
pub use tolerance::{Tolerance, DEFAULT_EPSILON};

// Re-export index types
pub use config::{RStarConfig, RStarConfigBuilder};
pub use indexed::IndexedObject;
pub use rtree::{
    IntegrityReport, Neighbor, NodeId, Predicate, RStarTree, RTreeStats, Sameness,
    SharedRStarTree, SpatialIndex, SpatialIndexError, SpatialResult,
};
