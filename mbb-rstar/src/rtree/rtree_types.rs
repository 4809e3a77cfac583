//! Core types and data structures for the R*-tree.
//!
//! This module defines the fundamental types used throughout the tree:
//! - Error types and result types
//! - Arena handles, entries and nodes
//! - Query result and statistics structures

use std::fmt;
use thiserror::Error;

use crate::bounding_box::BoundingBox;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur in spatial indexing operations.
///
/// Every variant is a precondition violation reported before the tree is
/// touched, so a call that returns one of these leaves the tree unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpatialIndexError {
    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    #[error("Indexed object has no bounding box")]
    MissingGeometry,

    #[error("Invalid node capacity: {0}")]
    InvalidCapacity(String),

    #[error("Invalid tolerance: {0}")]
    InvalidTolerance(String),
}

/// Result type for spatial operations
pub type SpatialResult<T> = Result<T, SpatialIndexError>;

// ============================================================================
// Arena Handles
// ============================================================================

/// Handle of a node inside the tree's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Node Types
// ============================================================================

/// Payload of an entry: a child node for internal nodes, an indexed object
/// for leaves.
#[derive(Debug, Clone)]
pub(crate) enum Child<T> {
    Node(NodeId),
    Leaf(T),
}

/// A bounding box together with the payload it bounds.
#[derive(Debug, Clone)]
pub(crate) struct Entry<T> {
    pub mbb: BoundingBox,
    pub child: Child<T>,
}

impl<T> Entry<T> {
    pub fn leaf(mbb: BoundingBox, object: T) -> Self {
        Entry {
            mbb,
            child: Child::Leaf(object),
        }
    }

    pub fn node(mbb: BoundingBox, id: NodeId) -> Self {
        Entry {
            mbb,
            child: Child::Node(id),
        }
    }

    #[inline]
    pub fn child_node(&self) -> Option<NodeId> {
        match self.child {
            Child::Node(id) => Some(id),
            Child::Leaf(_) => None,
        }
    }
}

/// An entry detached from the tree, waiting to be put back at `depth`
/// (distance from the root of the node it was taken from).
#[derive(Debug)]
pub(crate) struct PendingEntry<T> {
    pub entry: Entry<T>,
    pub depth: usize,
}

/// A tree node. `parent_slot` is the index of this node's own entry in the
/// parent's `entries`, meaningless for the root.
#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    pub entries: Vec<Entry<T>>,
    pub parent: Option<NodeId>,
    pub parent_slot: usize,
    pub leaf: bool,
}

impl<T> Node<T> {
    pub fn new(leaf: bool, capacity: usize) -> Self {
        Node {
            entries: Vec::with_capacity(capacity),
            parent: None,
            parent_slot: 0,
            leaf,
        }
    }

    #[inline]
    pub fn used(&self) -> usize {
        self.entries.len()
    }

    /// Union of the entry boxes, `None` for an empty node.
    pub fn compute_mbb(&self) -> Option<BoundingBox> {
        union_all(self.entries.iter().map(|e| &e.mbb))
    }
}

/// Union of a sequence of boxes, `None` when the sequence is empty.
pub(crate) fn union_all<'a, I>(boxes: I) -> Option<BoundingBox>
where
    I: IntoIterator<Item = &'a BoundingBox>,
{
    boxes.into_iter().fold(None, |acc, b| match acc {
        None => Some(*b),
        Some(u) => Some(u.union(b)),
    })
}

// ============================================================================
// Query Types
// ============================================================================

/// Spatial predicate applied between a stored box and a query box.
///
/// The stored box is the subject: `Contains` selects objects whose box
/// contains the query box, `Inside` objects whose box lies inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Predicate {
    IntersectsStrict,
    Intersects,
    ContainsStrict,
    Contains,
    InsideStrict,
    Inside,
    Equals,
}

/// Which notion of sameness `remove_with` matches stored objects against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sameness {
    /// [`IndexedObject::geometry_equivalent`](crate::IndexedObject::geometry_equivalent)
    #[default]
    GeometryEquivalent,
    /// [`IndexedObject::identity_equal`](crate::IndexedObject::identity_equal)
    Identity,
}

/// One nearest-neighbour result.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor<O> {
    /// Euclidean distance from the query point to the object's box.
    pub distance: f64,
    pub object: O,
}

impl<O> Neighbor<O> {
    /// Maps the object, keeping the distance.
    pub fn map<U, F: FnOnce(O) -> U>(self, f: F) -> Neighbor<U> {
        Neighbor {
            distance: self.distance,
            object: f(self.object),
        }
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Statistics about the tree shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RTreeStats {
    pub total_entries: usize,
    pub tree_height: usize,
    pub nodes: usize,
    pub leaf_nodes: usize,
    pub internal_nodes: usize,
    /// Arena slots released by underflow removal or root collapse, waiting
    /// for reuse.
    pub free_slots: usize,
}
