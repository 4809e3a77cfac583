//! Contract between the index and the objects it stores.

use crate::bounding_box::BoundingBox;
use crate::tolerance::Tolerance;

/// An object that can be stored in an [`RStarTree`](crate::RStarTree).
///
/// Two notions of sameness are kept apart on purpose:
///
/// - [`identity_equal`](IndexedObject::identity_equal) is strict and decides
///   whether an insert would create a duplicate;
/// - [`geometry_equivalent`](IndexedObject::geometry_equivalent) may be
///   looser and is what [`RStarTree::remove`](crate::RStarTree::remove)
///   matches against.
///
/// [`RStarTree::remove_with`](crate::RStarTree::remove_with) lets the caller
/// pick either one explicitly.
pub trait IndexedObject {
    /// The bounding box of the object, or `None` when the object has no
    /// geometry to index.
    fn bounding_box(&self) -> Option<BoundingBox>;

    /// Strict identity of two objects.
    fn identity_equal(&self, other: &Self) -> bool;

    /// Geometric equivalence of two objects under `tolerance`.
    ///
    /// Defaults to tolerant equality of the bounding boxes, whatever the
    /// identity of the two objects.
    fn geometry_equivalent(&self, other: &Self, tolerance: &Tolerance) -> bool {
        match (self.bounding_box(), other.bounding_box()) {
            (Some(a), Some(b)) => a.equals(&b, tolerance),
            (None, None) => true,
            _ => false,
        }
    }
}

/// A bare box indexes itself.
impl IndexedObject for BoundingBox {
    fn bounding_box(&self) -> Option<BoundingBox> {
        Some(*self)
    }

    fn identity_equal(&self, other: &Self) -> bool {
        self == other
    }

    fn geometry_equivalent(&self, other: &Self, tolerance: &Tolerance) -> bool {
        self.equals(other, tolerance)
    }
}
