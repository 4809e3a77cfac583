//! Thread-safe handle over an [`RStarTree`].

use std::sync::Arc;

use parking_lot::RwLock;

use crate::bounding_box::BoundingBox;
use crate::config::RStarConfig;
use crate::geometry::Point3;
use crate::indexed::IndexedObject;
use crate::tolerance::Tolerance;

use super::integrity::IntegrityReport;
use super::rtree_impl::RStarTree;
use super::rtree_types::{Neighbor, Predicate, RTreeStats, Sameness, SpatialResult};

/// Interface of a shared spatial index.
///
/// Every method takes `&self`; implementations provide their own locking.
pub trait SpatialIndex<T>: Send + Sync {
    /// Adds an object. Returns `false` if an identical object is already
    /// indexed.
    fn add(&self, object: T) -> SpatialResult<bool>;

    /// Removes a geometrically equivalent object.
    fn remove(&self, object: &T) -> SpatialResult<bool>;

    /// Finds the objects whose boxes intersect `query`.
    fn find_intersecting(&self, query: &BoundingBox) -> Vec<T>;

    /// Finds the objects whose boxes lie inside `query`.
    fn find_contained(&self, query: &BoundingBox) -> Vec<T>;

    /// Finds the `k` objects nearest to `point`, closest first.
    fn find_nearest(&self, point: &Point3, k: usize) -> Vec<Neighbor<T>>;

    /// Finds the objects within `distance` of `point`, closest first.
    fn find_within_distance(&self, point: &Point3, distance: f64) -> Vec<Neighbor<T>>;

    /// Gets the number of indexed objects.
    fn size(&self) -> usize;

    /// Clears all data from the index.
    fn clear(&self);
}

/// A cloneable, thread-safe handle to an [`RStarTree`].
///
/// Mutations take the write lock for the whole top-level operation, so
/// readers never observe a half-finished split or reinsertion. Queries take
/// the read lock and return owned clones of the matching objects.
///
/// # Examples
///
/// ```rust
/// use std::thread;
/// use mbb_rstar::{BoundingBox, SharedRStarTree, Tolerance};
///
/// let tree = SharedRStarTree::new(8, Tolerance::default()).unwrap();
///
/// let handles: Vec<_> = (0..4)
///     .map(|t| {
///         let tree = tree.clone();
///         thread::spawn(move || {
///             for i in 0..25 {
///                 let x = (t * 100 + i) as f64;
///                 let b = BoundingBox::from_coords(x, 0.0, 0.0, x + 1.0, 1.0, 1.0).unwrap();
///                 tree.insert(b).unwrap();
///             }
///         })
///     })
///     .collect();
/// for h in handles {
///     h.join().unwrap();
/// }
///
/// assert_eq!(tree.count(), 100);
/// ```
#[derive(Debug)]
pub struct SharedRStarTree<T> {
    inner: Arc<RwLock<RStarTree<T>>>,
}

impl<T> Clone for SharedRStarTree<T> {
    fn clone(&self) -> Self {
        SharedRStarTree {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> From<RStarTree<T>> for SharedRStarTree<T> {
    fn from(tree: RStarTree<T>) -> Self {
        SharedRStarTree {
            inner: Arc::new(RwLock::new(tree)),
        }
    }
}

impl<T> SharedRStarTree<T> {
    pub fn new(max_entries: usize, tolerance: Tolerance) -> SpatialResult<Self> {
        RStarTree::new(max_entries, tolerance).map(Self::from)
    }

    pub fn with_config(config: RStarConfig) -> Self {
        Self::from(RStarTree::with_config(config))
    }

    /// Runs `f` under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&RStarTree<T>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Runs `f` under the write lock.
    pub fn write<R>(&self, f: impl FnOnce(&mut RStarTree<T>) -> R) -> R {
        f(&mut self.inner.write())
    }

    pub fn count(&self) -> usize {
        self.inner.read().count()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn height(&self) -> usize {
        self.inner.read().height()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.inner.read().bounding_box()
    }

    pub fn stats(&self) -> RTreeStats {
        self.inner.read().stats()
    }

    pub fn check_integrity(&self) -> IntegrityReport {
        self.inner.read().check_integrity()
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }
}

impl<T: IndexedObject> SharedRStarTree<T> {
    pub fn insert(&self, object: T) -> SpatialResult<bool> {
        self.inner.write().insert(object)
    }

    pub fn remove(&self, object: &T) -> SpatialResult<bool> {
        self.inner.write().remove(object)
    }

    pub fn remove_identical(&self, object: &T) -> SpatialResult<bool> {
        self.inner.write().remove_identical(object)
    }

    pub fn remove_with(&self, object: &T, sameness: Sameness) -> SpatialResult<bool> {
        self.inner.write().remove_with(object, sameness)
    }

    pub fn bulk_insert<I: IntoIterator<Item = T>>(&self, objects: I) -> SpatialResult<usize> {
        self.inner.write().bulk_insert(objects)
    }
}

impl<T: Clone> SharedRStarTree<T> {
    pub fn retrieve(&self, query: &BoundingBox, predicate: Predicate) -> Vec<T> {
        self.inner
            .read()
            .retrieve(query, predicate)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn contains_point(&self, point: &Point3) -> Vec<T> {
        self.inner
            .read()
            .contains_point(point)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn nearest(&self, k: usize, point: &Point3) -> Vec<Neighbor<T>> {
        self.inner
            .read()
            .nearest(k, point)
            .into_iter()
            .map(|n| n.map(T::clone))
            .collect()
    }

    pub fn within_distance(&self, point: &Point3, distance: f64) -> Vec<Neighbor<T>> {
        self.inner
            .read()
            .within_distance(point, distance)
            .into_iter()
            .map(|n| n.map(T::clone))
            .collect()
    }

    pub fn all_entries(&self) -> Vec<T> {
        self.inner.read().all_entries().into_iter().cloned().collect()
    }
}

impl<T> SpatialIndex<T> for SharedRStarTree<T>
where
    T: IndexedObject + Clone + Send + Sync,
{
    fn add(&self, object: T) -> SpatialResult<bool> {
        self.insert(object)
    }

    fn remove(&self, object: &T) -> SpatialResult<bool> {
        SharedRStarTree::remove(self, object)
    }

    fn find_intersecting(&self, query: &BoundingBox) -> Vec<T> {
        self.retrieve(query, Predicate::Intersects)
    }

    fn find_contained(&self, query: &BoundingBox) -> Vec<T> {
        self.retrieve(query, Predicate::Inside)
    }

    fn find_nearest(&self, point: &Point3, k: usize) -> Vec<Neighbor<T>> {
        self.nearest(k, point)
    }

    fn find_within_distance(&self, point: &Point3, distance: f64) -> Vec<Neighbor<T>> {
        self.within_distance(point, distance)
    }

    fn size(&self) -> usize {
        self.count()
    }

    fn clear(&self) {
        SharedRStarTree::clear(self)
    }
}
