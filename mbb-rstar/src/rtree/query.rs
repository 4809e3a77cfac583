//! Predicate queries.

use crate::bounding_box::BoundingBox;
use crate::geometry::Point3;
use crate::tolerance::Tolerance;

use super::rtree_impl::RStarTree;
use super::rtree_types::{Child, NodeId, Predicate};

impl Predicate {
    /// Whether a stored box satisfies the predicate against `query`.
    pub fn matches(self, stored: &BoundingBox, query: &BoundingBox, tol: &Tolerance) -> bool {
        match self {
            Predicate::IntersectsStrict => stored.intersects_strict(query, tol),
            Predicate::Intersects => stored.intersects(query, tol),
            Predicate::ContainsStrict => stored.contains_strict(query, tol),
            Predicate::Contains => stored.contains(query, tol),
            Predicate::InsideStrict => stored.inside_strict(query, tol),
            Predicate::Inside => stored.inside(query, tol),
            Predicate::Equals => stored.equals(query, tol),
        }
    }

    /// Whether a subtree bounded by `node_mbb` may hold a match.
    ///
    /// A box that contains (or equals) the query can only sit under nodes
    /// that contain it; for the other predicates overlap is enough.
    pub(crate) fn may_descend(self, node_mbb: &BoundingBox, query: &BoundingBox, tol: &Tolerance) -> bool {
        match self {
            Predicate::ContainsStrict | Predicate::Contains | Predicate::Equals => {
                node_mbb.contains(query, tol)
            }
            Predicate::IntersectsStrict
            | Predicate::Intersects
            | Predicate::InsideStrict
            | Predicate::Inside => node_mbb.intersects(query, tol),
        }
    }
}

impl<T> RStarTree<T> {
    /// Every object whose box satisfies `predicate` against `query`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mbb_rstar::{BoundingBox, Predicate, RStarTree, Tolerance};
    ///
    /// let mut tree = RStarTree::new(4, Tolerance::default()).unwrap();
    /// let small = BoundingBox::from_coords(1.0, 1.0, 1.0, 2.0, 2.0, 2.0).unwrap();
    /// let large = BoundingBox::from_coords(0.0, 0.0, 0.0, 5.0, 5.0, 5.0).unwrap();
    /// tree.insert(small).unwrap();
    /// tree.insert(large).unwrap();
    ///
    /// let query = BoundingBox::from_coords(0.5, 0.5, 0.5, 3.0, 3.0, 3.0).unwrap();
    /// assert_eq!(tree.retrieve(&query, Predicate::Inside), vec![&small]);
    /// assert_eq!(tree.retrieve(&query, Predicate::Contains), vec![&large]);
    /// ```
    pub fn retrieve(&self, query: &BoundingBox, predicate: Predicate) -> Vec<&T> {
        let mut results = Vec::new();
        self.retrieve_from(self.root, query, predicate, self.tolerance(), &mut results);
        results
    }

    /// Runs a predicate query on the subtree rooted at `id`.
    pub(crate) fn retrieve_from<'a>(
        &'a self,
        id: NodeId,
        query: &BoundingBox,
        predicate: Predicate,
        tol: &Tolerance,
        results: &mut Vec<&'a T>,
    ) {
        for entry in &self.node(id).entries {
            match &entry.child {
                Child::Leaf(object) => {
                    if predicate.matches(&entry.mbb, query, tol) {
                        results.push(object);
                    }
                }
                Child::Node(child) => {
                    if predicate.may_descend(&entry.mbb, query, tol) {
                        self.retrieve_from(*child, query, predicate, tol, results);
                    }
                }
            }
        }
    }

    /// Objects whose box overlaps `query` by more than epsilon.
    pub fn intersects_strict(&self, query: &BoundingBox) -> Vec<&T> {
        self.retrieve(query, Predicate::IntersectsStrict)
    }

    /// Objects whose box touches or overlaps `query`.
    pub fn intersects(&self, query: &BoundingBox) -> Vec<&T> {
        self.retrieve(query, Predicate::Intersects)
    }

    pub fn contains_strict(&self, query: &BoundingBox) -> Vec<&T> {
        self.retrieve(query, Predicate::ContainsStrict)
    }

    /// Objects whose box contains `query`.
    pub fn contains(&self, query: &BoundingBox) -> Vec<&T> {
        self.retrieve(query, Predicate::Contains)
    }

    pub fn inside_strict(&self, query: &BoundingBox) -> Vec<&T> {
        self.retrieve(query, Predicate::InsideStrict)
    }

    /// Objects whose box lies inside `query`.
    pub fn inside(&self, query: &BoundingBox) -> Vec<&T> {
        self.retrieve(query, Predicate::Inside)
    }

    pub fn equals(&self, query: &BoundingBox) -> Vec<&T> {
        self.retrieve(query, Predicate::Equals)
    }

    /// Objects whose box contains `point`, boundary included.
    pub fn contains_point(&self, point: &Point3) -> Vec<&T> {
        let mut results = Vec::new();
        self.contains_point_recursive(self.root, point, &mut results);
        results
    }

    fn contains_point_recursive<'a>(&'a self, id: NodeId, point: &Point3, results: &mut Vec<&'a T>) {
        let tol = self.tolerance();
        for entry in &self.node(id).entries {
            if !entry.mbb.contains_point(point, tol) {
                continue;
            }
            match &entry.child {
                Child::Leaf(object) => results.push(object),
                Child::Node(child) => self.contains_point_recursive(*child, point, results),
            }
        }
    }
}
