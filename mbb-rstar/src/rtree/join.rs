//! Spatial joins between two trees.

use crate::bounding_box::BoundingBox;
use crate::indexed::IndexedObject;
use crate::tolerance::Tolerance;

use super::rtree_impl::RStarTree;
use super::rtree_types::{Child, NodeId, Predicate};

impl<T> RStarTree<T> {
    /// Every pair `(a, b)` with `a` from this tree and `b` from `other` whose
    /// boxes overlap by more than epsilon.
    ///
    /// Comparisons use this tree's tolerance.
    pub fn intersection_join<'a, 'b, U: IndexedObject>(
        &'a self,
        other: &'b RStarTree<U>,
    ) -> Vec<(&'a T, &'b U)> {
        self.join(other, Predicate::IntersectsStrict)
    }

    /// Every pair `(a, b)` whose boxes are equal under this tree's tolerance.
    pub fn equals_join<'a, 'b, U: IndexedObject>(
        &'a self,
        other: &'b RStarTree<U>,
    ) -> Vec<(&'a T, &'b U)> {
        self.join(other, Predicate::Equals)
    }

    fn join<'a, 'b, U>(&'a self, other: &'b RStarTree<U>, predicate: Predicate) -> Vec<(&'a T, &'b U)> {
        let mut pairs = Vec::new();
        if self.count == 0 || other.count == 0 {
            return pairs;
        }
        log::trace!("Joining {} x {} entries on {:?}", self.count, other.count, predicate);
        self.join_nodes(self.root, other, other.root, predicate, &mut pairs);
        pairs
    }

    /// Synchronized descent of both trees.
    ///
    /// Two internal nodes recurse into every child pair that may hold a
    /// match; when only one side has reached its leaves, each leaf entry is
    /// looked up as a predicate query in the other side's subtree.
    fn join_nodes<'a, 'b, U>(
        &'a self,
        a: NodeId,
        other: &'b RStarTree<U>,
        b: NodeId,
        predicate: Predicate,
        pairs: &mut Vec<(&'a T, &'b U)>,
    ) {
        let tol = self.tolerance();
        let left = self.node(a);
        let right = other.node(b);

        match (left.leaf, right.leaf) {
            (true, true) => {
                for ea in &left.entries {
                    let Child::Leaf(oa) = &ea.child else { continue };
                    for eb in &right.entries {
                        let Child::Leaf(ob) = &eb.child else { continue };
                        if predicate.matches(&ea.mbb, &eb.mbb, tol) {
                            pairs.push((oa, ob));
                        }
                    }
                }
            }
            (false, false) => {
                for ea in &left.entries {
                    let Child::Node(ca) = ea.child else { continue };
                    for eb in &right.entries {
                        let Child::Node(cb) = eb.child else { continue };
                        if child_pair_may_match(predicate, &ea.mbb, &eb.mbb, tol) {
                            self.join_nodes(ca, other, cb, predicate, pairs);
                        }
                    }
                }
            }
            (true, false) => {
                let mut matches = Vec::new();
                for ea in &left.entries {
                    let Child::Leaf(oa) = &ea.child else { continue };
                    matches.clear();
                    other.retrieve_from(b, &ea.mbb, predicate, tol, &mut matches);
                    pairs.extend(matches.iter().map(|ob| (oa, *ob)));
                }
            }
            (false, true) => {
                let mut matches = Vec::new();
                for eb in &right.entries {
                    let Child::Leaf(ob) = &eb.child else { continue };
                    matches.clear();
                    self.retrieve_from(a, &eb.mbb, predicate, tol, &mut matches);
                    pairs.extend(matches.iter().map(|oa| (*oa, ob)));
                }
            }
        }
    }
}

/// Whether two subtrees may hold a matching pair. Equal boxes are found under
/// any pair of touching ancestors, so the equality join only needs the
/// closed test.
fn child_pair_may_match(predicate: Predicate, a: &BoundingBox, b: &BoundingBox, tol: &Tolerance) -> bool {
    match predicate {
        Predicate::IntersectsStrict => a.intersects_strict(b, tol),
        _ => a.intersects(b, tol),
    }
}
