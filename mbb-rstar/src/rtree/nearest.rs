//! Nearest-neighbour and distance queries.
//!
//! Distances are measured from the query point to the closest point of an
//! object's box (MINDIST), so a point inside a box is at distance zero.

use crate::geometry::Point3;

use super::rtree_impl::RStarTree;
use super::rtree_types::{Child, Neighbor, NodeId};

impl<T> RStarTree<T> {
    /// The `k` objects nearest to `point`, closest first.
    ///
    /// Returns fewer than `k` results when the tree holds fewer objects.
    /// Objects at equal distance are returned in no particular order.
    pub fn nearest(&self, k: usize, point: &Point3) -> Vec<Neighbor<&T>> {
        let k = k.min(self.count);
        if k == 0 {
            return Vec::new();
        }

        let mut best: Vec<(f64, &T)> = Vec::with_capacity(k + 1);
        self.nearest_recursive(self.root, point, k, &mut best);

        best.into_iter()
            .map(|(dist_sq, object)| Neighbor {
                distance: dist_sq.sqrt(),
                object,
            })
            .collect()
    }

    /// Branch-and-bound search: child nodes are visited in MINDIST order and
    /// pruned once their MINDIST exceeds the current k-th best distance.
    fn nearest_recursive<'a>(
        &'a self,
        id: NodeId,
        point: &Point3,
        k: usize,
        best: &mut Vec<(f64, &'a T)>,
    ) {
        let node = self.node(id);

        if node.leaf {
            for entry in &node.entries {
                if let Child::Leaf(object) = &entry.child {
                    let dist_sq = entry.mbb.min_dist_squared(point);
                    if best.len() < k || dist_sq < kth_distance(best, k) {
                        let pos = best.partition_point(|(d, _)| *d <= dist_sq);
                        best.insert(pos, (dist_sq, object));
                        best.truncate(k);
                    }
                }
            }
            return;
        }

        // active branch list
        let mut branches: Vec<(f64, NodeId)> = node
            .entries
            .iter()
            .filter_map(|entry| {
                entry
                    .child_node()
                    .map(|child| (entry.mbb.min_dist_squared(point), child))
            })
            .collect();
        branches.sort_by(|a, b| a.0.total_cmp(&b.0));

        // epsilon applies to linear distances, as in within_distance
        let tol = self.tolerance();
        for (dist_sq, child) in branches {
            if tol.greater_than(dist_sq.sqrt(), kth_distance(best, k).sqrt()) {
                break;
            }
            self.nearest_recursive(child, point, k, best);
        }
    }

    /// Every object whose box lies within `distance` of `point`, closest
    /// first.
    pub fn within_distance(&self, point: &Point3, distance: f64) -> Vec<Neighbor<&T>> {
        if distance.is_nan() || distance < 0.0 || self.count == 0 {
            return Vec::new();
        }

        let mut found = Vec::new();
        self.within_distance_recursive(self.root, point, distance, &mut found);
        found.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        found
    }

    fn within_distance_recursive<'a>(
        &'a self,
        id: NodeId,
        point: &Point3,
        distance: f64,
        found: &mut Vec<Neighbor<&'a T>>,
    ) {
        let tol = self.tolerance();
        for entry in &self.node(id).entries {
            let d = entry.mbb.min_dist_squared(point).sqrt();
            if !tol.less_or_equal(d, distance) {
                continue;
            }
            match &entry.child {
                Child::Leaf(object) => found.push(Neighbor { distance: d, object }),
                Child::Node(child) => self.within_distance_recursive(*child, point, distance, found),
            }
        }
    }
}

/// Squared distance of the k-th best candidate, infinite until there are k.
fn kth_distance<T>(best: &[(f64, T)], k: usize) -> f64 {
    if best.len() < k {
        f64::INFINITY
    } else {
        best[k - 1].0
    }
}
