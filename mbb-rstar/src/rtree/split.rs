//! R*-tree node split.
//!
//! The split axis is the one whose candidate distributions have the smallest
//! summed margin; along that axis the distribution with the least overlap
//! (then least total volume) wins. Candidates are built from the entries
//! sorted by lower and by upper bound, keeping at least `m_min` entries on
//! each side.

use crate::bounding_box::BoundingBox;
use crate::indexed::IndexedObject;
use crate::tolerance::Tolerance;

use super::rtree_impl::RStarTree;
use super::rtree_types::{union_all, Entry, Node, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortKey {
    Lower,
    Upper,
}

const SORT_KEYS: [SortKey; 2] = [SortKey::Lower, SortKey::Upper];

impl<T: IndexedObject> RStarTree<T> {
    /// Moves part of an overflowing node's entries into a new sibling and
    /// returns the sibling's id. The sibling is not yet linked to a parent.
    pub(super) fn split(&mut self, id: NodeId) -> NodeId {
        let min_entries = self.config.min_entries();
        let capacity = self.config.max_entries() + 1;
        let tol = *self.tolerance();

        let node = self.node_mut(id);
        let leaf = node.leaf;
        let mut entries = std::mem::take(&mut node.entries);
        assert!(
            entries.len() >= 2 * min_entries,
            "cannot split node {} of {} entries",
            id,
            entries.len()
        );

        let axis = choose_split_axis(&mut entries, min_entries, &tol);
        let (key, split_at) = choose_split_index(&mut entries, axis, min_entries, &tol);
        sort_entries(&mut entries, axis, key);

        let mut sibling = Node::new(leaf, capacity);
        sibling.entries.extend(entries.drain(split_at..));
        let kept = entries.len();
        self.node_mut(id).entries = entries;

        let sibling = self.allocate_node(sibling);
        self.reparent_children(id, 0);
        self.reparent_children(sibling, 0);

        log::debug!(
            "Split node {} on axis {}: kept {}, moved {} to node {}",
            id,
            axis,
            kept,
            self.node(sibling).used(),
            sibling
        );
        sibling
    }
}

fn sort_entries<T>(entries: &mut [Entry<T>], axis: usize, key: SortKey) {
    entries.sort_by(|a, b| {
        let (a_lo, a_hi) = (a.mbb.min().coord(axis), a.mbb.max().coord(axis));
        let (b_lo, b_hi) = (b.mbb.min().coord(axis), b.mbb.max().coord(axis));
        match key {
            SortKey::Lower => a_lo.total_cmp(&b_lo).then(a_hi.total_cmp(&b_hi)),
            SortKey::Upper => a_hi.total_cmp(&b_hi).then(a_lo.total_cmp(&b_lo)),
        }
    });
}

/// Every legal distribution of the (already sorted) entries as
/// `(split_at, first_group_mbb, second_group_mbb)`.
fn distributions<T>(
    entries: &[Entry<T>],
    min_entries: usize,
) -> Vec<(usize, BoundingBox, BoundingBox)> {
    let total = entries.len();
    let prefix: Vec<BoundingBox> = entries
        .iter()
        .scan(None::<BoundingBox>, |acc, e| {
            let u = acc.map_or(e.mbb, |b| b.union(&e.mbb));
            *acc = Some(u);
            Some(u)
        })
        .collect();

    (min_entries..=total - min_entries)
        .filter_map(|split_at| {
            let second = union_all(entries[split_at..].iter().map(|e| &e.mbb))?;
            Some((split_at, prefix[split_at - 1], second))
        })
        .collect()
}

fn choose_split_axis<T>(entries: &mut [Entry<T>], min_entries: usize, tol: &Tolerance) -> usize {
    let mut best_axis = 0;
    let mut best_margin = f64::INFINITY;

    for axis in 0..3 {
        let mut margin = 0.0;
        for key in SORT_KEYS {
            sort_entries(entries, axis, key);
            margin += distributions(entries, min_entries)
                .iter()
                .map(|(_, first, second)| first.margin() + second.margin())
                .sum::<f64>();
        }
        if axis == 0 || tol.less_than(margin, best_margin) {
            best_axis = axis;
            best_margin = margin;
        }
    }
    best_axis
}

fn choose_split_index<T>(
    entries: &mut [Entry<T>],
    axis: usize,
    min_entries: usize,
    tol: &Tolerance,
) -> (SortKey, usize) {
    let mut best: Option<(SortKey, usize, f64, f64)> = None;

    for key in SORT_KEYS {
        sort_entries(entries, axis, key);
        for (split_at, first, second) in distributions(entries, min_entries) {
            let overlap = first.intersection_volume(&second);
            let volume = first.volume() + second.volume();
            let better = match best {
                None => true,
                Some((_, _, best_overlap, best_volume)) => {
                    tol.less_than(overlap, best_overlap)
                        || (tol.equal(overlap, best_overlap) && tol.less_than(volume, best_volume))
                }
            };
            if better {
                best = Some((key, split_at, overlap, volume));
            }
        }
    }

    match best {
        Some((key, split_at, _, _)) => (key, split_at),
        None => panic!("no split distribution for {} entries", entries.len()),
    }
}
