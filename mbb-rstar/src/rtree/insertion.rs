//! Insertion: subtree selection, overflow treatment and upward adjustment.

use crate::bounding_box::BoundingBox;
use crate::indexed::IndexedObject;

use super::rtree_impl::RStarTree;
use super::rtree_types::{Entry, Node, NodeId};

/// Bookkeeping shared by every insertion performed on behalf of one
/// top-level insert or remove.
#[derive(Debug)]
pub(crate) struct OperationContext {
    /// Number of times the root has grown since the operation started.
    pub height_diff: usize,
    /// Per depth, whether a forced reinsertion already happened there.
    level_forced_reinsert: Vec<bool>,
}

impl OperationContext {
    pub fn new(height: usize) -> Self {
        OperationContext {
            height_diff: 0,
            level_forced_reinsert: vec![false; height],
        }
    }

    pub fn forced_reinsert_done(&self, depth: usize) -> bool {
        self.level_forced_reinsert.get(depth).copied().unwrap_or(false)
    }

    pub fn mark_forced_reinsert(&mut self, depth: usize) {
        if depth >= self.level_forced_reinsert.len() {
            self.level_forced_reinsert.resize(depth + 1, false);
        }
        self.level_forced_reinsert[depth] = true;
    }

    /// A new root pushes every existing level one step further down.
    pub fn record_root_growth(&mut self) {
        self.height_diff += 1;
        self.level_forced_reinsert.insert(0, false);
    }
}

impl<T: IndexedObject> RStarTree<T> {
    /// Places `entry` at `target_depth` (a leaf when `None`) and repairs the
    /// path to the root. Returns whether the tree grew.
    pub(super) fn insert_entry(
        &mut self,
        entry: Entry<T>,
        target_depth: Option<usize>,
        ctx: &mut OperationContext,
    ) -> bool {
        let node = self.choose_subtree(&entry.mbb, target_depth);
        self.append(node, entry);
        self.adjust_node(node, ctx)
    }

    /// Walks down from the root to the node that should receive a box,
    /// stopping at a leaf or at `target_depth`.
    pub(super) fn choose_subtree(&self, mbb: &BoundingBox, target_depth: Option<usize>) -> NodeId {
        let mut id = self.root;
        let mut depth = 0;
        loop {
            if self.node(id).leaf || target_depth == Some(depth) {
                return id;
            }
            let slot = self.choose_node(id, mbb);
            id = self.child_at(id, slot);
            depth += 1;
        }
    }

    /// Picks the entry of an internal node that best accommodates `mbb`.
    ///
    /// Above the leaves: least volume enlargement, then least volume. Just
    /// above the leaves: least overlap enlargement first.
    fn choose_node(&self, id: NodeId, mbb: &BoundingBox) -> usize {
        let tol = self.tolerance();
        let entries = &self.node(id).entries;
        let children_are_leaves = entries
            .first()
            .and_then(|e| e.child_node())
            .map(|child| self.node(child).leaf)
            .unwrap_or(false);

        let mut best_slot = 0;
        let mut best = (f64::INFINITY, f64::INFINITY, f64::INFINITY);

        for (slot, entry) in entries.iter().enumerate() {
            let enlarged = entry.mbb.union(mbb);
            let volume = entry.mbb.volume();
            let enlargement = enlarged.volume() - volume;
            let overlap = if children_are_leaves {
                overlap_enlargement(entries, slot, &enlarged)
            } else {
                0.0
            };

            let (best_overlap, best_enlargement, best_volume) = best;
            let better = slot == 0
                || tol.less_than(overlap, best_overlap)
                || (tol.equal(overlap, best_overlap)
                    && (tol.less_than(enlargement, best_enlargement)
                        || (tol.equal(enlargement, best_enlargement)
                            && tol.less_than(volume, best_volume))));

            if better {
                best_slot = slot;
                best = (overlap, enlargement, volume);
            }
        }
        best_slot
    }

    /// Adds an entry to a node with room for it, wiring up the parent link
    /// of a child node.
    ///
    /// # Panics
    ///
    /// If the node already holds `m_max + 1` entries.
    pub(super) fn append(&mut self, id: NodeId, entry: Entry<T>) {
        let max_entries = self.config.max_entries();
        let child = entry.child_node();

        let node = self.node_mut(id);
        assert!(
            node.used() <= max_entries,
            "node {} is full with {} entries",
            id,
            node.used()
        );
        debug_assert_eq!(node.leaf, child.is_none(), "entry kind does not match node {}", id);
        node.entries.push(entry);
        let slot = node.used() - 1;

        if let Some(child) = child {
            let child_node = self.node_mut(child);
            child_node.parent = Some(id);
            child_node.parent_slot = slot;
        }
    }

    /// Resolves an overflow at `id`, then refreshes the parent's record of
    /// this node and continues upward while anything changed.
    ///
    /// Returns whether the root grew.
    pub(super) fn adjust_node(&mut self, id: NodeId, ctx: &mut OperationContext) -> bool {
        let mut sibling = None;

        if self.node(id).used() > self.config.max_entries() {
            let depth = self.depth_of(id);
            if id != self.root
                && self.config.forced_reinsert_count() > 0
                && !ctx.forced_reinsert_done(depth)
            {
                ctx.mark_forced_reinsert(depth);
                return self.forced_reinsert(id, depth, ctx);
            }
            sibling = Some(self.split(id));
        }

        let (parent, slot) = {
            let node = self.node(id);
            (node.parent, node.parent_slot)
        };

        match parent {
            Some(parent) => {
                let mbb = self.node_mbb(id);
                let changed = self.node(parent).entries[slot].mbb != mbb;
                if changed {
                    self.node_mut(parent).entries[slot].mbb = mbb;
                }
                if let Some(sibling) = sibling {
                    let sibling_mbb = self.node_mbb(sibling);
                    self.append(parent, Entry::node(sibling_mbb, sibling));
                }
                if changed || sibling.is_some() {
                    self.adjust_node(parent, ctx)
                } else {
                    false
                }
            }
            None => match sibling {
                Some(sibling) => {
                    self.grow_root(id, sibling, ctx);
                    true
                }
                None => false,
            },
        }
    }

    /// Evicts the `p` entries whose centres lie farthest from the node's
    /// centre and inserts them again from the root, closest first.
    fn forced_reinsert(&mut self, id: NodeId, depth: usize, ctx: &mut OperationContext) -> bool {
        let count = self.config.forced_reinsert_count();
        let center = self.node_mbb(id).center();

        let node = self.node_mut(id);
        node.entries.sort_by(|a, b| {
            let da = a.mbb.center().distance_squared(&center);
            let db = b.mbb.center().distance_squared(&center);
            db.total_cmp(&da)
        });
        let evicted: Vec<Entry<T>> = node.entries.drain(..count).collect();
        self.reparent_children(id, 0);

        log::trace!(
            "Forced reinsertion of {} entries from node {} at depth {}",
            evicted.len(),
            id,
            depth
        );

        let diff_at_eviction = ctx.height_diff;
        let mut grew = self.adjust_node(id, ctx);
        for entry in evicted.into_iter().rev() {
            let target = depth + (ctx.height_diff - diff_at_eviction);
            grew |= self.insert_entry(entry, Some(target), ctx);
        }
        grew
    }

    /// Replaces the root with a new internal node over the old root and its
    /// split sibling.
    fn grow_root(&mut self, old_root: NodeId, sibling: NodeId, ctx: &mut OperationContext) {
        let capacity = self.config.max_entries() + 1;
        let new_root = self.allocate_node(Node::new(false, capacity));

        let old_mbb = self.node_mbb(old_root);
        let sibling_mbb = self.node_mbb(sibling);
        self.append(new_root, Entry::node(old_mbb, old_root));
        self.append(new_root, Entry::node(sibling_mbb, sibling));

        self.root = new_root;
        self.height += 1;
        ctx.record_root_growth();
        log::debug!("Root grew to node {}, height {}", new_root, self.height);
    }
}

/// Increase in overlap between entry `slot` and its siblings if the entry's
/// box became `enlarged`.
fn overlap_enlargement<T>(entries: &[Entry<T>], slot: usize, enlarged: &BoundingBox) -> f64 {
    let current = &entries[slot].mbb;
    entries
        .iter()
        .enumerate()
        .filter(|(other, _)| *other != slot)
        .map(|(_, e)| enlarged.intersection_volume(&e.mbb) - current.intersection_volume(&e.mbb))
        .sum()
}
