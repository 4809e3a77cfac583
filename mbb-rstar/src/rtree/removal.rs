//! Removal with underflow condensation and orphan reinsertion.

use crate::indexed::IndexedObject;

use super::insertion::OperationContext;
use super::rtree_impl::RStarTree;
use super::rtree_types::{NodeId, PendingEntry, Sameness, SpatialResult};

impl<T: IndexedObject> RStarTree<T> {
    /// Removes one stored object that is
    /// [`geometry_equivalent`](IndexedObject::geometry_equivalent) to
    /// `object`. Returns `Ok(false)` if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialIndexError::MissingGeometry`](super::SpatialIndexError::MissingGeometry)
    /// if the object has no bounding box.
    pub fn remove(&mut self, object: &T) -> SpatialResult<bool> {
        self.remove_with(object, Sameness::GeometryEquivalent)
    }

    /// Removes the stored object that is
    /// [`identity_equal`](IndexedObject::identity_equal) to `object`.
    pub fn remove_identical(&mut self, object: &T) -> SpatialResult<bool> {
        self.remove_with(object, Sameness::Identity)
    }

    /// Removes one stored object matching `object` under `sameness`.
    pub fn remove_with(&mut self, object: &T, sameness: Sameness) -> SpatialResult<bool> {
        let mbb = Self::require_geometry(object)?;
        let Some((leaf, slot)) = self.find_leaf_slot(object, &mbb, sameness) else {
            log::trace!("No entry to remove at {}", mbb);
            return Ok(false);
        };

        let mut ctx = OperationContext::new(self.height);
        self.node_mut(leaf).entries.remove(slot);
        let orphans = self.condense_tree(leaf);
        self.reinsert_orphans(orphans, &mut ctx);
        self.collapse_root();
        self.count -= 1;
        Ok(true)
    }

    /// Walks from `leaf` to the root, detaching every node left with fewer
    /// than `m_min` entries and refreshing the parent boxes of the rest.
    ///
    /// The entries of detached nodes are returned with the depth they must be
    /// reinserted at.
    fn condense_tree(&mut self, leaf: NodeId) -> Vec<PendingEntry<T>> {
        let min_entries = self.config.min_entries();
        let mut orphans = Vec::new();
        let mut id = leaf;

        while let Some(parent) = self.node(id).parent {
            let slot = self.node(id).parent_slot;

            if self.node(id).used() < min_entries {
                let depth = self.depth_of(id);
                self.node_mut(parent).entries.remove(slot);
                self.reparent_children(parent, slot);

                let node = self.free_node(id);
                log::trace!(
                    "Detached underfull node {} with {} entries at depth {}",
                    id,
                    node.used(),
                    depth
                );
                orphans.extend(
                    node.entries
                        .into_iter()
                        .map(|entry| PendingEntry { entry, depth }),
                );
            } else {
                let mbb = self.node_mbb(id);
                self.node_mut(parent).entries[slot].mbb = mbb;
            }
            id = parent;
        }
        orphans
    }

    fn reinsert_orphans(&mut self, orphans: Vec<PendingEntry<T>>, ctx: &mut OperationContext) {
        if orphans.is_empty() {
            return;
        }
        log::debug!("Reinserting {} orphaned entries", orphans.len());
        for PendingEntry { entry, depth } in orphans {
            let target = depth + ctx.height_diff;
            self.insert_entry(entry, Some(target), ctx);
        }
    }

    /// Replaces an internal root holding a single child by that child, as
    /// often as needed.
    fn collapse_root(&mut self) {
        loop {
            let root = self.node(self.root);
            if root.leaf || root.used() != 1 {
                return;
            }
            let child = self.child_at(self.root, 0);
            let old_root = self.root;
            self.free_node(old_root);

            let node = self.node_mut(child);
            node.parent = None;
            node.parent_slot = 0;
            self.root = child;
            self.height -= 1;
            log::debug!("Root collapsed to node {}, height {}", child, self.height);
        }
    }
}
