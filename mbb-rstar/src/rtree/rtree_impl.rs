//! RStarTree implementation.

use crate::bounding_box::BoundingBox;
use crate::config::RStarConfig;
use crate::hilbert::{hilbert_index_bounded, BULK_HILBERT_ORDER};
use crate::indexed::IndexedObject;
use crate::tolerance::Tolerance;

use super::insertion::OperationContext;
use super::rtree_types::{
    union_all, Child, Entry, Node, NodeId, RTreeStats, Sameness, SpatialIndexError, SpatialResult,
};

/// An in-memory R*-tree over the bounding boxes of `T`.
///
/// Nodes live in an arena addressed by [`NodeId`]; each node records its
/// parent and the slot of its own entry in the parent. Mutations take
/// `&mut self` and queries `&self`, so the borrow checker enforces the
/// single-writer/multiple-reader contract within one thread. For sharing
/// across threads see [`SharedRStarTree`](crate::SharedRStarTree).
///
/// # Examples
///
/// ```rust
/// use mbb_rstar::{BoundingBox, Point3, RStarTree, Tolerance};
///
/// let mut tree = RStarTree::new(8, Tolerance::default()).unwrap();
/// for i in 0..50 {
///     let x = i as f64;
///     let b = BoundingBox::from_coords(x, 0.0, 0.0, x + 1.0, 1.0, 1.0).unwrap();
///     assert!(tree.insert(b).unwrap());
/// }
///
/// let query = BoundingBox::from_coords(10.5, 0.2, 0.2, 12.5, 0.8, 0.8).unwrap();
/// assert_eq!(tree.intersects(&query).len(), 3);
///
/// let nearest = tree.nearest(1, &Point3::new(-5.0, 0.5, 0.5));
/// assert_eq!(nearest[0].distance, 5.0);
/// ```
#[derive(Debug, Clone)]
pub struct RStarTree<T> {
    pub(super) nodes: Vec<Option<Node<T>>>,
    pub(super) free_nodes: Vec<NodeId>,
    pub(super) root: NodeId,
    pub(super) config: RStarConfig,
    pub(super) count: usize,
    pub(super) height: usize,
}

impl<T> RStarTree<T> {
    /// Creates an empty tree with node capacity `max_entries` and default
    /// fill and reinsertion ratios.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialIndexError::InvalidCapacity`] if `max_entries < 4`.
    pub fn new(max_entries: usize, tolerance: Tolerance) -> SpatialResult<Self> {
        let config = RStarConfig::builder()
            .max_entries(max_entries)
            .tolerance(tolerance)
            .build()?;
        Ok(Self::with_config(config))
    }

    /// Creates an empty tree from a validated configuration.
    pub fn with_config(config: RStarConfig) -> Self {
        let root = Node::new(true, config.max_entries() + 1);
        RStarTree {
            nodes: vec![Some(root)],
            free_nodes: Vec::new(),
            root: NodeId(0),
            config,
            count: 0,
            height: 1,
        }
    }

    #[inline]
    pub fn config(&self) -> &RStarConfig {
        &self.config
    }

    #[inline]
    pub fn tolerance(&self) -> &Tolerance {
        self.config.tolerance()
    }

    /// Number of indexed objects.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of levels, 1 for a tree whose root is a leaf.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Union of all indexed boxes, `None` when the tree is empty.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        if self.count == 0 {
            return None;
        }
        self.node(self.root).compute_mbb()
    }

    /// Every indexed object, in no particular order.
    pub fn all_entries(&self) -> Vec<&T> {
        let mut objects = Vec::with_capacity(self.count);
        self.collect_entries_recursive(self.root, &mut objects);
        objects
    }

    fn collect_entries_recursive<'a>(&'a self, id: NodeId, objects: &mut Vec<&'a T>) {
        for entry in &self.node(id).entries {
            match &entry.child {
                Child::Leaf(object) => objects.push(object),
                Child::Node(child) => self.collect_entries_recursive(*child, objects),
            }
        }
    }

    /// Removes every object, keeping the configuration.
    pub fn clear(&mut self) {
        log::debug!("Clearing tree of {} entries", self.count);
        *self = Self::with_config(self.config);
    }

    /// Shape statistics of the tree.
    pub fn stats(&self) -> RTreeStats {
        let (leaf_nodes, internal_nodes) = self
            .nodes
            .iter()
            .flatten()
            .fold((0, 0), |(leaves, internals), node| {
                if node.leaf {
                    (leaves + 1, internals)
                } else {
                    (leaves, internals + 1)
                }
            });

        RTreeStats {
            total_entries: self.count,
            tree_height: self.height,
            nodes: leaf_nodes + internal_nodes,
            leaf_nodes,
            internal_nodes,
            free_slots: self.free_nodes.len(),
        }
    }

    // ------------------------------------------------------------------
    // Arena
    // ------------------------------------------------------------------

    /// Stores a node, reusing a released slot when one is available.
    pub(super) fn allocate_node(&mut self, node: Node<T>) -> NodeId {
        if let Some(id) = self.free_nodes.pop() {
            self.nodes[id.index()] = Some(node);
            return id;
        }
        self.nodes.push(Some(node));
        NodeId(self.nodes.len() - 1)
    }

    /// Takes a node out of the arena and releases its slot.
    pub(super) fn free_node(&mut self, id: NodeId) -> Node<T> {
        let node = match self.nodes.get_mut(id.index()).and_then(Option::take) {
            Some(node) => node,
            None => panic!("freeing dangling node handle {}", id),
        };
        self.free_nodes.push(id);
        node
    }

    #[inline]
    pub(super) fn node(&self, id: NodeId) -> &Node<T> {
        match self.nodes.get(id.index()) {
            Some(Some(node)) => node,
            _ => panic!("dangling node handle {}", id),
        }
    }

    #[inline]
    pub(super) fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        match self.nodes.get_mut(id.index()) {
            Some(Some(node)) => node,
            _ => panic!("dangling node handle {}", id),
        }
    }

    /// Union of a non-empty node's entries.
    pub(super) fn node_mbb(&self, id: NodeId) -> BoundingBox {
        match self.node(id).compute_mbb() {
            Some(mbb) => mbb,
            None => panic!("node {} has no entries", id),
        }
    }

    /// Child node referenced by `slot` of an internal node.
    pub(super) fn child_at(&self, id: NodeId, slot: usize) -> NodeId {
        match self.node(id).entries[slot].child {
            Child::Node(child) => child,
            Child::Leaf(_) => panic!("leaf payload in internal node {} slot {}", id, slot),
        }
    }

    /// Distance from the root, walking parent links.
    pub(super) fn depth_of(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            depth += 1;
            current = parent;
        }
        depth
    }

    /// Points the children stored at `from..` back at their slots in `id`.
    pub(super) fn reparent_children(&mut self, id: NodeId, from: usize) {
        let children: Vec<(usize, NodeId)> = self
            .node(id)
            .entries
            .iter()
            .enumerate()
            .skip(from)
            .filter_map(|(slot, entry)| entry.child_node().map(|child| (slot, child)))
            .collect();

        for (slot, child) in children {
            let node = self.node_mut(child);
            node.parent = Some(id);
            node.parent_slot = slot;
        }
    }
}

impl<T: IndexedObject> RStarTree<T> {
    /// Inserts an object.
    ///
    /// Returns `Ok(false)` without touching the tree if an
    /// [`identity_equal`](IndexedObject::identity_equal) object is already
    /// indexed.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialIndexError::MissingGeometry`] if the object has no
    /// bounding box.
    pub fn insert(&mut self, object: T) -> SpatialResult<bool> {
        let mbb = Self::require_geometry(&object)?;
        if self.find_leaf_slot(&object, &mbb, Sameness::Identity).is_some() {
            log::trace!("Skipping duplicate insert of {}", mbb);
            return Ok(false);
        }

        let mut ctx = OperationContext::new(self.height);
        self.insert_entry(Entry::leaf(mbb, object), None, &mut ctx);
        self.count += 1;
        Ok(true)
    }

    /// Inserts many objects, ordering them along a Hilbert curve of their box
    /// centres first so that neighbouring objects are inserted together.
    ///
    /// Returns the number of objects actually inserted (duplicates are
    /// skipped).
    ///
    /// # Errors
    ///
    /// Returns [`SpatialIndexError::MissingGeometry`] if any object has no
    /// bounding box; in that case nothing is inserted.
    pub fn bulk_insert<I>(&mut self, objects: I) -> SpatialResult<usize>
    where
        I: IntoIterator<Item = T>,
    {
        let boxed = objects
            .into_iter()
            .map(|object| Self::require_geometry(&object).map(|mbb| (mbb, object)))
            .collect::<SpatialResult<Vec<_>>>()?;

        let Some(bounds) = union_all(boxed.iter().map(|(mbb, _)| mbb)) else {
            return Ok(0);
        };

        let mut ordered: Vec<(u64, T)> = boxed
            .into_iter()
            .map(|(mbb, object)| {
                let key = hilbert_index_bounded(&mbb.center(), &bounds, BULK_HILBERT_ORDER);
                (key, object)
            })
            .collect();
        ordered.sort_by_key(|(key, _)| *key);

        log::debug!("Bulk inserting {} objects", ordered.len());
        let mut inserted = 0;
        for (_, object) in ordered {
            if self.insert(object)? {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    pub(super) fn require_geometry(object: &T) -> SpatialResult<BoundingBox> {
        object.bounding_box().ok_or_else(|| {
            log::error!("Indexed object has no bounding box");
            SpatialIndexError::MissingGeometry
        })
    }

    /// Finds the leaf slot holding an object matching `object`, descending
    /// only into subtrees whose box contains `mbb`.
    pub(super) fn find_leaf_slot(
        &self,
        object: &T,
        mbb: &BoundingBox,
        sameness: Sameness,
    ) -> Option<(NodeId, usize)> {
        let tol = self.tolerance();
        let mut stack = vec![self.root];

        while let Some(id) = stack.pop() {
            let node = self.node(id);
            for (slot, entry) in node.entries.iter().enumerate() {
                if !entry.mbb.contains(mbb, tol) {
                    continue;
                }
                match &entry.child {
                    Child::Node(child) => stack.push(*child),
                    Child::Leaf(stored) => {
                        let matched = match sameness {
                            Sameness::Identity => stored.identity_equal(object),
                            Sameness::GeometryEquivalent => stored.geometry_equivalent(object, tol),
                        };
                        if matched {
                            return Some((id, slot));
                        }
                    }
                }
            }
        }
        None
    }
}
