//! Structural integrity checking.

use super::rtree_impl::RStarTree;
use super::rtree_types::{Child, NodeId};

// ============================================================================
// Integrity Checking
// ============================================================================

/// Result of an integrity check.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrityReport {
    /// Nodes reached from the root
    pub nodes_checked: usize,
    /// Objects found in the leaves
    pub entries_found: usize,
    /// Summary of findings
    pub is_valid: bool,
    /// Detailed error messages
    pub errors: Vec<String>,
}

impl IntegrityReport {
    pub fn new() -> Self {
        Self {
            nodes_checked: 0,
            entries_found: 0,
            is_valid: true,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, message: String) {
        self.is_valid = false;
        self.errors.push(message);
    }
}

impl Default for IntegrityReport {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RStarTree<T> {
    /// Walks the whole tree and reports every broken structural invariant:
    /// fill bounds, uniform leaf depth, parent links, entry boxes covering
    /// their subtrees, the object count and arena bookkeeping.
    ///
    /// Intended for tests and debugging; the tree never needs it to operate.
    pub fn check_integrity(&self) -> IntegrityReport {
        let mut report = IntegrityReport::new();

        match self.nodes.get(self.root.index()) {
            Some(Some(root)) => {
                if root.parent.is_some() {
                    report.fail(format!("root {} has a parent", self.root));
                }
            }
            _ => {
                report.fail(format!("root {} is not allocated", self.root));
                return report;
            }
        }

        self.check_node(self.root, 0, &mut report);

        if report.entries_found != self.count {
            report.fail(format!(
                "count is {} but leaves hold {} objects",
                self.count, report.entries_found
            ));
        }

        let live = self.nodes.iter().flatten().count();
        if live != report.nodes_checked {
            report.fail(format!(
                "{} nodes allocated but {} reachable from the root",
                live, report.nodes_checked
            ));
        }
        for id in &self.free_nodes {
            if matches!(self.nodes.get(id.index()), Some(Some(_))) {
                report.fail(format!("free slot {} still holds a node", id));
            }
        }

        if !report.is_valid {
            log::warn!("Integrity check found {} problems", report.errors.len());
        }
        report
    }

    fn check_node(&self, id: NodeId, depth: usize, report: &mut IntegrityReport) {
        let node = match self.nodes.get(id.index()) {
            Some(Some(node)) => node,
            _ => {
                report.fail(format!("dangling child handle {} at depth {}", id, depth));
                return;
            }
        };
        report.nodes_checked += 1;

        let max_entries = self.config.max_entries();
        let min_entries = self.config.min_entries();
        let is_root = id == self.root;

        if node.used() > max_entries {
            report.fail(format!("node {} holds {} entries, max {}", id, node.used(), max_entries));
        }
        if !is_root && node.used() < min_entries {
            report.fail(format!("node {} holds {} entries, min {}", id, node.used(), min_entries));
        }
        if is_root && !node.leaf && node.used() < 2 {
            report.fail(format!("internal root {} has {} children", id, node.used()));
        }
        if node.leaf != (depth + 1 == self.height) {
            report.fail(format!(
                "node {} at depth {} has leaf flag {} in a tree of height {}",
                id, depth, node.leaf, self.height
            ));
        }

        let tol = self.tolerance();
        for (slot, entry) in node.entries.iter().enumerate() {
            match &entry.child {
                Child::Leaf(_) => {
                    if !node.leaf {
                        report.fail(format!("internal node {} slot {} holds an object", id, slot));
                    }
                    report.entries_found += 1;
                }
                Child::Node(child) => {
                    if node.leaf {
                        report.fail(format!("leaf {} slot {} holds a child node", id, slot));
                        continue;
                    }
                    let Some(Some(child_node)) = self.nodes.get(child.index()) else {
                        report.fail(format!("node {} slot {} points at free slot {}", id, slot, child));
                        continue;
                    };
                    if child_node.parent != Some(id) || child_node.parent_slot != slot {
                        report.fail(format!(
                            "node {} records parent {:?} slot {}, expected {} slot {}",
                            child, child_node.parent, child_node.parent_slot, id, slot
                        ));
                    }
                    if let Some(actual) = child_node.compute_mbb() {
                        if !entry.mbb.contains(&actual, tol) {
                            report.fail(format!(
                                "entry box {} in node {} does not cover child {} box {}",
                                entry.mbb, id, child, actual
                            ));
                        }
                    }
                    self.check_node(*child, depth + 1, report);
                }
            }
        }
    }
}
