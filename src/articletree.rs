//! Live, threaded, filtered projection over the article store.
//!
//! The original keeps raw parent pointers between heap-allocated node
//! objects (`pan::ArticleTree`, built from `gui/header-pane.cc`'s
//! threading logic). Re-architected per the redesign note on cyclic
//! parent back-references: nodes live in a single arena `Vec`, addressed
//! by a stable [`NodeIndex`], with parent links as `Option<NodeIndex>` and
//! children discovered through a secondary index instead of intrusive
//! sibling pointers.

use crate::quark::Quark;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIndex(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowType {
    Articles,
    Threads,
    SubThreads,
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub message_id: Quark,
    pub parent: Option<NodeIndex>,
    pub date: i64,
    pub is_read: bool,
    pub score: i32,
    pub part_complete: bool,
}

/// Incremental change set emitted after a store mutation is folded into
/// the tree. `added`/`reparented` carry the new/old parent Message-IDs
/// rather than indices, since indices are an internal arena detail.
#[derive(Debug, Clone, Default)]
pub struct Diffs {
    pub added: HashMap<Quark, Option<Quark>>,
    pub reparented: HashMap<Quark, (Option<Quark>, Option<Quark>)>,
    pub removed: HashSet<Quark>,
    pub changed: HashSet<Quark>,
}

impl Diffs {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.reparented.is_empty()
            && self.removed.is_empty()
            && self.changed.is_empty()
    }
}

pub struct ArticleTree {
    nodes: Vec<TreeNode>,
    index_of: HashMap<Quark, NodeIndex>,
    children_of: HashMap<Option<NodeIndex>, Vec<NodeIndex>>,
    show_type: ShowType,
}

impl ArticleTree {
    pub fn new(show_type: ShowType) -> Self {
        ArticleTree {
            nodes: Vec::new(),
            index_of: HashMap::new(),
            children_of: HashMap::new(),
            show_type,
        }
    }

    pub fn show_type(&self) -> ShowType {
        self.show_type
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, idx: NodeIndex) -> &TreeNode {
        &self.nodes[idx.0]
    }

    pub fn find(&self, message_id: &Quark) -> Option<&TreeNode> {
        self.index_of.get(message_id).map(|&i| self.node(i))
    }

    fn parent_message_id(&self, parent: Option<NodeIndex>) -> Option<Quark> {
        parent.map(|p| self.node(p).message_id.clone())
    }

    /// Insert a new node under `parent_mid` (`None` for a root), recording
    /// it in `diffs.added`. Returns the new node's index.
    pub fn insert(
        &mut self,
        message_id: Quark,
        parent_mid: Option<&Quark>,
        date: i64,
        diffs: &mut Diffs,
    ) -> NodeIndex {
        let parent = parent_mid.and_then(|mid| self.index_of.get(mid).copied());
        let idx = NodeIndex(self.nodes.len());
        self.nodes.push(TreeNode {
            message_id: message_id.clone(),
            parent,
            date,
            is_read: false,
            score: 0,
            part_complete: true,
        });
        self.index_of.insert(message_id.clone(), idx);
        self.children_of.entry(parent).or_default().push(idx);
        diffs
            .added
            .insert(message_id, self.parent_message_id(parent));
        idx
    }

    /// Remove `message_id` and reparent its children to its nearest
    /// surviving ancestor (its own parent, since only one level is
    /// removed at a time).
    pub fn remove(&mut self, message_id: &Quark, diffs: &mut Diffs) {
        let Some(&idx) = self.index_of.get(message_id) else {
            return;
        };
        let parent = self.node(idx).parent;
        let orphans = self.children_of.remove(&Some(idx)).unwrap_or_default();

        for child_idx in &orphans {
            let old_parent = Some(message_id.clone());
            let new_parent = self.parent_message_id(parent);
            self.nodes[child_idx.0].parent = parent;
            self.children_of.entry(parent).or_default().push(*child_idx);
            let child_mid = self.nodes[child_idx.0].message_id.clone();
            diffs
                .reparented
                .insert(child_mid, (old_parent, new_parent));
        }

        if let Some(siblings) = self.children_of.get_mut(&parent) {
            siblings.retain(|&i| i != idx);
        }
        self.index_of.remove(message_id);
        diffs.removed.insert(message_id.clone());
    }

    pub fn mark_changed(&mut self, message_id: &Quark, diffs: &mut Diffs) {
        if self.index_of.contains_key(message_id) {
            diffs.changed.insert(message_id.clone());
        }
    }

    /// Roots ordered by `root_cmp` (e.g. by date, descending); every
    /// non-root level is always ordered by ascending date regardless of
    /// the roots' sort order, per the ordering discipline. When threading
    /// is off (`ShowType::Articles`), everything is flattened to roots.
    pub fn ordered(&self, root_cmp: impl Fn(&TreeNode, &TreeNode) -> std::cmp::Ordering) -> Vec<NodeIndex> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let roots_key: Option<NodeIndex> = None;

        if self.show_type == ShowType::Articles {
            let mut all: Vec<NodeIndex> = (0..self.nodes.len()).map(NodeIndex).collect();
            all.sort_by(|a, b| root_cmp(self.node(*a), self.node(*b)));
            return all;
        }

        let mut roots = self.children_of.get(&roots_key).cloned().unwrap_or_default();
        roots.sort_by(|a, b| root_cmp(self.node(*a), self.node(*b)));
        for root in roots {
            self.push_subtree(root, &mut out);
        }
        out
    }

    fn push_subtree(&self, idx: NodeIndex, out: &mut Vec<NodeIndex>) {
        out.push(idx);
        let mut children = self.children_of.get(&Some(idx)).cloned().unwrap_or_default();
        children.sort_by_key(|&c| self.node(c).date);
        for child in children {
            self.push_subtree(child, out);
        }
    }
}
