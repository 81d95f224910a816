//! Parent-indexed tree
//!
//! A forest stored as a flat, pre-order array. Each node keeps the index of
//! its parent (or none for a root); there are no child lists and no back
//! references. Every subtree occupies a contiguous range that starts at its
//! root, so insertion and removal only need to shift parent indices.
//!
//! Author: Moroya Sakamoto

use crate::error::TreeError;

/// Node payload plus the index of its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode<T> {
    pub payload: T,
    pub parent: Option<usize>,
}

impl<T> TreeNode<T> {
    pub fn root(payload: T) -> Self {
        Self {
            payload,
            parent: None,
        }
    }

    pub fn child_of(parent: usize, payload: T) -> Self {
        Self {
            payload,
            parent: Some(parent),
        }
    }
}

/// Flat pre-order forest.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedTree<T> {
    nodes: Vec<TreeNode<T>>,
}

impl<T> Default for IndexedTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IndexedTree<T> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Build from an already flattened node list, checking the layout.
    pub fn from_nodes(nodes: Vec<TreeNode<T>>) -> Result<Self, TreeError> {
        let tree = Self { nodes };
        tree.check()?;
        Ok(tree)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[TreeNode<T>] {
        &self.nodes
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.nodes.get(index).map(|n| &n.payload)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.nodes.get_mut(index).map(|n| &mut n.payload)
    }

    pub fn parent_of(&self, index: usize) -> Option<usize> {
        self.nodes.get(index).and_then(|n| n.parent)
    }

    /// Number of ancestors, found by walking parent indices to the root.
    pub fn depth(&self, index: usize) -> usize {
        let mut depth = 0;
        let mut current = self.parent_of(index);
        while let Some(p) = current {
            depth += 1;
            current = self.parent_of(p);
        }
        depth
    }

    /// True if `ancestor` is on the parent chain of `index`.
    pub fn is_descendant(&self, index: usize, ancestor: usize) -> bool {
        let mut current = self.parent_of(index);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent_of(p);
        }
        false
    }

    /// One past the last index of the subtree rooted at `index`.
    pub fn subtree_end(&self, index: usize) -> usize {
        let mut end = index + 1;
        while end < self.nodes.len() && self.nodes[end].parent.is_some_and(|p| p >= index) {
            end += 1;
        }
        end
    }

    /// Direct children of `index`, in order.
    pub fn children(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, n)| n.parent == Some(index))
            .map(|(i, _)| i)
    }

    /// Append a new root at the end of the forest.
    pub fn push_root(&mut self, payload: T) -> usize {
        self.nodes.push(TreeNode::root(payload));
        self.nodes.len() - 1
    }

    /// Insert a new last child of `parent`, directly after its existing
    /// subtree. Returns the new node's index, or `None` if `parent` does
    /// not exist.
    pub fn insert_child(&mut self, parent: usize, payload: T) -> Option<usize> {
        if parent >= self.nodes.len() {
            return None;
        }
        let at = self.subtree_end(parent);
        for node in &mut self.nodes[at..] {
            if let Some(p) = node.parent.as_mut() {
                if *p >= at {
                    *p += 1;
                }
            }
        }
        self.nodes.insert(at, TreeNode::child_of(parent, payload));
        debug_assert!(self.check().is_ok());
        Some(at)
    }

    /// Remove `index` and its whole subtree, returning the removed payloads
    /// in array order.
    pub fn remove(&mut self, index: usize) -> Vec<T> {
        if index >= self.nodes.len() {
            return Vec::new();
        }
        let end = self.subtree_end(index);
        let removed: Vec<T> = self.nodes.drain(index..end).map(|n| n.payload).collect();
        let count = removed.len();
        for node in &mut self.nodes[index..] {
            if let Some(p) = node.parent.as_mut() {
                if *p >= end {
                    *p -= count;
                }
            }
        }
        debug_assert!(self.check().is_ok());
        removed
    }

    /// Verify the pre-order layout: every parent precedes its child, and
    /// the node just before a child is its parent or one of its parent's
    /// descendants.
    pub fn check(&self) -> Result<(), TreeError> {
        for (node, entry) in self.nodes.iter().enumerate() {
            let Some(parent) = entry.parent else {
                continue;
            };
            let contiguous = node > 0 && (node - 1 == parent || self.is_descendant(node - 1, parent));
            if parent >= node || !contiguous {
                return Err(TreeError::InconsistentIndex { node, parent });
            }
        }
        Ok(())
    }

    /// `(index, depth, payload)` in array order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(move |(i, n)| (i, self.depth(i), &n.payload))
    }
}

// ── Tests ──────────────────────────────────────────────────────────────
