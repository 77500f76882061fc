//! Height-balanced (AVL) binary search tree indexing stems.
//!
//! Nodes live in an arena and point at their children through [`NodeId`]
//! handles, so a node keeps its handle through every rotation and through the
//! removal of any other node. Insertion and removal recurse down the search
//! path and hand back the new subtree root for the caller to reattach; every
//! node on the way back up is rebalanced.

use crate::models::{NodeId, StemNode};
use std::cmp::Ordering;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Stem already present: {0}")]
    DuplicateKey(String),
    #[error("Stem not found: {0}")]
    NotFound(String),
    #[error("Tree invariant violated: {0}")]
    Invariant(String),
}

/// AVL tree of [`StemNode`]s keyed by stem text.
///
/// Nodes are only handed out mutably inside the crate, so a stem cannot be
/// rewritten in place behind the tree's ordering:
///
/// ```compile_fail
/// let mut tree = synodict::tree::StemTree::new();
/// let id = tree.insert("run").unwrap();
/// tree.get_mut(id).unwrap().stem.push('s');
/// ```
#[derive(Debug, Clone, Default)]
pub struct StemTree {
    nodes: Vec<Option<StemNode>>,
    free: Vec<usize>,
    root: Option<NodeId>,
    len: usize,
}

impl StemTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stems in the tree
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Height of the whole tree (-1 when empty).
    pub fn height(&self) -> i32 {
        self.height_of(self.root)
    }

    pub fn get(&self, id: NodeId) -> Option<&StemNode> {
        self.nodes.get(id.0).and_then(|slot| slot.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut StemNode> {
        self.nodes.get_mut(id.0).and_then(|slot| slot.as_mut())
    }

    pub fn stem(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|node| node.stem.as_str())
    }

    /// Locate the node holding `stem`.
    pub fn find(&self, stem: &str) -> Option<NodeId> {
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.node(id);
            current = match stem.cmp(node.stem.as_str()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    pub fn contains(&self, stem: &str) -> bool {
        self.find(stem).is_some()
    }

    /// Insert a new leaf for `stem` and rebalance the path back to the root.
    pub fn insert(&mut self, stem: &str) -> Result<NodeId, TreeError> {
        if self.contains(stem) {
            return Err(TreeError::DuplicateKey(stem.to_string()));
        }

        let id = self.alloc(StemNode::new(stem));
        let root = self.root;
        self.root = Some(self.insert_at(root, id));
        self.len += 1;

        debug!(stem, node = id.0, height = self.height(), "inserted stem");
        Ok(id)
    }

    fn insert_at(&mut self, subtree: Option<NodeId>, new: NodeId) -> NodeId {
        let Some(id) = subtree else {
            return new;
        };

        if self.node(new).stem < self.node(id).stem {
            let left = self.node(id).left;
            let child = self.insert_at(left, new);
            self.node_mut(id).left = Some(child);
        } else {
            let right = self.node(id).right;
            let child = self.insert_at(right, new);
            self.node_mut(id).right = Some(child);
        }

        self.rebalance(id)
    }

    /// Remove `stem` and return its node, detached from the tree.
    ///
    /// A node with two children is replaced by its in-order successor: the
    /// successor node itself is moved into the vacated position, so no handle
    /// ever changes the stem it refers to.
    pub fn remove(&mut self, stem: &str) -> Result<StemNode, TreeError> {
        let target = self
            .find(stem)
            .ok_or_else(|| TreeError::NotFound(stem.to_string()))?;

        if let Some(root) = self.root {
            self.root = self.remove_at(root, stem);
        }

        let mut node = self.nodes[target.0]
            .take()
            .ok_or_else(|| TreeError::Invariant(format!("slot {} already free", target.0)))?;
        self.free.push(target.0);
        self.len -= 1;

        node.left = None;
        node.right = None;
        node.height = 0;

        debug!(stem, node = target.0, height = self.height(), "removed stem");
        Ok(node)
    }

    fn remove_at(&mut self, id: NodeId, stem: &str) -> Option<NodeId> {
        let (left, right) = self.children(id);

        match stem.cmp(self.node(id).stem.as_str()) {
            Ordering::Less => {
                let child = left.and_then(|l| self.remove_at(l, stem));
                self.node_mut(id).left = child;
            }
            Ordering::Greater => {
                let child = right.and_then(|r| self.remove_at(r, stem));
                self.node_mut(id).right = child;
            }
            Ordering::Equal => {
                return match (left, right) {
                    (None, None) => None,
                    (Some(child), None) | (None, Some(child)) => Some(child),
                    (Some(l), Some(r)) => {
                        let (rest, successor) = self.detach_min(r);
                        let node = self.node_mut(successor);
                        node.left = Some(l);
                        node.right = rest;
                        Some(self.rebalance(successor))
                    }
                };
            }
        }

        Some(self.rebalance(id))
    }

    /// Unlink the minimum of the subtree at `id`.
    /// Returns (remaining subtree, detached minimum).
    fn detach_min(&mut self, id: NodeId) -> (Option<NodeId>, NodeId) {
        match self.node(id).left {
            None => (self.node(id).right, id),
            Some(left) => {
                let (rest, min) = self.detach_min(left);
                self.node_mut(id).left = rest;
                (Some(self.rebalance(id)), min)
            }
        }
    }

    /// Restore the AVL condition at `id` and return the subtree's new root.
    fn rebalance(&mut self, id: NodeId) -> NodeId {
        let (left, right) = self.children(id);
        let balance = self.height_of(left) - self.height_of(right);

        if balance > 1 {
            if left.is_some_and(|l| self.leans_right(l)) {
                self.double_with_left_child(id)
            } else {
                self.rotate_with_left_child(id)
            }
        } else if balance < -1 {
            if right.is_some_and(|r| self.leans_left(r)) {
                self.double_with_right_child(id)
            } else {
                self.rotate_with_right_child(id)
            }
        } else {
            self.update_height(id);
            id
        }
    }

    /// Single rotation lifting the left child (left-left case).
    fn rotate_with_left_child(&mut self, k2: NodeId) -> NodeId {
        let Some(k1) = self.node(k2).left else {
            return k2;
        };
        trace!(pivot = %self.node(k2).stem, "rotate with left child");

        let inner = self.node(k1).right;
        self.node_mut(k2).left = inner;
        self.node_mut(k1).right = Some(k2);
        self.update_height(k2);
        self.update_height(k1);
        k1
    }

    /// Single rotation lifting the right child (right-right case).
    fn rotate_with_right_child(&mut self, k1: NodeId) -> NodeId {
        let Some(k2) = self.node(k1).right else {
            return k1;
        };
        trace!(pivot = %self.node(k1).stem, "rotate with right child");

        let inner = self.node(k2).left;
        self.node_mut(k1).right = inner;
        self.node_mut(k2).left = Some(k1);
        self.update_height(k1);
        self.update_height(k2);
        k2
    }

    /// Left-right case.
    fn double_with_left_child(&mut self, k3: NodeId) -> NodeId {
        if let Some(left) = self.node(k3).left {
            let lifted = self.rotate_with_right_child(left);
            self.node_mut(k3).left = Some(lifted);
        }
        self.rotate_with_left_child(k3)
    }

    /// Right-left case.
    fn double_with_right_child(&mut self, k1: NodeId) -> NodeId {
        if let Some(right) = self.node(k1).right {
            let lifted = self.rotate_with_left_child(right);
            self.node_mut(k1).right = Some(lifted);
        }
        self.rotate_with_right_child(k1)
    }

    fn leans_left(&self, id: NodeId) -> bool {
        let (left, right) = self.children(id);
        self.height_of(left) > self.height_of(right)
    }

    fn leans_right(&self, id: NodeId) -> bool {
        let (left, right) = self.children(id);
        self.height_of(left) < self.height_of(right)
    }

    fn update_height(&mut self, id: NodeId) {
        let (left, right) = self.children(id);
        let height = 1 + self.height_of(left).max(self.height_of(right));
        self.node_mut(id).height = height;
    }

    #[inline]
    fn height_of(&self, id: Option<NodeId>) -> i32 {
        id.map_or(-1, |id| self.node(id).height)
    }

    #[inline]
    fn children(&self, id: NodeId) -> (Option<NodeId>, Option<NodeId>) {
        let node = self.node(id);
        (node.left, node.right)
    }

    fn alloc(&mut self, node: StemNode) -> NodeId {
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                NodeId(slot)
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    // Handles reachable from `root` always name live slots.
    fn node(&self, id: NodeId) -> &StemNode {
        self.nodes[id.0].as_ref().expect("stale node handle")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut StemNode {
        self.nodes[id.0].as_mut().expect("stale node handle")
    }

    /// Root, then left subtree, then right subtree.
    pub fn pre_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.len);
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();

        while let Some(id) = stack.pop() {
            out.push(id);
            let (left, right) = self.children(id);
            stack.extend(right);
            stack.extend(left);
        }

        out
    }

    /// Nodes in increasing stem order.
    pub fn in_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.len);
        let mut stack = Vec::new();
        let mut current = self.root;

        while current.is_some() || !stack.is_empty() {
            while let Some(id) = current {
                stack.push(id);
                current = self.node(id).left;
            }
            if let Some(id) = stack.pop() {
                out.push(id);
                current = self.node(id).right;
            }
        }

        out
    }

    /// All stems in increasing order.
    pub fn stems(&self) -> Vec<&str> {
        self.in_order()
            .into_iter()
            .map(|id| self.node(id).stem.as_str())
            .collect()
    }

    /// Verify ordering, cached heights, balance and the node count.
    pub fn check_invariants(&self) -> Result<(), TreeError> {
        let stems = self.stems();
        if let Some(pair) = stems.windows(2).find(|w| w[0] >= w[1]) {
            return Err(TreeError::Invariant(format!(
                "in-order stems out of order: {:?} before {:?}",
                pair[0], pair[1]
            )));
        }
        if stems.len() != self.len {
            return Err(TreeError::Invariant(format!(
                "reachable nodes {} != count {}",
                stems.len(),
                self.len
            )));
        }
        let live = self.nodes.iter().filter(|slot| slot.is_some()).count();
        if live != self.len {
            return Err(TreeError::Invariant(format!(
                "live slots {} != count {}",
                live, self.len
            )));
        }
        self.check_subtree(self.root).map(|_| ())
    }

    fn check_subtree(&self, id: Option<NodeId>) -> Result<i32, TreeError> {
        let Some(id) = id else {
            return Ok(-1);
        };
        let node = self.node(id);
        let left = self.check_subtree(node.left)?;
        let right = self.check_subtree(node.right)?;

        if node.height != 1 + left.max(right) {
            return Err(TreeError::Invariant(format!(
                "stale height {} at {:?} (expected {})",
                node.height,
                node.stem,
                1 + left.max(right)
            )));
        }
        if (left - right).abs() > 1 {
            return Err(TreeError::Invariant(format!(
                "unbalanced at {:?}: left {} right {}",
                node.stem, left, right
            )));
        }
        Ok(node.height)
    }
}
