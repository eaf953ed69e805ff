#![forbid(unsafe_code)]

//! Node registry for the focus tree.
//!
//! Nodes live in a flat map keyed by their caller-supplied id. Parent/child
//! relationships are id references, so the tree never owns pointers into
//! itself and removal is a plain map operation.
//!
//! # Invariants
//!
//! 1. Node ids are unique and non-empty.
//! 2. Links are symmetric: `b.children` contains `a` iff `a.parent == b`.
//! 3. `children` has no duplicates and keeps first-registration order.
//! 4. `active_child`, when set, names a current child.
//! 5. The parent relation is acyclic.
//! 6. The current focus, when set, names a registered node.
//!
//! # Complexity
//!
//! | Operation | Time |
//! |-----------|------|
//! | register (new) | O(C) for the duplicate-child check |
//! | register (re-parent) | O(D + C) (cycle check + relink) |
//! | unregister | O(S + C) for a subtree of S nodes |
//! | descend | O(D) |
//! | root | O(N) |

use std::collections::HashMap;

use lrud_core::{LrudError, NodeId, Orientation, Result};
use serde_json::{Map, Value};

/// A registered node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    orientation: Option<Orientation>,
    wrapping: Option<bool>,
    grid: Option<bool>,
    active_child: Option<NodeId>,
    data: Map<String, Value>,
    /// Registration sequence number, used to pick the root-most node.
    seq: u64,
}

impl Node {
    fn new(id: &str, seq: u64) -> Self {
        Self {
            id: id.to_owned(),
            parent: None,
            children: Vec::new(),
            orientation: None,
            wrapping: None,
            grid: None,
            active_child: None,
            data: Map::new(),
            seq,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Child ids in first-registration order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }

    #[must_use]
    pub fn is_wrapping(&self) -> bool {
        self.wrapping.unwrap_or(false)
    }

    /// The stored grid flag, `None` if never set.
    #[must_use]
    pub fn grid(&self) -> Option<bool> {
        self.grid
    }

    #[must_use]
    pub fn is_grid(&self) -> bool {
        self.grid.unwrap_or(false)
    }

    #[must_use]
    pub fn active_child(&self) -> Option<&str> {
        self.active_child.as_deref()
    }

    /// Caller metadata attached at registration.
    #[must_use]
    pub fn get_data(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// A node without children is a focusable leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Position of `child` among this node's children.
    #[must_use]
    pub fn index_of(&self, child: &str) -> Option<usize> {
        self.children.iter().position(|c| c == child)
    }

    fn has_child(&self, child: &str) -> bool {
        self.children.iter().any(|c| c == child)
    }
}

/// Attributes supplied at registration.
///
/// Every field is optional. On re-registration only the fields that are set
/// overwrite the stored node; `data` is merged key by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeAttrs {
    pub parent: Option<NodeId>,
    pub orientation: Option<Orientation>,
    pub wrapping: Option<bool>,
    pub grid: Option<bool>,
    pub data: Map<String, Value>,
}

impl NodeAttrs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes for a plain child of `parent`.
    #[must_use]
    pub fn child_of(parent: impl Into<NodeId>) -> Self {
        Self::new().with_parent(parent)
    }

    /// Builder: set the parent.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<NodeId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Builder: set the orientation.
    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    /// Builder: horizontal orientation.
    #[must_use]
    pub fn horizontal(self) -> Self {
        self.with_orientation(Orientation::Horizontal)
    }

    /// Builder: vertical orientation.
    #[must_use]
    pub fn vertical(self) -> Self {
        self.with_orientation(Orientation::Vertical)
    }

    /// Builder: set wrapping.
    #[must_use]
    pub fn with_wrapping(mut self, wrapping: bool) -> Self {
        self.wrapping = Some(wrapping);
        self
    }

    /// Builder: set the grid flag.
    #[must_use]
    pub fn with_grid(mut self, grid: bool) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Builder: attach a metadata entry.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// What an [`FocusTree::unregister`] call removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    /// The removed node followed by its descendants, depth first.
    pub removed: Vec<NodeId>,
    /// The focused leaf, if it was inside the removed subtree.
    pub blurred: Option<NodeId>,
}

/// Registry of nodes plus the current focus.
#[derive(Debug, Default)]
pub struct FocusTree {
    nodes: HashMap<NodeId, Node>,
    current_focus: Option<NodeId>,
    next_seq: u64,
}

impl FocusTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Registration ---

    /// Register `id`, or merge `attrs` into it if it already exists.
    ///
    /// A parent that is not registered yet is created as a bare root so the
    /// link stays symmetric; registering it later fills in its attributes.
    pub fn register(&mut self, id: &str, attrs: NodeAttrs) -> Result<()> {
        if id.is_empty() {
            return Err(LrudError::invalid_argument("node id must not be empty"));
        }
        if let Some(parent) = attrs.parent.as_deref() {
            if parent.is_empty() {
                return Err(LrudError::invalid_argument("parent id must not be empty"));
            }
            if parent == id || self.is_ancestor_of(id, parent) {
                return Err(LrudError::invalid_argument(format!(
                    "parenting '{id}' under '{parent}' would create a cycle"
                )));
            }
        }

        let created = !self.nodes.contains_key(id);
        if created {
            self.insert_bare(id);
        }

        let NodeAttrs {
            parent,
            orientation,
            wrapping,
            grid,
            data,
        } = attrs;

        if let Some(parent) = parent {
            self.link(id, &parent);
        }

        if let Some(node) = self.nodes.get_mut(id) {
            if orientation.is_some() {
                node.orientation = orientation;
            }
            if wrapping.is_some() {
                node.wrapping = wrapping;
            }
            if grid.is_some() {
                node.grid = grid;
            }
            node.data.extend(data);
        }

        tracing::debug!(
            id,
            created,
            parent = self.parent(id).unwrap_or(""),
            "node registered"
        );
        Ok(())
    }

    /// Remove `id` and its whole subtree. `None` if `id` is not registered.
    ///
    /// Clears the parent's active child when it pointed at `id`, and clears
    /// the current focus when it was inside the subtree.
    pub fn unregister(&mut self, id: &str) -> Option<Removal> {
        let parent = self.nodes.get(id)?.parent.clone();
        let removed = self.subtree(id);

        if let Some(parent) = parent {
            self.detach(id, &parent);
        }
        for gone in &removed {
            self.nodes.remove(gone);
        }

        let held_focus = self
            .current_focus
            .as_deref()
            .is_some_and(|focus| removed.iter().any(|r| r == focus));
        let blurred = if held_focus {
            self.current_focus.take()
        } else {
            None
        };

        tracing::debug!(
            id,
            removed = removed.len(),
            blurred = blurred.as_deref().unwrap_or(""),
            "node unregistered"
        );
        Some(Removal { removed, blurred })
    }

    /// Drop every node and the current focus.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.current_focus = None;
        self.next_seq = 0;
    }

    // --- Active children ---

    /// Point `parent`'s active child at `child`.
    ///
    /// Returns `Ok(false)` without changing anything when `child` is not a
    /// current child of `parent`.
    pub fn set_active_child(&mut self, parent: &str, child: &str) -> Result<bool> {
        let node = self
            .nodes
            .get_mut(parent)
            .ok_or_else(|| LrudError::node_not_found(parent))?;
        if !node.has_child(child) {
            return Ok(false);
        }
        node.active_child = Some(child.to_owned());
        Ok(true)
    }

    /// Point `parent`'s active child at `parent.children[index]`.
    ///
    /// Returns `Ok(false)` when `index` is out of range.
    pub fn set_active_index(&mut self, parent: &str, index: usize) -> Result<bool> {
        let child = self
            .nodes
            .get(parent)
            .ok_or_else(|| LrudError::node_not_found(parent))?
            .children
            .get(index)
            .cloned();
        match child {
            Some(child) => self.set_active_child(parent, &child),
            None => Ok(false),
        }
    }

    pub(crate) fn clear_active_child(&mut self, id: &str) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.active_child = None;
        }
    }

    /// Point `parent` at `child` while walking a live parent chain.
    pub(crate) fn mark_active(&mut self, parent: &str, child: &str) {
        if let Some(node) = self.nodes.get_mut(parent) {
            node.active_child = Some(child.to_owned());
        }
    }

    pub(crate) fn set_current_focus(&mut self, id: Option<NodeId>) {
        self.current_focus = id;
    }

    // --- Queries ---

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of registered nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Children of `id`; empty for leaves and unknown ids.
    #[must_use]
    pub fn children(&self, id: &str) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    #[must_use]
    pub fn parent(&self, id: &str) -> Option<&str> {
        self.nodes.get(id)?.parent.as_deref()
    }

    #[must_use]
    pub fn active_child(&self, id: &str) -> Option<&str> {
        self.nodes.get(id)?.active_child.as_deref()
    }

    /// The earliest-registered node without a parent.
    #[must_use]
    pub fn root(&self) -> Option<&str> {
        self.nodes
            .values()
            .filter(|n| n.parent.is_none())
            .min_by_key(|n| n.seq)
            .map(|n| n.id.as_str())
    }

    /// Ancestors of `id`, nearest first. Empty for roots and unknown ids.
    #[must_use]
    pub fn ancestors(&self, id: &str) -> Vec<&str> {
        let mut out = Vec::new();
        let mut cursor = self.parent(id);
        while let Some(parent) = cursor {
            out.push(parent);
            cursor = self.parent(parent);
        }
        out
    }

    /// Whether `ancestor` is a proper ancestor of `id`.
    #[must_use]
    pub fn is_ancestor_of(&self, ancestor: &str, id: &str) -> bool {
        let mut cursor = self.parent(id);
        while let Some(parent) = cursor {
            if parent == ancestor {
                return true;
            }
            cursor = self.parent(parent);
        }
        false
    }

    /// The currently focused leaf.
    #[inline]
    #[must_use]
    pub fn current_focus(&self) -> Option<&str> {
        self.current_focus.as_deref()
    }

    #[must_use]
    pub fn is_focused(&self, id: &str) -> bool {
        self.current_focus.as_deref() == Some(id)
    }

    /// The leaf that focusing `id` would land on.
    ///
    /// Follows active children, falling back to the first child, until it
    /// reaches a node without children.
    #[must_use]
    pub fn descend<'a>(&'a self, id: &'a str) -> Option<&'a str> {
        let mut cursor = self.nodes.get(id)?;
        while let Some(first) = cursor.children.first() {
            let next = cursor
                .active_child
                .as_ref()
                .filter(|c| cursor.has_child(c))
                .unwrap_or(first);
            tracing::trace!(from = %cursor.id, to = %next, "descend");
            cursor = self.nodes.get(next.as_str())?;
        }
        Some(cursor.id.as_str())
    }

    /// Follow active children from the root of the focused subtree.
    ///
    /// Starts at the topmost ancestor of the current focus, or at
    /// [`root`](Self::root) when nothing is focused. The first entry is that
    /// root; after a focus transition the last entry is the focused leaf.
    #[must_use]
    pub fn active_path(&self) -> Vec<&str> {
        let start = match self.current_focus() {
            Some(focus) => self.ancestors(focus).last().copied().unwrap_or(focus),
            None => match self.root() {
                Some(root) => root,
                None => return Vec::new(),
            },
        };
        let mut path = vec![start];
        let mut cursor = start;
        while let Some(next) = self.active_child(cursor) {
            path.push(next);
            cursor = next;
        }
        path
    }

    /// `leaf` and its ancestors that are somebody's child, deepest first.
    ///
    /// These are exactly the nodes reported `active` while `leaf` is focused.
    pub(crate) fn chain(&self, leaf: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = leaf;
        while let Some(parent) = self.parent(cursor) {
            out.push(cursor.to_owned());
            cursor = parent;
        }
        out
    }

    /// Nodes reached by following active children down from `root`,
    /// deepest first. `root` itself is not included.
    pub(crate) fn active_chain(&self, root: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = root;
        while let Some(next) = self.active_child(cursor) {
            out.push(next.to_owned());
            cursor = next;
        }
        out.reverse();
        out
    }

    // --- Internals ---

    fn insert_bare(&mut self, id: &str) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.nodes.insert(id.to_owned(), Node::new(id, seq));
    }

    fn link(&mut self, id: &str, parent: &str) {
        let old = self.nodes.get(id).and_then(|n| n.parent.clone());
        if old.as_deref() == Some(parent) {
            return;
        }
        if let Some(old) = old {
            self.detach(id, &old);
        }
        if !self.nodes.contains_key(parent) {
            self.insert_bare(parent);
        }
        if let Some(p) = self.nodes.get_mut(parent) {
            if !p.has_child(id) {
                p.children.push(id.to_owned());
            }
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = Some(parent.to_owned());
        }
    }

    fn detach(&mut self, id: &str, parent: &str) {
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.retain(|c| c != id);
            if p.active_child.as_deref() == Some(id) {
                p.active_child = None;
            }
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = None;
        }
    }

    fn subtree(&self, id: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id.to_owned()];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.get(&next) {
                stack.extend(node.children.iter().rev().cloned());
            }
            out.push(next);
        }
        out
    }
}

// =========================================================================
// Tests
// =========================================================================
