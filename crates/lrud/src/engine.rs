#![forbid(unsafe_code)]

//! Focus engine coordinating the tree, focus transitions, and notifications.

use lrud_core::key_config;
use lrud_core::{
    Direction, Emitter, EventKind, KeyInput, LrudError, Move, NavEvent, NodeId, Result,
    SubscriptionId,
};

use crate::navigator::{self, KeyOutcome, Step};
use crate::tree::{FocusTree, Node, NodeAttrs};

/// Central focus coordinator.
///
/// Owns the node registry and the notification channel. Every operation
/// runs to completion before returning and emits its notifications in-line;
/// handlers receive a shared view of the tree as it is at the emission
/// point.
#[derive(Debug, Default)]
pub struct Lrud {
    tree: FocusTree,
    emitter: Emitter<FocusTree>,
}

impl Lrud {
    /// Create an engine with an empty tree and no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the node registry.
    #[must_use]
    pub fn tree(&self) -> &FocusTree {
        &self.tree
    }

    /// The currently focused leaf.
    #[inline]
    #[must_use]
    pub fn current_focus(&self) -> Option<&str> {
        self.tree.current_focus()
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.tree.node(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.tree.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    #[must_use]
    pub fn is_focused(&self, id: &str) -> bool {
        self.tree.is_focused(id)
    }

    /// Ids from the root down to the focused leaf.
    #[must_use]
    pub fn active_path(&self) -> Vec<&str> {
        self.tree.active_path()
    }

    // --- Subscriptions ---

    /// Subscribe to notifications of `kind`.
    pub fn on<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&NavEvent, &FocusTree) + 'static,
    {
        self.emitter.on(kind, handler)
    }

    /// Remove a subscription.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        self.emitter.off(id)
    }

    // --- Registry ---

    /// Register a node, or merge attributes into an existing one.
    pub fn register(&mut self, id: &str, attrs: NodeAttrs) -> Result<()> {
        self.tree.register(id, attrs)
    }

    /// Remove a node and its subtree.
    ///
    /// Returns `false` if `id` was not registered. Emits `blur` for the
    /// focused leaf if it was inside the removed subtree.
    pub fn unregister(&mut self, id: &str) -> bool {
        let Some(removal) = self.tree.unregister(id) else {
            return false;
        };
        if let Some(prev) = removal.blurred {
            self.emit(NavEvent::Blur { id: prev });
        }
        true
    }

    /// Reset to an empty tree and detach every subscriber.
    ///
    /// Emits nothing.
    pub fn destroy(&mut self) {
        self.tree.clear();
        self.emitter.clear();
        tracing::debug!("engine destroyed");
    }

    // --- Active children ---

    /// Point `parent`'s active child at `child`.
    ///
    /// Unknown `parent` is an error; a `child` that is not one of its
    /// children is ignored (`Ok(false)`).
    pub fn set_active_child(&mut self, parent: &str, child: &str) -> Result<bool> {
        self.tree.set_active_child(parent, child)
    }

    /// Point `parent`'s active child at the child at `index`.
    pub fn set_active_index(&mut self, parent: &str, index: usize) -> Result<bool> {
        self.tree.set_active_index(parent, index)
    }

    // --- Focus ---

    /// Focus `id`, or refresh the current focus, or focus the root.
    ///
    /// The target is drilled down to a leaf through active children (first
    /// child when unset). Returns the leaf that received focus, or `None`
    /// when no id was given and the tree is empty.
    ///
    /// # Errors
    ///
    /// [`LrudError::NodeNotFound`] if `id` is not registered. Nothing is
    /// mutated or emitted in that case.
    pub fn focus(&mut self, id: Option<&str>) -> Result<Option<NodeId>> {
        let target = match id {
            Some(id) => id,
            None => match self.tree.current_focus().or_else(|| self.tree.root()) {
                Some(fallback) => fallback,
                None => return Ok(None),
            },
        };
        let leaf = self
            .tree
            .descend(target)
            .ok_or_else(|| LrudError::node_not_found(target))?
            .to_owned();
        self.transition(&leaf);
        Ok(Some(leaf))
    }

    /// Emit `blur` for `id`, or for the current focus.
    ///
    /// Observational only: the current focus is left in place. Returns the
    /// id the notification was emitted for.
    pub fn blur(&mut self, id: Option<&str>) -> Option<NodeId> {
        let target = id.or_else(|| self.tree.current_focus())?.to_owned();
        self.emit(NavEvent::Blur { id: target.clone() });
        Some(target)
    }

    // --- Input ---

    /// Translate a key press and act on it.
    ///
    /// The raw code is resolved through the process-wide key configuration
    /// at call time. Propagation is stopped for directional presses that were
    /// consumed, including at a non-wrapping edge. ENTER only emits `select`
    /// and leaves the press to the host.
    pub fn handle_key_event<E>(&mut self, event: &mut E) -> KeyOutcome
    where
        E: KeyInput + ?Sized,
    {
        let code = event.key_code();
        let _span = tracing::debug_span!("key", code).entered();

        let Some(key) = key_config::resolve_key(code) else {
            return KeyOutcome::Unhandled;
        };
        let outcome = match key.direction() {
            Some(direction) => self.navigate(direction),
            None => self.select(),
        };
        if outcome.is_consumed() {
            event.stop_propagation();
        }
        outcome
    }

    /// Move focus one step in `direction`.
    pub fn navigate(&mut self, direction: Direction) -> KeyOutcome {
        let Some(from) = self.tree.current_focus().map(str::to_owned) else {
            return KeyOutcome::Unhandled;
        };

        match navigator::resolve(&self.tree, &from, direction) {
            Step::NoMatch => KeyOutcome::Unhandled,
            Step::Edge { container } => {
                tracing::debug!(%from, %direction, %container, "edge");
                KeyOutcome::Edge { container }
            }
            Step::Target { container, target } => {
                let Some(to) = self.tree.descend(&target).map(str::to_owned) else {
                    return KeyOutcome::Edge { container };
                };
                tracing::debug!(%from, %to, %direction, %container, "move");
                self.emit(NavEvent::Move(Move {
                    from: from.clone(),
                    to: to.clone(),
                    direction,
                    parent: container,
                }));
                self.transition(&to);
                KeyOutcome::Moved { from, to }
            }
        }
    }

    /// Emit `select` for the focused leaf.
    pub fn select(&mut self) -> KeyOutcome {
        let Some(id) = self.tree.current_focus().map(str::to_owned) else {
            return KeyOutcome::Unhandled;
        };
        self.emit(NavEvent::Select { id: id.clone() });
        KeyOutcome::Selected { id }
    }

    // --- Internals ---

    /// Move the focus to `leaf`, maintaining active children and emitting
    /// `blur`, `inactive`, `active`, `focus` in that order.
    fn transition(&mut self, leaf: &str) {
        let old_leaf = self.tree.current_focus().map(str::to_owned);
        let new_root = self.topmost(leaf);
        // Without a focused leaf (e.g. after it was unregistered) the old path
        // is whatever the active children under the new root still point at.
        let old_chain = match old_leaf.as_deref() {
            Some(old) => self.tree.chain(old),
            None => self.tree.active_chain(&new_root),
        };
        let new_chain = self.tree.chain(leaf);

        tracing::debug!(
            from = old_leaf.as_deref().unwrap_or(""),
            to = leaf,
            "focus transition"
        );

        if let Some(old) = old_leaf.as_deref().filter(|old| *old != leaf) {
            self.emit(NavEvent::Blur { id: old.to_owned() });
        }

        // A focus change across separate roots leaves the old root pointing
        // into a subtree that is no longer active.
        if let Some(old) = old_leaf.as_deref() {
            let old_root = self.topmost(old);
            if old_root != new_root {
                self.tree.clear_active_child(&old_root);
            }
        }

        for stale in old_chain.iter().filter(|id| !new_chain.contains(id)) {
            self.tree.clear_active_child(stale);
            self.emit(NavEvent::Inactive { id: stale.clone() });
        }

        self.tree.set_current_focus(Some(leaf.to_owned()));
        for child in &new_chain {
            if let Some(parent) = self.tree.parent(child).map(str::to_owned) {
                self.tree.mark_active(&parent, child);
            }
        }

        for fresh in new_chain.iter().filter(|id| !old_chain.contains(id)) {
            self.emit(NavEvent::Active { id: fresh.clone() });
        }
        self.emit(NavEvent::Focus { id: leaf.to_owned() });
    }

    fn topmost(&self, id: &str) -> NodeId {
        self.tree
            .ancestors(id)
            .last()
            .copied()
            .unwrap_or(id)
            .to_owned()
    }

    fn emit(&mut self, event: NavEvent) {
        self.emitter.emit(&event, &self.tree);
    }
}

// =========================================================================
// Tests
// =========================================================================
