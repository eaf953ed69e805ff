#![forbid(unsafe_code)]

//! Synchronous publish/subscribe channel.
//!
//! Handlers run in-line, in subscription order, while the emitting
//! operation is still in progress. Each handler receives the event and a
//! shared view of the emitter's context `C` (the focus tree, for the engine),
//! so it observes the exact intermediate state at the emission point.
//!
//! Handlers cannot reach back into the owner mutably: the owner holds
//! `&mut self` for the whole operation and lends out only `&C`.

use crate::event::{EventKind, NavEvent};

/// Handle returned by [`Emitter::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Subscription<C: ?Sized> {
    id: SubscriptionId,
    kind: EventKind,
    handler: Box<dyn FnMut(&NavEvent, &C)>,
}

/// Ordered list of handlers keyed by event kind.
pub struct Emitter<C: ?Sized> {
    subscriptions: Vec<Subscription<C>>,
    next_id: u64,
}

impl<C: ?Sized> Default for Emitter<C> {
    fn default() -> Self {
        Self {
            subscriptions: Vec::new(),
            next_id: 1,
        }
    }
}

impl<C: ?Sized> std::fmt::Debug for Emitter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl<C: ?Sized> Emitter<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to events of `kind`.
    pub fn on<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&NavEvent, &C) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            kind,
            handler: Box::new(handler),
        });
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|sub| sub.id != id);
        self.subscriptions.len() != before
    }

    /// Deliver `event` to every handler subscribed to its kind.
    pub fn emit(&mut self, event: &NavEvent, ctx: &C) {
        let kind = event.kind();
        tracing::trace!(%event, "emit");
        for sub in self.subscriptions.iter_mut().filter(|s| s.kind == kind) {
            (sub.handler)(event, ctx);
        }
    }

    /// Detach every handler.
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }

    /// Number of handlers subscribed to `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.subscriptions.iter().filter(|s| s.kind == kind).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}
