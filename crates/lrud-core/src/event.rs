#![forbid(unsafe_code)]

//! Notifications emitted by the focus engine.
//!
//! # Ordering
//!
//! A single focus transition from leaf `O` to leaf `L` emits, in order:
//!
//! 1. `Blur(O)` when `O` differs from `L`.
//! 2. `Inactive` for each node leaving the active path, deepest first.
//! 3. `Active` for each node joining the active path, deepest first.
//! 4. `Focus(L)`.
//!
//! A directional move emits `Move` immediately before that sequence.

use std::fmt;
use std::str::FromStr;

use crate::NodeId;
use crate::direction::Direction;
use crate::error::LrudError;

/// Name of a notification, used to subscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Focus,
    Blur,
    Active,
    Inactive,
    Move,
    Select,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::Focus,
        EventKind::Blur,
        EventKind::Active,
        EventKind::Inactive,
        EventKind::Move,
        EventKind::Select,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Move => "move",
            Self::Select => "select",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = LrudError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| LrudError::invalid_argument(format!("unknown event '{s}'")))
    }
}

/// Payload of a directional move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    /// Leaf focused before the move.
    pub from: NodeId,
    /// Leaf that receives focus.
    pub to: NodeId,
    pub direction: Direction,
    /// Container whose children the move stepped through.
    pub parent: NodeId,
}

/// A notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    Focus { id: NodeId },
    Blur { id: NodeId },
    /// `id` joined the active path.
    Active { id: NodeId },
    /// `id` left the active path.
    Inactive { id: NodeId },
    Move(Move),
    /// The focused leaf was selected (ENTER).
    Select { id: NodeId },
}

impl NavEvent {
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Focus { .. } => EventKind::Focus,
            Self::Blur { .. } => EventKind::Blur,
            Self::Active { .. } => EventKind::Active,
            Self::Inactive { .. } => EventKind::Inactive,
            Self::Move(_) => EventKind::Move,
            Self::Select { .. } => EventKind::Select,
        }
    }

    /// The node the notification is about. For moves, the destination leaf.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Focus { id }
            | Self::Blur { id }
            | Self::Active { id }
            | Self::Inactive { id }
            | Self::Select { id } => id,
            Self::Move(mv) => &mv.to,
        }
    }
}

impl fmt::Display for NavEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move(mv) => write!(
                f,
                "move {} -> {} ({} in {})",
                mv.from, mv.to, mv.direction, mv.parent
            ),
            other => write!(f, "{} {}", other.kind(), other.id()),
        }
    }
}
