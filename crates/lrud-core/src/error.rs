#![forbid(unsafe_code)]

//! Error taxonomy for the focus engine.
//!
//! Only two conditions abort a tree operation. Anything else that can go
//! "wrong" in steady-state navigation (an edge without wrapping, an unmapped
//! key code, a stale active child) is a silent no-op and never surfaces here.

use crate::NodeId;

/// Errors raised by mutating operations on the focus tree.
///
/// A call that returns an error has not mutated any state and has not
/// emitted any notification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LrudError {
    /// The call was made with an argument that can never be valid, such as
    /// an empty node id or a parent link that would form a cycle.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },
    /// The node the call targets is not registered.
    #[error("node not found: '{id}'")]
    NodeNotFound { id: NodeId },
    /// A configuration document could not be parsed.
    #[error("invalid key configuration: {0}")]
    Config(String),
}

impl LrudError {
    #[must_use]
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn node_not_found(id: impl Into<NodeId>) -> Self {
        Self::NodeNotFound { id: id.into() }
    }
}

/// Result alias used throughout the engine.
pub type Result<T, E = LrudError> = std::result::Result<T, E>;
