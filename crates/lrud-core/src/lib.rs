#![forbid(unsafe_code)]

//! Core: directions, key configuration, notifications, and errors.
//!
//! # Role in LRUD
//! `lrud-core` is the input layer. It owns the vocabulary the focus engine
//! speaks: logical [`Direction`]s and [`Key`]s, the process-wide key-code
//! configuration that turns raw device codes into keys, the [`KeyInput`]
//! contract for incoming key events, the notification types emitted on focus
//! changes, and the synchronous [`Emitter`] that delivers them.
//!
//! # How it fits in the system
//! The `lrud` crate builds the focus tree and the navigation algorithm on top
//! of these types. Nothing here knows about the tree, so front ends that only
//! need to translate device input can depend on this crate alone.

pub mod direction;
pub mod emitter;
pub mod error;
pub mod event;
pub mod key_config;
pub mod key_event;

pub use direction::{Direction, Key, Orientation};
pub use emitter::{Emitter, SubscriptionId};
pub use error::{LrudError, Result};
pub use event::{EventKind, Move, NavEvent};
pub use key_config::KeyConfig;
pub use key_event::{CallbackKeyEvent, KeyEvent, KeyInput};

/// Identifier of a node in the focus tree. Caller supplied, never generated.
pub type NodeId = String;
