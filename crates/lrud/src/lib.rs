#![forbid(unsafe_code)]

//! Spatial focus engine for Left/Right/Up/Down navigation.
//!
//! # Role in LRUD
//! `lrud` owns the focus tree and everything that moves focus through it:
//! node registration, active-child bookkeeping, the focus resolver that
//! drills a target down to a leaf, and the directional navigator with its
//! list, grid, wrap, and edge rules. [`Lrud`] ties these together and emits
//! [`NavEvent`]s to subscribers as focus changes.
//!
//! # Example
//!
//! ```
//! use lrud::{KeyEvent, KeyOutcome, Lrud, NodeAttrs};
//!
//! let mut nav = Lrud::new();
//! nav.register("list", NodeAttrs::new().horizontal()).unwrap();
//! nav.register("a", NodeAttrs::child_of("list")).unwrap();
//! nav.register("b", NodeAttrs::child_of("list")).unwrap();
//!
//! nav.focus(None).unwrap();
//! assert_eq!(nav.current_focus(), Some("a"));
//!
//! let mut right = KeyEvent::new(39);
//! let outcome = nav.handle_key_event(&mut right);
//! assert!(matches!(outcome, KeyOutcome::Moved { .. }));
//! assert_eq!(nav.current_focus(), Some("b"));
//! assert!(right.propagation_stopped());
//! ```

pub mod engine;
pub mod navigator;
pub mod tree;

pub use engine::Lrud;
pub use navigator::KeyOutcome;
pub use tree::{FocusTree, Node, NodeAttrs, Removal};

pub use lrud_core::key_config;
pub use lrud_core::{
    CallbackKeyEvent, Direction, Emitter, EventKind, Key, KeyConfig, KeyEvent, KeyInput,
    LrudError, Move, NavEvent, NodeId, Orientation, Result, SubscriptionId,
};
