#![forbid(unsafe_code)]

//! Key-code and key-map configuration.
//!
//! Raw device codes reach the navigator as plain integers. They are
//! translated in two steps: the code table maps a code to a key *name*
//! (`37 -> "LEFT"`), and the key map maps that name to a logical [`Key`]
//! (`"LEFT" -> Key::Left`). Splitting the two lets a platform rename codes
//! without touching the key map, and lets an application remap names
//! without knowing device codes.
//!
//! # Scope
//!
//! - **Process-wide**: the base configuration is shared by every engine in
//!   the process and read at the moment each key event is handled, so
//!   [`set_key_config`] takes effect for all live engines immediately.
//! - **Thread-local overrides**: [`push_override`] layers a configuration on
//!   top of the base for the current thread only. The innermost override
//!   wins. Guards pop on drop, even during unwinding.
//!
//! # Invariants
//!
//! 1. Lookups never fail loudly: an unmapped code or name yields `None`.
//! 2. Override guards restore the previous state when dropped.
//! 3. A poisoned lock is recovered, never propagated as a panic.
//!
//! # Example
//!
//! ```
//! use lrud_core::key_config::{resolve_key, with_key_config_override, KeyConfig};
//! use lrud_core::Key;
//!
//! let remote = KeyConfig::empty()
//!     .with_code(4, "LEFT")
//!     .with_code(5, "RIGHT")
//!     .with_key("LEFT", Key::Left)
//!     .with_key("RIGHT", Key::Right);
//!
//! with_key_config_override(remote, || {
//!     assert_eq!(resolve_key(4), Some(Key::Left));
//!     assert_eq!(resolve_key(37), None);
//! });
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{LazyLock, PoisonError, RwLock};

use crate::direction::Key;

/// Default browser-style key codes.
pub const DEFAULT_KEY_CODES: [(u32, &str); 5] = [
    (13, "ENTER"),
    (37, "LEFT"),
    (38, "UP"),
    (39, "RIGHT"),
    (40, "DOWN"),
];

/// Two-stage mapping from raw key codes to logical keys.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KeyConfig {
    /// Raw device code to key name.
    pub codes: HashMap<u32, String>,
    /// Key name to logical key.
    pub keys: HashMap<String, Key>,
}

impl Default for KeyConfig {
    fn default() -> Self {
        let codes = DEFAULT_KEY_CODES
            .iter()
            .map(|(code, name)| (*code, (*name).to_string()))
            .collect();
        let keys = [Key::Left, Key::Right, Key::Up, Key::Down, Key::Enter]
            .into_iter()
            .map(|key| (key.name().to_string(), key))
            .collect();
        Self { codes, keys }
    }
}

impl KeyConfig {
    /// A configuration that maps nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            codes: HashMap::new(),
            keys: HashMap::new(),
        }
    }

    /// Builder: map a raw code to a key name.
    #[must_use]
    pub fn with_code(mut self, code: u32, name: impl Into<String>) -> Self {
        self.codes.insert(code, name.into());
        self
    }

    /// Builder: map a key name to a logical key.
    #[must_use]
    pub fn with_key(mut self, name: impl Into<String>, key: Key) -> Self {
        self.keys.insert(name.into(), key);
        self
    }

    /// Key name for a raw code.
    #[must_use]
    pub fn name_for(&self, code: u32) -> Option<&str> {
        self.codes.get(&code).map(String::as_str)
    }

    /// Resolve a raw code through both tables.
    #[must_use]
    pub fn resolve(&self, code: u32) -> Option<Key> {
        let name = self.name_for(code)?;
        self.keys.get(name).copied()
    }

    /// Parse a configuration from JSON.
    ///
    /// Missing tables fall back to the defaults, so a document that only
    /// lists `codes` keeps the stock key map.
    ///
    /// ```
    /// # use lrud_core::{Key, KeyConfig};
    /// let cfg = KeyConfig::from_json_str(r#"{ "codes": { "461": "LEFT" } }"#).unwrap();
    /// assert_eq!(cfg.resolve(461), Some(Key::Left));
    /// ```
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|err| crate::LrudError::Config(err.to_string()))
    }

    /// Serialize this configuration to pretty-printed JSON.
    #[cfg(feature = "serde")]
    pub fn to_json_string(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self).map_err(|err| crate::LrudError::Config(err.to_string()))
    }
}

// ============================================================================
// Process-wide configuration
// ============================================================================

static GLOBAL_KEY_CONFIG: LazyLock<RwLock<KeyConfig>> =
    LazyLock::new(|| RwLock::new(KeyConfig::default()));

/// Replace the process-wide configuration.
pub fn set_key_config(config: KeyConfig) {
    let mut global = GLOBAL_KEY_CONFIG
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    *global = config;
    tracing::debug!(
        codes = global.codes.len(),
        keys = global.keys.len(),
        "key config replaced"
    );
}

/// Edit the process-wide configuration in place.
pub fn update_key_config<F>(f: F)
where
    F: FnOnce(&mut KeyConfig),
{
    let mut global = GLOBAL_KEY_CONFIG
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    f(&mut global);
    tracing::debug!(
        codes = global.codes.len(),
        keys = global.keys.len(),
        "key config updated"
    );
}

/// Restore the process-wide configuration to the defaults.
pub fn reset_key_config() {
    set_key_config(KeyConfig::default());
}

/// Snapshot of the effective configuration for this thread.
#[must_use]
pub fn key_config() -> KeyConfig {
    OVERRIDE_STACK.with(|stack| {
        if let Some(top) = stack.borrow().last() {
            return top.clone();
        }
        GLOBAL_KEY_CONFIG
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    })
}

/// Resolve a raw code through the effective configuration.
#[must_use]
pub fn resolve_key(code: u32) -> Option<Key> {
    let key = OVERRIDE_STACK.with(|stack| {
        if let Some(top) = stack.borrow().last() {
            return top.resolve(code);
        }
        GLOBAL_KEY_CONFIG
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .resolve(code)
    });
    tracing::trace!(code, ?key, "key lookup");
    key
}

// ============================================================================
// Thread-local overrides
// ============================================================================

thread_local! {
    /// Stack of active configuration overrides for this thread.
    static OVERRIDE_STACK: RefCell<Vec<KeyConfig>> = const { RefCell::new(Vec::new()) };
}

/// RAII guard that removes an override when dropped.
#[must_use]
pub struct OverrideGuard {
    // Thread-local data: keep the guard on the thread that pushed it.
    _marker: std::marker::PhantomData<*const ()>,
}

impl Drop for OverrideGuard {
    fn drop(&mut self) {
        // An empty stack here means clear_all_overrides() ran first.
        OVERRIDE_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

impl std::fmt::Debug for OverrideGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverrideGuard")
            .field("depth", &override_depth())
            .finish()
    }
}

/// Push an override onto this thread's stack.
pub fn push_override(config: KeyConfig) -> OverrideGuard {
    OVERRIDE_STACK.with(|stack| {
        stack.borrow_mut().push(config);
    });
    OverrideGuard {
        _marker: std::marker::PhantomData,
    }
}

/// Run `f` with `config` as this thread's effective configuration.
pub fn with_key_config_override<F, R>(config: KeyConfig, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = push_override(config);
    f()
}

/// Whether this thread has any override active.
#[must_use]
pub fn has_active_overrides() -> bool {
    OVERRIDE_STACK.with(|stack| !stack.borrow().is_empty())
}

/// Number of overrides active on this thread.
#[must_use]
pub fn override_depth() -> usize {
    OVERRIDE_STACK.with(|stack| stack.borrow().len())
}

/// Drop every override on this thread, bypassing the guards.
///
/// Intended for test harness cleanup only.
pub fn clear_all_overrides() {
    OVERRIDE_STACK.with(|stack| {
        stack.borrow_mut().clear();
    });
}
