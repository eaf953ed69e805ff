#![forbid(unsafe_code)]

//! The key-event contract consumed by the navigator.

/// An incoming key press.
///
/// Carries the raw device code and a way to tell the surrounding input
/// system that the engine consumed the press. The engine calls
/// [`stop_propagation`](KeyInput::stop_propagation) whenever a press was
/// acted on, including presses that hit a non-wrapping edge.
pub trait KeyInput {
    /// Raw device key code.
    fn key_code(&self) -> u32;

    /// Suppress further handling of this press by the host.
    fn stop_propagation(&mut self);
}

/// Plain key event that records propagation suppression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyEvent {
    pub code: u32,
    stop_count: u32,
}

impl KeyEvent {
    #[must_use]
    pub const fn new(code: u32) -> Self {
        Self {
            code,
            stop_count: 0,
        }
    }

    /// Whether propagation was stopped at least once.
    #[must_use]
    pub const fn propagation_stopped(&self) -> bool {
        self.stop_count > 0
    }

    /// Number of times propagation was stopped.
    #[must_use]
    pub const fn stop_count(&self) -> u32 {
        self.stop_count
    }
}

impl KeyInput for KeyEvent {
    fn key_code(&self) -> u32 {
        self.code
    }

    fn stop_propagation(&mut self) {
        self.stop_count += 1;
    }
}

/// Key event backed by a caller-supplied suppression callback.
pub struct CallbackKeyEvent<F: FnMut()> {
    code: u32,
    on_stop: F,
}

impl<F: FnMut()> CallbackKeyEvent<F> {
    pub fn new(code: u32, on_stop: F) -> Self {
        Self { code, on_stop }
    }
}

impl<F: FnMut()> KeyInput for CallbackKeyEvent<F> {
    fn key_code(&self) -> u32 {
        self.code
    }

    fn stop_propagation(&mut self) {
        (self.on_stop)();
    }
}

impl<F: FnMut()> std::fmt::Debug for CallbackKeyEvent<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackKeyEvent")
            .field("code", &self.code)
            .finish_non_exhaustive()
    }
}
