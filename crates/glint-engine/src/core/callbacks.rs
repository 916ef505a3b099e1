use crate::error::Result;
use crate::input::Event;

use super::context::GraphicsContext;

/// Verdict returned by an event handler.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EventControl {
    /// The caller consumed the event; default handling is skipped.
    Handled,
    /// Default handling still applies (`Quit` stops the loop).
    Unhandled,
}

/// Per-frame render callback. Receives the frame delta in seconds.
pub type RenderFn<P, U> = Box<dyn FnMut(&mut GraphicsContext<P, U>, f32) -> Result<()>>;

/// Event handler callback.
pub type EventHandlerFn<P, U> = Box<dyn FnMut(&mut GraphicsContext<P, U>, &Event) -> EventControl>;

/// Storage for a callback that may replace or clear itself while running.
///
/// The callback is moved out for the duration of the call; `restore` only
/// puts it back when nothing was installed or cleared in the meantime.
pub(crate) enum CallbackSlot<F> {
    Empty,
    Ready(F),
    Running,
}

impl<F> Default for CallbackSlot<F> {
    fn default() -> Self {
        CallbackSlot::Empty
    }
}

impl<F> CallbackSlot<F> {
    pub fn set(&mut self, f: F) {
        *self = CallbackSlot::Ready(f);
    }

    pub fn clear(&mut self) {
        *self = CallbackSlot::Empty;
    }

    pub fn take(&mut self) -> Option<F> {
        match std::mem::replace(self, CallbackSlot::Running) {
            CallbackSlot::Ready(f) => Some(f),
            other => {
                *self = other;
                None
            }
        }
    }

    pub fn restore(&mut self, f: F) {
        if matches!(self, CallbackSlot::Running) {
            *self = CallbackSlot::Ready(f);
        }
    }
}
