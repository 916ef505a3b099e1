//! Input subsystem.
//!
//! Public event types are platform-agnostic. Backends lower their platform
//! events into flat [`NativeEvent`] records; [`translate`] maps those onto
//! [`Event`]s delivered to the event handler.

mod native;
mod state;
mod translate;
mod types;

pub(crate) mod platform;

pub use native::{NativeButton, NativeEvent, NativeKey, NativeKind, NativeMotion, NativeWindow};
pub use state::InputState;
pub use translate::translate;
pub use types::{
    Event,
    Key,
    KeyEvent,
    Modifiers,
    MouseButton,
    MouseButtonEvent,
    MouseButtons,
    MouseMotionEvent,
};
