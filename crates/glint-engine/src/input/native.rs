use super::types::{Key, Modifiers, MouseButton, MouseButtons};

/// Kind tag of a native event record.
///
/// Several kinds are produced by the platform but have no `Event` mapping.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum NativeKind {
    Quit,
    KeyDown,
    KeyUp,
    MouseMotion,
    MouseButtonDown,
    MouseButtonUp,
    MouseWheel,
    TextInput,
    WindowResized,
    WindowMoved,
    WindowFocus,
    /// A platform event with no dedicated kind.
    #[default]
    Unknown,
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct NativeKey {
    pub scancode: u32,
    pub keycode: Key,
    pub modifiers: Modifiers,
    pub repeat: bool,
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct NativeMotion {
    pub x: f32,
    pub y: f32,
    pub xrel: f32,
    pub yrel: f32,
    pub state: MouseButtons,
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct NativeButton {
    pub button: MouseButton,
    pub x: f32,
    pub y: f32,
    pub clicks: u8,
}

/// Window payload. Meaning of `data1`/`data2` depends on the kind
/// (size for resize, position for move, focus flag in `data1` for focus).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct NativeWindow {
    pub data1: i32,
    pub data2: i32,
}

/// Flat native event record as queued by a [`Platform`](crate::window::Platform).
///
/// Only the payload matching `kind` is meaningful; the others stay default.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct NativeEvent {
    pub kind: NativeKind,
    /// Milliseconds since the platform was initialized.
    pub timestamp: u32,
    pub key: NativeKey,
    pub motion: NativeMotion,
    pub button: NativeButton,
    pub window: NativeWindow,
}

impl NativeEvent {
    pub fn new(kind: NativeKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn key(kind: NativeKind, key: NativeKey) -> Self {
        Self {
            kind,
            key,
            ..Self::default()
        }
    }

    pub fn motion(motion: NativeMotion) -> Self {
        Self {
            kind: NativeKind::MouseMotion,
            motion,
            ..Self::default()
        }
    }

    pub fn button(kind: NativeKind, button: NativeButton) -> Self {
        Self {
            kind,
            button,
            ..Self::default()
        }
    }

    pub fn window(kind: NativeKind, data1: i32, data2: i32) -> Self {
        Self {
            kind,
            window: NativeWindow { data1, data2 },
            ..Self::default()
        }
    }
}
