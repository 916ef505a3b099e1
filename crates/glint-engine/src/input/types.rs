use std::fmt;

use bitflags::bitflags;

/// Layout-dependent key identifier (the "keycode").
///
/// Keys not represented here map to `Key::Unknown` with a stable platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    // Common control keys
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Modifiers as keys
    Shift,
    Control,
    Alt,
    Meta,

    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Digits
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    // Function keys
    F1, F2, F3, F4, F5, F6,
    F7, F8, F9, F10, F11, F12,

    /// Platform-dependent key not yet represented here.
    Unknown(u32),
}

impl Default for Key {
    fn default() -> Self {
        Key::Unknown(0)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

bitflags! {
    /// Set of currently held mouse buttons.
    #[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
    pub struct MouseButtons: u32 {
        const LEFT    = 1 << 0;
        const MIDDLE  = 1 << 1;
        const RIGHT   = 1 << 2;
        const BACK    = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

impl MouseButtons {
    /// Mask bit for `button`; `Other` buttons are not tracked in the mask.
    pub fn from_button(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => MouseButtons::LEFT,
            MouseButton::Middle => MouseButtons::MIDDLE,
            MouseButton::Right => MouseButtons::RIGHT,
            MouseButton::Back => MouseButtons::BACK,
            MouseButton::Forward => MouseButtons::FORWARD,
            MouseButton::Other(_) => MouseButtons::empty(),
        }
    }
}

/// Modifier keys state.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Key press or release.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct KeyEvent {
    /// Platform scancode of the physical key.
    pub scancode: u32,
    pub keycode: Key,
    pub modifiers: Modifiers,
}

/// Pointer motion in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MouseMotionEvent {
    pub x: f32,
    pub y: f32,
    /// Motion relative to the previous pointer position.
    pub xrel: f32,
    pub yrel: f32,
    pub buttons: MouseButtons,
}

/// Mouse button press or release.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MouseButtonEvent {
    pub button: MouseButton,
    pub x: f32,
    pub y: f32,
    /// 1 for a single click, 2 for a double click, and so on.
    pub clicks: u8,
}

/// Events delivered to the event handler.
///
/// Produced fresh each poll; not retained by the context.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Event {
    Quit,
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
    MouseMotion(MouseMotionEvent),
    MouseButtonDown(MouseButtonEvent),
    MouseButtonUp(MouseButtonEvent),
    WindowResized { width: u32, height: u32 },
}
