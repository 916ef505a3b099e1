use std::time::Instant;

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};
use winit::keyboard::{Key as LogicalKey, KeyCode, ModifiersState, NamedKey, PhysicalKey};
use winit::platform::scancode::PhysicalKeyExtScancode;
use winit::window::Window;

use crate::input::{
    InputState, Key, Modifiers, MouseButton, NativeEvent, NativeKey, NativeKind,
};

/// Lowers a winit `WindowEvent` into a native event record, updating `state`.
///
/// Returns `None` for events that are consumed by the backend itself
/// (redraw requests, destruction notices).
pub(crate) fn lower_window_event(
    window: &Window,
    state: &mut InputState,
    event: &WindowEvent,
    timestamp: u32,
) -> Option<NativeEvent> {
    let mut native = match event {
        WindowEvent::CloseRequested => NativeEvent::new(NativeKind::Quit),

        WindowEvent::Resized(size) => NativeEvent::window(
            NativeKind::WindowResized,
            size.width as i32,
            size.height as i32,
        ),

        WindowEvent::Moved(pos) => NativeEvent::window(NativeKind::WindowMoved, pos.x, pos.y),

        WindowEvent::Focused(focused) => {
            if !*focused {
                state.focus_lost();
            }
            NativeEvent::window(NativeKind::WindowFocus, *focused as i32, 0)
        }

        // winit 0.30: ModifiersChanged carries a wrapper with `.state()`.
        WindowEvent::ModifiersChanged(m) => {
            state.modifiers = map_modifiers(m.state());
            NativeEvent::new(NativeKind::Unknown)
        }

        WindowEvent::CursorLeft { .. } => {
            state.pointer_left();
            NativeEvent::new(NativeKind::Unknown)
        }

        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = to_logical_f32(window, *position);
            NativeEvent::motion(state.pointer_moved(x, y))
        }

        WindowEvent::MouseInput { state: st, button, .. } => {
            let pressed = *st == ElementState::Pressed;
            let kind = if pressed {
                NativeKind::MouseButtonDown
            } else {
                NativeKind::MouseButtonUp
            };
            let record = state.button_changed(map_mouse_button(*button), pressed, Instant::now());
            NativeEvent::button(kind, record)
        }

        WindowEvent::MouseWheel { .. } => NativeEvent::new(NativeKind::MouseWheel),

        WindowEvent::KeyboardInput { event, .. } => {
            let pressed = event.state == ElementState::Pressed;
            let scancode = event.physical_key.to_scancode().unwrap_or(0);
            state.key_changed(scancode, pressed);

            let keycode = map_logical_key(&event.logical_key)
                .unwrap_or_else(|| map_physical_key(event.physical_key));

            let kind = if pressed { NativeKind::KeyDown } else { NativeKind::KeyUp };
            NativeEvent::key(
                kind,
                NativeKey {
                    scancode,
                    keycode,
                    modifiers: state.modifiers,
                    repeat: event.repeat,
                },
            )
        }

        WindowEvent::Ime(winit::event::Ime::Commit(text)) if !text.is_empty() => {
            NativeEvent::new(NativeKind::TextInput)
        }

        WindowEvent::RedrawRequested | WindowEvent::Destroyed => return None,

        _ => NativeEvent::new(NativeKind::Unknown),
    };

    native.timestamp = timestamp;
    Some(native)
}

fn to_logical_f32(window: &Window, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let logical = pos.to_logical::<f64>(window.scale_factor());
    (logical.x as f32, logical.y as f32)
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

/// Layout-aware mapping. `None` when the logical key has no `Key` variant.
fn map_logical_key(key: &LogicalKey) -> Option<Key> {
    match key {
        LogicalKey::Named(named) => {
            let key = match named {
                NamedKey::Escape => Key::Escape,
                NamedKey::Enter => Key::Enter,
                NamedKey::Tab => Key::Tab,
                NamedKey::Backspace => Key::Backspace,
                NamedKey::Space => Key::Space,

                NamedKey::Insert => Key::Insert,
                NamedKey::Delete => Key::Delete,
                NamedKey::Home => Key::Home,
                NamedKey::End => Key::End,
                NamedKey::PageUp => Key::PageUp,
                NamedKey::PageDown => Key::PageDown,

                NamedKey::ArrowUp => Key::ArrowUp,
                NamedKey::ArrowDown => Key::ArrowDown,
                NamedKey::ArrowLeft => Key::ArrowLeft,
                NamedKey::ArrowRight => Key::ArrowRight,

                NamedKey::Shift => Key::Shift,
                NamedKey::Control => Key::Control,
                NamedKey::Alt => Key::Alt,
                NamedKey::Super => Key::Meta,

                NamedKey::F1 => Key::F1,
                NamedKey::F2 => Key::F2,
                NamedKey::F3 => Key::F3,
                NamedKey::F4 => Key::F4,
                NamedKey::F5 => Key::F5,
                NamedKey::F6 => Key::F6,
                NamedKey::F7 => Key::F7,
                NamedKey::F8 => Key::F8,
                NamedKey::F9 => Key::F9,
                NamedKey::F10 => Key::F10,
                NamedKey::F11 => Key::F11,
                NamedKey::F12 => Key::F12,

                _ => return None,
            };
            Some(key)
        }

        LogicalKey::Character(text) => {
            let mut chars = text.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            char_key(c)
        }

        _ => None,
    }
}

fn char_key(c: char) -> Option<Key> {
    let key = match c.to_ascii_uppercase() {
        'A' => Key::A,
        'B' => Key::B,
        'C' => Key::C,
        'D' => Key::D,
        'E' => Key::E,
        'F' => Key::F,
        'G' => Key::G,
        'H' => Key::H,
        'I' => Key::I,
        'J' => Key::J,
        'K' => Key::K,
        'L' => Key::L,
        'M' => Key::M,
        'N' => Key::N,
        'O' => Key::O,
        'P' => Key::P,
        'Q' => Key::Q,
        'R' => Key::R,
        'S' => Key::S,
        'T' => Key::T,
        'U' => Key::U,
        'V' => Key::V,
        'W' => Key::W,
        'X' => Key::X,
        'Y' => Key::Y,
        'Z' => Key::Z,

        '0' => Key::Digit0,
        '1' => Key::Digit1,
        '2' => Key::Digit2,
        '3' => Key::Digit3,
        '4' => Key::Digit4,
        '5' => Key::Digit5,
        '6' => Key::Digit6,
        '7' => Key::Digit7,
        '8' => Key::Digit8,
        '9' => Key::Digit9,

        ' ' => Key::Space,
        _ => return None,
    };
    Some(key)
}

/// Position-based fallback for keys the layout mapping does not cover.
fn map_physical_key(pk: PhysicalKey) -> Key {
    match pk {
        PhysicalKey::Code(code) => match code {
            KeyCode::Escape => Key::Escape,
            KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
            KeyCode::Tab => Key::Tab,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Space => Key::Space,

            KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
            KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
            KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,
            KeyCode::SuperLeft | KeyCode::SuperRight => Key::Meta,

            KeyCode::Numpad0 => Key::Digit0,
            KeyCode::Numpad1 => Key::Digit1,
            KeyCode::Numpad2 => Key::Digit2,
            KeyCode::Numpad3 => Key::Digit3,
            KeyCode::Numpad4 => Key::Digit4,
            KeyCode::Numpad5 => Key::Digit5,
            KeyCode::Numpad6 => Key::Digit6,
            KeyCode::Numpad7 => Key::Digit7,
            KeyCode::Numpad8 => Key::Digit8,
            KeyCode::Numpad9 => Key::Digit9,

            other => Key::Unknown(other as u32),
        },

        // NativeKeyCode carries no stable numeric.
        PhysicalKey::Unidentified(_) => Key::Unknown(0),
    }
}
