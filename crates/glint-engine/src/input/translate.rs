use super::native::{NativeEvent, NativeKind};
use super::types::{Event, KeyEvent, MouseButtonEvent, MouseMotionEvent};

/// Translates a native event record into an [`Event`].
///
/// Returns `None` for kinds with no `Event` mapping. Pure: fields are copied
/// verbatim from the record.
pub fn translate(native: &NativeEvent) -> Option<Event> {
    let event = match native.kind {
        NativeKind::Quit => Event::Quit,

        NativeKind::KeyDown => Event::KeyDown(key_event(native)),
        NativeKind::KeyUp => Event::KeyUp(key_event(native)),

        NativeKind::MouseMotion => {
            let m = &native.motion;
            Event::MouseMotion(MouseMotionEvent {
                x: m.x,
                y: m.y,
                xrel: m.xrel,
                yrel: m.yrel,
                buttons: m.state,
            })
        }

        NativeKind::MouseButtonDown => Event::MouseButtonDown(button_event(native)),
        NativeKind::MouseButtonUp => Event::MouseButtonUp(button_event(native)),

        NativeKind::WindowResized => Event::WindowResized {
            width: native.window.data1.max(0) as u32,
            height: native.window.data2.max(0) as u32,
        },

        NativeKind::MouseWheel
        | NativeKind::TextInput
        | NativeKind::WindowMoved
        | NativeKind::WindowFocus
        | NativeKind::Unknown => return None,
    };

    Some(event)
}

fn key_event(native: &NativeEvent) -> KeyEvent {
    KeyEvent {
        scancode: native.key.scancode,
        keycode: native.key.keycode,
        modifiers: native.key.modifiers,
    }
}

fn button_event(native: &NativeEvent) -> MouseButtonEvent {
    let b = &native.button;
    MouseButtonEvent {
        button: b.button,
        x: b.x,
        y: b.y,
        clicks: b.clicks,
    }
}
