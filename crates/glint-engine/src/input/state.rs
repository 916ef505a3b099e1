use std::collections::HashSet;
use std::time::{Duration, Instant};

use super::native::{NativeButton, NativeMotion};
use super::types::{Modifiers, MouseButton, MouseButtons};

/// Presses closer together than this (same button) count as a multi-click.
const MULTI_CLICK_TIME: Duration = Duration::from_millis(500);
/// Maximum pointer travel, in logical pixels, between presses of a multi-click.
const MULTI_CLICK_RADIUS: f32 = 4.0;

#[derive(Debug, Copy, Clone)]
struct LastPress {
    button: MouseButton,
    at: Instant,
    x: f32,
    y: f32,
    clicks: u8,
}

/// Input state tracked on behalf of a platform backend.
///
/// Holds "is down" information and the pointer position, and produces the
/// derived fields of native records (relative motion, button mask, click count).
#[derive(Debug, Default)]
pub struct InputState {
    /// Current modifier state.
    pub modifiers: Modifiers,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    /// Currently held mouse buttons.
    pub buttons: MouseButtons,

    /// Scancodes of currently held keys.
    pub keys_down: HashSet<u32>,

    last_press: Option<LastPress>,
}

impl InputState {
    /// Records a pointer move and returns the motion payload.
    ///
    /// The first move after the pointer enters has zero relative motion.
    pub fn pointer_moved(&mut self, x: f32, y: f32) -> NativeMotion {
        let (xrel, yrel) = match self.pointer_pos {
            Some((px, py)) => (x - px, y - py),
            None => (0.0, 0.0),
        };
        self.pointer_pos = Some((x, y));

        NativeMotion {
            x,
            y,
            xrel,
            yrel,
            state: self.buttons,
        }
    }

    pub fn pointer_left(&mut self) {
        self.pointer_pos = None;
    }

    /// Records a button transition at `at` and returns the button payload.
    pub fn button_changed(&mut self, button: MouseButton, pressed: bool, at: Instant) -> NativeButton {
        let (x, y) = self.pointer_pos.unwrap_or((0.0, 0.0));
        let bit = MouseButtons::from_button(button);

        let clicks = if pressed {
            self.buttons.insert(bit);
            self.count_click(button, at, x, y)
        } else {
            self.buttons.remove(bit);
            self.last_press
                .filter(|p| p.button == button)
                .map_or(1, |p| p.clicks)
        };

        NativeButton { button, x, y, clicks }
    }

    /// Records a key transition. Returns `false` for a press of a key already held.
    pub fn key_changed(&mut self, scancode: u32, pressed: bool) -> bool {
        if pressed {
            self.keys_down.insert(scancode)
        } else {
            self.keys_down.remove(&scancode);
            true
        }
    }

    /// Clears held keys and buttons so nothing stays stuck across focus changes.
    pub fn focus_lost(&mut self) {
        self.keys_down.clear();
        self.buttons = MouseButtons::empty();
        self.last_press = None;
    }

    pub fn key_down(&self, scancode: u32) -> bool {
        self.keys_down.contains(&scancode)
    }

    fn count_click(&mut self, button: MouseButton, at: Instant, x: f32, y: f32) -> u8 {
        let clicks = match self.last_press {
            Some(prev)
                if prev.button == button
                    && at.saturating_duration_since(prev.at) <= MULTI_CLICK_TIME
                    && (x - prev.x).abs() <= MULTI_CLICK_RADIUS
                    && (y - prev.y).abs() <= MULTI_CLICK_RADIUS =>
            {
                prev.clicks.saturating_add(1)
            }
            _ => 1,
        };

        self.last_press = Some(LastPress { button, at, x, y, clicks });
        clicks
    }
}
