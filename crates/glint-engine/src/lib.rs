//! Glint engine crate.
//!
//! A small OpenGL windowing wrapper: one window, one GL context, a frame loop
//! with a render callback and an event handler, and a built-in fullscreen
//! shader for when no render callback is set.

pub mod config;
pub mod core;
pub mod device;
pub mod error;
pub mod input;
pub mod logging;
pub mod time;
pub mod window;

#[cfg(test)]
mod testing;

pub use config::{GlRequest, GraphicsConfig};
pub use crate::core::{BlendMode, EventControl, Graphics, GraphicsContext};
pub use error::{GraphicsError, Result};
pub use input::{Event, Key, KeyEvent, Modifiers, MouseButton, MouseButtons};
