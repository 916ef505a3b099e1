use std::ffi::{c_void, CStr};

use crate::config::{GlRequest, GraphicsConfig};
use crate::device::Gl;
use crate::error::Result;
use crate::input::{MouseButtons, NativeEvent};

/// Opaque handle to a native window owned by a [`Platform`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct WindowHandle(pub(crate) u32);

/// Opaque handle to a native GL context owned by a [`Platform`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ContextHandle(pub(crate) u32);

/// Pointer position (logical pixels) and held buttons.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    pub buttons: MouseButtons,
}

/// Windowing/input collaborator.
///
/// Owns the OS-level resources behind the handles it hands out. The caller is
/// responsible for releasing them in reverse order of acquisition:
/// GL context, then window, then `quit`.
pub trait Platform {
    /// GL function table produced by [`Platform::load_gl`].
    type Gl: Gl;

    /// Initializes the windowing subsystem.
    fn init(&mut self) -> Result<()>;

    /// Shuts the windowing subsystem down. Called once, after every window is destroyed.
    fn quit(&mut self);

    fn create_window(&mut self, config: &GraphicsConfig) -> Result<WindowHandle>;

    fn destroy_window(&mut self, window: WindowHandle);

    /// Creates a GL context for `window`. `request` is a hint; the granted
    /// version may differ.
    fn create_gl_context(&mut self, window: WindowHandle, request: &GlRequest)
        -> Result<ContextHandle>;

    fn destroy_gl_context(&mut self, context: ContextHandle);

    /// Makes `context` current on the calling thread against `window`.
    fn make_current(&mut self, window: WindowHandle, context: ContextHandle) -> Result<()>;

    /// Sets the swap interval of the current context (0 = immediate, 1 = vsync).
    fn set_swap_interval(&mut self, interval: u32) -> Result<()>;

    fn swap_buffers(&mut self, window: WindowHandle) -> Result<()>;

    /// Collects events the OS has queued without blocking.
    fn pump_events(&mut self);

    /// Pops the next collected native event, if any.
    fn poll_event(&mut self) -> Option<NativeEvent>;

    /// Drawable size of `window` in physical pixels.
    fn window_pixel_size(&self, window: WindowHandle) -> (u32, u32);

    fn mouse_state(&self) -> MouseState;

    /// Keyboard snapshot query by platform scancode.
    fn is_key_pressed(&self, scancode: u32) -> bool;

    /// Description of the most recent native failure, empty if none.
    fn last_error(&self) -> String;

    /// Resolves a GL entry point for the current context. Null when unavailable.
    fn get_proc_address(&self, name: &CStr) -> *const c_void;

    /// Loads the GL function table through [`Platform::get_proc_address`].
    ///
    /// Requires a current context.
    fn load_gl(&mut self) -> Result<Self::Gl>;
}
