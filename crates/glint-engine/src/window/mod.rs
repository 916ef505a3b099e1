//! Windowing collaborator.
//!
//! [`Platform`] is the seam between the context and the OS; [`WinitPlatform`]
//! implements it over winit + glutin.

mod platform;
mod winit_backend;

pub use platform::{ContextHandle, MouseState, Platform, WindowHandle};
pub use winit_backend::WinitPlatform;
