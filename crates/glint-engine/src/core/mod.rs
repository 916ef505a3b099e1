//! Core engine-facing contracts.
//!
//! [`GraphicsContext`] is the single owner of a window, its GL context and the
//! frame loop. Callers customize it through the render callback and the
//! event handler; everything else is a thin passthrough to the GL table.

mod callbacks;
mod context;

pub use callbacks::{EventControl, EventHandlerFn, RenderFn};
pub use context::{BlendMode, Graphics, GraphicsContext};
