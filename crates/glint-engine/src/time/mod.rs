//! Time subsystem.
//!
//! One `FrameClock` per context; `tick()` once per rendered frame yields the
//! delta handed to render callbacks.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
