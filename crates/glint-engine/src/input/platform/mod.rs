//! Platform event lowering.

pub(crate) mod winit;
