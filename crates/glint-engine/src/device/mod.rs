//! GL device layer.
//!
//! This module is responsible for:
//! - the [`Gl`] function table seam and its glow-backed implementation
//! - shader compilation and program linking
//! - the default renderer's GPU resources

mod gl;
pub(crate) mod quad;
pub mod shader;

pub use gl::{
    BlendFactor, BufferId, BufferTarget, BufferUsage, Capability, ClearMask, Gl, GlowGl,
    IndexType, PolygonMode, Primitive, ProgramId, ShaderId, ShaderStage, UniformLocation,
    VertexArrayId,
};
pub(crate) use gl::missing_entry_points;
