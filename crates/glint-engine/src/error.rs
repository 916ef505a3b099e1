//! Error types for context construction and the frame loop.

use thiserror::Error;

use crate::device::ShaderStage;

/// Errors surfaced by [`GraphicsContext`](crate::core::GraphicsContext) and its collaborators.
///
/// Construction is all-or-nothing: any construction variant is returned only after
/// every resource acquired earlier in the same call has been released.
#[derive(Error, Debug)]
pub enum GraphicsError {
    /// The windowing subsystem could not be initialized.
    #[error("failed to initialize windowing subsystem: {0}")]
    Init(String),

    /// The native window could not be created.
    #[error("failed to create window: {0}")]
    WindowCreate(String),

    /// The GL context could not be created for the window.
    #[error("failed to create GL context: {0}")]
    ContextCreate(String),

    /// The GL context could not be made current on the calling thread.
    #[error("failed to make GL context current: {0}")]
    MakeCurrent(String),

    /// GL entry points could not be loaded, or the driver reported no version.
    #[error("OpenGL initialization failed: {0}")]
    GlInitFailed(String),

    /// A shader stage failed to compile. `log` holds the driver diagnostic text.
    #[error("failed to compile {stage} shader: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    /// A program failed to link. `log` holds the driver diagnostic text.
    #[error("failed to link program: {log}")]
    ProgramLink { log: String },

    /// Presenting the back buffer failed.
    #[error("failed to swap buffers: {0}")]
    Swap(String),

    /// Any other native call failure.
    #[error("platform error: {0}")]
    Platform(String),

    /// A user render callback failed.
    #[error("render callback failed: {0:#}")]
    Callback(anyhow::Error),
}

impl From<anyhow::Error> for GraphicsError {
    fn from(err: anyhow::Error) -> Self {
        GraphicsError::Callback(err)
    }
}

pub type Result<T> = std::result::Result<T, GraphicsError>;
