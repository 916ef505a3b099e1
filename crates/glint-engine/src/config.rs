use std::time::Duration;

/// Requested OpenGL context version.
///
/// This is a request; the platform may grant a different compatible version.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GlRequest {
    pub major: u8,
    pub minor: u8,
    /// Request a core profile context.
    pub core_profile: bool,
    /// Request a forward-compatible context (required for core profiles on macOS).
    pub forward_compatible: bool,
}

impl Default for GlRequest {
    fn default() -> Self {
        Self {
            major: 3,
            minor: 3,
            core_profile: true,
            forward_compatible: true,
        }
    }
}

/// Window + context configuration.
///
/// Supplied once at construction and never mutated by the context afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    pub vsync: bool,
    pub gl: GlRequest,
    /// Optional `(min, max)` bounds on the per-frame delta handed to the render callback.
    pub dt_clamps: Option<(Duration, Duration)>,
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            title: "glint".to_string(),
            width: 800,
            height: 600,
            resizable: true,
            vsync: true,
            gl: GlRequest::default(),
            dt_clamps: None,
        }
    }
}

impl GraphicsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Initial window size in logical pixels.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn gl_version(mut self, major: u8, minor: u8) -> Self {
        self.gl.major = major;
        self.gl.minor = minor;
        self
    }

    /// Bounds frame deltas, e.g. so a debugger pause does not show up as one huge step.
    pub fn dt_clamps(mut self, min: Duration, max: Duration) -> Self {
        self.dt_clamps = Some((min, max));
        self
    }
}
