//! The graphics context: one window, one GL context, the frame loop.

use crate::config::GraphicsConfig;
use crate::device::quad::DefaultQuad;
use crate::device::{
    shader, BlendFactor, BufferId, BufferTarget, BufferUsage, Capability, ClearMask, Gl,
    IndexType, PolygonMode, Primitive, ProgramId, ShaderId, ShaderStage, UniformLocation,
    VertexArrayId,
};
use crate::error::{GraphicsError, Result};
use crate::input::{self, Event};
use crate::time::FrameClock;
use crate::window::{ContextHandle, Platform, WindowHandle, WinitPlatform};

use super::callbacks::{CallbackSlot, EventControl, EventHandlerFn, RenderFn};

/// Blending presets for [`GraphicsContext::set_blend_mode`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum BlendMode {
    #[default]
    Disabled,
    /// `src * a + dst * (1 - a)`
    Alpha,
    /// `src * a + dst`
    Additive,
    /// `src * dst`
    Multiply,
}

/// Graphics context backed by the winit/glutin platform.
pub type Graphics<U = ()> = GraphicsContext<WinitPlatform, U>;

// ── Native resources ──────────────────────────────────────────────────────

/// Platform plus the window and GL context it handed out.
///
/// Dropping it releases the context, then the window, then the subsystem.
struct NativeSurface<P: Platform> {
    platform: P,
    window: WindowHandle,
    context: ContextHandle,
}

impl<P: Platform> NativeSurface<P> {
    /// Initializes the platform, creates the window and its GL context, and
    /// makes the context current. Anything acquired is released on failure.
    fn open(mut platform: P, config: &GraphicsConfig) -> Result<Self> {
        platform.init()?;
        log::debug!("windowing subsystem initialized");

        let window = match platform.create_window(config) {
            Ok(w) => w,
            Err(e) => {
                platform.quit();
                return Err(e);
            }
        };
        log::debug!("window created: {:?} {}x{}", config.title, config.width, config.height);

        let gl = &config.gl;
        let context = match platform.create_gl_context(window, gl) {
            Ok(c) => c,
            Err(e) => {
                platform.destroy_window(window);
                platform.quit();
                return Err(e);
            }
        };
        log::debug!(
            "GL context created (requested {}.{}, core={})",
            gl.major,
            gl.minor,
            gl.core_profile
        );

        let mut surface = Self { platform, window, context };
        surface.make_current()?;
        Ok(surface)
    }

    fn make_current(&mut self) -> Result<()> {
        self.platform.make_current(self.window, self.context)
    }
}

impl<P: Platform> Drop for NativeSurface<P> {
    fn drop(&mut self) {
        self.platform.destroy_gl_context(self.context);
        self.platform.destroy_window(self.window);
        self.platform.quit();
        log::debug!("native resources released");
    }
}

// ── GraphicsContext ───────────────────────────────────────────────────────

/// Owns a window, its GL context, the loaded GL table and the default
/// renderer, and drives the frame loop.
///
/// `U` is caller state reachable from callbacks through [`Self::user_data`].
/// Dropping the context (or calling [`Self::teardown`]) releases everything.
pub struct GraphicsContext<P: Platform, U = ()> {
    quad: DefaultQuad,
    gl: P::Gl,
    surface: NativeSurface<P>,
    config: GraphicsConfig,
    gl_version: String,
    clock: FrameClock,
    render_fn: CallbackSlot<RenderFn<P, U>>,
    event_handler: CallbackSlot<EventHandlerFn<P, U>>,
    should_stop: bool,
    user_data: U,
}

impl<U> GraphicsContext<WinitPlatform, U> {
    /// Opens a window and GL context on the native windowing system.
    pub fn new(config: GraphicsConfig, user_data: U) -> Result<Self> {
        Self::with_platform(WinitPlatform::new(), config, user_data)
    }
}

impl<P: Platform, U> GraphicsContext<P, U> {
    /// Builds a context on `platform`. All-or-nothing: a failure at any step
    /// releases what earlier steps acquired, in reverse order.
    pub fn with_platform(platform: P, config: GraphicsConfig, user_data: U) -> Result<Self> {
        let mut surface = NativeSurface::open(platform, &config)?;

        if config.vsync {
            match surface.platform.set_swap_interval(1) {
                Ok(()) => log::debug!("vsync enabled"),
                Err(e) => log::warn!("vsync unavailable, continuing without it: {e}"),
            }
        }

        let gl = surface.platform.load_gl()?;
        log::debug!("GL entry points loaded");

        let gl_version = gl
            .version()
            .ok_or_else(|| GraphicsError::GlInitFailed("GL_VERSION query returned null".into()))?;
        log::info!("OpenGL {gl_version}");

        let quad = DefaultQuad::new(&gl, &config.gl)?;
        log::debug!("default renderer ready");

        let clock = match config.dt_clamps {
            Some((min, max)) => FrameClock::new().with_clamps(min, max),
            None => FrameClock::new(),
        };

        Ok(Self {
            quad,
            gl,
            surface,
            config,
            gl_version,
            clock,
            render_fn: CallbackSlot::default(),
            event_handler: CallbackSlot::default(),
            should_stop: false,
            user_data,
        })
    }

    /// Releases every GL and native resource. Equivalent to dropping.
    pub fn teardown(self) {
        log::debug!("tearing down graphics context");
        drop(self);
    }

    // ── callbacks ─────────────────────────────────────────────────────────

    /// Installs the per-frame render callback, replacing any previous one.
    ///
    /// While set, the default renderer is not used.
    pub fn set_render_fn<F>(&mut self, f: F)
    where
        F: FnMut(&mut Self, f32) -> Result<()> + 'static,
    {
        self.render_fn.set(Box::new(f));
    }

    pub fn clear_render_fn(&mut self) {
        self.render_fn.clear();
    }

    /// Installs the event handler, replacing any previous one.
    pub fn set_event_handler<F>(&mut self, f: F)
    where
        F: FnMut(&mut Self, &Event) -> EventControl + 'static,
    {
        self.event_handler.set(Box::new(f));
    }

    pub fn clear_event_handler(&mut self) {
        self.event_handler.clear();
    }

    // ── loop ──────────────────────────────────────────────────────────────

    /// Runs the frame loop until [`Self::quit`] is called or an unhandled
    /// `Quit` event arrives.
    ///
    /// Each iteration drains events, renders one frame and swaps. Errors from
    /// the render callback or the swap end the loop immediately.
    pub fn run(&mut self) -> Result<()> {
        log::debug!("entering frame loop");
        while !self.should_stop {
            self.process_events();
            let frame = self.clock.tick();
            self.render_frame(frame.dt)?;
            self.swap_buffers()?;
        }
        log::debug!("frame loop stopped after {} frames", self.clock.frame_index());
        Ok(())
    }

    /// Drains pending native events through the translator and the handler.
    pub fn process_events(&mut self) {
        self.surface.platform.pump_events();

        while let Some(native) = self.surface.platform.poll_event() {
            match input::translate(&native) {
                Some(event) => self.dispatch(event),
                None => log::trace!("dropped native event {:?}", native.kind),
            }
        }
    }

    fn dispatch(&mut self, event: Event) {
        let control = match self.event_handler.take() {
            Some(mut handler) => {
                let control = handler(self, &event);
                self.event_handler.restore(handler);
                control
            }
            None => EventControl::Unhandled,
        };

        if event == Event::Quit && control == EventControl::Unhandled {
            log::debug!("quit requested by platform");
            self.should_stop = true;
        }
    }

    /// Renders one frame through the render callback, or the default
    /// renderer when none is set. Does not swap.
    pub fn render_frame(&mut self, dt: f32) -> Result<()> {
        if let Some(mut render) = self.render_fn.take() {
            let result = render(self, dt);
            self.render_fn.restore(render);
            return result;
        }

        self.surface.make_current()?;
        let size = self.window_size();
        self.quad.draw(&self.gl, size, self.clock.elapsed() as f32);
        Ok(())
    }

    pub fn swap_buffers(&mut self) -> Result<()> {
        self.surface.platform.swap_buffers(self.surface.window)
    }

    /// Restarts the delta baseline, so the next frame's delta is measured from
    /// now. Useful after a long load between construction and [`Self::run`].
    pub fn reset_frame_timer(&mut self) {
        self.clock.reset();
    }

    /// Stops the loop before its next iteration.
    pub fn quit(&mut self) {
        self.should_stop = true;
    }

    pub fn is_stopping(&self) -> bool {
        self.should_stop
    }

    // ── queries ───────────────────────────────────────────────────────────

    /// Drawable size in physical pixels.
    pub fn window_size(&self) -> (u32, u32) {
        self.surface.platform.window_pixel_size(self.surface.window)
    }

    /// Seconds since construction.
    pub fn elapsed_time(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn fps(&self) -> f32 {
        self.clock.fps()
    }

    pub fn mouse_position(&self) -> (f32, f32) {
        let mouse = self.surface.platform.mouse_state();
        (mouse.x, mouse.y)
    }

    pub fn is_key_pressed(&self, scancode: u32) -> bool {
        self.surface.platform.is_key_pressed(scancode)
    }

    pub fn config(&self) -> &GraphicsConfig {
        &self.config
    }

    /// Version string reported by the driver.
    pub fn gl_version(&self) -> &str {
        &self.gl_version
    }

    pub fn user_data(&self) -> &U {
        &self.user_data
    }

    pub fn user_data_mut(&mut self) -> &mut U {
        &mut self.user_data
    }

    pub fn platform(&self) -> &P {
        &self.surface.platform
    }

    /// The loaded GL table, for calls not covered by the passthroughs.
    pub fn gl(&self) -> &P::Gl {
        &self.gl
    }

    pub fn default_program(&self) -> ProgramId {
        self.quad.program
    }

    // ── state passthroughs ────────────────────────────────────────────────

    /// Clears color and depth to `(r, g, b, a)`.
    pub fn clear(&self, r: f32, g: f32, b: f32, a: f32) {
        self.gl.clear_color(r, g, b, a);
        self.gl.clear(ClearMask::COLOR | ClearMask::DEPTH);
    }

    pub fn set_viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.gl.viewport(x, y, width, height);
    }

    pub fn set_depth_test(&self, enabled: bool) {
        if enabled {
            self.gl.enable(Capability::DepthTest);
        } else {
            self.gl.disable(Capability::DepthTest);
        }
    }

    pub fn set_blend_mode(&self, mode: BlendMode) {
        let (src, dst) = match mode {
            BlendMode::Disabled => {
                self.gl.disable(Capability::Blend);
                return;
            }
            BlendMode::Alpha => (BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha),
            BlendMode::Additive => (BlendFactor::SrcAlpha, BlendFactor::One),
            BlendMode::Multiply => (BlendFactor::DstColor, BlendFactor::Zero),
        };
        self.gl.enable(Capability::Blend);
        self.gl.blend_func(src, dst);
    }

    pub fn set_wireframe(&self, enabled: bool) {
        self.gl.polygon_mode(if enabled { PolygonMode::Line } else { PolygonMode::Fill });
    }

    pub fn set_line_width(&self, width: f32) {
        self.gl.line_width(width);
    }

    pub fn set_point_size(&self, size: f32) {
        self.gl.point_size(size);
    }

    // ── programs and uniforms ─────────────────────────────────────────────

    pub fn compile_shader(&self, source: &str, stage: ShaderStage) -> Result<ShaderId> {
        shader::compile(&self.gl, source, stage)
    }

    pub fn delete_shader(&self, shader: ShaderId) {
        self.gl.delete_shader(shader);
    }

    /// Compiles and links a program. Intermediate shaders never outlive the call.
    pub fn link_program(&self, vertex_src: &str, fragment_src: &str) -> Result<ProgramId> {
        shader::link(&self.gl, vertex_src, fragment_src)
    }

    pub fn delete_program(&self, program: ProgramId) {
        self.gl.delete_program(program);
    }

    pub fn use_program(&self, program: Option<ProgramId>) {
        self.gl.use_program(program);
    }

    /// Location of `name` in `program`; [`UniformLocation::NONE`] when absent.
    pub fn uniform_location(&self, program: ProgramId, name: &str) -> UniformLocation {
        self.gl.uniform_location(program, name)
    }

    // Setters ignore `UniformLocation::NONE`.

    pub fn set_uniform_f32(&self, loc: UniformLocation, x: f32) {
        if loc.is_valid() {
            self.gl.uniform_1_f32(loc, x);
        }
    }

    pub fn set_uniform_vec2(&self, loc: UniformLocation, v: [f32; 2]) {
        if loc.is_valid() {
            self.gl.uniform_2_f32(loc, v[0], v[1]);
        }
    }

    pub fn set_uniform_vec3(&self, loc: UniformLocation, v: [f32; 3]) {
        if loc.is_valid() {
            self.gl.uniform_3_f32(loc, v[0], v[1], v[2]);
        }
    }

    pub fn set_uniform_vec4(&self, loc: UniformLocation, v: [f32; 4]) {
        if loc.is_valid() {
            self.gl.uniform_4_f32(loc, v[0], v[1], v[2], v[3]);
        }
    }

    pub fn set_uniform_i32(&self, loc: UniformLocation, x: i32) {
        if loc.is_valid() {
            self.gl.uniform_1_i32(loc, x);
        }
    }

    /// Column-major 4x4 matrix.
    pub fn set_uniform_mat4(&self, loc: UniformLocation, m: &[f32; 16]) {
        if loc.is_valid() {
            self.gl.uniform_matrix_4_f32(loc, false, m);
        }
    }

    // ── buffers and vertex arrays ─────────────────────────────────────────

    pub fn create_buffer(&self) -> Result<BufferId> {
        self.gl
            .create_buffer()
            .map_err(|e| GraphicsError::Platform(format!("failed to create buffer: {e}")))
    }

    pub fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferId>) {
        self.gl.bind_buffer(target, buffer);
    }

    /// Uploads `data` to the buffer bound at `target`.
    pub fn buffer_data_f32(&self, target: BufferTarget, data: &[f32], usage: BufferUsage) {
        self.gl.buffer_data(target, bytemuck::cast_slice(data), usage);
    }

    pub fn buffer_data_u32(&self, target: BufferTarget, data: &[u32], usage: BufferUsage) {
        self.gl.buffer_data(target, bytemuck::cast_slice(data), usage);
    }

    pub fn delete_buffer(&self, buffer: BufferId) {
        self.gl.delete_buffer(buffer);
    }

    pub fn create_vertex_array(&self) -> Result<VertexArrayId> {
        self.gl
            .create_vertex_array()
            .map_err(|e| GraphicsError::Platform(format!("failed to create vertex array: {e}")))
    }

    pub fn bind_vertex_array(&self, vao: Option<VertexArrayId>) {
        self.gl.bind_vertex_array(vao);
    }

    pub fn delete_vertex_array(&self, vao: VertexArrayId) {
        self.gl.delete_vertex_array(vao);
    }

    /// Enables attribute `index` as `components` floats read from the bound
    /// array buffer. `stride` and `offset` are counted in floats.
    pub fn vertex_attrib_f32(&self, index: u32, components: i32, stride: i32, offset: i32) {
        const F32: i32 = std::mem::size_of::<f32>() as i32;
        self.gl.enable_vertex_attrib_array(index);
        self.gl.vertex_attrib_pointer_f32(index, components, stride * F32, offset * F32);
    }

    // ── drawing ───────────────────────────────────────────────────────────

    pub fn draw_arrays(&self, mode: Primitive, first: i32, count: i32) {
        self.gl.draw_arrays(mode, first, count);
    }

    /// Draws from the bound element buffer; `offset` is in bytes.
    pub fn draw_elements(&self, mode: Primitive, count: i32, index_type: IndexType, offset: i32) {
        self.gl.draw_elements(mode, count, index_type, offset);
    }
}

impl<P: Platform, U> Drop for GraphicsContext<P, U> {
    fn drop(&mut self) {
        // GL objects go first, while the context still exists.
        if let Err(e) = self.surface.make_current() {
            log::error!("could not make context current for teardown: {e}");
        }
        self.quad.destroy(&self.gl);
    }
}
