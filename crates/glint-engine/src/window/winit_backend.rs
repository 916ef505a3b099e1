use std::collections::VecDeque;
use std::ffi::{c_void, CStr};
use std::num::NonZeroU32;
use std::time::{Duration, Instant};

use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{Display, DisplayApiPreference, GetGlDisplay, GlDisplay};
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::GlWindow;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle, RawWindowHandle};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::config::{GlRequest, GraphicsConfig};
use crate::device::{missing_entry_points, GlowGl};
use crate::error::{GraphicsError, Result};
use crate::input::platform::winit::lower_window_event;
use crate::input::{InputState, NativeEvent, NativeKind};

use super::platform::{ContextHandle, MouseState, Platform, WindowHandle};

/// Receives winit callbacks during a pump and queues lowered records.
struct Collector {
    started: Instant,
    window: Option<Window>,
    input: InputState,
    queue: VecDeque<NativeEvent>,
    pending_resize: Option<PhysicalSize<u32>>,
}

impl Collector {
    fn new() -> Self {
        Self {
            started: Instant::now(),
            window: None,
            input: InputState::default(),
            queue: VecDeque::new(),
            pending_resize: None,
        }
    }

    fn timestamp(&self) -> u32 {
        self.started.elapsed().as_millis().min(u32::MAX as u128) as u32
    }
}

impl ApplicationHandler for Collector {
    // The window is created up front by `create_window`.
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let timestamp = self.timestamp();
        let Some(window) = self.window.as_ref() else {
            return;
        };
        if window.id() != window_id {
            return;
        }

        if let WindowEvent::Resized(size) = event {
            self.pending_resize = Some(size);
        }

        if let Some(native) = lower_window_event(window, &mut self.input, &event, timestamp) {
            self.queue.push_back(native);
        }
    }
}

enum GlContextState {
    NotCurrent(NotCurrentContext),
    Current(PossiblyCurrentContext),
}

/// [`Platform`] over winit (window + events) and glutin (GL context + surface).
///
/// Supports a single window. Events are collected with a zero-timeout
/// `pump_app_events`, so polling never blocks.
pub struct WinitPlatform {
    event_loop: Option<EventLoop<()>>,
    collector: Collector,

    gl_config: Option<Config>,
    gl_context: Option<GlContextState>,
    gl_surface: Option<Surface<WindowSurface>>,

    window_handle: Option<WindowHandle>,
    context_handle: Option<ContextHandle>,
    next_handle: u32,

    last_error: String,
}

impl WinitPlatform {
    pub fn new() -> Self {
        Self {
            event_loop: None,
            collector: Collector::new(),
            gl_config: None,
            gl_context: None,
            gl_surface: None,
            window_handle: None,
            context_handle: None,
            next_handle: 1,
            last_error: String::new(),
        }
    }

    /// The winit window, once created.
    pub fn window(&self) -> Option<&Window> {
        self.collector.window.as_ref()
    }

    fn fail(&mut self, err: GraphicsError) -> GraphicsError {
        self.last_error = err.to_string();
        err
    }

    fn allocate_handle(&mut self) -> u32 {
        let h = self.next_handle;
        self.next_handle = self.next_handle.wrapping_add(1).max(1);
        h
    }

    fn current_context(&self) -> Option<&PossiblyCurrentContext> {
        match self.gl_context.as_ref()? {
            GlContextState::Current(ctx) => Some(ctx),
            GlContextState::NotCurrent(_) => None,
        }
    }

    /// Opens the GL display for `window` and picks a config compatible with it.
    fn find_gl_config(&self, window: &Window) -> Result<Config> {
        let Some(event_loop) = self.event_loop.as_ref() else {
            return Err(GraphicsError::WindowCreate("platform not initialized".into()));
        };
        let raw_display = event_loop
            .display_handle()
            .map_err(|e| GraphicsError::WindowCreate(e.to_string()))?
            .as_raw();
        let raw_window = window
            .window_handle()
            .map_err(|e| GraphicsError::WindowCreate(e.to_string()))?
            .as_raw();

        let display = unsafe { Display::new(raw_display, display_preference(raw_window)) }
            .map_err(|e| GraphicsError::WindowCreate(format!("no GL display: {e}")))?;

        let template = ConfigTemplateBuilder::new()
            .compatible_with_native_window(raw_window)
            .build();
        let configs = unsafe { display.find_configs(template) }
            .map_err(|e| GraphicsError::WindowCreate(format!("GL config query failed: {e}")))?;

        pick_config(configs)
            .ok_or_else(|| GraphicsError::WindowCreate("display offered no GL configs".into()))
    }

    fn apply_pending_resize(&mut self) {
        let Some(size) = self.collector.pending_resize.take() else {
            return;
        };
        let (Some(window), Some(surface), Some(ctx)) = (
            self.collector.window.as_ref(),
            self.gl_surface.as_ref(),
            self.current_context(),
        ) else {
            return;
        };

        // Zero-sized surfaces are invalid; minimized windows keep the old size.
        if size.width > 0 && size.height > 0 {
            window.resize_surface(surface, ctx);
        }
    }
}

fn pick_config<I: Iterator<Item = Config>>(configs: I) -> Option<Config> {
    most_samples(configs, |c| c.num_samples())
}

/// The item with the most MSAA samples, earliest first on ties. `None` when empty.
fn most_samples<T, I, F>(items: I, samples: F) -> Option<T>
where
    I: Iterator<Item = T>,
    F: Fn(&T) -> u8,
{
    items.reduce(|best, c| if samples(&c) > samples(&best) { c } else { best })
}

#[allow(unreachable_code, unused_variables)]
fn display_preference(window: RawWindowHandle) -> DisplayApiPreference {
    #[cfg(target_os = "windows")]
    return DisplayApiPreference::WglThenEgl(Some(window));

    #[cfg(target_os = "macos")]
    return DisplayApiPreference::Cgl;

    #[cfg(target_os = "android")]
    return DisplayApiPreference::Egl;

    #[cfg(all(unix, not(any(target_os = "macos", target_os = "ios", target_os = "android"))))]
    return DisplayApiPreference::EglThenGlx(Box::new(winit::platform::x11::register_xlib_error_hook));
}

impl Default for WinitPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for WinitPlatform {
    type Gl = GlowGl;

    fn init(&mut self) -> Result<()> {
        if self.event_loop.is_some() {
            return Ok(());
        }

        let event_loop = EventLoop::new()
            .map_err(|e| self.fail(GraphicsError::Init(e.to_string())))?;

        self.event_loop = Some(event_loop);
        self.collector = Collector::new();
        log::debug!("winit event loop created");
        Ok(())
    }

    fn quit(&mut self) {
        self.collector = Collector::new();
        self.event_loop = None;
        log::debug!("winit event loop released");
    }

    fn create_window(&mut self, config: &GraphicsConfig) -> Result<WindowHandle> {
        if self.collector.window.is_some() {
            return Err(self.fail(GraphicsError::WindowCreate(
                "only one window per platform is supported".into(),
            )));
        }
        let Some(event_loop) = self.event_loop.as_ref() else {
            return Err(self.fail(GraphicsError::WindowCreate("platform not initialized".into())));
        };

        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width as f64, config.height as f64))
            .with_resizable(config.resizable);

        // There is no ActiveEventLoop outside a pump, so the window comes from the loop itself.
        #[allow(deprecated)]
        let window = event_loop
            .create_window(attrs)
            .map_err(|e| GraphicsError::WindowCreate(e.to_string()));
        let window = window.map_err(|e| self.fail(e))?;

        let gl_config = match self.find_gl_config(&window) {
            Ok(c) => c,
            Err(e) => return Err(self.fail(e)),
        };

        let handle = WindowHandle(self.allocate_handle());
        log::debug!("created window {handle:?} ({}x{})", config.width, config.height);

        self.collector.window = Some(window);
        self.gl_config = Some(gl_config);
        self.window_handle = Some(handle);
        Ok(handle)
    }

    fn destroy_window(&mut self, window: WindowHandle) {
        if self.window_handle != Some(window) {
            log::warn!("destroy_window: unknown handle {window:?}");
            return;
        }
        if let Some(context) = self.context_handle {
            log::error!("window {window:?} destroyed before its GL context; releasing context first");
            self.destroy_gl_context(context);
        }

        self.gl_config = None;
        self.collector.window = None;
        self.window_handle = None;
        log::debug!("destroyed window {window:?}");
    }

    fn create_gl_context(&mut self, window: WindowHandle, request: &GlRequest) -> Result<ContextHandle> {
        if self.window_handle != Some(window) || self.context_handle.is_some() {
            return Err(self.fail(GraphicsError::ContextCreate(format!(
                "window {window:?} is unknown or already has a context"
            ))));
        }
        let (Some(win), Some(gl_config)) = (self.collector.window.as_ref(), self.gl_config.as_ref())
        else {
            return Err(self.fail(GraphicsError::ContextCreate("window not created".into())));
        };

        let raw_handle = match win.window_handle() {
            Ok(h) => h.as_raw(),
            Err(e) => return Err(self.fail(GraphicsError::ContextCreate(e.to_string()))),
        };

        let profile = if request.core_profile {
            GlProfile::Core
        } else {
            GlProfile::Compatibility
        };
        // glutin sets forward compatibility itself where the platform requires it.
        let attrs = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(request.major, request.minor))))
            .with_profile(profile)
            .build(Some(raw_handle));

        let display = gl_config.display();
        let context = match unsafe { display.create_context(gl_config, &attrs) } {
            Ok(c) => c,
            Err(e) => return Err(self.fail(GraphicsError::ContextCreate(e.to_string()))),
        };

        let surface_attrs = match win.build_surface_attributes(SurfaceAttributesBuilder::new()) {
            Ok(a) => a,
            Err(e) => return Err(self.fail(GraphicsError::ContextCreate(e.to_string()))),
        };
        let surface = match unsafe { display.create_window_surface(gl_config, &surface_attrs) } {
            Ok(s) => s,
            Err(e) => return Err(self.fail(GraphicsError::ContextCreate(e.to_string()))),
        };

        let handle = ContextHandle(self.allocate_handle());
        log::debug!(
            "created GL context {handle:?} (requested {}.{})",
            request.major,
            request.minor
        );

        self.gl_context = Some(GlContextState::NotCurrent(context));
        self.gl_surface = Some(surface);
        self.context_handle = Some(handle);
        Ok(handle)
    }

    fn destroy_gl_context(&mut self, context: ContextHandle) {
        if self.context_handle != Some(context) {
            log::warn!("destroy_gl_context: unknown handle {context:?}");
            return;
        }

        // Surface first: it must not outlive the context it was made current with.
        self.gl_surface = None;
        self.gl_context = None;
        self.context_handle = None;
        log::debug!("destroyed GL context {context:?}");
    }

    fn make_current(&mut self, window: WindowHandle, context: ContextHandle) -> Result<()> {
        if self.window_handle != Some(window) || self.context_handle != Some(context) {
            return Err(self.fail(GraphicsError::MakeCurrent(format!(
                "unknown handles {window:?}/{context:?}"
            ))));
        }
        let (Some(state), Some(surface)) = (self.gl_context.take(), self.gl_surface.as_ref()) else {
            return Err(self.fail(GraphicsError::MakeCurrent("context not created".into())));
        };

        let result = match state {
            GlContextState::NotCurrent(ctx) => ctx.make_current(surface).map(GlContextState::Current),
            GlContextState::Current(ctx) => match ctx.make_current(surface) {
                Ok(()) => Ok(GlContextState::Current(ctx)),
                Err(e) => {
                    self.gl_context = Some(GlContextState::Current(ctx));
                    return Err(self.fail(GraphicsError::MakeCurrent(e.to_string())));
                }
            },
        };

        match result {
            Ok(state) => {
                self.gl_context = Some(state);
                Ok(())
            }
            Err(e) => Err(self.fail(GraphicsError::MakeCurrent(e.to_string()))),
        }
    }

    fn set_swap_interval(&mut self, interval: u32) -> Result<()> {
        let (Some(surface), Some(ctx)) = (self.gl_surface.as_ref(), self.current_context()) else {
            return Err(self.fail(GraphicsError::Platform("no current context".into())));
        };

        let interval = match NonZeroU32::new(interval) {
            Some(n) => SwapInterval::Wait(n),
            None => SwapInterval::DontWait,
        };
        surface
            .set_swap_interval(ctx, interval)
            .map_err(|e| GraphicsError::Platform(e.to_string()))
            .map_err(|e| self.fail(e))
    }

    fn swap_buffers(&mut self, window: WindowHandle) -> Result<()> {
        if self.window_handle != Some(window) {
            return Err(self.fail(GraphicsError::Swap(format!("unknown window {window:?}"))));
        }
        let (Some(surface), Some(ctx)) = (self.gl_surface.as_ref(), self.current_context()) else {
            return Err(self.fail(GraphicsError::Swap("no current context".into())));
        };

        if let Some(w) = self.collector.window.as_ref() {
            w.pre_present_notify();
        }
        surface
            .swap_buffers(ctx)
            .map_err(|e| GraphicsError::Swap(e.to_string()))
            .map_err(|e| self.fail(e))
    }

    fn pump_events(&mut self) {
        let Some(event_loop) = self.event_loop.as_mut() else {
            return;
        };

        match event_loop.pump_app_events(Some(Duration::ZERO), &mut self.collector) {
            PumpStatus::Continue => {}
            PumpStatus::Exit(code) => {
                log::warn!("winit event loop exited (code {code})");
                self.collector.queue.push_back(NativeEvent::new(NativeKind::Quit));
            }
        }

        self.apply_pending_resize();
    }

    fn poll_event(&mut self) -> Option<NativeEvent> {
        self.collector.queue.pop_front()
    }

    fn window_pixel_size(&self, window: WindowHandle) -> (u32, u32) {
        match self.collector.window.as_ref() {
            Some(w) if self.window_handle == Some(window) => {
                let size = w.inner_size();
                (size.width, size.height)
            }
            _ => (0, 0),
        }
    }

    fn mouse_state(&self) -> MouseState {
        let input = &self.collector.input;
        let (x, y) = input.pointer_pos.unwrap_or((0.0, 0.0));
        MouseState {
            x,
            y,
            buttons: input.buttons,
        }
    }

    fn is_key_pressed(&self, scancode: u32) -> bool {
        self.collector.input.key_down(scancode)
    }

    fn last_error(&self) -> String {
        self.last_error.clone()
    }

    fn get_proc_address(&self, name: &CStr) -> *const c_void {
        match self.gl_config.as_ref() {
            Some(cfg) => cfg.display().get_proc_address(name),
            None => std::ptr::null(),
        }
    }

    fn load_gl(&mut self) -> Result<GlowGl> {
        if self.current_context().is_none() {
            return Err(self.fail(GraphicsError::GlInitFailed("no current context".into())));
        }

        let missing = missing_entry_points(|name| self.get_proc_address(name));
        if !missing.is_empty() {
            return Err(self.fail(GraphicsError::GlInitFailed(format!(
                "unresolved entry points: {}",
                missing.join(", ")
            ))));
        }

        // GL_VERSION must be readable before glow parses it.
        type GetString = unsafe extern "system" fn(u32) -> *const u8;
        let get_string = self.get_proc_address(c"glGetString");
        let get_string: GetString = unsafe { std::mem::transmute::<*const c_void, GetString>(get_string) };
        if unsafe { get_string(glow::VERSION) }.is_null() {
            return Err(self.fail(GraphicsError::GlInitFailed(
                "GL_VERSION query returned null".into(),
            )));
        }

        let gl = unsafe { GlowGl::load(|name| self.get_proc_address(name)) };
        Ok(gl)
    }
}
