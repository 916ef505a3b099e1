//! In-memory platform and GL used by unit tests.
//!
//! Both share a [`Ledger`] recording every live native object so tests can
//! assert nothing leaks, plus a [`Faults`] table to force failures.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use std::ffi::{c_void, CStr};
use std::rc::Rc;

use crate::config::{GlRequest, GraphicsConfig};
use crate::device::{
    BlendFactor, BufferId, BufferTarget, BufferUsage, Capability, ClearMask, Gl, IndexType,
    PolygonMode, Primitive, ProgramId, ShaderId, ShaderStage, UniformLocation, VertexArrayId,
};
use crate::error::{GraphicsError, Result};
use crate::input::NativeEvent;
use crate::window::{ContextHandle, MouseState, Platform, WindowHandle};

/// Failure injection switches.
#[derive(Debug, Default, Clone)]
pub(crate) struct Faults {
    pub init: bool,
    pub create_window: bool,
    pub create_context: bool,
    pub make_current: bool,
    pub swap_interval: bool,
    pub load_gl: bool,
    pub null_version: bool,
    pub compile: bool,
    pub link_program: bool,
    pub create_vertex_array: bool,
    pub create_buffer: bool,
    pub swap: bool,
}

#[derive(Debug)]
struct MockShader {
    source: String,
    compiled: bool,
}

#[derive(Debug, Default)]
struct MockProgram {
    attached: Vec<u32>,
    uniforms: Vec<String>,
}

#[derive(Debug, Default)]
struct State {
    faults: Faults,
    next_id: u32,

    initialized: bool,
    windows: BTreeSet<u32>,
    contexts: BTreeSet<u32>,
    current: Option<u32>,
    swap_interval: Option<u32>,

    shaders: BTreeMap<u32, MockShader>,
    programs: BTreeMap<u32, MockProgram>,
    vertex_arrays: BTreeSet<u32>,
    buffers: BTreeMap<u32, usize>,
    bound_array_buffer: Option<u32>,

    calls: Vec<String>,
    queue: VecDeque<NativeEvent>,
    pumps: u32,
    swaps: u32,
    draws: Vec<DrawCall>,
    uniform_writes: u32,
    clears: u32,
    clear_color: Option<[f32; 4]>,
    clear_mask: Option<ClearMask>,
    viewport: Option<(i32, i32, i32, i32)>,
    enabled: HashSet<String>,
    polygon_mode: Option<PolygonMode>,

    keys_down: HashSet<u32>,
    mouse: MouseState,
    window_size: (u32, u32),
}

impl State {
    fn id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

/// One recorded `draw_arrays` / `draw_elements` call.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct DrawCall {
    pub mode: Primitive,
    pub first: i32,
    pub count: i32,
}

/// Shared record of native objects and calls.
#[derive(Debug, Clone, Default)]
pub(crate) struct Ledger(Rc<RefCell<State>>);

impl Ledger {
    pub fn inject(&self, f: impl FnOnce(&mut Faults)) {
        f(&mut self.0.borrow_mut().faults);
    }

    pub fn push_event(&self, event: NativeEvent) {
        self.0.borrow_mut().queue.push_back(event);
    }

    pub fn pending_events(&self) -> usize {
        self.0.borrow().queue.len()
    }

    pub fn set_key_down(&self, scancode: u32) {
        self.0.borrow_mut().keys_down.insert(scancode);
    }

    pub fn set_mouse(&self, mouse: MouseState) {
        self.0.borrow_mut().mouse = mouse;
    }

    pub fn set_window_size(&self, size: (u32, u32)) {
        self.0.borrow_mut().window_size = size;
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.borrow().calls.clone()
    }

    pub fn live_shaders(&self) -> Vec<ShaderId> {
        self.0.borrow().shaders.keys().map(|&id| ShaderId(id)).collect()
    }

    pub fn live_programs(&self) -> Vec<ProgramId> {
        self.0.borrow().programs.keys().map(|&id| ProgramId(id)).collect()
    }

    /// Every live GL object, labelled by kind.
    pub fn live_gl_objects(&self) -> Vec<String> {
        let s = self.0.borrow();
        let mut out = Vec::new();
        out.extend(s.shaders.keys().map(|id| format!("shader {id}")));
        out.extend(s.programs.keys().map(|id| format!("program {id}")));
        out.extend(s.vertex_arrays.iter().map(|id| format!("vao {id}")));
        out.extend(s.buffers.keys().map(|id| format!("buffer {id}")));
        out
    }

    /// Every live platform object, including the initialized subsystem.
    pub fn live_native_handles(&self) -> Vec<String> {
        let s = self.0.borrow();
        let mut out = Vec::new();
        if s.initialized {
            out.push("subsystem".to_string());
        }
        out.extend(s.windows.iter().map(|id| format!("window {id}")));
        out.extend(s.contexts.iter().map(|id| format!("context {id}")));
        out
    }

    pub fn buffer_bytes(&self, buffer: BufferId) -> Option<usize> {
        self.0.borrow().buffers.get(&buffer.0).copied()
    }

    pub fn pumps(&self) -> u32 {
        self.0.borrow().pumps
    }

    pub fn swaps(&self) -> u32 {
        self.0.borrow().swaps
    }

    pub fn draw_calls(&self) -> u32 {
        self.0.borrow().draws.len() as u32
    }

    pub fn draws(&self) -> Vec<DrawCall> {
        self.0.borrow().draws.clone()
    }

    /// Color set by the most recent `clear_color`.
    pub fn clear_color(&self) -> Option<[f32; 4]> {
        self.0.borrow().clear_color
    }

    /// Mask of the most recent `clear`.
    pub fn clear_mask(&self) -> Option<ClearMask> {
        self.0.borrow().clear_mask
    }

    /// Arguments of the most recent `viewport`.
    pub fn viewport(&self) -> Option<(i32, i32, i32, i32)> {
        self.0.borrow().viewport
    }

    pub fn uniform_writes(&self) -> u32 {
        self.0.borrow().uniform_writes
    }

    pub fn clears(&self) -> u32 {
        self.0.borrow().clears
    }

    pub fn swap_interval(&self) -> Option<u32> {
        self.0.borrow().swap_interval
    }

    pub fn is_enabled(&self, cap: &str) -> bool {
        self.0.borrow().enabled.contains(cap)
    }

    pub fn polygon_mode(&self) -> Option<PolygonMode> {
        self.0.borrow().polygon_mode
    }

    fn log(&self, call: impl Into<String>) {
        self.0.borrow_mut().calls.push(call.into());
    }

    fn faults(&self) -> Faults {
        self.0.borrow().faults.clone()
    }
}

// ── MockPlatform ──────────────────────────────────────────────────────────

pub(crate) struct MockPlatform {
    ledger: Ledger,
}

impl MockPlatform {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }
}

impl Platform for MockPlatform {
    type Gl = MockGl;

    fn init(&mut self) -> Result<()> {
        if self.ledger.faults().init {
            return Err(GraphicsError::Init("injected".into()));
        }
        self.ledger.0.borrow_mut().initialized = true;
        self.ledger.log("init");
        Ok(())
    }

    fn quit(&mut self) {
        self.ledger.0.borrow_mut().initialized = false;
        self.ledger.log("quit");
    }

    fn create_window(&mut self, config: &GraphicsConfig) -> Result<WindowHandle> {
        if self.ledger.faults().create_window {
            return Err(GraphicsError::WindowCreate("injected".into()));
        }
        let mut s = self.ledger.0.borrow_mut();
        let id = s.id();
        s.windows.insert(id);
        if s.window_size == (0, 0) {
            s.window_size = (config.width, config.height);
        }
        s.calls.push("create_window".into());
        Ok(WindowHandle(id))
    }

    fn destroy_window(&mut self, window: WindowHandle) {
        let mut s = self.ledger.0.borrow_mut();
        if !s.contexts.is_empty() {
            s.calls.push("violation: window destroyed before context".into());
        }
        s.windows.remove(&window.0);
        s.calls.push("destroy_window".into());
    }

    fn create_gl_context(&mut self, window: WindowHandle, _request: &GlRequest) -> Result<ContextHandle> {
        if self.ledger.faults().create_context {
            return Err(GraphicsError::ContextCreate("injected".into()));
        }
        let mut s = self.ledger.0.borrow_mut();
        if !s.windows.contains(&window.0) {
            return Err(GraphicsError::ContextCreate("unknown window".into()));
        }
        let id = s.id();
        s.contexts.insert(id);
        s.calls.push("create_gl_context".into());
        Ok(ContextHandle(id))
    }

    fn destroy_gl_context(&mut self, context: ContextHandle) {
        let mut s = self.ledger.0.borrow_mut();
        s.contexts.remove(&context.0);
        if s.current == Some(context.0) {
            s.current = None;
        }
        s.calls.push("destroy_gl_context".into());
    }

    fn make_current(&mut self, _window: WindowHandle, context: ContextHandle) -> Result<()> {
        if self.ledger.faults().make_current {
            return Err(GraphicsError::MakeCurrent("injected".into()));
        }
        let mut s = self.ledger.0.borrow_mut();
        s.current = Some(context.0);
        s.calls.push("make_current".into());
        Ok(())
    }

    fn set_swap_interval(&mut self, interval: u32) -> Result<()> {
        if self.ledger.faults().swap_interval {
            return Err(GraphicsError::Platform("injected".into()));
        }
        self.ledger.0.borrow_mut().swap_interval = Some(interval);
        Ok(())
    }

    fn swap_buffers(&mut self, _window: WindowHandle) -> Result<()> {
        if self.ledger.faults().swap {
            return Err(GraphicsError::Swap("injected".into()));
        }
        let mut s = self.ledger.0.borrow_mut();
        s.swaps += 1;
        s.calls.push("swap".into());
        Ok(())
    }

    fn pump_events(&mut self) {
        let mut s = self.ledger.0.borrow_mut();
        s.pumps += 1;
        s.calls.push("pump".into());
    }

    fn poll_event(&mut self) -> Option<NativeEvent> {
        self.ledger.0.borrow_mut().queue.pop_front()
    }

    fn window_pixel_size(&self, _window: WindowHandle) -> (u32, u32) {
        self.ledger.0.borrow().window_size
    }

    fn mouse_state(&self) -> MouseState {
        self.ledger.0.borrow().mouse
    }

    fn is_key_pressed(&self, scancode: u32) -> bool {
        self.ledger.0.borrow().keys_down.contains(&scancode)
    }

    fn last_error(&self) -> String {
        String::new()
    }

    fn get_proc_address(&self, _name: &CStr) -> *const c_void {
        std::ptr::null()
    }

    fn load_gl(&mut self) -> Result<MockGl> {
        if self.ledger.faults().load_gl {
            return Err(GraphicsError::GlInitFailed("injected".into()));
        }
        self.ledger.log("load_gl");
        Ok(MockGl::new(self.ledger.clone()))
    }
}

// ── MockGl ────────────────────────────────────────────────────────────────

pub(crate) struct MockGl {
    ledger: Ledger,
}

impl MockGl {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }

    fn uniform_write(&self, loc: UniformLocation) {
        if loc.is_valid() {
            self.ledger.0.borrow_mut().uniform_writes += 1;
        }
    }
}

fn uniform_names(source: &str) -> impl Iterator<Item = String> + '_ {
    source
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with("uniform "))
        .filter_map(|l| l.trim_end_matches(';').split_whitespace().last())
        .map(str::to_string)
}

impl Gl for MockGl {
    fn version(&self) -> Option<String> {
        (!self.ledger.faults().null_version).then(|| "3.3.0 Mock".to_string())
    }

    fn create_shader(&self, _stage: ShaderStage) -> std::result::Result<ShaderId, String> {
        let mut s = self.ledger.0.borrow_mut();
        let id = s.id();
        s.shaders.insert(id, MockShader { source: String::new(), compiled: false });
        Ok(ShaderId(id))
    }

    fn shader_source(&self, shader: ShaderId, source: &str) {
        if let Some(sh) = self.ledger.0.borrow_mut().shaders.get_mut(&shader.0) {
            sh.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: ShaderId) {
        let fail = self.ledger.faults().compile;
        if let Some(sh) = self.ledger.0.borrow_mut().shaders.get_mut(&shader.0) {
            sh.compiled = !fail && sh.source.contains("void main()");
        }
    }

    fn shader_compile_status(&self, shader: ShaderId) -> bool {
        self.ledger.0.borrow().shaders.get(&shader.0).is_some_and(|s| s.compiled)
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        if self.shader_compile_status(shader) {
            String::new()
        } else {
            "0:2(1): error: syntax error, unexpected end of file".to_string()
        }
    }

    fn delete_shader(&self, shader: ShaderId) {
        self.ledger.0.borrow_mut().shaders.remove(&shader.0);
    }

    fn create_program(&self) -> std::result::Result<ProgramId, String> {
        let mut s = self.ledger.0.borrow_mut();
        let id = s.id();
        s.programs.insert(id, MockProgram::default());
        Ok(ProgramId(id))
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        if let Some(p) = self.ledger.0.borrow_mut().programs.get_mut(&program.0) {
            p.attached.push(shader.0);
        }
    }

    fn detach_shader(&self, program: ProgramId, shader: ShaderId) {
        if let Some(p) = self.ledger.0.borrow_mut().programs.get_mut(&program.0) {
            p.attached.retain(|&s| s != shader.0);
        }
    }

    fn link_program(&self, program: ProgramId) {
        let mut s = self.ledger.0.borrow_mut();
        let Some(attached) = s.programs.get(&program.0).map(|p| p.attached.clone()) else {
            return;
        };
        let uniforms: Vec<String> = attached
            .iter()
            .filter_map(|id| s.shaders.get(id))
            .flat_map(|sh| uniform_names(&sh.source).collect::<Vec<_>>())
            .collect();
        if let Some(p) = s.programs.get_mut(&program.0) {
            p.uniforms = uniforms;
        }
    }

    fn program_link_status(&self, program: ProgramId) -> bool {
        if self.ledger.faults().link_program {
            return false;
        }
        let s = self.ledger.0.borrow();
        s.programs.get(&program.0).is_some_and(|p| {
            p.attached.len() == 2
                && p.attached.iter().all(|id| s.shaders.get(id).is_some_and(|sh| sh.compiled))
        })
    }

    fn program_info_log(&self, _program: ProgramId) -> String {
        "error: linking with uncompiled/unspecialized shader".to_string()
    }

    fn delete_program(&self, program: ProgramId) {
        self.ledger.0.borrow_mut().programs.remove(&program.0);
    }

    fn use_program(&self, _program: Option<ProgramId>) {}

    fn uniform_location(&self, program: ProgramId, name: &str) -> UniformLocation {
        self.ledger
            .0
            .borrow()
            .programs
            .get(&program.0)
            .and_then(|p| p.uniforms.iter().position(|u| u == name))
            .map_or(UniformLocation::NONE, |i| UniformLocation(i as i32))
    }

    fn uniform_1_f32(&self, loc: UniformLocation, _x: f32) {
        self.uniform_write(loc);
    }

    fn uniform_2_f32(&self, loc: UniformLocation, _x: f32, _y: f32) {
        self.uniform_write(loc);
    }

    fn uniform_3_f32(&self, loc: UniformLocation, _x: f32, _y: f32, _z: f32) {
        self.uniform_write(loc);
    }

    fn uniform_4_f32(&self, loc: UniformLocation, _x: f32, _y: f32, _z: f32, _w: f32) {
        self.uniform_write(loc);
    }

    fn uniform_1_i32(&self, loc: UniformLocation, _x: i32) {
        self.uniform_write(loc);
    }

    fn uniform_matrix_4_f32(&self, loc: UniformLocation, _transpose: bool, _m: &[f32; 16]) {
        self.uniform_write(loc);
    }

    fn create_vertex_array(&self) -> std::result::Result<VertexArrayId, String> {
        if self.ledger.faults().create_vertex_array {
            return Err("injected".into());
        }
        let mut s = self.ledger.0.borrow_mut();
        let id = s.id();
        s.vertex_arrays.insert(id);
        Ok(VertexArrayId(id))
    }

    fn bind_vertex_array(&self, _vao: Option<VertexArrayId>) {}

    fn delete_vertex_array(&self, vao: VertexArrayId) {
        self.ledger.0.borrow_mut().vertex_arrays.remove(&vao.0);
    }

    fn create_buffer(&self) -> std::result::Result<BufferId, String> {
        if self.ledger.faults().create_buffer {
            return Err("injected".into());
        }
        let mut s = self.ledger.0.borrow_mut();
        let id = s.id();
        s.buffers.insert(id, 0);
        Ok(BufferId(id))
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferId>) {
        if target == BufferTarget::Array {
            self.ledger.0.borrow_mut().bound_array_buffer = buffer.map(|b| b.0);
        }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], _usage: BufferUsage) {
        let mut s = self.ledger.0.borrow_mut();
        if target == BufferTarget::Array {
            if let Some(id) = s.bound_array_buffer {
                s.buffers.insert(id, data.len());
            }
        }
    }

    fn delete_buffer(&self, buffer: BufferId) {
        let mut s = self.ledger.0.borrow_mut();
        s.buffers.remove(&buffer.0);
        if s.bound_array_buffer == Some(buffer.0) {
            s.bound_array_buffer = None;
        }
    }

    fn enable_vertex_attrib_array(&self, _index: u32) {}

    fn vertex_attrib_pointer_f32(&self, _index: u32, _size: i32, _stride: i32, _offset: i32) {}

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.ledger.0.borrow_mut().clear_color = Some([r, g, b, a]);
    }

    fn clear(&self, mask: ClearMask) {
        let mut s = self.ledger.0.borrow_mut();
        s.clears += 1;
        s.clear_mask = Some(mask);
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.ledger.0.borrow_mut().viewport = Some((x, y, width, height));
    }

    fn enable(&self, cap: Capability) {
        self.ledger.0.borrow_mut().enabled.insert(format!("{cap:?}"));
    }

    fn disable(&self, cap: Capability) {
        self.ledger.0.borrow_mut().enabled.remove(&format!("{cap:?}"));
    }

    fn blend_func(&self, _src: BlendFactor, _dst: BlendFactor) {}

    fn polygon_mode(&self, mode: PolygonMode) {
        self.ledger.0.borrow_mut().polygon_mode = Some(mode);
    }

    fn line_width(&self, _width: f32) {}

    fn point_size(&self, _size: f32) {}

    fn draw_arrays(&self, mode: Primitive, first: i32, count: i32) {
        self.ledger.0.borrow_mut().draws.push(DrawCall { mode, first, count });
    }

    fn draw_elements(&self, mode: Primitive, count: i32, _index_type: IndexType, offset: i32) {
        self.ledger.0.borrow_mut().draws.push(DrawCall { mode, first: offset, count });
    }
}
