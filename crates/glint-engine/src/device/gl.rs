use std::ffi::{c_void, CStr};
use std::fmt;
use std::num::NonZeroU32;

use bitflags::bitflags;
use glow::HasContext;

/// GL shader object name.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ShaderId(pub u32);

/// GL program object name.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ProgramId(pub u32);

/// GL vertex array object name.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct VertexArrayId(pub u32);

/// GL buffer object name.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct BufferId(pub u32);

/// Uniform location within a program. `-1` means "not found".
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformLocation(pub i32);

impl UniformLocation {
    pub const NONE: UniformLocation = UniformLocation(-1);

    pub fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Capability {
    DepthTest,
    Blend,
    CullFace,
    ScissorTest,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstColor,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PolygonMode {
    Fill,
    Line,
    Point,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Primitive {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferTarget {
    Array,
    ElementArray,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferUsage {
    StaticDraw,
    DynamicDraw,
    StreamDraw,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum IndexType {
    U8,
    U16,
    U32,
}

bitflags! {
    #[derive(Debug, Copy, Clone, Eq, PartialEq)]
    pub struct ClearMask: u32 {
        const COLOR   = 1 << 0;
        const DEPTH   = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

/// Entry points that must resolve for the table to be considered complete.
pub(crate) const REQUIRED_ENTRY_POINTS: &[&CStr] = &[
    c"glGetString",
    c"glCreateShader",
    c"glShaderSource",
    c"glCompileShader",
    c"glGetShaderiv",
    c"glGetShaderInfoLog",
    c"glDeleteShader",
    c"glCreateProgram",
    c"glAttachShader",
    c"glLinkProgram",
    c"glGetProgramiv",
    c"glGetProgramInfoLog",
    c"glDeleteProgram",
    c"glUseProgram",
    c"glGetUniformLocation",
    c"glUniform1f",
    c"glUniform2f",
    c"glGenVertexArrays",
    c"glBindVertexArray",
    c"glGenBuffers",
    c"glBindBuffer",
    c"glBufferData",
    c"glVertexAttribPointer",
    c"glEnableVertexAttribArray",
    c"glClearColor",
    c"glClear",
    c"glViewport",
    c"glDrawArrays",
];

/// Names of required entry points `resolve` returns null for.
pub(crate) fn missing_entry_points<F>(mut resolve: F) -> Vec<&'static str>
where
    F: FnMut(&CStr) -> *const c_void,
{
    REQUIRED_ENTRY_POINTS
        .iter()
        .filter(|name| resolve(name).is_null())
        .map(|name| name.to_str().unwrap_or("<non-utf8>"))
        .collect()
}

/// The subset of GL the context drives.
///
/// Every call requires the owning context to be current on the calling thread.
pub trait Gl {
    /// `GL_VERSION`, or `None` when the driver reports nothing.
    fn version(&self) -> Option<String>;

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, String>;
    fn shader_source(&self, shader: ShaderId, source: &str);
    fn compile_shader(&self, shader: ShaderId);
    fn shader_compile_status(&self, shader: ShaderId) -> bool;
    fn shader_info_log(&self, shader: ShaderId) -> String;
    fn delete_shader(&self, shader: ShaderId);

    fn create_program(&self) -> Result<ProgramId, String>;
    fn attach_shader(&self, program: ProgramId, shader: ShaderId);
    fn detach_shader(&self, program: ProgramId, shader: ShaderId);
    fn link_program(&self, program: ProgramId);
    fn program_link_status(&self, program: ProgramId) -> bool;
    fn program_info_log(&self, program: ProgramId) -> String;
    fn delete_program(&self, program: ProgramId);
    fn use_program(&self, program: Option<ProgramId>);

    fn uniform_location(&self, program: ProgramId, name: &str) -> UniformLocation;
    fn uniform_1_f32(&self, location: UniformLocation, x: f32);
    fn uniform_2_f32(&self, location: UniformLocation, x: f32, y: f32);
    fn uniform_3_f32(&self, location: UniformLocation, x: f32, y: f32, z: f32);
    fn uniform_4_f32(&self, location: UniformLocation, x: f32, y: f32, z: f32, w: f32);
    fn uniform_1_i32(&self, location: UniformLocation, x: i32);
    fn uniform_matrix_4_f32(&self, location: UniformLocation, transpose: bool, m: &[f32; 16]);

    fn create_vertex_array(&self) -> Result<VertexArrayId, String>;
    fn bind_vertex_array(&self, vao: Option<VertexArrayId>);
    fn delete_vertex_array(&self, vao: VertexArrayId);

    fn create_buffer(&self) -> Result<BufferId, String>;
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferId>);
    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage);
    fn delete_buffer(&self, buffer: BufferId);

    fn enable_vertex_attrib_array(&self, index: u32);
    /// Float attribute with `size` components, `stride`/`offset` in bytes.
    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32);

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&self, mask: ClearMask);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);

    fn enable(&self, cap: Capability);
    fn disable(&self, cap: Capability);
    fn blend_func(&self, src: BlendFactor, dst: BlendFactor);
    fn polygon_mode(&self, mode: PolygonMode);
    fn line_width(&self, width: f32);
    fn point_size(&self, size: f32);

    fn draw_arrays(&self, mode: Primitive, first: i32, count: i32);
    /// `offset` is a byte offset into the bound element buffer.
    fn draw_elements(&self, mode: Primitive, count: i32, index_type: IndexType, offset: i32);
}

/// [`Gl`] over a loaded `glow::Context`.
pub struct GlowGl {
    gl: glow::Context,
    point_size: Option<PointSizeFn>,
}

type PointSizeFn = unsafe extern "system" fn(f32);

impl GlowGl {
    /// Loads the table through `loader`.
    ///
    /// # Safety
    ///
    /// A GL context must be current and `loader` must return valid entry points
    /// for it (or null).
    pub unsafe fn load<F>(mut loader: F) -> Self
    where
        F: FnMut(&CStr) -> *const c_void,
    {
        // Resolved by hand; not every glow release wraps it.
        let ptr = loader(c"glPointSize");
        let point_size = (!ptr.is_null())
            .then(|| unsafe { std::mem::transmute::<*const c_void, PointSizeFn>(ptr) });

        let gl = unsafe { glow::Context::from_loader_function_cstr(|s| loader(s)) };
        Self { gl, point_size }
    }

    /// The underlying glow context, for calls outside the [`Gl`] subset.
    pub fn raw(&self) -> &glow::Context {
        &self.gl
    }
}

fn shader(id: ShaderId) -> Option<glow::NativeShader> {
    NonZeroU32::new(id.0).map(glow::NativeShader)
}

fn program(id: ProgramId) -> Option<glow::NativeProgram> {
    NonZeroU32::new(id.0).map(glow::NativeProgram)
}

fn vertex_array(id: VertexArrayId) -> Option<glow::NativeVertexArray> {
    NonZeroU32::new(id.0).map(glow::NativeVertexArray)
}

fn buffer(id: BufferId) -> Option<glow::NativeBuffer> {
    NonZeroU32::new(id.0).map(glow::NativeBuffer)
}

fn location(loc: UniformLocation) -> Option<glow::NativeUniformLocation> {
    loc.is_valid().then(|| glow::NativeUniformLocation(loc.0 as u32))
}

fn stage_enum(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

fn capability_enum(cap: Capability) -> u32 {
    match cap {
        Capability::DepthTest => glow::DEPTH_TEST,
        Capability::Blend => glow::BLEND,
        Capability::CullFace => glow::CULL_FACE,
        Capability::ScissorTest => glow::SCISSOR_TEST,
    }
}

fn blend_factor_enum(f: BlendFactor) -> u32 {
    match f {
        BlendFactor::Zero => glow::ZERO,
        BlendFactor::One => glow::ONE,
        BlendFactor::SrcAlpha => glow::SRC_ALPHA,
        BlendFactor::OneMinusSrcAlpha => glow::ONE_MINUS_SRC_ALPHA,
        BlendFactor::DstColor => glow::DST_COLOR,
    }
}

fn primitive_enum(p: Primitive) -> u32 {
    match p {
        Primitive::Points => glow::POINTS,
        Primitive::Lines => glow::LINES,
        Primitive::LineStrip => glow::LINE_STRIP,
        Primitive::LineLoop => glow::LINE_LOOP,
        Primitive::Triangles => glow::TRIANGLES,
        Primitive::TriangleStrip => glow::TRIANGLE_STRIP,
        Primitive::TriangleFan => glow::TRIANGLE_FAN,
    }
}

fn target_enum(t: BufferTarget) -> u32 {
    match t {
        BufferTarget::Array => glow::ARRAY_BUFFER,
        BufferTarget::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
    }
}

fn usage_enum(u: BufferUsage) -> u32 {
    match u {
        BufferUsage::StaticDraw => glow::STATIC_DRAW,
        BufferUsage::DynamicDraw => glow::DYNAMIC_DRAW,
        BufferUsage::StreamDraw => glow::STREAM_DRAW,
    }
}

fn index_enum(t: IndexType) -> u32 {
    match t {
        IndexType::U8 => glow::UNSIGNED_BYTE,
        IndexType::U16 => glow::UNSIGNED_SHORT,
        IndexType::U32 => glow::UNSIGNED_INT,
    }
}

fn clear_bits(mask: ClearMask) -> u32 {
    let mut bits = 0;
    if mask.contains(ClearMask::COLOR) {
        bits |= glow::COLOR_BUFFER_BIT;
    }
    if mask.contains(ClearMask::DEPTH) {
        bits |= glow::DEPTH_BUFFER_BIT;
    }
    if mask.contains(ClearMask::STENCIL) {
        bits |= glow::STENCIL_BUFFER_BIT;
    }
    bits
}

// Object names of zero never come out of glow; calls on them are skipped.
impl Gl for GlowGl {
    fn version(&self) -> Option<String> {
        let version = unsafe { self.gl.get_parameter_string(glow::VERSION) };
        (!version.is_empty()).then_some(version)
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, String> {
        let s = unsafe { self.gl.create_shader(stage_enum(stage))? };
        Ok(ShaderId(s.0.get()))
    }

    fn shader_source(&self, id: ShaderId, source: &str) {
        if let Some(s) = shader(id) {
            unsafe { self.gl.shader_source(s, source) }
        }
    }

    fn compile_shader(&self, id: ShaderId) {
        if let Some(s) = shader(id) {
            unsafe { self.gl.compile_shader(s) }
        }
    }

    fn shader_compile_status(&self, id: ShaderId) -> bool {
        shader(id).is_some_and(|s| unsafe { self.gl.get_shader_compile_status(s) })
    }

    fn shader_info_log(&self, id: ShaderId) -> String {
        shader(id)
            .map(|s| unsafe { self.gl.get_shader_info_log(s) })
            .unwrap_or_default()
    }

    fn delete_shader(&self, id: ShaderId) {
        if let Some(s) = shader(id) {
            unsafe { self.gl.delete_shader(s) }
        }
    }

    fn create_program(&self) -> Result<ProgramId, String> {
        let p = unsafe { self.gl.create_program()? };
        Ok(ProgramId(p.0.get()))
    }

    fn attach_shader(&self, p: ProgramId, s: ShaderId) {
        if let (Some(p), Some(s)) = (program(p), shader(s)) {
            unsafe { self.gl.attach_shader(p, s) }
        }
    }

    fn detach_shader(&self, p: ProgramId, s: ShaderId) {
        if let (Some(p), Some(s)) = (program(p), shader(s)) {
            unsafe { self.gl.detach_shader(p, s) }
        }
    }

    fn link_program(&self, id: ProgramId) {
        if let Some(p) = program(id) {
            unsafe { self.gl.link_program(p) }
        }
    }

    fn program_link_status(&self, id: ProgramId) -> bool {
        program(id).is_some_and(|p| unsafe { self.gl.get_program_link_status(p) })
    }

    fn program_info_log(&self, id: ProgramId) -> String {
        program(id)
            .map(|p| unsafe { self.gl.get_program_info_log(p) })
            .unwrap_or_default()
    }

    fn delete_program(&self, id: ProgramId) {
        if let Some(p) = program(id) {
            unsafe { self.gl.delete_program(p) }
        }
    }

    fn use_program(&self, id: Option<ProgramId>) {
        unsafe { self.gl.use_program(id.and_then(program)) }
    }

    fn uniform_location(&self, id: ProgramId, name: &str) -> UniformLocation {
        program(id)
            .and_then(|p| unsafe { self.gl.get_uniform_location(p, name) })
            .map_or(UniformLocation::NONE, |loc| UniformLocation(loc.0 as i32))
    }

    fn uniform_1_f32(&self, loc: UniformLocation, x: f32) {
        unsafe { self.gl.uniform_1_f32(location(loc).as_ref(), x) }
    }

    fn uniform_2_f32(&self, loc: UniformLocation, x: f32, y: f32) {
        unsafe { self.gl.uniform_2_f32(location(loc).as_ref(), x, y) }
    }

    fn uniform_3_f32(&self, loc: UniformLocation, x: f32, y: f32, z: f32) {
        unsafe { self.gl.uniform_3_f32(location(loc).as_ref(), x, y, z) }
    }

    fn uniform_4_f32(&self, loc: UniformLocation, x: f32, y: f32, z: f32, w: f32) {
        unsafe { self.gl.uniform_4_f32(location(loc).as_ref(), x, y, z, w) }
    }

    fn uniform_1_i32(&self, loc: UniformLocation, x: i32) {
        unsafe { self.gl.uniform_1_i32(location(loc).as_ref(), x) }
    }

    fn uniform_matrix_4_f32(&self, loc: UniformLocation, transpose: bool, m: &[f32; 16]) {
        unsafe {
            self.gl
                .uniform_matrix_4_f32_slice(location(loc).as_ref(), transpose, m)
        }
    }

    fn create_vertex_array(&self) -> Result<VertexArrayId, String> {
        let vao = unsafe { self.gl.create_vertex_array()? };
        Ok(VertexArrayId(vao.0.get()))
    }

    fn bind_vertex_array(&self, id: Option<VertexArrayId>) {
        unsafe { self.gl.bind_vertex_array(id.and_then(vertex_array)) }
    }

    fn delete_vertex_array(&self, id: VertexArrayId) {
        if let Some(vao) = vertex_array(id) {
            unsafe { self.gl.delete_vertex_array(vao) }
        }
    }

    fn create_buffer(&self) -> Result<BufferId, String> {
        let b = unsafe { self.gl.create_buffer()? };
        Ok(BufferId(b.0.get()))
    }

    fn bind_buffer(&self, target: BufferTarget, id: Option<BufferId>) {
        unsafe { self.gl.bind_buffer(target_enum(target), id.and_then(buffer)) }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        unsafe {
            self.gl
                .buffer_data_u8_slice(target_enum(target), data, usage_enum(usage))
        }
    }

    fn delete_buffer(&self, id: BufferId) {
        if let Some(b) = buffer(id) {
            unsafe { self.gl.delete_buffer(b) }
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(index, size, glow::FLOAT, false, stride, offset)
        }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { self.gl.clear_color(r, g, b, a) }
    }

    fn clear(&self, mask: ClearMask) {
        unsafe { self.gl.clear(clear_bits(mask)) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn enable(&self, cap: Capability) {
        unsafe { self.gl.enable(capability_enum(cap)) }
    }

    fn disable(&self, cap: Capability) {
        unsafe { self.gl.disable(capability_enum(cap)) }
    }

    fn blend_func(&self, src: BlendFactor, dst: BlendFactor) {
        unsafe {
            self.gl
                .blend_func(blend_factor_enum(src), blend_factor_enum(dst))
        }
    }

    fn polygon_mode(&self, mode: PolygonMode) {
        let mode = match mode {
            PolygonMode::Fill => glow::FILL,
            PolygonMode::Line => glow::LINE,
            PolygonMode::Point => glow::POINT,
        };
        unsafe { self.gl.polygon_mode(glow::FRONT_AND_BACK, mode) }
    }

    fn line_width(&self, width: f32) {
        unsafe { self.gl.line_width(width) }
    }

    fn point_size(&self, size: f32) {
        if let Some(f) = self.point_size {
            unsafe { f(size) }
        }
    }

    fn draw_arrays(&self, mode: Primitive, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(primitive_enum(mode), first, count) }
    }

    fn draw_elements(&self, mode: Primitive, count: i32, index_type: IndexType, offset: i32) {
        unsafe {
            self.gl
                .draw_elements(primitive_enum(mode), count, index_enum(index_type), offset)
        }
    }
}
