//! Built-in fullscreen quad used when no render callback is set.

use super::gl::{
    BufferId, BufferTarget, BufferUsage, ClearMask, Gl, Primitive, ProgramId, UniformLocation,
    VertexArrayId,
};
use super::shader;
use crate::config::GlRequest;
use crate::error::{GraphicsError, Result};

/// Two triangles spanning clip space, no index buffer.
pub(crate) const QUAD_VERTICES: [[f32; 2]; 6] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [1.0, 1.0],
    [-1.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
];

pub(crate) const QUAD_VERTEX_COUNT: i32 = QUAD_VERTICES.len() as i32;

const VERTEX_BODY: &str = r#"
layout(location = 0) in vec2 a_Position;
out vec2 v_Uv;

void main() {
    v_Uv = a_Position * 0.5 + 0.5;
    gl_Position = vec4(a_Position, 0.0, 1.0);
}
"#;

const FRAGMENT_BODY: &str = r#"
in vec2 v_Uv;
out vec4 o_Color;

uniform float u_Time;
uniform vec2 u_Resolution;

void main() {
    vec2 p = (gl_FragCoord.xy / max(u_Resolution, vec2(1.0))) * 2.0 - 1.0;
    float v = sin(p.x * 6.0 + u_Time)
            + sin(p.y * 5.0 - u_Time * 1.3)
            + sin(length(p) * 8.0 - u_Time * 2.0);
    vec3 c = 0.5 + 0.5 * cos(vec3(0.0, 2.1, 4.2) + v + u_Time * 0.25);
    o_Color = vec4(c * (0.6 + 0.4 * v_Uv.y), 1.0);
}
"#;

/// `#version` line for the requested context.
///
/// `layout(location)` needs GLSL 3.30; older requests fall back to 1.50 with
/// the explicit attribute location extension.
pub(crate) fn glsl_header(request: &GlRequest) -> String {
    let (major, minor) = (request.major, request.minor);
    let profile = if request.core_profile { " core" } else { "" };

    if (major, minor) >= (3, 3) {
        format!("#version {major}{minor}0{profile}\n")
    } else {
        "#version 150\n#extension GL_ARB_explicit_attrib_location : require\n".to_string()
    }
}

/// GPU resources of the default renderer.
#[derive(Debug)]
pub(crate) struct DefaultQuad {
    pub program: ProgramId,
    pub vao: VertexArrayId,
    pub vbo: BufferId,
    pub u_time: UniformLocation,
    pub u_resolution: UniformLocation,
}

impl DefaultQuad {
    /// Builds the program, VAO and VBO.
    ///
    /// On failure everything created here is deleted before returning.
    pub fn new<G: Gl + ?Sized>(gl: &G, request: &GlRequest) -> Result<Self> {
        let header = glsl_header(request);
        let vs = format!("{header}{VERTEX_BODY}");
        let fs = format!("{header}{FRAGMENT_BODY}");

        let program = shader::link(gl, &vs, &fs)?;

        let vao = match gl.create_vertex_array() {
            Ok(vao) => vao,
            Err(e) => {
                gl.delete_program(program);
                return Err(GraphicsError::Platform(format!("failed to create vertex array: {e}")));
            }
        };

        let vbo = match gl.create_buffer() {
            Ok(vbo) => vbo,
            Err(e) => {
                gl.delete_vertex_array(vao);
                gl.delete_program(program);
                return Err(GraphicsError::Platform(format!("failed to create vertex buffer: {e}")));
            }
        };

        gl.bind_vertex_array(Some(vao));
        gl.bind_buffer(BufferTarget::Array, Some(vbo));
        gl.buffer_data(
            BufferTarget::Array,
            bytemuck::cast_slice(&QUAD_VERTICES),
            BufferUsage::StaticDraw,
        );
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 2, std::mem::size_of::<[f32; 2]>() as i32, 0);
        gl.bind_vertex_array(None);
        gl.bind_buffer(BufferTarget::Array, None);

        // Either may be optimized out; draw skips missing uniforms.
        let u_time = gl.uniform_location(program, "u_Time");
        let u_resolution = gl.uniform_location(program, "u_Resolution");
        log::debug!("default program uniforms: u_Time={u_time:?} u_Resolution={u_resolution:?}");

        Ok(Self {
            program,
            vao,
            vbo,
            u_time,
            u_resolution,
        })
    }

    /// Clears to opaque black and draws the quad over a `size` pixel viewport.
    pub fn draw<G: Gl + ?Sized>(&self, gl: &G, size: (u32, u32), time: f32) {
        let (w, h) = size;

        gl.clear_color(0.0, 0.0, 0.0, 1.0);
        gl.clear(ClearMask::COLOR);

        gl.use_program(Some(self.program));
        gl.viewport(0, 0, w as i32, h as i32);

        if self.u_resolution.is_valid() {
            gl.uniform_2_f32(self.u_resolution, w as f32, h as f32);
        }
        if self.u_time.is_valid() {
            gl.uniform_1_f32(self.u_time, time);
        }

        gl.bind_vertex_array(Some(self.vao));
        gl.draw_arrays(Primitive::Triangles, 0, QUAD_VERTEX_COUNT);
        gl.bind_vertex_array(None);
    }

    /// Deletes the GPU objects. The owning context must be current.
    pub fn destroy<G: Gl + ?Sized>(&self, gl: &G) {
        gl.delete_buffer(self.vbo);
        gl.delete_vertex_array(self.vao);
        gl.delete_program(self.program);
    }
}
