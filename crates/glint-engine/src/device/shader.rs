//! Shader compilation and program linking.

use super::gl::{Gl, ProgramId, ShaderId, ShaderStage};
use crate::error::{GraphicsError, Result};

/// Diagnostic text beyond this many bytes is dropped.
pub const INFO_LOG_LIMIT: usize = 512;

/// Compiles `source` as a shader of `stage`.
///
/// On success the caller owns the returned shader and must delete it. On
/// failure the shader object is deleted before returning and the driver's
/// diagnostic text is carried in the error.
pub fn compile<G: Gl + ?Sized>(gl: &G, source: &str, stage: ShaderStage) -> Result<ShaderId> {
    let shader = gl.create_shader(stage).map_err(|log| {
        log::error!("failed to create {stage} shader: {log}");
        GraphicsError::ShaderCompile { stage, log }
    })?;

    gl.shader_source(shader, source);
    gl.compile_shader(shader);

    if !gl.shader_compile_status(shader) {
        let log = bounded_log(gl.shader_info_log(shader));
        gl.delete_shader(shader);
        log::error!("{stage} shader compilation failed:\n{log}");
        return Err(GraphicsError::ShaderCompile { stage, log });
    }

    Ok(shader)
}

/// Compiles both stages and links them into a program.
///
/// Shader objects never outlive this call: they are deleted whether linking
/// succeeds or fails. A program that fails to link is deleted as well.
pub fn link<G: Gl + ?Sized>(gl: &G, vertex_src: &str, fragment_src: &str) -> Result<ProgramId> {
    let vertex = compile(gl, vertex_src, ShaderStage::Vertex)?;

    let fragment = match compile(gl, fragment_src, ShaderStage::Fragment) {
        Ok(f) => f,
        Err(e) => {
            gl.delete_shader(vertex);
            return Err(e);
        }
    };

    let result = link_shaders(gl, vertex, fragment);

    gl.delete_shader(vertex);
    gl.delete_shader(fragment);

    result
}

fn link_shaders<G: Gl + ?Sized>(gl: &G, vertex: ShaderId, fragment: ShaderId) -> Result<ProgramId> {
    let program = gl.create_program().map_err(|log| {
        log::error!("failed to create program: {log}");
        GraphicsError::ProgramLink { log }
    })?;

    gl.attach_shader(program, vertex);
    gl.attach_shader(program, fragment);
    gl.link_program(program);

    if !gl.program_link_status(program) {
        let log = bounded_log(gl.program_info_log(program));
        gl.delete_program(program);
        log::error!("program link failed:\n{log}");
        return Err(GraphicsError::ProgramLink { log });
    }

    // The linked program keeps its own copy of the binaries.
    gl.detach_shader(program, vertex);
    gl.detach_shader(program, fragment);

    Ok(program)
}

/// Trims driver output to [`INFO_LOG_LIMIT`] bytes on a char boundary.
///
/// Drivers are not required to produce a log; an empty one is replaced so the
/// error always carries some text.
fn bounded_log(mut log: String) -> String {
    if log.len() > INFO_LOG_LIMIT {
        let mut end = INFO_LOG_LIMIT;
        while !log.is_char_boundary(end) {
            end -= 1;
        }
        log.truncate(end);
    }

    let trimmed = log.trim_end();
    if trimmed.is_empty() {
        "no diagnostic output from driver".to_string()
    } else {
        trimmed.to_string()
    }
}
