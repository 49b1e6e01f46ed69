//! Shader compilation, program linking and location lookup.

use crate::{
    foundation::error::{AlphaError, AlphaResult, ShaderStage},
    gpu::gl::{self, GlApi},
};

pub const A_POSITION: &str = "aPosition";
pub const A_TEXTURE_COORD: &str = "aTextureCoord";
pub const U_MVP_MATRIX: &str = "uMVPMatrix";
pub const U_ST_MATRIX: &str = "uSTMatrix";

/// A linked program plus the four locations the compositor binds every draw.
pub struct ProgramHandle<G: GlApi> {
    program: G::Program,
    pub position: u32,
    pub tex_coord: u32,
    pub mvp_matrix: G::UniformLocation,
    pub tex_matrix: G::UniformLocation,
}

impl<G: GlApi> ProgramHandle<G> {
    pub fn program(&self) -> G::Program {
        self.program
    }

    pub fn delete(self, gl: &G) {
        gl.delete_program(self.program);
    }
}

impl<G: GlApi> std::fmt::Debug for ProgramHandle<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgramHandle")
            .field("program", &self.program)
            .field("position", &self.position)
            .field("tex_coord", &self.tex_coord)
            .field("mvp_matrix", &self.mvp_matrix)
            .field("tex_matrix", &self.tex_matrix)
            .finish()
    }
}

fn compile_stage<G: GlApi>(gl: &G, stage: ShaderStage, source: &str) -> AlphaResult<G::Shader> {
    let kind = match stage {
        ShaderStage::Vertex => gl::VERTEX_SHADER,
        ShaderStage::Fragment => gl::FRAGMENT_SHADER,
    };
    let shader = gl
        .create_shader(kind)
        .map_err(|e| AlphaError::gl_create(format!("glCreateShader({stage}) failed: {e}")))?;
    gl.shader_source(shader, source);
    gl.compile_shader(shader);
    if !gl.shader_compile_status(shader) {
        let log = gl.shader_info_log(shader);
        gl.delete_shader(shader);
        tracing::error!(%stage, log = %log.trim(), "could not compile shader");
        return Err(AlphaError::shader_compile(stage, log));
    }
    Ok(shader)
}

/// Compile both stages, link them and resolve the required locations.
///
/// Every object allocated along the way is deleted before an error is returned.
pub fn create_program<G: GlApi>(
    gl: &G,
    vertex_source: &str,
    fragment_source: &str,
) -> AlphaResult<ProgramHandle<G>> {
    let vs = compile_stage(gl, ShaderStage::Vertex, vertex_source)?;
    let fs = match compile_stage(gl, ShaderStage::Fragment, fragment_source) {
        Ok(fs) => fs,
        Err(e) => {
            gl.delete_shader(vs);
            return Err(e);
        }
    };

    let program = match gl.create_program() {
        Ok(p) => p,
        Err(e) => {
            gl.delete_shader(vs);
            gl.delete_shader(fs);
            return Err(AlphaError::gl_create(format!(
                "glCreateProgram failed: {e}"
            )));
        }
    };
    gl.attach_shader(program, vs);
    gl.attach_shader(program, fs);
    gl.link_program(program);

    // The program keeps its own copy of the linked stages.
    gl.detach_shader(program, vs);
    gl.detach_shader(program, fs);
    gl.delete_shader(vs);
    gl.delete_shader(fs);

    if !gl.program_link_status(program) {
        let log = gl.program_info_log(program);
        gl.delete_program(program);
        tracing::error!(log = %log.trim(), "could not link program");
        return Err(AlphaError::program_link(log));
    }

    match resolve_locations(gl, program) {
        Ok(handle) => Ok(handle),
        Err(e) => {
            gl.delete_program(program);
            Err(e)
        }
    }
}

fn resolve_locations<G: GlApi>(gl: &G, program: G::Program) -> AlphaResult<ProgramHandle<G>> {
    let attrib = |name: &str| {
        gl.attrib_location(program, name)
            .ok_or_else(|| AlphaError::missing_location(name))
    };
    let uniform = |name: &str| {
        gl.uniform_location(program, name)
            .ok_or_else(|| AlphaError::missing_location(name))
    };

    Ok(ProgramHandle {
        program,
        position: attrib(A_POSITION)?,
        tex_coord: attrib(A_TEXTURE_COORD)?,
        mvp_matrix: uniform(U_MVP_MATRIX)?,
        tex_matrix: uniform(U_ST_MATRIX)?,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/gpu/program.rs"]
mod tests;
