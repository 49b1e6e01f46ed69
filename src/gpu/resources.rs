//! GPU objects scoped to one rendering surface.
//!
//! Everything created in a surface-created callback lives in one [`SurfaceResources`] value
//! tagged with the [`SurfaceGeneration`] that produced it. The whole set is either released
//! together while the context is current, or abandoned when the context is already gone.

use crate::{
    foundation::error::{AlphaError, AlphaResult},
    gpu::{
        gl::{self, GlApi},
        program::ProgramHandle,
    },
};

/// Monotonic counter of surface (re)creations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceGeneration(pub u64);

impl SurfaceGeneration {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for SurfaceGeneration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gen{}", self.0)
    }
}

/// Program, texture, vertex buffer and texture consumer for one surface generation.
pub struct SurfaceResources<G: GlApi, C> {
    pub generation: SurfaceGeneration,
    pub program: ProgramHandle<G>,
    pub texture: G::Texture,
    pub texture_target: u32,
    pub vertex_buffer: G::Buffer,
    pub consumer: C,
    /// Geometry revision currently stored in `vertex_buffer`.
    pub uploaded_revision: Option<u64>,
}

impl<G: GlApi, C> SurfaceResources<G, C> {
    /// Delete every GL object. The context that created them must be current.
    pub fn release(self, gl: &G) {
        tracing::debug!(generation = %self.generation, "releasing surface resources");
        gl.use_program(None);
        gl.bind_texture(self.texture_target, None);
        gl.bind_buffer(gl::ARRAY_BUFFER, None);
        gl.delete_buffer(self.vertex_buffer);
        gl.delete_texture(self.texture);
        self.program.delete(gl);
    }

    /// Drop the handles without touching GL; the objects died with their context.
    pub fn abandon(self) {
        tracing::debug!(generation = %self.generation, "abandoning surface resources");
    }
}

impl<G: GlApi, C> std::fmt::Debug for SurfaceResources<G, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceResources")
            .field("generation", &self.generation)
            .field("program", &self.program)
            .field("texture", &self.texture)
            .field("vertex_buffer", &self.vertex_buffer)
            .field("uploaded_revision", &self.uploaded_revision)
            .finish_non_exhaustive()
    }
}

/// Create the frame texture with the sampling state the compositor expects:
/// nearest minification, linear magnification, clamped edges.
pub fn create_frame_texture<G: GlApi>(gl: &G, target: u32) -> AlphaResult<G::Texture> {
    let texture = gl
        .create_texture()
        .map_err(|e| AlphaError::gl_create(format!("glGenTextures failed: {e}")))?;
    gl.bind_texture(target, Some(texture));
    gl.tex_parameter_i32(target, gl::TEXTURE_MIN_FILTER, gl::NEAREST as i32);
    gl.tex_parameter_i32(target, gl::TEXTURE_MAG_FILTER, gl::LINEAR as i32);
    gl.tex_parameter_i32(target, gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE as i32);
    gl.tex_parameter_i32(target, gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE as i32);
    Ok(texture)
}

pub fn create_vertex_buffer<G: GlApi>(gl: &G, bytes: &[u8]) -> AlphaResult<G::Buffer> {
    let buffer = gl
        .create_buffer()
        .map_err(|e| AlphaError::gl_create(format!("glGenBuffers failed: {e}")))?;
    gl.bind_buffer(gl::ARRAY_BUFFER, Some(buffer));
    gl.buffer_data(gl::ARRAY_BUFFER, bytes, gl::STATIC_DRAW);
    Ok(buffer)
}
