//! The narrow slice of OpenGL (ES 2.0) the compositor needs.
//!
//! [`GlApi`] mirrors `glow::HasContext`: handles are associated types, creation returns
//! `Result<_, String>`, and everything takes `&self`. Implementations are render-thread
//! confined; nothing here is `Send` by requirement.

use std::fmt;

use crate::foundation::core::Mat4;

// Values mirror `glow`'s constants so the seam builds without the `glow` feature.

pub const NO_ERROR: u32 = 0;
pub const INVALID_ENUM: u32 = 0x0500;
pub const INVALID_VALUE: u32 = 0x0501;

pub const VERTEX_SHADER: u32 = 0x8B31;
pub const FRAGMENT_SHADER: u32 = 0x8B30;

pub const TEXTURE_2D: u32 = 0x0DE1;
pub const TEXTURE_EXTERNAL_OES: u32 = 0x8D65;
pub const TEXTURE0: u32 = 0x84C0;
pub const TEXTURE_MAG_FILTER: u32 = 0x2800;
pub const TEXTURE_MIN_FILTER: u32 = 0x2801;
pub const TEXTURE_WRAP_S: u32 = 0x2802;
pub const TEXTURE_WRAP_T: u32 = 0x2803;
pub const NEAREST: u32 = 0x2600;
pub const LINEAR: u32 = 0x2601;
pub const CLAMP_TO_EDGE: u32 = 0x812F;
pub const RGBA: u32 = 0x1908;
pub const UNSIGNED_BYTE: u32 = 0x1401;

pub const ARRAY_BUFFER: u32 = 0x8892;
pub const STATIC_DRAW: u32 = 0x88E4;
pub const FLOAT: u32 = 0x1406;

pub const DEPTH_BUFFER_BIT: u32 = 0x0000_0100;
pub const COLOR_BUFFER_BIT: u32 = 0x0000_4000;

pub const BLEND: u32 = 0x0BE2;
pub const ONE: u32 = 1;
pub const ONE_MINUS_SRC_ALPHA: u32 = 0x0303;

pub const TRIANGLE_STRIP: u32 = 0x0005;

/// GL entry points used by the shader manager and the compositor.
pub trait GlApi {
    type Shader: Copy + fmt::Debug;
    type Program: Copy + fmt::Debug;
    type Texture: Copy + fmt::Debug;
    type Buffer: Copy + fmt::Debug;
    type UniformLocation: Clone + fmt::Debug;

    fn create_shader(&self, kind: u32) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn delete_program(&self, program: Self::Program);
    fn use_program(&self, program: Option<Self::Program>);
    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;
    fn uniform_location(&self, program: Self::Program, name: &str)
    -> Option<Self::UniformLocation>;
    fn uniform_matrix4(&self, location: &Self::UniformLocation, value: &Mat4);

    fn create_texture(&self) -> Result<Self::Texture, String>;
    fn bind_texture(&self, target: u32, texture: Option<Self::Texture>);
    fn tex_parameter_i32(&self, target: u32, pname: u32, value: i32);
    /// `glTexImage2D` at level 0 with no border. ES 2.0 requires `internal_format == format`.
    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &self,
        target: u32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: &[u8],
    );
    fn active_texture(&self, unit: u32);
    fn delete_texture(&self, texture: Self::Texture);

    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    fn bind_buffer(&self, target: u32, buffer: Option<Self::Buffer>);
    fn buffer_data(&self, target: u32, data: &[u8], usage: u32);
    fn delete_buffer(&self, buffer: Self::Buffer);
    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32);
    fn enable_vertex_attrib_array(&self, index: u32);
    fn disable_vertex_attrib_array(&self, index: u32);

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&self, mask: u32);
    fn enable(&self, cap: u32);
    fn disable(&self, cap: u32);
    fn blend_func(&self, src: u32, dst: u32);
    fn draw_arrays(&self, mode: u32, first: i32, count: i32);
    fn flush(&self);
    fn finish(&self);
    fn get_error(&self) -> u32;
}

#[cfg(test)]
#[path = "../../tests/unit/gpu/gl.rs"]
mod tests;
