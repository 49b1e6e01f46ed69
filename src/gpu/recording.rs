//! Headless [`GlApi`] that records commands and tracks live objects.
//!
//! Shaders "compile" unless their source contains an `#error` directive, and attribute or
//! uniform lookups succeed only for identifiers that appear in an attached shader's source,
//! which is enough to exercise every failure path of program creation without a driver.

use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet, VecDeque},
};

use crate::{
    foundation::core::Mat4,
    gpu::gl::{self, GlApi},
};

/// One recorded state-changing GL command.
#[derive(Clone, Debug, PartialEq)]
pub enum GlCall {
    CreateShader { id: u32, kind: u32 },
    DeleteShader(u32),
    CreateProgram(u32),
    DeleteProgram(u32),
    LinkProgram(u32),
    UseProgram(Option<u32>),
    UniformMatrix4 { location: u32, value: Mat4 },
    CreateTexture(u32),
    DeleteTexture(u32),
    BindTexture { target: u32, texture: Option<u32> },
    TexParameter { target: u32, pname: u32, value: i32 },
    TexImage {
        target: u32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        bytes: usize,
    },
    ActiveTexture(u32),
    CreateBuffer(u32),
    DeleteBuffer(u32),
    BindBuffer { target: u32, buffer: Option<u32> },
    BufferData { target: u32, bytes: Vec<u8> },
    VertexAttribPointer { index: u32, size: i32, stride: i32, offset: i32 },
    EnableVertexAttribArray(u32),
    DisableVertexAttribArray(u32),
    Viewport { x: i32, y: i32, width: i32, height: i32 },
    ClearColor([f32; 4]),
    Clear(u32),
    Enable(u32),
    Disable(u32),
    BlendFunc { src: u32, dst: u32 },
    DrawArrays { mode: u32, first: i32, count: i32 },
    Flush,
    Finish,
}

/// GPU objects that have been created and not yet deleted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LiveObjects {
    pub shaders: BTreeSet<u32>,
    pub programs: BTreeSet<u32>,
    pub textures: BTreeSet<u32>,
    pub buffers: BTreeSet<u32>,
}

impl LiveObjects {
    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
            && self.programs.is_empty()
            && self.textures.is_empty()
            && self.buffers.is_empty()
    }

    pub fn total(&self) -> usize {
        self.shaders.len() + self.programs.len() + self.textures.len() + self.buffers.len()
    }
}

#[derive(Default)]
struct State {
    next_id: u32,
    calls: Vec<GlCall>,
    live: LiveObjects,
    sources: BTreeMap<u32, String>,
    attached: BTreeMap<u32, BTreeSet<u32>>,
    linked: BTreeSet<u32>,
    locations: BTreeMap<(u32, String), u32>,
    pending_errors: VecDeque<u32>,
    fail_link: bool,
    fail_create_texture: bool,
}

impl State {
    fn alloc(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn program_mentions(&self, program: u32, name: &str) -> bool {
        let Some(shaders) = self.attached.get(&program) else {
            return false;
        };
        shaders.iter().any(|s| {
            self.sources.get(s).is_some_and(|src| {
                src.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .any(|w| w == name)
            })
        })
    }

    fn location(&mut self, program: u32, name: &str) -> Option<u32> {
        if !self.linked.contains(&program) || !self.program_mentions(program, name) {
            return None;
        }
        let next = self
            .locations
            .keys()
            .filter(|(p, _)| *p == program)
            .count() as u32;
        Some(
            *self
                .locations
                .entry((program, name.to_string()))
                .or_insert(next),
        )
    }
}

/// Recording, resource-tracking GL implementation.
#[derive(Default)]
pub struct RecordingGl {
    state: RefCell<State>,
}

impl RecordingGl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `glLinkProgram` report failure.
    pub fn fail_next_link(&self) {
        self.state.borrow_mut().fail_link = true;
    }

    /// Make the next `glGenTextures` fail.
    pub fn fail_next_texture(&self) {
        self.state.borrow_mut().fail_create_texture = true;
    }

    /// Queue an error code for the next `glGetError`.
    pub fn inject_error(&self, code: u32) {
        self.state.borrow_mut().pending_errors.push_back(code);
    }

    pub fn calls(&self) -> Vec<GlCall> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn live_objects(&self) -> LiveObjects {
        self.state.borrow().live.clone()
    }

    /// Number of `glDrawArrays` calls recorded since the last [`Self::clear_calls`].
    pub fn draw_count(&self) -> usize {
        self.count(|c| matches!(c, GlCall::DrawArrays { .. }))
    }

    /// Number of `glClear` calls recorded since the last [`Self::clear_calls`].
    pub fn clear_count(&self) -> usize {
        self.count(|c| matches!(c, GlCall::Clear(_)))
    }

    pub fn count(&self, pred: impl Fn(&GlCall) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: GlCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl GlApi for RecordingGl {
    type Shader = u32;
    type Program = u32;
    type Texture = u32;
    type Buffer = u32;
    type UniformLocation = u32;

    fn create_shader(&self, kind: u32) -> Result<u32, String> {
        let mut st = self.state.borrow_mut();
        let id = st.alloc();
        st.live.shaders.insert(id);
        st.calls.push(GlCall::CreateShader { id, kind });
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        self.state
            .borrow_mut()
            .sources
            .insert(shader, source.to_string());
    }

    fn compile_shader(&self, _shader: u32) {}

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.state
            .borrow()
            .sources
            .get(&shader)
            .is_some_and(|src| !src.contains("#error"))
    }

    fn shader_info_log(&self, shader: u32) -> String {
        let st = self.state.borrow();
        match st.sources.get(&shader) {
            Some(src) if src.contains("#error") => {
                let line = src
                    .lines()
                    .position(|l| l.contains("#error"))
                    .map_or(0, |i| i + 1);
                format!("ERROR: 0:{line}: '#error' : user-defined error")
            }
            _ => String::new(),
        }
    }

    fn delete_shader(&self, shader: u32) {
        let mut st = self.state.borrow_mut();
        st.live.shaders.remove(&shader);
        st.calls.push(GlCall::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<u32, String> {
        let mut st = self.state.borrow_mut();
        let id = st.alloc();
        st.live.programs.insert(id);
        st.calls.push(GlCall::CreateProgram(id));
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.state
            .borrow_mut()
            .attached
            .entry(program)
            .or_default()
            .insert(shader);
    }

    fn detach_shader(&self, _program: u32, _shader: u32) {
        // Sources stay reachable for location lookups, like a linked program's symbol table.
    }

    fn link_program(&self, program: u32) {
        let mut st = self.state.borrow_mut();
        if std::mem::take(&mut st.fail_link) {
            st.linked.remove(&program);
        } else {
            st.linked.insert(program);
        }
        st.calls.push(GlCall::LinkProgram(program));
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.state.borrow().linked.contains(&program)
    }

    fn program_info_log(&self, program: u32) -> String {
        if self.program_link_status(program) {
            String::new()
        } else {
            "error: varying mismatch between stages".to_string()
        }
    }

    fn delete_program(&self, program: u32) {
        let mut st = self.state.borrow_mut();
        st.live.programs.remove(&program);
        st.linked.remove(&program);
        st.calls.push(GlCall::DeleteProgram(program));
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(GlCall::UseProgram(program));
    }

    fn attrib_location(&self, program: u32, name: &str) -> Option<u32> {
        self.state.borrow_mut().location(program, name)
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<u32> {
        self.state.borrow_mut().location(program, name)
    }

    fn uniform_matrix4(&self, location: &u32, value: &Mat4) {
        self.record(GlCall::UniformMatrix4 {
            location: *location,
            value: *value,
        });
    }

    fn create_texture(&self) -> Result<u32, String> {
        let mut st = self.state.borrow_mut();
        if std::mem::take(&mut st.fail_create_texture) {
            return Err("out of texture names".to_string());
        }
        let id = st.alloc();
        st.live.textures.insert(id);
        st.calls.push(GlCall::CreateTexture(id));
        Ok(id)
    }

    fn bind_texture(&self, target: u32, texture: Option<u32>) {
        self.record(GlCall::BindTexture { target, texture });
    }

    fn tex_parameter_i32(&self, target: u32, pname: u32, value: i32) {
        self.record(GlCall::TexParameter {
            target,
            pname,
            value,
        });
    }

    fn tex_image_2d(
        &self,
        target: u32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: &[u8],
    ) {
        let mut st = self.state.borrow_mut();
        st.calls.push(GlCall::TexImage {
            target,
            internal_format,
            width,
            height,
            format,
            bytes: pixels.len(),
        });
        // ES 2.0 rules: external images are never specified this way, and no format
        // conversion happens on upload.
        if target == gl::TEXTURE_EXTERNAL_OES || ty != gl::UNSIGNED_BYTE {
            st.pending_errors.push_back(gl::INVALID_ENUM);
        } else if u32::try_from(internal_format).ok() != Some(format) {
            st.pending_errors.push_back(gl::INVALID_VALUE);
        }
    }

    fn active_texture(&self, unit: u32) {
        self.record(GlCall::ActiveTexture(unit));
    }

    fn delete_texture(&self, texture: u32) {
        let mut st = self.state.borrow_mut();
        st.live.textures.remove(&texture);
        st.calls.push(GlCall::DeleteTexture(texture));
    }

    fn create_buffer(&self) -> Result<u32, String> {
        let mut st = self.state.borrow_mut();
        let id = st.alloc();
        st.live.buffers.insert(id);
        st.calls.push(GlCall::CreateBuffer(id));
        Ok(id)
    }

    fn bind_buffer(&self, target: u32, buffer: Option<u32>) {
        self.record(GlCall::BindBuffer { target, buffer });
    }

    fn buffer_data(&self, target: u32, data: &[u8], _usage: u32) {
        self.record(GlCall::BufferData {
            target,
            bytes: data.to_vec(),
        });
    }

    fn delete_buffer(&self, buffer: u32) {
        let mut st = self.state.borrow_mut();
        st.live.buffers.remove(&buffer);
        st.calls.push(GlCall::DeleteBuffer(buffer));
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32) {
        self.record(GlCall::VertexAttribPointer {
            index,
            size,
            stride,
            offset,
        });
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(GlCall::EnableVertexAttribArray(index));
    }

    fn disable_vertex_attrib_array(&self, index: u32) {
        self.record(GlCall::DisableVertexAttribArray(index));
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(GlCall::Viewport {
            x,
            y,
            width,
            height,
        });
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.record(GlCall::ClearColor([r, g, b, a]));
    }

    fn clear(&self, mask: u32) {
        self.record(GlCall::Clear(mask));
    }

    fn enable(&self, cap: u32) {
        self.record(GlCall::Enable(cap));
    }

    fn disable(&self, cap: u32) {
        self.record(GlCall::Disable(cap));
    }

    fn blend_func(&self, src: u32, dst: u32) {
        self.record(GlCall::BlendFunc { src, dst });
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        self.record(GlCall::DrawArrays { mode, first, count });
    }

    fn flush(&self) {
        self.record(GlCall::Flush);
    }

    fn finish(&self) {
        self.record(GlCall::Finish);
    }

    fn get_error(&self) -> u32 {
        self.state
            .borrow_mut()
            .pending_errors
            .pop_front()
            .unwrap_or(gl::NO_ERROR)
    }
}
