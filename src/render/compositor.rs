//! The per-surface renderer: latches decoded frames and blends them onto the target.
//!
//! A [`Compositor`] is confined to the render context. The host drives it with
//! `on_surface_created`, `on_surface_changed` and repeated `on_draw_frame` ticks; decoder
//! signals reach it only through [`FrameSync`] and the texture producer's surface.
//!
//! Draw tick:
//! 1. Perform a requested teardown, if any.
//! 2. Latch the newest frame if one is pending and refresh the texture transform.
//! 3. Clear to transparent black.
//! 4. If compositing is permitted, issue one blended triangle-strip draw of the quad.

use std::sync::Arc;

use kurbo::Size;

use crate::{
    foundation::{
        core::{IDENTITY, Mat4, PixelSize},
        error::{AlphaError, AlphaResult},
    },
    geometry::{
        POSITION_OFFSET_BYTES, ScaleMode, ScalePolicy, UV_OFFSET_BYTES, VERTEX_STRIDE_BYTES,
        color_frame_size,
    },
    gpu::{
        diagnostics::GlDiagnostics,
        gl::{self, GlApi},
        program::create_program,
        resources::{SurfaceGeneration, SurfaceResources, create_frame_texture, create_vertex_buffer},
    },
    render::{
        config::RendererConfig,
        host::{RenderRequester, SurfaceListener},
        texture::{FrameNotifier, FrameTexture, TextureProducer},
    },
    shaders::ShaderSource,
    sync::FrameSync,
};

/// Lifecycle of the compositor with respect to its rendering surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RendererState {
    /// No surface has been created yet.
    Uninitialized,
    /// GPU objects exist for the given surface generation.
    Ready(SurfaceGeneration),
    /// GPU objects were released on request; the context is still current.
    Released,
    /// The surface and its context are gone.
    Destroyed,
    /// Initialization failed fatally. Terminal: later surfaces are refused.
    Failed(String),
}

/// What a single draw tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    /// Cleared and issued the textured draw.
    Drawn,
    /// Cleared only.
    Cleared,
    /// No GL work at all (no current surface).
    Skipped,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub ticks: u64,
    pub draws: u64,
    pub clears_only: u64,
    pub latches: u64,
    pub geometry_uploads: u64,
}

pub struct Compositor<G: GlApi, P: TextureProducer<G>> {
    gl: G,
    config: RendererConfig,
    shaders: Box<dyn ShaderSource>,
    producer: P,
    sync: Arc<FrameSync>,
    requester: Arc<dyn RenderRequester>,
    listener: Option<Box<dyn SurfaceListener<P::Surface>>>,
    policy: ScalePolicy,
    generation: SurfaceGeneration,
    resources: Option<SurfaceResources<G, P::Consumer>>,
    state: RendererState,
    /// A surface (and its context) exists between created and destroyed.
    surface_alive: bool,
    tex_matrix: Mat4,
    viewport: Option<PixelSize>,
    diagnostics: GlDiagnostics,
    stats: RenderStats,
}

impl<G: GlApi, P: TextureProducer<G>> Compositor<G, P> {
    pub fn new(
        gl: G,
        config: RendererConfig,
        shaders: impl ShaderSource + 'static,
        producer: P,
        sync: Arc<FrameSync>,
        requester: Arc<dyn RenderRequester>,
    ) -> AlphaResult<Self> {
        config.validate()?;
        if !producer.supports_target(config.texture_target) {
            return Err(AlphaError::validation(format!(
                "texture producer cannot feed the {:?} texture target",
                config.texture_target
            )));
        }
        let policy = ScalePolicy::new(config.scale_mode);
        Ok(Self {
            gl,
            config,
            shaders: Box::new(shaders),
            producer,
            sync,
            requester,
            listener: None,
            policy,
            generation: SurfaceGeneration::default(),
            resources: None,
            state: RendererState::Uninitialized,
            surface_alive: false,
            tex_matrix: IDENTITY,
            viewport: None,
            diagnostics: GlDiagnostics::default(),
            stats: RenderStats::default(),
        })
    }

    pub fn set_surface_listener(&mut self, listener: impl SurfaceListener<P::Surface> + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn gl(&self) -> &G {
        &self.gl
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn state(&self) -> &RendererState {
        &self.state
    }

    pub fn generation(&self) -> SurfaceGeneration {
        self.generation
    }

    pub fn policy(&self) -> &ScalePolicy {
        &self.policy
    }

    pub fn diagnostics(&self) -> &GlDiagnostics {
        &self.diagnostics
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn sync(&self) -> &Arc<FrameSync> {
        &self.sync
    }

    pub fn viewport(&self) -> Option<PixelSize> {
        self.viewport
    }

    /// Texture transform latched on the most recent frame.
    pub fn texture_matrix(&self) -> Mat4 {
        self.tex_matrix
    }

    pub fn set_scale_mode(&mut self, mode: ScaleMode) {
        self.config.scale_mode = mode;
        self.policy.set_mode(mode);
    }

    /// Size of the visible color frame.
    pub fn set_frame_size(&mut self, frame: PixelSize) {
        self.policy.set_frame_pixels(frame);
    }

    /// Size reported by the decoder for a side-by-side packed stream.
    pub fn measure_video(&mut self, video: PixelSize) {
        self.set_frame_size(color_frame_size(video));
    }

    /// Build every GPU object for a fresh surface and hand the decoder-facing surface to the
    /// listener. Objects from a previous generation are abandoned, not deleted: their context
    /// no longer exists.
    #[tracing::instrument(skip(self), fields(generation))]
    pub fn on_surface_created(&mut self) -> AlphaResult<()> {
        if let RendererState::Failed(reason) = &self.state {
            self.surface_alive = true;
            return Err(AlphaError::state(format!(
                "renderer failed permanently: {reason}"
            )));
        }
        self.surface_alive = true;
        self.generation = self.generation.next();
        tracing::Span::current().record("generation", self.generation.0);
        if let Some(stale) = self.resources.take() {
            stale.abandon();
        }

        match self.build_resources() {
            Ok((resources, surface)) => {
                self.resources = Some(resources);
                self.tex_matrix = IDENTITY;
                self.state = RendererState::Ready(self.generation);
                self.sync.discard_pending();
                if let Some(listener) = self.listener.as_mut() {
                    listener.on_surface_prepared(surface);
                }
                tracing::info!(generation = %self.generation, "surface prepared");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "renderer initialization failed");
                self.sync.disable_compositing();
                self.state = RendererState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    fn build_resources(&mut self) -> AlphaResult<(SurfaceResources<G, P::Consumer>, P::Surface)> {
        let vertex_source = self.shaders.load_text(&self.config.vertex_shader)?;
        let fragment_source = self.shaders.load_text(self.config.fragment_shader_name())?;
        let program = create_program(&self.gl, &vertex_source, &fragment_source)?;
        self.diagnostics.check(&self.gl, "glLinkProgram");

        let target = self.config.texture_target.gl_enum();
        let texture = match create_frame_texture(&self.gl, target) {
            Ok(t) => t,
            Err(e) => {
                program.delete(&self.gl);
                return Err(e);
            }
        };
        self.diagnostics.check(&self.gl, "glTexParameter");

        let vertex_buffer = match create_vertex_buffer(&self.gl, self.policy.geometry().as_bytes()) {
            Ok(b) => b,
            Err(e) => {
                self.gl.delete_texture(texture);
                program.delete(&self.gl);
                return Err(e);
            }
        };

        let notifier = FrameNotifier::new(Arc::clone(&self.sync), Arc::clone(&self.requester));
        let (consumer, surface) = match self.producer.attach(&self.gl, target, texture, notifier) {
            Ok(pair) => pair,
            Err(e) => {
                self.gl.delete_buffer(vertex_buffer);
                self.gl.delete_texture(texture);
                program.delete(&self.gl);
                return Err(e);
            }
        };

        Ok((
            SurfaceResources {
                generation: self.generation,
                program,
                texture,
                texture_target: target,
                vertex_buffer,
                consumer,
                uploaded_revision: Some(self.policy.revision()),
            },
            surface,
        ))
    }

    #[tracing::instrument(skip(self))]
    pub fn on_surface_changed(&mut self, width: u32, height: u32) {
        let w = i32::try_from(width).unwrap_or(i32::MAX);
        let h = i32::try_from(height).unwrap_or(i32::MAX);
        self.gl.viewport(0, 0, w, h);
        self.viewport = Some(PixelSize::new(width, height));
        self.policy
            .set_viewport(Size::new(f64::from(width), f64::from(height)));
    }

    /// Forget every GL handle; the context is already gone.
    #[tracing::instrument(skip(self))]
    pub fn on_surface_destroyed(&mut self) {
        if let Some(resources) = self.resources.take() {
            resources.abandon();
        }
        self.sync.discard_pending();
        self.surface_alive = false;
        if !matches!(self.state, RendererState::Failed(_)) {
            self.state = RendererState::Destroyed;
        }
        if let Some(listener) = self.listener.as_mut() {
            listener.on_surface_destroyed();
        }
    }

    /// Delete this generation's GL objects. Must run on the render context.
    pub fn release_resources(&mut self) {
        if let Some(resources) = self.resources.take() {
            resources.release(&self.gl);
            self.diagnostics.check(&self.gl, "release");
            self.state = RendererState::Released;
        }
    }

    pub fn on_draw_frame(&mut self) -> DrawOutcome {
        self.stats.ticks += 1;
        if self.sync.take_teardown() {
            tracing::debug!("teardown requested");
            self.release_resources();
        }

        if !self.surface_alive {
            return DrawOutcome::Skipped;
        }
        let Some(res) = self.resources.as_mut() else {
            return match self.state {
                RendererState::Released | RendererState::Failed(_) => {
                    clear_target(&self.gl);
                    self.gl.flush();
                    self.stats.clears_only += 1;
                    DrawOutcome::Cleared
                }
                _ => DrawOutcome::Skipped,
            };
        };

        if self.sync.take_frame_pending() {
            match res.consumer.update_tex_image(&self.gl) {
                Ok(()) => {
                    self.tex_matrix = res.consumer.transform_matrix();
                    self.stats.latches += 1;
                    tracing::trace!("frame latched");
                }
                Err(e) => tracing::warn!(error = %e, "frame latch failed"),
            }
            self.diagnostics.check(&self.gl, "updateTexImage");
        }

        clear_target(&self.gl);

        if !self.sync.is_composite_enabled() {
            self.gl.flush();
            self.stats.clears_only += 1;
            return DrawOutcome::Cleared;
        }

        let gl = &self.gl;
        let diag = &mut self.diagnostics;

        gl.bind_buffer(gl::ARRAY_BUFFER, Some(res.vertex_buffer));
        if res.uploaded_revision != Some(self.policy.revision()) {
            gl.buffer_data(
                gl::ARRAY_BUFFER,
                self.policy.geometry().as_bytes(),
                gl::STATIC_DRAW,
            );
            res.uploaded_revision = Some(self.policy.revision());
            self.stats.geometry_uploads += 1;
            diag.check(gl, "glBufferData");
        }

        gl.enable(gl::BLEND);
        gl.blend_func(gl::ONE, gl::ONE_MINUS_SRC_ALPHA);

        gl.use_program(Some(res.program.program()));
        diag.check(gl, "glUseProgram");

        gl.active_texture(gl::TEXTURE0);
        gl.bind_texture(res.texture_target, Some(res.texture));

        let position = res.program.position;
        gl.vertex_attrib_pointer_f32(position, 3, VERTEX_STRIDE_BYTES, POSITION_OFFSET_BYTES);
        diag.check(gl, "glVertexAttribPointer aPosition");
        gl.enable_vertex_attrib_array(position);
        diag.check(gl, "glEnableVertexAttribArray aPosition");

        let tex_coord = res.program.tex_coord;
        gl.vertex_attrib_pointer_f32(tex_coord, 2, VERTEX_STRIDE_BYTES, UV_OFFSET_BYTES);
        diag.check(gl, "glVertexAttribPointer aTextureCoord");
        gl.enable_vertex_attrib_array(tex_coord);
        diag.check(gl, "glEnableVertexAttribArray aTextureCoord");

        gl.uniform_matrix4(&res.program.mvp_matrix, &IDENTITY);
        gl.uniform_matrix4(&res.program.tex_matrix, &self.tex_matrix);

        gl.draw_arrays(gl::TRIANGLE_STRIP, 0, 4);
        diag.check(gl, "glDrawArrays");
        gl.flush();

        self.stats.draws += 1;
        DrawOutcome::Drawn
    }
}

fn clear_target<G: GlApi>(gl: &G) {
    gl.clear_color(0.0, 0.0, 0.0, 0.0);
    gl.clear(gl::DEPTH_BUFFER_BIT | gl::COLOR_BUFFER_BIT);
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
