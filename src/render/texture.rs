//! Handoff of decoded images from the decoder context to the render context.
//!
//! A [`TextureProducer`] binds a consumer ([`FrameTexture`]) to the compositor's GL texture
//! and returns the surface the decoder writes into. Producers announce new images through a
//! [`FrameNotifier`]; the compositor latches them on its next tick.

use std::sync::{Arc, Mutex};

use crate::{
    foundation::{
        core::{FLIP_V, Mat4, PixelSize},
        error::{AlphaError, AlphaResult},
    },
    gpu::gl::{self, GlApi},
    render::{config::TextureTarget, host::RenderRequester},
    sync::FrameSync,
};

/// Consumer side of the shared texture, owned by the render context.
pub trait FrameTexture<G: GlApi> {
    /// Latch the most recently produced image into the GL texture.
    fn update_tex_image(&mut self, gl: &G) -> AlphaResult<()>;

    /// Transform from quad texture coordinates to the latched image's coordinates.
    fn transform_matrix(&self) -> Mat4;
}

/// Factory for a consumer/surface pair bound to one GL texture.
pub trait TextureProducer<G: GlApi> {
    type Consumer: FrameTexture<G>;
    type Surface: Clone + Send + 'static;

    /// Whether consumers from this producer can be bound to `target`.
    fn supports_target(&self, _target: TextureTarget) -> bool {
        true
    }

    fn attach(
        &mut self,
        gl: &G,
        target: u32,
        texture: G::Texture,
        notifier: FrameNotifier,
    ) -> AlphaResult<(Self::Consumer, Self::Surface)>;
}

/// Frame-available signal: marks a frame pending and hints the host to render.
#[derive(Clone)]
pub struct FrameNotifier {
    sync: Arc<FrameSync>,
    requester: Arc<dyn RenderRequester>,
}

impl FrameNotifier {
    pub fn new(sync: Arc<FrameSync>, requester: Arc<dyn RenderRequester>) -> Self {
        Self { sync, requester }
    }

    pub fn frame_available(&self) {
        self.sync.frame_available();
        self.requester.request_render();
    }

    pub fn sync(&self) -> &Arc<FrameSync> {
        &self.sync
    }
}

impl std::fmt::Debug for FrameNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameNotifier")
            .field("sync", &self.sync)
            .finish_non_exhaustive()
    }
}

/// One decoded image: tightly packed RGBA8, rows top-first, premultiplied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoFrame {
    pub size: PixelSize,
    pub rgba: Vec<u8>,
}

impl VideoFrame {
    pub fn new(size: PixelSize, rgba: Vec<u8>) -> AlphaResult<Self> {
        if size.is_empty() {
            return Err(AlphaError::validation("video frame has zero dimensions"));
        }
        if rgba.len() != size.rgba8_len() {
            return Err(AlphaError::validation(format!(
                "video frame byte length mismatch: got {}, expected {} for {}x{}",
                rgba.len(),
                size.rgba8_len(),
                size.width,
                size.height
            )));
        }
        Ok(Self { size, rgba })
    }
}

type FrameSlot = Arc<Mutex<Option<VideoFrame>>>;

/// Producer for decoders that hand over CPU pixel buffers.
#[derive(Clone, Copy, Debug, Default)]
pub struct PixelTextureProducer;

impl<G: GlApi> TextureProducer<G> for PixelTextureProducer {
    type Consumer = PixelTexture<G>;
    type Surface = PixelSurface;

    /// CPU uploads go through `glTexImage2D`, which external textures do not accept.
    fn supports_target(&self, target: TextureTarget) -> bool {
        target == TextureTarget::Texture2d
    }

    fn attach(
        &mut self,
        _gl: &G,
        target: u32,
        texture: G::Texture,
        notifier: FrameNotifier,
    ) -> AlphaResult<(PixelTexture<G>, PixelSurface)> {
        if target != gl::TEXTURE_2D {
            return Err(AlphaError::validation(format!(
                "pixel uploads need GL_TEXTURE_2D, got target {target:#06x}"
            )));
        }
        let slot = FrameSlot::default();
        let consumer = PixelTexture {
            slot: Arc::clone(&slot),
            target,
            texture,
            latched: None,
        };
        Ok((consumer, PixelSurface { slot, notifier }))
    }
}

/// Decoder-facing end of a [`PixelTextureProducer`]. Cloneable and `Send`.
#[derive(Clone, Debug)]
pub struct PixelSurface {
    slot: FrameSlot,
    notifier: FrameNotifier,
}

impl PixelSurface {
    /// Replace the pending image. Unlatched images are overwritten, never queued.
    pub fn submit(&self, frame: VideoFrame) -> AlphaResult<()> {
        {
            let mut slot = self
                .slot
                .lock()
                .map_err(|_| AlphaError::state("frame slot lock poisoned"))?;
            *slot = Some(frame);
        }
        self.notifier.frame_available();
        Ok(())
    }

    pub fn notifier(&self) -> &FrameNotifier {
        &self.notifier
    }
}

/// Render-side end of a [`PixelTextureProducer`].
pub struct PixelTexture<G: GlApi> {
    slot: FrameSlot,
    target: u32,
    texture: G::Texture,
    latched: Option<PixelSize>,
}

impl<G: GlApi> PixelTexture<G> {
    /// Dimensions of the last image uploaded to the texture.
    pub fn latched_size(&self) -> Option<PixelSize> {
        self.latched
    }
}

impl<G: GlApi> FrameTexture<G> for PixelTexture<G> {
    fn update_tex_image(&mut self, gl: &G) -> AlphaResult<()> {
        let frame = self
            .slot
            .lock()
            .map_err(|_| AlphaError::state("frame slot lock poisoned"))?
            .take();
        let Some(frame) = frame else {
            return Ok(());
        };
        let width = i32::try_from(frame.size.width)
            .map_err(|_| AlphaError::validation("frame width exceeds GL limits"))?;
        let height = i32::try_from(frame.size.height)
            .map_err(|_| AlphaError::validation("frame height exceeds GL limits"))?;
        gl.bind_texture(self.target, Some(self.texture));
        gl.tex_image_2d(
            self.target,
            gl::RGBA as i32,
            width,
            height,
            gl::RGBA,
            gl::UNSIGNED_BYTE,
            &frame.rgba,
        );
        self.latched = Some(frame.size);
        Ok(())
    }

    fn transform_matrix(&self) -> Mat4 {
        FLIP_V
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/texture.rs"]
mod tests;
