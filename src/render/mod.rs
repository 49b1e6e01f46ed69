pub mod compositor;
pub mod config;
pub mod host;
pub mod texture;

pub use compositor::{Compositor, DrawOutcome, RenderStats, RendererState};
pub use config::{RendererConfig, TextureTarget};
pub use host::{ContinuousRendering, RenderRequester, SurfaceListener};
pub use texture::{
    FrameNotifier, FrameTexture, PixelSurface, PixelTexture, PixelTextureProducer,
    TextureProducer, VideoFrame,
};
