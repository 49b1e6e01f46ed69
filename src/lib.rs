//! `alphaplay` composites side-by-side alpha videos onto an OpenGL surface.
//!
//! A decoded frame carries its alpha channel in the left half and its color in the right
//! half. The [`Compositor`] samples both halves, emits premultiplied RGBA and blends it with
//! `ONE, ONE_MINUS_SRC_ALPHA`, so the video appears over arbitrary content without an opaque
//! rectangle.
//!
//! The crate is split along execution contexts:
//! - the render context owns a [`Compositor`] (GL objects, geometry, draw ticks)
//! - the decoder context runs a [`MediaDecoder`] and signals through [`FrameSync`]
//! - the embedder drives a [`PlayerController`] and observes it via [`PlayerListener`]
//!
//! GL access goes through [`GlApi`]; [`GlowGl`] wraps a real context and [`RecordingGl`]
//! records commands headlessly for tests and dry runs.
#![deny(unsafe_code)]

pub mod foundation;
pub mod geometry;
pub mod gpu;
pub mod media;
pub mod player;
pub mod render;
pub mod shaders;
pub mod sync;

pub use foundation::core::{IDENTITY, Mat4, Orientation, PixelSize};
pub use foundation::error::{AlphaError, AlphaResult, ShaderStage};
pub use geometry::{FrameGeometry, ScaleMode, ScalePolicy, color_frame_size, compute_geometry};
pub use gpu::{GlApi, GlDiagnostics, ProgramHandle, RecordingGl, create_program};
#[cfg(feature = "glow")]
pub use gpu::GlowGl;
pub use media::{DataSource, DecoderListener, FfmpegDecoder, MediaDecoder, MediaEntry};
pub use player::{
    PlaybackMonitor, PlaybackReport, PlayerController, PlayerHooks, PlayerListener, PlayerState,
};
pub use render::{
    Compositor, DrawOutcome, FrameNotifier, FrameTexture, PixelSurface, PixelTextureProducer,
    RenderRequester, RenderStats, RendererConfig, RendererState, SurfaceListener, TextureProducer,
    TextureTarget, VideoFrame,
};
pub use shaders::{BuiltinShaders, DirShaderSource, ShaderSource, StaticShaders};
pub use sync::FrameSync;
