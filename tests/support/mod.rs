#![allow(dead_code)]

use std::{
    cell::RefCell,
    path::{Path, PathBuf},
    rc::Rc,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use alphaplay::{
    AlphaError, AlphaResult, BuiltinShaders, Compositor, DecoderListener, FrameSync, MediaDecoder,
    PixelSize, PixelSurface, PixelTextureProducer, RecordingGl, RenderRequester, RendererConfig,
    SurfaceListener, VideoFrame,
};

pub type TestCompositor = Compositor<RecordingGl, PixelTextureProducer>;

/// Render requester that counts hints.
#[derive(Default)]
pub struct CountingRequester(AtomicUsize);

impl CountingRequester {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl RenderRequester for CountingRequester {
    fn request_render(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Surface listener that keeps the latest decoder-facing surface.
#[derive(Clone, Default)]
pub struct SurfaceSlot(pub Rc<RefCell<Option<PixelSurface>>>);

impl SurfaceSlot {
    pub fn take(&self) -> Option<PixelSurface> {
        self.0.borrow_mut().take()
    }
}

impl SurfaceListener<PixelSurface> for SurfaceSlot {
    fn on_surface_prepared(&mut self, surface: PixelSurface) {
        *self.0.borrow_mut() = Some(surface);
    }

    fn on_surface_destroyed(&mut self) {
        *self.0.borrow_mut() = None;
    }
}

pub fn compositor(
    config: RendererConfig,
    sync: Arc<FrameSync>,
    requester: Arc<CountingRequester>,
) -> (TestCompositor, SurfaceSlot) {
    let mut comp = Compositor::new(
        RecordingGl::new(),
        config,
        BuiltinShaders,
        PixelTextureProducer,
        sync,
        requester,
    )
    .expect("default config is valid");
    let slot = SurfaceSlot::default();
    comp.set_surface_listener(slot.clone());
    (comp, slot)
}

/// Decoder whose signals are fired by the test, standing in for a real playback engine.
#[derive(Default)]
pub struct ScriptedDecoder {
    pub listener: Option<Arc<dyn DecoderListener>>,
    pub surface: Option<PixelSurface>,
    pub source: Option<PathBuf>,
    pub video: PixelSize,
    pub log: Arc<Mutex<Vec<String>>>,
}

impl ScriptedDecoder {
    pub fn new(video: PixelSize) -> Self {
        Self {
            video,
            ..Self::default()
        }
    }

    pub fn signals(&self) -> Arc<dyn DecoderListener> {
        self.listener.clone().expect("controller installs a listener")
    }

    /// Write a solid packed frame to the attached surface.
    pub fn emit_frame(&self, fill: u8) {
        let surface = self.surface.as_ref().expect("surface attached");
        let frame = VideoFrame::new(self.video, vec![fill; self.video.rgba8_len()])
            .expect("frame matches video size");
        surface.submit(frame).expect("slot lock");
    }

    fn push(&self, entry: impl Into<String>) {
        self.log.lock().expect("log lock").push(entry.into());
    }
}

impl MediaDecoder for ScriptedDecoder {
    type Surface = PixelSurface;

    fn player_type(&self) -> &'static str {
        "ScriptedDecoder"
    }

    fn set_listener(&mut self, listener: Arc<dyn DecoderListener>) {
        self.listener = Some(listener);
    }

    fn set_surface(&mut self, surface: PixelSurface) {
        self.push("set_surface");
        self.surface = Some(surface);
    }

    fn set_source(&mut self, locator: &Path) -> AlphaResult<()> {
        self.push("set_source");
        self.source = Some(locator.to_path_buf());
        Ok(())
    }

    fn prepare_async(&mut self) -> AlphaResult<()> {
        self.push("prepare_async");
        Ok(())
    }

    fn start(&mut self) -> AlphaResult<()> {
        if self.surface.is_none() {
            return Err(AlphaError::state("no surface"));
        }
        self.push("start");
        Ok(())
    }

    fn pause(&mut self) -> AlphaResult<()> {
        self.push("pause");
        Ok(())
    }

    fn stop(&mut self) -> AlphaResult<()> {
        self.push("stop");
        Ok(())
    }

    fn reset(&mut self) -> AlphaResult<()> {
        self.push("reset");
        Ok(())
    }

    fn release(&mut self) {
        self.push("release");
        self.surface = None;
    }

    fn set_looping(&mut self, looping: bool) {
        self.push(format!("looping:{looping}"));
    }

    fn set_screen_on_while_playing(&mut self, on: bool) {
        self.push(format!("screen_on:{on}"));
    }

    fn video_dimensions(&self) -> AlphaResult<PixelSize> {
        PixelSize::non_empty(self.video.width, self.video.height)
    }
}
