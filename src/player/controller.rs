//! Drives a [`MediaDecoder`] and routes its signals to the renderer and the embedder.
//!
//! Decoder callbacks land on the decoder's own context. They only touch [`FrameSync`], the
//! render-request hint, the shared [`PlayerState`] and the registered observers, so they
//! never wait on the render context or on the controller itself.

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use crate::{
    foundation::{
        core::{Orientation, PixelSize},
        error::{AlphaError, AlphaResult},
    },
    geometry::{ScaleMode, color_frame_size},
    media::{
        data_source::DataSource,
        decoder::{DecoderListener, MediaDecoder},
    },
    player::state::PlayerState,
    render::host::RenderRequester,
    sync::FrameSync,
};

/// Embedder-facing lifecycle observer. Every method defaults to a no-op.
pub trait PlayerListener: Send + Sync {
    fn on_prepared(&self) {}
    /// `video` is the decoded (packed) size, `color` the visible frame derived from it.
    fn on_video_size_known(&self, _video: PixelSize, _color: PixelSize) {}
    fn on_first_frame(&self) {}
    /// Called for every displayed frame with its position in the current pass.
    fn on_frame(&self, _position: Duration) {}
    fn on_completion(&self) {}
    fn on_error(&self, _error: &AlphaError) {}
}

/// Outcome of one playback attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaybackReport {
    pub success: bool,
    pub player_type: &'static str,
    pub code: i32,
    pub extra: i32,
    pub message: String,
}

pub trait PlaybackMonitor: Send + Sync {
    fn monitor(&self, report: &PlaybackReport);
}

#[derive(Clone, Default)]
pub struct PlayerHooks {
    pub listener: Option<Arc<dyn PlayerListener>>,
    pub monitor: Option<Arc<dyn PlaybackMonitor>>,
}

/// The decoder's listener: shared between the controller and the decoder's context.
struct SignalRouter {
    sync: Arc<FrameSync>,
    requester: Arc<dyn RenderRequester>,
    state: Mutex<PlayerState>,
    hooks: PlayerHooks,
    player_type: &'static str,
}

impl SignalRouter {
    fn lock_state(&self) -> AlphaResult<MutexGuard<'_, PlayerState>> {
        self.state
            .lock()
            .map_err(|_| AlphaError::state("player state lock poisoned"))
    }

    fn state(&self) -> PlayerState {
        self.lock_state()
            .map(|s| *s)
            .unwrap_or(PlayerState::Released)
    }

    fn advance(&self, next: PlayerState) -> AlphaResult<()> {
        let mut state = self.lock_state()?;
        *state = state.transition(next)?;
        tracing::debug!(state = ?next, "player state");
        Ok(())
    }

    /// Transition only if currently in `from`; used by decoder callbacks, which may race
    /// with a reset issued by the controller.
    fn advance_from(&self, from: &[PlayerState], next: PlayerState) -> bool {
        match self.lock_state() {
            Ok(mut state) if from.contains(&*state) => {
                *state = next;
                tracing::debug!(state = ?next, "player state");
                true
            }
            Ok(state) => {
                tracing::debug!(current = ?*state, ignored = ?next, "stale decoder signal");
                false
            }
            Err(_) => false,
        }
    }

    fn report(&self, success: bool, code: i32, extra: i32, message: &str) {
        if let Some(monitor) = &self.hooks.monitor {
            monitor.monitor(&PlaybackReport {
                success,
                player_type: self.player_type,
                code,
                extra,
                message: message.to_string(),
            });
        }
    }

    fn fail(&self, error: &AlphaError) {
        let (code, extra) = match error {
            AlphaError::Decoder { code, extra, .. } => (*code, *extra),
            _ => (0, 0),
        };
        self.report(false, code, extra, &error.to_string());
        if let Some(listener) = &self.hooks.listener {
            listener.on_error(error);
        }
    }
}

impl DecoderListener for SignalRouter {
    fn on_prepared(&self) {
        if self.advance_from(&[PlayerState::Preparing], PlayerState::Prepared) {
            if let Some(listener) = &self.hooks.listener {
                listener.on_prepared();
            }
        }
    }

    fn on_first_frame(&self) {
        self.sync.first_frame();
        self.requester.request_render();
        self.report(true, 0, 0, "");
        if let Some(listener) = &self.hooks.listener {
            listener.on_first_frame();
        }
    }

    fn on_frame(&self, position: Duration) {
        if let Some(listener) = &self.hooks.listener {
            listener.on_frame(position);
        }
    }

    fn on_completion(&self) {
        self.sync.completion();
        self.requester.request_render();
        self.advance_from(&[PlayerState::Started], PlayerState::Stopped);
        if let Some(listener) = &self.hooks.listener {
            listener.on_completion();
        }
    }

    fn on_error(&self, code: i32, extra: i32, message: &str) {
        self.sync.disable_compositing();
        self.requester.request_render();
        tracing::warn!(code, extra, message, "decoder error");
        self.advance_from(
            &[
                PlayerState::Preparing,
                PlayerState::Prepared,
                PlayerState::Started,
                PlayerState::Paused,
                PlayerState::Stopped,
            ],
            PlayerState::NotPrepared,
        );
        self.fail(&AlphaError::decoder(code, extra, message));
    }
}

/// Owns one decoder and sequences its lifecycle.
pub struct PlayerController<D: MediaDecoder> {
    decoder: D,
    router: Arc<SignalRouter>,
    video_size: Option<PixelSize>,
    scale_mode: ScaleMode,
}

impl<D: MediaDecoder> PlayerController<D> {
    pub fn new(
        mut decoder: D,
        sync: Arc<FrameSync>,
        requester: Arc<dyn RenderRequester>,
        hooks: PlayerHooks,
    ) -> Self {
        let router = Arc::new(SignalRouter {
            sync,
            requester,
            state: Mutex::new(PlayerState::NotPrepared),
            hooks,
            player_type: decoder.player_type(),
        });
        decoder.set_listener(router.clone());
        Self {
            decoder,
            router,
            video_size: None,
            scale_mode: ScaleMode::default(),
        }
    }

    pub fn state(&self) -> PlayerState {
        self.router.state()
    }

    pub fn player_type(&self) -> &'static str {
        self.router.player_type
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    pub fn decoder_mut(&mut self) -> &mut D {
        &mut self.decoder
    }

    /// Decoded size, known once playback has been started.
    pub fn video_size(&self) -> Option<PixelSize> {
        self.video_size
    }

    /// Scale mode of the entry chosen by the last [`Self::start_with`].
    pub fn scale_mode(&self) -> ScaleMode {
        self.scale_mode
    }

    /// Hand the renderer's output surface to the decoder.
    pub fn attach_surface(&mut self, surface: D::Surface) {
        self.decoder.set_surface(surface);
    }

    /// Pick the entry for `orientation`, configure the decoder and begin preparing.
    ///
    /// Returns the entry's scale mode, which the embedder applies to the compositor.
    #[tracing::instrument(skip(self, source))]
    pub fn start_with(
        &mut self,
        source: &DataSource,
        orientation: Orientation,
    ) -> AlphaResult<ScaleMode> {
        let result = self.configure(source, orientation);
        if let Err(e) = &result {
            self.router.fail(e);
        }
        result
    }

    fn configure(&mut self, source: &DataSource, orientation: Orientation) -> AlphaResult<ScaleMode> {
        source.validate()?;
        let path = source.resolve_path(orientation)?;
        let scale_mode = source
            .entry_for(orientation)
            .map(|e| e.scale_mode)
            .unwrap_or_default();

        if self.state() != PlayerState::NotPrepared {
            self.reset()?;
        }
        self.decoder.set_source(&path)?;
        self.decoder.set_looping(source.looping);
        self.decoder.set_screen_on_while_playing(true);
        self.router.advance(PlayerState::Preparing)?;
        if let Err(e) = self.decoder.prepare_async() {
            self.router.advance(PlayerState::NotPrepared)?;
            return Err(e);
        }
        tracing::info!(path = %path.display(), ?scale_mode, "preparing");
        self.scale_mode = scale_mode;
        self.video_size = None;
        Ok(scale_mode)
    }

    /// Total duration of the current source, when the decoder knows it.
    pub fn duration(&self) -> Option<Duration> {
        self.decoder.duration()
    }

    /// Start after preparation, or resume after a pause.
    ///
    /// The state reads `Started` before the decoder is told to run, so signals it emits
    /// from inside `start` (or right after, from its own context) see the new state.
    pub fn start(&mut self) -> AlphaResult<()> {
        let previous = self.state();
        previous.transition(PlayerState::Started)?;
        if previous == PlayerState::Prepared {
            let video = self.decoder.video_dimensions()?;
            self.video_size = Some(video);
            if let Some(listener) = &self.router.hooks.listener {
                listener.on_video_size_known(video, color_frame_size(video));
            }
        }
        self.router.advance(PlayerState::Started)?;
        if let Err(e) = self.decoder.start() {
            self.router.advance_from(&[PlayerState::Started], previous);
            self.router.fail(&e);
            return Err(e);
        }
        Ok(())
    }

    pub fn pause(&mut self) -> AlphaResult<()> {
        self.state().transition(PlayerState::Paused)?;
        self.decoder.pause()?;
        self.router.advance(PlayerState::Paused)
    }

    /// Stop playback. Compositing is revoked first so no further frame is drawn.
    pub fn stop(&mut self) -> AlphaResult<()> {
        self.state().transition(PlayerState::Stopped)?;
        self.router.sync.disable_compositing();
        self.router.requester.request_render();
        self.decoder.stop()?;
        self.router.advance(PlayerState::Stopped)
    }

    /// Stop playback and report it to the listener as a finished playback.
    pub fn stop_with_finish_callback(&mut self) -> AlphaResult<()> {
        self.stop()?;
        if let Some(listener) = &self.router.hooks.listener {
            listener.on_completion();
        }
        Ok(())
    }

    pub fn reset(&mut self) -> AlphaResult<()> {
        self.state().transition(PlayerState::NotPrepared)?;
        self.router.sync.disable_compositing();
        self.decoder.reset()?;
        self.video_size = None;
        self.router.advance(PlayerState::NotPrepared)
    }

    /// Tear everything down: revoke compositing, release the decoder, then ask the render
    /// context to free its GPU objects on its next tick.
    pub fn release(&mut self) {
        if self.state() == PlayerState::Released {
            return;
        }
        self.router.sync.disable_compositing();
        self.decoder.release();
        self.router.sync.request_teardown();
        self.router.requester.request_render();
        if let Err(e) = self.router.advance(PlayerState::Released) {
            tracing::warn!(error = %e, "release");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/player/controller.rs"]
mod tests;
