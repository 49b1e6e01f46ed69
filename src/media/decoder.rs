//! The decoder capability set the player drives, and the signals it emits back.

use std::{path::Path, sync::Arc, time::Duration};

use crate::foundation::{core::PixelSize, error::AlphaResult};

/// Unspecified decoder failure.
pub const MEDIA_ERROR_UNKNOWN: i32 = 1;
/// File or network read failure.
pub const MEDIA_ERROR_IO: i32 = -1004;
/// Stream does not conform to its container or codec.
pub const MEDIA_ERROR_MALFORMED: i32 = -1007;
/// Feature not available in this build or on this platform.
pub const MEDIA_ERROR_UNSUPPORTED: i32 = -1010;

/// Lifecycle signals, delivered from the decoder's own execution context.
///
/// Implementations must return quickly and never call back into the decoder.
pub trait DecoderListener: Send + Sync {
    fn on_prepared(&self);
    /// The first decoded image has been written to the output surface.
    fn on_first_frame(&self);
    /// A frame was written to the output surface, `position` into the current pass.
    fn on_frame(&self, _position: Duration) {}
    fn on_completion(&self);
    fn on_error(&self, code: i32, extra: i32, message: &str);
}

/// A media playback engine writing decoded images into a render surface.
///
/// Backends are interchangeable; the renderer never branches on which one is in use.
pub trait MediaDecoder: Send {
    /// Output target handed over by the renderer's texture producer.
    type Surface;

    /// Stable backend name, reported to playback monitors.
    fn player_type(&self) -> &'static str;

    fn set_listener(&mut self, listener: Arc<dyn DecoderListener>);
    fn set_surface(&mut self, surface: Self::Surface);
    fn set_source(&mut self, locator: &Path) -> AlphaResult<()>;
    /// Start preparing; completion arrives as `on_prepared` or `on_error`.
    fn prepare_async(&mut self) -> AlphaResult<()>;
    fn start(&mut self) -> AlphaResult<()>;
    fn pause(&mut self) -> AlphaResult<()>;
    fn stop(&mut self) -> AlphaResult<()>;
    /// Return to the unconfigured state; a new source must be set afterwards.
    fn reset(&mut self) -> AlphaResult<()>;
    fn release(&mut self);
    fn set_looping(&mut self, looping: bool);
    fn set_screen_on_while_playing(&mut self, on: bool);
    /// Decoded (packed) video dimensions; valid once prepared.
    fn video_dimensions(&self) -> AlphaResult<PixelSize>;
    /// Total duration of one pass, if the container reports it.
    fn duration(&self) -> Option<Duration> {
        None
    }
}
