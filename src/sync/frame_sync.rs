use std::sync::atomic::{AtomicBool, Ordering};

/// Flags shared between the decoder's callback context and the render context.
///
/// Each flag is independent and last-write-wins: writers never wait for the reader, and a
/// rapid set/clear pair may go unobserved. Every transition is a compare-and-set so a
/// repeated signal is a no-op rather than a second transition.
#[derive(Debug, Default)]
pub struct FrameSync {
    frame_pending: AtomicBool,
    composite_enabled: AtomicBool,
    teardown_requested: AtomicBool,
}

impl FrameSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoder wrote a new image into the shared texture. Returns `true` on the
    /// false-to-true edge.
    pub fn frame_available(&self) -> bool {
        self.frame_pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Render context: consume the pending frame, if any.
    pub fn take_frame_pending(&self) -> bool {
        self.frame_pending
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_frame_pending(&self) -> bool {
        self.frame_pending.load(Ordering::Acquire)
    }

    /// Decoder rendered its first frame: compositing becomes permitted.
    pub fn first_frame(&self) -> bool {
        let changed = self
            .composite_enabled
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        tracing::info!(changed, composite_enabled = true, "first frame");
        changed
    }

    /// Playback completed: later draw ticks clear only.
    pub fn completion(&self) -> bool {
        let changed = self.disable_compositing();
        tracing::info!(changed, composite_enabled = false, "completion");
        changed
    }

    /// Revoke compositing without a completion signal (errors, stop, release).
    pub fn disable_compositing(&self) -> bool {
        self.composite_enabled
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_composite_enabled(&self) -> bool {
        self.composite_enabled.load(Ordering::Acquire)
    }

    /// Ask the render context to release its GPU objects on its next tick.
    ///
    /// Compositing is revoked first, so the tick that performs the teardown never draws.
    pub fn request_teardown(&self) {
        self.disable_compositing();
        self.teardown_requested.store(true, Ordering::Release);
    }

    pub fn take_teardown(&self) -> bool {
        self.teardown_requested
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Drop a frame signal that refers to a texture from a previous surface.
    pub fn discard_pending(&self) {
        self.frame_pending.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sync/frame_sync.rs"]
mod tests;
