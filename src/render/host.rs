//! Contracts between the compositor and the view system hosting it.

/// Hint that the host should schedule a draw tick at its next opportunity.
///
/// Called from any execution context; implementations must not block.
pub trait RenderRequester: Send + Sync {
    fn request_render(&self);
}

impl<F> RenderRequester for F
where
    F: Fn() + Send + Sync,
{
    fn request_render(&self) {
        self()
    }
}

/// Requester for hosts that render continuously and ignore hints.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContinuousRendering;

impl RenderRequester for ContinuousRendering {
    fn request_render(&self) {}
}

/// Observer of the decoder-facing surface's lifetime.
///
/// `S` is whatever the texture producer hands to the decoder as its output target.
pub trait SurfaceListener<S> {
    fn on_surface_prepared(&mut self, surface: S);
    fn on_surface_destroyed(&mut self);
}
