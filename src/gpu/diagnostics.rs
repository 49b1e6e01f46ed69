use crate::gpu::gl::{self, GlApi};

/// `glGetError` can hold several sticky flags; a lost context may report forever.
const MAX_ERRORS_PER_CHECK: usize = 8;

/// A GL error observed after a named operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlErrorRecord {
    pub op: &'static str,
    pub code: u32,
}

/// Accumulated transient GL errors. Never aborts rendering; only makes failures observable.
#[derive(Clone, Debug, Default)]
pub struct GlDiagnostics {
    total: u64,
    last: Option<GlErrorRecord>,
}

impl GlDiagnostics {
    /// Drain pending GL errors, logging each against `op`. Returns `true` when clean.
    pub fn check<G: GlApi + ?Sized>(&mut self, gl: &G, op: &'static str) -> bool {
        let mut clean = true;
        for _ in 0..MAX_ERRORS_PER_CHECK {
            let code = gl.get_error();
            if code == gl::NO_ERROR {
                break;
            }
            clean = false;
            tracing::error!(op, code, "gl error");
            self.total = self.total.saturating_add(1);
            self.last = Some(GlErrorRecord { op, code });
        }
        clean
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn last(&self) -> Option<GlErrorRecord> {
        self.last
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gpu/diagnostics.rs"]
mod tests;
