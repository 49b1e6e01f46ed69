pub mod diagnostics;
pub mod gl;
#[cfg(feature = "glow")]
pub mod glow_backend;
pub mod program;
pub mod recording;
pub mod resources;

pub use diagnostics::{GlDiagnostics, GlErrorRecord};
pub use gl::GlApi;
#[cfg(feature = "glow")]
pub use glow_backend::GlowGl;
pub use program::{ProgramHandle, create_program};
pub use recording::{GlCall, LiveObjects, RecordingGl};
pub use resources::{SurfaceGeneration, SurfaceResources};
