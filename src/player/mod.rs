pub mod controller;
pub mod state;

pub use controller::{PlaybackMonitor, PlaybackReport, PlayerController, PlayerHooks, PlayerListener};
pub use state::PlayerState;
