use crate::foundation::error::{AlphaError, AlphaResult};

/// Playback lifecycle as seen by the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerState {
    #[default]
    NotPrepared,
    Preparing,
    Prepared,
    Started,
    Paused,
    Stopped,
    Released,
}

impl PlayerState {
    pub fn can_transition_to(self, next: PlayerState) -> bool {
        use PlayerState::*;
        match (self, next) {
            (Released, _) => false,
            (_, Released) => true,
            // Reset and decoder errors return any live state to the start.
            (_, NotPrepared) => true,
            (NotPrepared | Stopped, Preparing) => true,
            (Preparing, Prepared) => true,
            (Prepared | Paused, Started) => true,
            (Started, Paused) => true,
            (Prepared | Started | Paused, Stopped) => true,
            _ => false,
        }
    }

    pub fn transition(self, next: PlayerState) -> AlphaResult<PlayerState> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AlphaError::state(format!(
                "invalid player transition {self:?} -> {next:?}"
            )))
        }
    }

    /// Whether the decoder may currently be writing frames.
    pub fn is_playing(self) -> bool {
        matches!(self, PlayerState::Started)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/player/state.rs"]
mod tests;
