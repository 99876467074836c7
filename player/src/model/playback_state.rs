use serde::{Deserialize, Serialize};

/// Logical, observer-facing playback status
///
/// Exactly one state is active at a time. The `is_*` predicates are derived
/// from it and never stored separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlaybackState {
  #[default]
  Idle,
  Waiting,
  Playing,
  Paused,
  Resumed,
  Stopped,
  Error,
}

impl PlaybackState {
  pub const ALL: [PlaybackState; 7] = [
    PlaybackState::Idle,
    PlaybackState::Waiting,
    PlaybackState::Playing,
    PlaybackState::Paused,
    PlaybackState::Resumed,
    PlaybackState::Stopped,
    PlaybackState::Error,
  ];

  /// Audio is flowing, either from a fresh start or after a pause
  pub fn is_playing(&self) -> bool {
    matches!(self, PlaybackState::Playing | PlaybackState::Resumed)
  }

  pub fn is_paused(&self) -> bool {
    matches!(self, PlaybackState::Paused)
  }

  pub fn is_stopped(&self) -> bool {
    matches!(self, PlaybackState::Stopped)
  }
}

impl std::fmt::Display for PlaybackState {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      PlaybackState::Idle => "idle",
      PlaybackState::Waiting => "waiting",
      PlaybackState::Playing => "playing",
      PlaybackState::Paused => "paused",
      PlaybackState::Resumed => "resumed",
      PlaybackState::Stopped => "stopped",
      PlaybackState::Error => "error",
    };
    write!(f, "{}", name)
  }
}
