use crate::error::{PlaybackError, PlayerError};

/// Raw playback-state codes reported by media engines
pub mod state_code {
  pub const IDLE: i32 = 1;
  pub const BUFFERING: i32 = 2;
  pub const READY: i32 = 3;
  pub const ENDED: i32 = 4;
}

/// Backend notifications in the transition engine's vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
  Idle,
  Buffering,
  Ready,
  Ended,
  IsPlayingTrue,
  IsPlayingFalse,
  ErrorOccurred(PlaybackError),
}

impl BackendEvent {
  /// Decode a raw playback-state code
  ///
  /// Codes outside the known set mean the engine and this crate disagree on
  /// the protocol, which is reported as a contract violation.
  pub fn from_state_code(code: i32) -> Result<Self, PlayerError> {
    match code {
      state_code::IDLE => Ok(BackendEvent::Idle),
      state_code::BUFFERING => Ok(BackendEvent::Buffering),
      state_code::READY => Ok(BackendEvent::Ready),
      state_code::ENDED => Ok(BackendEvent::Ended),
      other => Err(PlayerError::ContractViolation(format!(
        "unknown playback state code {}",
        other
      ))),
    }
  }

  pub fn from_is_playing(is_playing: bool) -> Self {
    if is_playing {
      BackendEvent::IsPlayingTrue
    } else {
      BackendEvent::IsPlayingFalse
    }
  }

  /// A missing error value is replaced by [`PlaybackError::Unspecified`]
  pub fn from_error(error: Option<PlaybackError>) -> Self {
    BackendEvent::ErrorOccurred(error.unwrap_or(PlaybackError::Unspecified))
  }
}

/// Command the transition engine asks the adapter to send to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendCommand {
  StartPlayback,
}
