use crate::backend::BackendError;

/// Errors returned by the playback session and its collaborators
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    #[error("Playback session has been released")]
    Released,

    #[error("Backend command failed: {0}")]
    Backend(#[from] BackendError),

    #[error("Contract violation: {0}")]
    ContractViolation(String),

    #[error("Invalid session configuration: {0}")]
    InvalidConfiguration(String),
}

pub type Result<T> = std::result::Result<T, PlayerError>;

/// Error value retained in the session's last-error slot
///
/// Unlike [`PlayerError`], this describes why *playback* failed rather than why
/// a call failed. It stays in the snapshot until a newer error replaces it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaybackError {
    #[error("Backend playback error {code}: {message}")]
    Backend { code: i32, message: String },

    #[error("Backend rejected command: {0}")]
    CommandRejected(String),

    #[error("{0}")]
    External(String),

    /// The engine raised an error notification without an error value
    #[error("Backend reported an error without details")]
    Unspecified,
}

impl PlaybackError {
    /// Create an engine-reported error
    pub fn backend(code: i32, message: impl Into<String>) -> Self {
        PlaybackError::Backend {
            code,
            message: message.into(),
        }
    }

    /// Create an error that originates outside the backend's event stream
    pub fn external(message: impl Into<String>) -> Self {
        PlaybackError::External(message.into())
    }
}

impl From<BackendError> for PlaybackError {
    fn from(err: BackendError) -> Self {
        PlaybackError::CommandRejected(err.to_string())
    }
}
