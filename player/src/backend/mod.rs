mod simulated;

pub use simulated::{SimulatedBackend, SimulatedCommand};

use crate::error::{PlaybackError, PlayerError};
use crate::model::{Item, ItemId};
use std::sync::Arc;

/// Error types for backend command operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("Backend rejected {command}: {reason}")]
    CommandFailed {
        command: &'static str,
        reason: String,
    },

    #[error("Backend has been released")]
    Released,
}

/// Result type for backend command operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Engine-native description of one queued item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDescriptor {
    pub media_id: ItemId,
    pub uri: String,
    pub title: String,
}

impl From<&Item> for MediaDescriptor {
    fn from(item: &Item) -> Self {
        Self {
            media_id: item.id.clone(),
            uri: item.source_uri.clone(),
            title: item.title.clone(),
        }
    }
}

/// Command and query surface of a media-rendering engine
///
/// Implementations own decoding, buffering and output. They report progress
/// by calling the attached [`BackendListener`], possibly from their own
/// threads and possibly synchronously from inside a command. A backend must
/// not hold its own locks while calling the listener.
pub trait MediaBackend: Send + Sync {
    fn stop(&self) -> BackendResult<()>;
    fn clear_queue(&self) -> BackendResult<()>;
    fn add_item(&self, descriptor: MediaDescriptor) -> BackendResult<()>;
    fn prepare(&self) -> BackendResult<()>;
    fn play(&self) -> BackendResult<()>;
    fn pause(&self) -> BackendResult<()>;
    fn seek_next(&self) -> BackendResult<()>;
    fn seek_prev(&self) -> BackendResult<()>;

    fn has_next(&self) -> bool;
    fn has_prev(&self) -> bool;

    /// Id of the item the engine currently has loaded, if any
    fn current_active_id(&self) -> Option<ItemId>;

    /// Whether the engine starts playing by itself once it becomes ready
    fn set_play_when_ready(&self, play_when_ready: bool) -> BackendResult<()>;

    /// Attach a listener, or detach the current one with `None`
    fn set_listener(&self, listener: Option<Arc<dyn BackendListener>>);

    /// Free engine resources; later commands fail with [`BackendError::Released`]
    fn release(&self);
}

/// Raw notifications emitted by a media backend
pub trait BackendListener: Send + Sync {
    /// `code` is one of [`crate::model::state_code`]; anything else is a
    /// contract violation and is rejected
    fn on_playback_state_changed(&self, code: i32) -> Result<(), PlayerError>;

    fn on_is_playing_changed(&self, is_playing: bool);

    fn on_player_error(&self, error: Option<PlaybackError>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_from_item() {
        let item = Item::new("track-7", "https://cdn.example/7.ogg", "Seventh");
        let descriptor = MediaDescriptor::from(&item);

        assert_eq!(descriptor.media_id, ItemId::new("track-7"));
        assert_eq!(descriptor.uri, "https://cdn.example/7.ogg");
        assert_eq!(descriptor.title, "Seventh");
    }

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::CommandFailed {
            command: "prepare",
            reason: "no decoder".to_string(),
        };
        assert_eq!(err.to_string(), "Backend rejected prepare: no decoder");
    }
}
