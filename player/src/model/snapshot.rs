use std::sync::Arc;

use crate::error::PlaybackError;
use super::{Item, PlaybackState};

/// The last published view of the session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackSnapshot {
  pub state: PlaybackState,
  /// Item the backend reported as active at publish time
  pub current_item: Option<Arc<Item>>,
  /// Set on entering `Error`; never cleared when leaving it
  pub last_error: Option<PlaybackError>,
}
