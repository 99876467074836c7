use serde::{Deserialize, Serialize};

use super::ItemId;

/// A playable item supplied by the caller
///
/// Items are immutable once created; the registry and the snapshot hold them
/// behind `Arc` instead of copying them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
  pub id: ItemId,
  pub source_uri: String,
  pub title: String,
}

impl Item {
  pub fn new(
    id: impl Into<ItemId>,
    source_uri: impl Into<String>,
    title: impl Into<String>,
  ) -> Self {
    Self {
      id: id.into(),
      source_uri: source_uri.into(),
      title: title.into(),
    }
  }
}
