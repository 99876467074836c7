use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Opaque key identifying a queued item within one playback request
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  /// Returns the ID as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl std::fmt::Display for ItemId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl AsRef<str> for ItemId {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

impl Borrow<str> for ItemId {
  fn borrow(&self) -> &str {
    &self.0
  }
}

impl From<&str> for ItemId {
  fn from(id: &str) -> Self {
    Self::new(id)
  }
}

impl From<String> for ItemId {
  fn from(id: String) -> Self {
    Self(id)
  }
}
