use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use player::PlaybackState;

const CAPACITY: usize = 200;

/// Bounded history of published states, newest last
#[derive(Clone, Default)]
pub struct EventLog {
  entries: Arc<Mutex<VecDeque<(u64, PlaybackState)>>>,
}

impl EventLog {
  /// Observer that appends every published state to this log
  pub fn observer(&self) -> impl Fn(PlaybackState) + Send + Sync + 'static {
    let entries = self.entries.clone();
    let published = AtomicU64::new(0);

    move |state: PlaybackState| {
      let sequence = published.fetch_add(1, Ordering::SeqCst) + 1;

      let mut entries = entries.lock().unwrap_or_else(PoisonError::into_inner);
      if entries.len() == CAPACITY {
        entries.pop_front();
      }
      entries.push_back((sequence, state));
    }
  }

  pub fn lines(&self) -> Vec<String> {
    self.entries
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .iter()
      .map(|(sequence, state)| format!("{:>4}  {}", sequence, state))
      .collect()
  }

  pub fn len(&self) -> usize {
    self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
  }
}
