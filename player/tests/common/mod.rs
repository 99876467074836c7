// Shared fixtures for the integration tests

#![allow(dead_code)]

use player::{
    BackendListener, BackendResult, ItemId, MediaBackend, MediaDescriptor, PlaybackError,
    PlaybackState, PlayerError, PlayerObserver,
};
use std::sync::{Arc, Mutex};

/// Backend that only records commands; tests push raw notifications by hand
#[derive(Default)]
pub struct ScriptedBackend {
    inner: Mutex<Scripted>,
}

#[derive(Default)]
struct Scripted {
    calls: Vec<String>,
    queue: Vec<ItemId>,
    active: Option<usize>,
    listener: Option<Arc<dyn BackendListener>>,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    pub fn has_listener(&self) -> bool {
        self.inner.lock().unwrap().listener.is_some()
    }

    pub fn set_active(&self, index: Option<usize>) {
        self.inner.lock().unwrap().active = index;
    }

    /// The attached listener, kept by the caller to outlive a detach
    pub fn listener_handle(&self) -> Option<Arc<dyn BackendListener>> {
        self.inner.lock().unwrap().listener.clone()
    }

    fn listener(&self) -> Arc<dyn BackendListener> {
        self.inner
            .lock()
            .unwrap()
            .listener
            .clone()
            .expect("no listener attached")
    }

    pub fn emit_state(&self, code: i32) -> Result<(), PlayerError> {
        self.listener().on_playback_state_changed(code)
    }

    pub fn emit_is_playing(&self, is_playing: bool) {
        self.listener().on_is_playing_changed(is_playing);
    }

    pub fn emit_error(&self, error: Option<PlaybackError>) {
        self.listener().on_player_error(error);
    }

    fn record(&self, call: &str) -> BackendResult<()> {
        self.inner.lock().unwrap().calls.push(call.to_string());
        Ok(())
    }
}

impl MediaBackend for ScriptedBackend {
    fn stop(&self) -> BackendResult<()> {
        self.record("stop")
    }

    fn clear_queue(&self) -> BackendResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.queue.clear();
        inner.active = None;
        inner.calls.push("clear_queue".to_string());
        Ok(())
    }

    fn add_item(&self, descriptor: MediaDescriptor) -> BackendResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("add_item:{}", descriptor.media_id));
        inner.queue.push(descriptor.media_id);
        if inner.active.is_none() {
            inner.active = Some(0);
        }
        Ok(())
    }

    fn prepare(&self) -> BackendResult<()> {
        self.record("prepare")
    }

    fn play(&self) -> BackendResult<()> {
        self.record("play")
    }

    fn pause(&self) -> BackendResult<()> {
        self.record("pause")
    }

    fn seek_next(&self) -> BackendResult<()> {
        self.record("seek_next")
    }

    fn seek_prev(&self) -> BackendResult<()> {
        self.record("seek_prev")
    }

    fn has_next(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        matches!(inner.active, Some(i) if i + 1 < inner.queue.len())
    }

    fn has_prev(&self) -> bool {
        matches!(self.inner.lock().unwrap().active, Some(i) if i > 0)
    }

    fn current_active_id(&self) -> Option<ItemId> {
        let inner = self.inner.lock().unwrap();
        inner.active.and_then(|i| inner.queue.get(i).cloned())
    }

    fn set_play_when_ready(&self, play_when_ready: bool) -> BackendResult<()> {
        self.record(&format!("set_play_when_ready:{}", play_when_ready))
    }

    fn set_listener(&self, listener: Option<Arc<dyn BackendListener>>) {
        self.inner.lock().unwrap().listener = listener;
    }

    fn release(&self) {
        self.inner.lock().unwrap().calls.push("release".to_string());
    }
}

/// Observer that keeps every state it was told about
#[derive(Default)]
pub struct StateRecorder {
    seen: Mutex<Vec<PlaybackState>>,
}

impl StateRecorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seen(&self) -> Vec<PlaybackState> {
        self.seen.lock().unwrap().clone()
    }
}

impl PlayerObserver for StateRecorder {
    fn on_player_state_changed(&self, state: PlaybackState) {
        self.seen.lock().unwrap().push(state);
    }
}
