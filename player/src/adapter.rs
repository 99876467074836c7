use crate::backend::{BackendListener, MediaBackend};
use crate::dispatcher::Dispatcher;
use crate::error::{PlaybackError, PlayerError};
use crate::model::{BackendCommand, BackendEvent, Item};
use crate::registry::ItemRegistry;
use std::sync::{Arc, Weak};

/// Turns raw backend notifications into transitions and publishes them
///
/// The adapter is the listener a session attaches to its backend. It keeps a
/// weak reference to the backend so that the backend → listener → backend
/// cycle does not keep either alive.
pub struct BackendEventAdapter {
    dispatcher: Arc<Dispatcher>,
    registry: ItemRegistry,
    backend: Weak<dyn MediaBackend>,
}

impl BackendEventAdapter {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        registry: ItemRegistry,
        backend: Weak<dyn MediaBackend>,
    ) -> Self {
        Self {
            dispatcher,
            registry,
            backend,
        }
    }

    /// Process one event: transition, publish, then issue any side-effect command
    ///
    /// The active item is looked up before the dispatcher lock is taken and
    /// the command is sent after it is released, so a backend that calls back
    /// into the adapter from either path cannot deadlock.
    pub fn handle_event(&self, event: BackendEvent) {
        let current_item = self.resolve_current_item();

        let Some(outcome) = self.dispatcher.apply(&event, current_item) else {
            return;
        };

        if let Some(command) = outcome.command {
            self.issue(command);
        }
    }

    /// Item the backend reports as active, resolved through the registry
    pub fn resolve_current_item(&self) -> Option<Arc<Item>> {
        let backend = self.backend.upgrade()?;
        let id = backend.current_active_id()?;
        let item = self.registry.resolve(id.as_str());
        if item.is_none() {
            log::debug!("Active media id {} is not in the registry", id);
        }
        item
    }

    fn issue(&self, command: BackendCommand) {
        let Some(backend) = self.backend.upgrade() else {
            log::debug!("Backend dropped before {:?} could be issued", command);
            return;
        };

        let result = match command {
            BackendCommand::StartPlayback => backend.play(),
        };

        if let Err(e) = result {
            log::error!("Failed to issue {:?} to backend: {}", command, e);
            self.handle_event(BackendEvent::ErrorOccurred(PlaybackError::from(e)));
        }
    }
}

impl BackendListener for BackendEventAdapter {
    fn on_playback_state_changed(&self, code: i32) -> Result<(), PlayerError> {
        let event = BackendEvent::from_state_code(code).map_err(|e| {
            log::error!("Rejecting backend notification: {}", e);
            e
        })?;
        self.handle_event(event);
        Ok(())
    }

    fn on_is_playing_changed(&self, is_playing: bool) {
        self.handle_event(BackendEvent::from_is_playing(is_playing));
    }

    fn on_player_error(&self, error: Option<PlaybackError>) {
        if error.is_none() {
            log::warn!("Backend raised an error notification without an error value");
        }
        self.handle_event(BackendEvent::from_error(error));
    }
}
