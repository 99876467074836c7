use crate::adapter::BackendEventAdapter;
use crate::backend::{BackendListener, MediaBackend, MediaDescriptor};
use crate::config::SessionConfig;
use crate::dispatcher::{Dispatcher, ObserverId, PlayerObserver};
use crate::error::{PlaybackError, PlayerError, Result};
use crate::model::{Item, PlaybackSnapshot, PlaybackState};
use crate::registry::ItemRegistry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Public façade over a media backend
///
/// Commands are forwarded to the backend; the logical state only changes
/// when the backend reports back through the attached adapter. All methods
/// take `&self`, so a session can be shared across threads behind an `Arc`.
///
/// # Example
///
/// ```rust
/// use player::{Item, PlaybackSession, PlaybackState, SimulatedBackend};
/// use std::sync::Arc;
///
/// let session = PlaybackSession::new(Arc::new(SimulatedBackend::new()))?;
/// session.add_callback(|state: PlaybackState| println!("now {}", state));
///
/// session.play(vec![Item::new("a", "file:///a.flac", "A")])?;
/// assert_eq!(session.get_current_state(), PlaybackState::Playing);
///
/// session.release();
/// # Ok::<(), player::PlayerError>(())
/// ```
pub struct PlaybackSession {
    backend: Arc<dyn MediaBackend>,
    registry: ItemRegistry,
    dispatcher: Arc<Dispatcher>,
    released: AtomicBool,
}

impl PlaybackSession {
    /// Create a session with the default configuration
    ///
    /// Attaches the session's adapter as the backend listener and turns off
    /// the backend's auto-start, so playback only begins through the
    /// ready → start-playback rule.
    pub fn new(backend: Arc<dyn MediaBackend>) -> Result<Self> {
        Self::with_config(backend, SessionConfig::default())
    }

    /// Create a session with a custom configuration
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::InvalidConfiguration`] when `config` fails
    /// validation, or [`PlayerError::Backend`] when the backend refuses to
    /// disable auto-start.
    pub fn with_config(backend: Arc<dyn MediaBackend>, config: SessionConfig) -> Result<Self> {
        config.validate().map_err(PlayerError::InvalidConfiguration)?;

        let registry = ItemRegistry::new();
        let dispatcher = Arc::new(Dispatcher::new(config));
        let adapter = Arc::new(BackendEventAdapter::new(
            dispatcher.clone(),
            registry.clone(),
            Arc::downgrade(&backend),
        ));

        backend.set_play_when_ready(false)?;
        backend.set_listener(Some(adapter as Arc<dyn BackendListener>));

        Ok(Self {
            backend,
            registry,
            dispatcher,
            released: AtomicBool::new(false),
        })
    }

    /// Play a single item, replacing whatever was queued
    pub fn play_item(&self, item: impl Into<Arc<Item>>) -> Result<()> {
        self.play(std::iter::once(item.into()))
    }

    /// Replace the queue with `items` and prepare the backend
    ///
    /// The backend is stopped and cleared, the registry is rebuilt to hold
    /// exactly `items`, one descriptor per item is submitted, and the backend
    /// is prepared. An empty list is accepted; nothing plays until the
    /// backend reports otherwise.
    ///
    /// If the backend rejects an item, the registry is cut back to the items
    /// it accepted before the error is returned.
    pub fn play<I>(&self, items: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Arc<Item>>,
    {
        self.ensure_active()?;
        let items: Vec<Arc<Item>> = items.into_iter().map(Into::into).collect();
        log::debug!("▶️ Playing {} item(s)", items.len());

        self.backend.stop()?;
        self.backend.clear_queue()?;
        self.registry.replace_all(&items);

        for (queued, item) in items.iter().enumerate() {
            if let Err(e) = self.backend.add_item(MediaDescriptor::from(item.as_ref())) {
                log::error!("Backend rejected item {}: {}", item.id, e);
                self.registry.replace_all(&items[..queued]);
                return Err(e.into());
            }
        }

        self.backend.prepare()?;
        Ok(())
    }

    pub fn pause(&self) -> Result<()> {
        self.ensure_active()?;
        self.backend.pause()?;
        Ok(())
    }

    pub fn resume(&self) -> Result<()> {
        self.ensure_active()?;
        self.backend.play()?;
        Ok(())
    }

    pub fn stop(&self) -> Result<()> {
        self.ensure_active()?;
        self.backend.stop()?;
        Ok(())
    }

    /// Seek to the next item; a no-op when the backend has none
    pub fn skip_to_next(&self) -> Result<()> {
        self.ensure_active()?;
        if !self.backend.has_next() {
            log::debug!("No next item, ignoring skip");
            return Ok(());
        }
        self.backend.seek_next()?;
        Ok(())
    }

    /// Seek to the previous item; a no-op when the backend has none
    pub fn skip_to_prev(&self) -> Result<()> {
        self.ensure_active()?;
        if !self.backend.has_prev() {
            log::debug!("No previous item, ignoring skip");
            return Ok(());
        }
        self.backend.seek_prev()?;
        Ok(())
    }

    pub fn is_playing(&self) -> bool {
        self.get_current_state().is_playing()
    }

    pub fn is_paused(&self) -> bool {
        self.get_current_state().is_paused()
    }

    pub fn is_stopped(&self) -> bool {
        self.get_current_state().is_stopped()
    }

    /// Register an observer for state changes
    pub fn add_callback<O>(&self, observer: O) -> ObserverId
    where
        O: PlayerObserver + 'static,
    {
        self.dispatcher.subscribe(Arc::new(observer))
    }

    /// Register an observer that is already shared elsewhere
    pub fn add_shared_callback(&self, observer: Arc<dyn PlayerObserver>) -> ObserverId {
        self.dispatcher.subscribe(observer)
    }

    pub fn remove_callback(&self, id: ObserverId) -> bool {
        self.dispatcher.unsubscribe(id)
    }

    pub fn get_current_state(&self) -> PlaybackState {
        self.dispatcher.current_state()
    }

    /// Receiver that always holds the latest published state
    pub fn observe_state(&self) -> watch::Receiver<PlaybackState> {
        self.dispatcher.watch()
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.dispatcher.snapshot()
    }

    /// The most recent playback error
    ///
    /// Leaving the `Error` state does not clear it; it is only replaced by a
    /// newer error.
    pub fn get_error(&self) -> Option<PlaybackError> {
        self.dispatcher.snapshot().last_error
    }

    /// Force the `Error` state with an error raised outside the backend
    pub fn set_error(&self, error: PlaybackError) {
        log::debug!("Error set externally: {}", error);
        let current_item = self.resolve_current_item();
        self.dispatcher
            .publish(PlaybackState::Error, current_item, Some(error));
    }

    /// Item the backend is currently on, if it is one of ours
    pub fn get_current_item(&self) -> Option<Arc<Item>> {
        self.resolve_current_item()
    }

    /// Resolve an id from the most recent `play` request
    pub fn resolve_item(&self, id: &str) -> Option<Arc<Item>> {
        self.registry.resolve(id)
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    /// Detach from and release the backend
    ///
    /// Observers are dropped first, so none is called after this returns.
    /// Safe to call more than once, and while nothing is playing.
    pub fn release(&self) {
        // Every caller waits for in-flight delivery, not only the first
        self.dispatcher.release();
        if self.released.swap(true, Ordering::SeqCst) {
            return;
        }
        log::debug!("Releasing playback session");

        if let Err(e) = self.backend.stop() {
            log::warn!("Backend failed to stop during release: {}", e);
        }
        self.backend.set_listener(None);
        self.backend.release();
    }

    fn resolve_current_item(&self) -> Option<Arc<Item>> {
        let id = self.backend.current_active_id()?;
        self.registry.resolve(id.as_str())
    }

    fn ensure_active(&self) -> Result<()> {
        if self.is_released() {
            return Err(PlayerError::Released);
        }
        Ok(())
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, BackendResult};
    use crate::model::ItemId;
    use mockall::mock;
    use mockall::predicate::eq;
    use std::sync::Mutex;

    mock! {
        pub Backend {}

        impl MediaBackend for Backend {
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
            fn current_active_id(&self) -> Option<ItemId>;
            fn set_play_when_ready(&self, play_when_ready: bool) -> BackendResult<()>;
            fn set_listener(&self, listener: Option<Arc<dyn BackendListener>>);
            fn release(&self);
        }
    }

    /// A mock that accepts the calls every session makes on construction and release
    fn create_mock_backend() -> MockBackend {
        let mut backend = MockBackend::new();
        backend
            .expect_set_play_when_ready()
            .with(eq(false))
            .times(1)
            .returning(|_| Ok(()));
        backend.expect_set_listener().returning(|_| ());
        backend.expect_current_active_id().returning(|| None);
        backend
    }

    fn expect_release(backend: &mut MockBackend) {
        backend.expect_stop().returning(|| Ok(()));
        backend.expect_release().times(1).returning(|| ());
    }

    #[test]
    fn test_pause_resume_stop_forwarded() {
        let mut backend = create_mock_backend();
        backend.expect_pause().times(1).returning(|| Ok(()));
        backend.expect_play().times(1).returning(|| Ok(()));
        expect_release(&mut backend);

        let session = PlaybackSession::new(Arc::new(backend)).unwrap();
        session.pause().unwrap();
        session.resume().unwrap();
        session.stop().unwrap();

        assert_eq!(session.get_current_state(), PlaybackState::Idle);
    }

    #[test]
    fn test_skip_without_neighbours_is_noop() {
        let mut backend = create_mock_backend();
        backend.expect_has_next().returning(|| false);
        backend.expect_has_prev().returning(|| false);
        backend.expect_seek_next().never();
        backend.expect_seek_prev().never();
        expect_release(&mut backend);

        let session = PlaybackSession::new(Arc::new(backend)).unwrap();

        assert!(session.skip_to_next().is_ok());
        assert!(session.skip_to_prev().is_ok());
    }

    #[test]
    fn test_skip_with_neighbours_seeks() {
        let mut backend = create_mock_backend();
        backend.expect_has_next().returning(|| true);
        backend.expect_has_prev().returning(|| true);
        backend.expect_seek_next().times(1).returning(|| Ok(()));
        backend.expect_seek_prev().times(1).returning(|| Ok(()));
        expect_release(&mut backend);

        let session = PlaybackSession::new(Arc::new(backend)).unwrap();

        session.skip_to_next().unwrap();
        session.skip_to_prev().unwrap();
    }

    #[test]
    fn test_play_submits_descriptors_in_order() {
        let submitted = Arc::new(Mutex::new(Vec::new()));
        let mut backend = create_mock_backend();
        backend.expect_clear_queue().times(1).returning(|| Ok(()));
        {
            let submitted = submitted.clone();
            backend.expect_add_item().times(2).returning(move |descriptor| {
                submitted.lock().unwrap().push(descriptor.media_id);
                Ok(())
            });
        }
        backend.expect_prepare().times(1).returning(|| Ok(()));
        expect_release(&mut backend);

        let session = PlaybackSession::new(Arc::new(backend)).unwrap();
        session
            .play(vec![
                Item::new("a", "file:///a.mp3", "A"),
                Item::new("b", "file:///b.mp3", "B"),
            ])
            .unwrap();

        assert_eq!(
            *submitted.lock().unwrap(),
            vec![ItemId::new("a"), ItemId::new("b")]
        );
        assert!(session.resolve_item("a").is_some());
        assert!(session.resolve_item("c").is_none());
    }

    #[test]
    fn test_rejected_item_is_not_registered() {
        let mut backend = create_mock_backend();
        backend.expect_clear_queue().returning(|| Ok(()));
        backend.expect_add_item().returning(|descriptor| {
            if descriptor.media_id.as_str() == "b" {
                return Err(BackendError::CommandFailed {
                    command: "add_item",
                    reason: "unsupported codec".to_string(),
                });
            }
            Ok(())
        });
        backend.expect_prepare().never();
        expect_release(&mut backend);

        let session = PlaybackSession::new(Arc::new(backend)).unwrap();
        let result = session.play(vec![
            Item::new("a", "file:///a.mp3", "A"),
            Item::new("b", "file:///b.ape", "B"),
            Item::new("c", "file:///c.mp3", "C"),
        ]);

        assert!(matches!(result, Err(PlayerError::Backend(_))));
        assert!(session.resolve_item("a").is_some());
        assert!(session.resolve_item("b").is_none());
        assert!(session.resolve_item("c").is_none());
    }

    #[test]
    fn test_backend_error_propagates() {
        let mut backend = create_mock_backend();
        backend.expect_pause().returning(|| {
            Err(BackendError::CommandFailed {
                command: "pause",
                reason: "busy".to_string(),
            })
        });
        expect_release(&mut backend);

        let session = PlaybackSession::new(Arc::new(backend)).unwrap();

        assert!(matches!(
            session.pause(),
            Err(PlayerError::Backend(BackendError::CommandFailed { .. }))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let backend = MockBackend::new();
        let config = SessionConfig {
            pending_warn_threshold: 0,
            ..SessionConfig::default()
        };

        let result = PlaybackSession::with_config(Arc::new(backend), config);

        assert!(matches!(result, Err(PlayerError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_commands_after_release_fail() {
        let mut backend = create_mock_backend();
        expect_release(&mut backend);
        backend.expect_pause().never();

        let session = PlaybackSession::new(Arc::new(backend)).unwrap();
        session.release();
        session.release();

        assert!(session.is_released());
        assert!(matches!(session.pause(), Err(PlayerError::Released)));
        assert!(matches!(
            session.play(Vec::<Item>::new()),
            Err(PlayerError::Released)
        ));
    }

    #[test]
    fn test_set_error_publishes_error_state() {
        let mut backend = create_mock_backend();
        expect_release(&mut backend);
        let session = PlaybackSession::new(Arc::new(backend)).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let seen = seen.clone();
            session.add_callback(move |state: PlaybackState| seen.lock().unwrap().push(state));
        }

        session.set_error(PlaybackError::external("storage unavailable"));

        assert_eq!(session.get_current_state(), PlaybackState::Error);
        assert_eq!(
            session.get_error(),
            Some(PlaybackError::external("storage unavailable"))
        );
        assert_eq!(*seen.lock().unwrap(), vec![PlaybackState::Error]);
    }
}
