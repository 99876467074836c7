use crate::config::SessionConfig;
use crate::error::PlaybackError;
use crate::model::{BackendEvent, Item, PlaybackSnapshot, PlaybackState};
use crate::transition::{transition, Transition};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};
use tokio::sync::watch;
use uuid::Uuid;

/// Receives logical playback state changes
pub trait PlayerObserver: Send + Sync {
    fn on_player_state_changed(&self, state: PlaybackState);
}

impl<F> PlayerObserver for F
where
    F: Fn(PlaybackState) + Send + Sync,
{
    fn on_player_state_changed(&self, state: PlaybackState) {
        self(state)
    }
}

/// Handle returned by [`Dispatcher::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(Uuid);

impl ObserverId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObserverId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ObserverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

type ObserverEntry = (ObserverId, Arc<dyn PlayerObserver>);

struct Notification {
    sequence: u64,
    state: PlaybackState,
    recipients: Vec<ObserverEntry>,
}

struct DispatchState {
    snapshot: PlaybackSnapshot,
    observers: Vec<ObserverEntry>,
    pending: VecDeque<Notification>,
    /// Thread currently delivering queued notifications
    draining: Option<ThreadId>,
    published: u64,
}

/// Owns the observer list and the last published snapshot
///
/// Every publish happens inside one critical section: the snapshot, the
/// watch channel and the notification queue are updated together, so
/// concurrent publishes are totally ordered. Delivery happens outside the
/// lock through a FIFO queue drained by whichever thread finds it idle.
///
/// Observer list policy: each notification carries the list as it was at
/// publish time. Observers unsubscribed before delivery are skipped, and a
/// publish triggered from inside a callback is queued behind the current one
/// rather than delivered re-entrantly. Subscribing or unsubscribing from a
/// callback is allowed.
pub struct Dispatcher {
    state: Mutex<DispatchState>,
    drained: Condvar,
    released: AtomicBool,
    state_tx: watch::Sender<PlaybackState>,
    config: SessionConfig,
}

impl Dispatcher {
    pub fn new(config: SessionConfig) -> Self {
        let (state_tx, _) = watch::channel(PlaybackState::Idle);

        Self {
            state: Mutex::new(DispatchState {
                snapshot: PlaybackSnapshot::default(),
                observers: Vec::new(),
                pending: VecDeque::new(),
                draining: None,
                published: 0,
            }),
            drained: Condvar::new(),
            released: AtomicBool::new(false),
            state_tx,
            config,
        }
    }

    /// Register an observer; it receives every state published afterwards
    pub fn subscribe(&self, observer: Arc<dyn PlayerObserver>) -> ObserverId {
        let id = ObserverId::new();
        let mut state = self.lock();
        if self.is_released() {
            log::warn!("Observer {} subscribed after release; it will never be called", id);
            return id;
        }
        state.observers.push((id, observer));
        log::debug!("Observer {} subscribed ({} total)", id, state.observers.len());
        id
    }

    /// Remove an observer, returning whether it was registered
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut state = self.lock();
        let before = state.observers.len();
        state.observers.retain(|(observer_id, _)| *observer_id != id);
        let removed = state.observers.len() != before;
        if removed {
            log::debug!("Observer {} unsubscribed", id);
        }
        removed
    }

    pub fn observer_count(&self) -> usize {
        self.lock().observers.len()
    }

    /// The last published snapshot
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.lock().snapshot.clone()
    }

    pub fn current_state(&self) -> PlaybackState {
        self.lock().snapshot.state
    }

    /// A receiver that always holds the latest published state
    pub fn watch(&self) -> watch::Receiver<PlaybackState> {
        self.state_tx.subscribe()
    }

    /// Publish `state` to every subscribed observer
    ///
    /// `error` replaces the stored last error when present; it is never
    /// cleared by a publish without one.
    pub fn publish(
        &self,
        state: PlaybackState,
        current_item: Option<Arc<Item>>,
        error: Option<PlaybackError>,
    ) {
        {
            let mut guard = self.lock();
            if self.is_released() {
                log::debug!("Dropping {} published after release", state);
                return;
            }
            self.publish_locked(&mut guard, state, current_item, error);
        }
        self.drain();
    }

    /// Fold `event` into the current state and publish the outcome
    ///
    /// The transition is computed under the same lock that publishes it, so
    /// concurrent events never interleave. The returned transition carries any
    /// backend command; the caller must issue it after this returns.
    /// Returns `None` once the dispatcher has been released.
    pub fn apply(
        &self,
        event: &BackendEvent,
        current_item: Option<Arc<Item>>,
    ) -> Option<Transition> {
        let outcome = {
            let mut guard = self.lock();
            if self.is_released() {
                log::debug!("Dropping {:?} received after release", event);
                return None;
            }

            let current = guard.snapshot.state;
            let outcome = transition(current, event);

            if outcome.publish {
                log::debug!("{} --{:?}--> {}", current, event, outcome.next);
                self.publish_locked(&mut guard, outcome.next, current_item, outcome.error.clone());
            } else if outcome.is_ignored() && self.config.republish_unchanged {
                self.publish_locked(&mut guard, current, current_item, None);
            }
            outcome
        };
        self.drain();
        Some(outcome)
    }

    /// Drop all observers and stop delivering notifications
    ///
    /// When another thread is delivering, this waits for the callback in
    /// progress to return, so no observer runs after `release` returns.
    /// Called from inside a callback it returns immediately and the rest of
    /// that notification is skipped. Calling it again is a no-op.
    pub fn release(&self) {
        let mut guard = self.lock();
        if !self.released.swap(true, Ordering::SeqCst) {
            log::debug!(
                "Releasing dispatcher: dropping {} observers and {} pending notifications",
                guard.observers.len(),
                guard.pending.len()
            );
        }
        guard.observers.clear();
        guard.pending.clear();

        let me = thread::current().id();
        while matches!(guard.draining, Some(drainer) if drainer != me) {
            guard = self
                .drained
                .wait(guard)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    fn publish_locked(
        &self,
        guard: &mut MutexGuard<'_, DispatchState>,
        state: PlaybackState,
        current_item: Option<Arc<Item>>,
        error: Option<PlaybackError>,
    ) {
        guard.snapshot.state = state;
        guard.snapshot.current_item = current_item;
        if let Some(error) = error {
            guard.snapshot.last_error = Some(error);
        }
        self.state_tx.send_replace(state);

        guard.published += 1;
        let notification = Notification {
            sequence: guard.published,
            state,
            recipients: guard.observers.clone(),
        };
        guard.pending.push_back(notification);

        if guard.pending.len() > self.config.pending_warn_threshold {
            log::warn!(
                "{} notifications waiting for delivery; an observer may be re-publishing in a loop",
                guard.pending.len()
            );
        }
    }

    /// Deliver queued notifications unless another call is already doing so
    fn drain(&self) {
        {
            let mut guard = self.lock();
            if guard.draining.is_some() {
                return;
            }
            guard.draining = Some(thread::current().id());
        }
        let _unwind = DrainUnwind(self);

        loop {
            let notification = {
                let mut guard = self.lock();
                match guard.pending.pop_front() {
                    Some(notification) => notification,
                    None => {
                        guard.draining = None;
                        self.drained.notify_all();
                        return;
                    }
                }
            };
            self.deliver(notification);
        }
    }

    fn deliver(&self, notification: Notification) {
        for (index, (id, observer)) in notification.recipients.iter().enumerate() {
            if !self.is_still_subscribed(*id) {
                continue;
            }

            if !self.config.isolate_observer_panics {
                observer.on_player_state_changed(notification.state);
                continue;
            }

            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                observer.on_player_state_changed(notification.state);
            }));
            if result.is_err() {
                log::error!(
                    "Observer #{} ({}) panicked while handling notification #{} ({})",
                    index + 1,
                    id,
                    notification.sequence,
                    notification.state
                );
            }
        }
    }

    fn is_still_subscribed(&self, id: ObserverId) -> bool {
        let guard = self.lock();
        !self.is_released() && guard.observers.iter().any(|(observer_id, _)| *observer_id == id)
    }

    fn lock(&self) -> MutexGuard<'_, DispatchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Hands the drain back if an observer panic escapes `deliver`
struct DrainUnwind<'a>(&'a Dispatcher);

impl Drop for DrainUnwind<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.lock().draining = None;
            self.0.drained.notify_all();
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
