//! Playback-state reconciliation over an asynchronous media backend
//!
//! A [`PlaybackSession`] forwards commands to a [`MediaBackend`] and turns the
//! backend's raw notifications into a single logical [`PlaybackState`] that is
//! published to observers in order.

pub mod adapter;
pub mod backend;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod model;
pub mod registry;
pub mod session;
pub mod transition;

// Re-export key types for easier access
pub use adapter::BackendEventAdapter;
pub use backend::{
    BackendError, BackendListener, BackendResult, MediaBackend, MediaDescriptor, SimulatedBackend,
    SimulatedCommand,
};
pub use config::SessionConfig;
pub use dispatcher::{Dispatcher, ObserverId, PlayerObserver};
pub use error::{PlaybackError, PlayerError, Result};
pub use model::{state_code, BackendCommand, BackendEvent, Item, ItemId, PlaybackSnapshot, PlaybackState};
pub use registry::ItemRegistry;
pub use session::PlaybackSession;
pub use transition::{transition, Transition};
