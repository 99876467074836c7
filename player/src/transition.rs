use crate::error::PlaybackError;
use crate::model::{BackendCommand, BackendEvent, PlaybackState};

/// Result of folding one backend event into the current logical state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: PlaybackState,
    /// Whether observers should be told about `next`
    pub publish: bool,
    /// Command to send to the backend once the state lock is released
    pub command: Option<BackendCommand>,
    /// Error to store in the last-error slot
    pub error: Option<PlaybackError>,
}

impl Transition {
    fn to(next: PlaybackState) -> Self {
        Self {
            next,
            publish: true,
            command: None,
            error: None,
        }
    }

    fn ignore(current: PlaybackState) -> Self {
        Self {
            next: current,
            publish: false,
            command: None,
            error: None,
        }
    }

    fn command(current: PlaybackState, command: BackendCommand) -> Self {
        Self {
            next: current,
            publish: false,
            command: Some(command),
            error: None,
        }
    }

    fn fail(error: PlaybackError) -> Self {
        Self {
            next: PlaybackState::Error,
            publish: true,
            command: None,
            error: Some(error),
        }
    }

    /// The event was deliberately dropped: no state change, no command
    pub fn is_ignored(&self) -> bool {
        !self.publish && self.command.is_none()
    }
}

/// Compute the next logical state for `event` arriving in `current`
///
/// The match covers the full state × event product without a catch-all arm,
/// so adding a state or an event is a compile error until every pair is
/// decided. `Ready` never publishes: the engine's "ready" is not "playing",
/// it only prompts the `StartPlayback` command, and the real transition
/// arrives with the following is-playing notification.
pub fn transition(current: PlaybackState, event: &BackendEvent) -> Transition {
    use PlaybackState::*;

    match (current, event) {
        (Paused, BackendEvent::Idle) => Transition::to(Stopped),
        (Idle | Waiting | Playing | Resumed | Stopped | Error, BackendEvent::Idle) => {
            Transition::to(Idle)
        }

        (_, BackendEvent::Buffering) => Transition::to(Waiting),

        (_, BackendEvent::Ready) => Transition::command(current, BackendCommand::StartPlayback),

        (_, BackendEvent::Ended) => Transition::to(Stopped),

        (Idle | Waiting | Stopped | Error, BackendEvent::IsPlayingTrue) => Transition::to(Playing),
        (Paused, BackendEvent::IsPlayingTrue) => Transition::to(Resumed),
        (Playing | Resumed, BackendEvent::IsPlayingTrue) => {
            log::debug!("Skipping is-playing=true while {}", current);
            Transition::ignore(current)
        }

        (Playing | Resumed, BackendEvent::IsPlayingFalse) => Transition::to(Paused),
        (Waiting | Idle, BackendEvent::IsPlayingFalse) => Transition::to(Stopped),
        (Paused | Stopped | Error, BackendEvent::IsPlayingFalse) => {
            log::debug!("Ignoring is-playing=false while {}", current);
            Transition::ignore(current)
        }

        (_, BackendEvent::ErrorOccurred(error)) => Transition::fail(error.clone()),
    }
}
