use super::{BackendError, BackendListener, BackendResult, MediaBackend, MediaDescriptor};
use crate::error::{PlaybackError, PlayerError};
use crate::model::{state_code, ItemId};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Commands recorded by [`SimulatedBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulatedCommand {
    Stop,
    ClearQueue,
    AddItem(ItemId),
    Prepare,
    Play,
    Pause,
    SeekNext,
    SeekPrev,
    SetPlayWhenReady(bool),
    Release,
}

enum Emission {
    State(i32),
    IsPlaying(bool),
    Error(Option<PlaybackError>),
}

struct Engine {
    queue: Vec<MediaDescriptor>,
    index: Option<usize>,
    state: i32,
    is_playing: bool,
    play_when_ready: bool,
    released: bool,
    failing_command: Option<&'static str>,
    listener: Option<Arc<dyn BackendListener>>,
    commands: Vec<SimulatedCommand>,
}

impl Engine {
    fn set_state(&mut self, state: i32, out: &mut Vec<Emission>) {
        if self.state != state {
            self.state = state;
            out.push(Emission::State(state));
        }
        self.refresh_is_playing(out);
    }

    fn refresh_is_playing(&mut self, out: &mut Vec<Emission>) {
        let is_playing = self.state == state_code::READY && self.play_when_ready;
        if self.is_playing != is_playing {
            self.is_playing = is_playing;
            out.push(Emission::IsPlaying(is_playing));
        }
    }

    /// Reload the current item: buffering, then ready
    fn reload(&mut self, out: &mut Vec<Emission>) {
        self.set_state(state_code::BUFFERING, out);
        self.set_state(state_code::READY, out);
    }
}

/// In-process media backend that mimics a real engine's event ordering
///
/// Events are emitted synchronously from inside the command that caused
/// them, in the order engines typically report them: the playback-state
/// change first, then the is-playing change. `is_playing` is true exactly
/// when the engine is ready and play-when-ready is set.
pub struct SimulatedBackend {
    engine: Mutex<Engine>,
}

impl SimulatedBackend {
    pub fn new() -> Self {
        Self {
            engine: Mutex::new(Engine {
                queue: Vec::new(),
                index: None,
                state: state_code::IDLE,
                is_playing: false,
                play_when_ready: true,
                released: false,
                failing_command: None,
                listener: None,
                commands: Vec::new(),
            }),
        }
    }

    /// Every command accepted so far, oldest first
    pub fn commands(&self) -> Vec<SimulatedCommand> {
        self.lock().commands.clone()
    }

    pub fn clear_commands(&self) {
        self.lock().commands.clear();
    }

    /// Make every later call of `command` (e.g. `"play"`) fail
    pub fn set_failing_command(&self, command: Option<&'static str>) {
        self.lock().failing_command = command;
    }

    pub fn queue_len(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn is_playing(&self) -> bool {
        self.lock().is_playing
    }

    pub fn has_listener(&self) -> bool {
        self.lock().listener.is_some()
    }

    pub fn is_released(&self) -> bool {
        self.lock().released
    }

    /// The current item reaches its end
    ///
    /// Advances to the next queued item without interruption, or ends the
    /// queue when there is none.
    pub fn finish_current(&self) {
        self.run(|engine, out| {
            if engine.state != state_code::READY {
                return;
            }
            match engine.index {
                Some(index) if index + 1 < engine.queue.len() => {
                    engine.index = Some(index + 1);
                }
                _ => engine.set_state(state_code::ENDED, out),
            }
        });
    }

    /// The engine hits a playback error and drops back to idle
    pub fn fail(&self, error: Option<PlaybackError>) {
        self.run(|engine, out| {
            out.push(Emission::Error(error));
            engine.set_state(state_code::IDLE, out);
        });
    }

    /// Deliver an arbitrary raw playback-state code to the listener
    pub fn inject_state_code(&self, code: i32) -> Result<(), PlayerError> {
        match self.listener() {
            Some(listener) => listener.on_playback_state_changed(code),
            None => Ok(()),
        }
    }

    fn command<F>(&self, name: &'static str, record: SimulatedCommand, apply: F) -> BackendResult<()>
    where
        F: FnOnce(&mut Engine, &mut Vec<Emission>),
    {
        let mut emissions = Vec::new();
        let listener = {
            let mut engine = self.lock();
            if engine.released {
                return Err(BackendError::Released);
            }
            if engine.failing_command == Some(name) {
                return Err(BackendError::CommandFailed {
                    command: name,
                    reason: "simulated failure".to_string(),
                });
            }
            engine.commands.push(record);
            apply(&mut *engine, &mut emissions);
            engine.listener.clone()
        };
        Self::emit(listener, emissions);
        Ok(())
    }

    fn run<F>(&self, apply: F)
    where
        F: FnOnce(&mut Engine, &mut Vec<Emission>),
    {
        let mut emissions = Vec::new();
        let listener = {
            let mut engine = self.lock();
            if engine.released {
                return;
            }
            apply(&mut *engine, &mut emissions);
            engine.listener.clone()
        };
        Self::emit(listener, emissions);
    }

    fn emit(listener: Option<Arc<dyn BackendListener>>, emissions: Vec<Emission>) {
        let Some(listener) = listener else {
            return;
        };
        for emission in emissions {
            match emission {
                Emission::State(code) => {
                    if let Err(e) = listener.on_playback_state_changed(code) {
                        log::warn!("Listener rejected playback state {}: {}", code, e);
                    }
                }
                Emission::IsPlaying(is_playing) => listener.on_is_playing_changed(is_playing),
                Emission::Error(error) => listener.on_player_error(error),
            }
        }
    }

    fn listener(&self) -> Option<Arc<dyn BackendListener>> {
        self.lock().listener.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Engine> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaBackend for SimulatedBackend {
    fn stop(&self) -> BackendResult<()> {
        self.command("stop", SimulatedCommand::Stop, |engine, out| {
            engine.set_state(state_code::IDLE, out);
        })
    }

    fn clear_queue(&self) -> BackendResult<()> {
        self.command("clear_queue", SimulatedCommand::ClearQueue, |engine, out| {
            engine.queue.clear();
            engine.index = None;
            if engine.state != state_code::IDLE {
                engine.set_state(state_code::ENDED, out);
            }
        })
    }

    fn add_item(&self, descriptor: MediaDescriptor) -> BackendResult<()> {
        let record = SimulatedCommand::AddItem(descriptor.media_id.clone());
        self.command("add_item", record, |engine, _| {
            engine.queue.push(descriptor);
            if engine.index.is_none() {
                engine.index = Some(0);
            }
        })
    }

    fn prepare(&self) -> BackendResult<()> {
        self.command("prepare", SimulatedCommand::Prepare, |engine, out| {
            if engine.queue.is_empty() || engine.state != state_code::IDLE {
                return;
            }
            engine.reload(out);
        })
    }

    fn play(&self) -> BackendResult<()> {
        self.command("play", SimulatedCommand::Play, |engine, out| {
            engine.play_when_ready = true;
            engine.refresh_is_playing(out);
        })
    }

    fn pause(&self) -> BackendResult<()> {
        self.command("pause", SimulatedCommand::Pause, |engine, out| {
            engine.play_when_ready = false;
            engine.refresh_is_playing(out);
        })
    }

    fn seek_next(&self) -> BackendResult<()> {
        self.command("seek_next", SimulatedCommand::SeekNext, |engine, out| {
            if let Some(index) = engine.index.filter(|i| i + 1 < engine.queue.len()) {
                engine.index = Some(index + 1);
                if engine.state != state_code::IDLE {
                    engine.reload(out);
                }
            }
        })
    }

    fn seek_prev(&self) -> BackendResult<()> {
        self.command("seek_prev", SimulatedCommand::SeekPrev, |engine, out| {
            if let Some(index) = engine.index.filter(|i| *i > 0) {
                engine.index = Some(index - 1);
                if engine.state != state_code::IDLE {
                    engine.reload(out);
                }
            }
        })
    }

    fn has_next(&self) -> bool {
        let engine = self.lock();
        matches!(engine.index, Some(i) if i + 1 < engine.queue.len())
    }

    fn has_prev(&self) -> bool {
        matches!(self.lock().index, Some(i) if i > 0)
    }

    fn current_active_id(&self) -> Option<ItemId> {
        let engine = self.lock();
        engine
            .index
            .and_then(|i| engine.queue.get(i))
            .map(|descriptor| descriptor.media_id.clone())
    }

    fn set_play_when_ready(&self, play_when_ready: bool) -> BackendResult<()> {
        let record = SimulatedCommand::SetPlayWhenReady(play_when_ready);
        self.command("set_play_when_ready", record, |engine, out| {
            engine.play_when_ready = play_when_ready;
            engine.refresh_is_playing(out);
        })
    }

    fn set_listener(&self, listener: Option<Arc<dyn BackendListener>>) {
        self.lock().listener = listener;
    }

    fn release(&self) {
        let mut engine = self.lock();
        if engine.released {
            return;
        }
        engine.commands.push(SimulatedCommand::Release);
        engine.released = true;
        engine.listener = None;
        engine.queue.clear();
        engine.index = None;
        engine.is_playing = false;
        engine.state = state_code::IDLE;
    }
}
