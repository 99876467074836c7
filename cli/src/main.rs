mod event_log;
mod playlist;
mod view;
mod widget;

use std::fs::File;
use std::io;
use std::sync::Arc;

use crossterm::event::{
    self,
    KeyCode,
    KeyEvent,
    KeyEventKind,
};

use ratatui::{
    DefaultTerminal,
    Frame,
};

use log::LevelFilter;
use simplelog::{Config, WriteLogger};

use player::{Item, PlaybackError, PlaybackSession, SimulatedBackend};

use event_log::EventLog;
use view::{control, startup};

const LOG_FILE: &str = "player-cli.log";

fn main() -> io::Result<()> {
    if let Err(e) = init_logging() {
        eprintln!("Logging disabled: {}", e);
    }

    let playlist = match std::env::args().nth(1) {
        Some(path) => playlist::load(&path)?,
        None => playlist::demo(),
    };
    log::info!("Loaded {} item(s)", playlist.len());

    let mut app = App::new(playlist)?;
    let mut terminal = ratatui::init();
    let app_result = app.run(&mut terminal);
    ratatui::restore();
    app.session.release();
    app_result
}

fn init_logging() -> io::Result<()> {
    let file = File::create(LOG_FILE)?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), file)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

#[derive(Debug, Default)]
enum Page {
    #[default]
    Startup,
    Control,
}

pub struct App {
    exit: bool,
    page: Page,
    session: PlaybackSession,
    backend: Arc<SimulatedBackend>,
    playlist: Vec<Arc<Item>>,
    events: EventLog,
    /// Outcome of the last command that failed
    status: Option<String>,
}

impl App {
    pub fn new(playlist: Vec<Arc<Item>>) -> io::Result<Self> {
        let backend = Arc::new(SimulatedBackend::new());
        let session = PlaybackSession::new(backend.clone())
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

        let events = EventLog::default();
        session.add_callback(events.observer());

        Ok(Self {
            exit: false,
            page: Page::default(),
            session,
            backend,
            playlist,
            events,
            status: None,
        })
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> io::Result<()> {
        while !self.exit {
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        match self.page {
            Page::Startup => startup::draw(frame, &self.playlist),
            Page::Control => control::draw(frame, self),
        }
    }

    fn handle_events(&mut self) -> io::Result<()> {
        if let event::Event::Key(key_event) = event::read()? {
            if key_event.kind != KeyEventKind::Press {
                return Ok(());
            }
            if self.handle_shared_event(key_event) {
                return Ok(());
            }

            match self.page {
                Page::Startup => startup::handle_event(self, key_event),
                Page::Control => control::handle_event(self, key_event),
            }
        }
        Ok(())
    }

    fn handle_shared_event(&mut self, key_event: KeyEvent) -> bool {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.exit();
                true
            },
            _ => false,
        }
    }

    fn start(&mut self) {
        self.page = Page::Control;
        self.replay();
    }

    fn replay(&mut self) {
        let result = self.session.play(self.playlist.clone());
        self.record(result);
    }

    fn toggle_pause(&mut self) {
        let result = if self.session.is_playing() {
            self.session.pause()
        } else {
            self.session.resume()
        };
        self.record(result);
    }

    fn raise_external_error(&mut self) {
        self.session
            .set_error(PlaybackError::external("raised from the keyboard"));
    }

    fn fail_backend(&mut self) {
        self.backend
            .fail(Some(PlaybackError::backend(2001, "simulated network failure")));
    }

    fn record(&mut self, result: player::Result<()>) {
        self.status = match result {
            Ok(()) => None,
            Err(e) => {
                log::error!("Command failed: {}", e);
                Some(e.to_string())
            }
        };
    }

    fn exit(&mut self) {
        self.exit = true;
    }
}
