use crossterm::event::{ KeyCode, KeyEvent };
use ratatui::{
  layout::{ Constraint, Direction, Layout, Rect },
  style::{ Color, Style, Stylize },
  text::{ Line, Span },
  widgets::{ Block, Borders, List, ListItem, Paragraph },
  Frame,
};

use player::PlaybackState;

use crate::widget::playlist_view::PlaylistView;
use crate::App;

const HELP: &str =
  "space pause/resume · n next · p prev · s stop · r replay · x finish track · f backend failure · e external error · q quit";

pub fn draw(frame: &mut Frame, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(5),
      Constraint::Min(5),
      Constraint::Length(1),
    ])
    .split(frame.area());

  draw_status(frame, app, rows[0]);

  let columns = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
    .split(rows[1]);

  let current = app.session.get_current_item();
  PlaylistView::new(&app.playlist, current.as_deref()).draw(frame, columns[0]);
  draw_events(frame, app, columns[1]);

  frame.render_widget(Paragraph::new(HELP).dark_gray(), rows[2]);
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
  let snapshot = app.session.snapshot();

  let state = Span::styled(
    snapshot.state.to_string(),
    Style::new().fg(state_color(snapshot.state)).bold(),
  );
  let title = app
    .session
    .get_current_item()
    .map(|item| item.title.clone())
    .unwrap_or_else(|| "-".to_string());
  let error = snapshot
    .last_error
    .map(|e| e.to_string())
    .unwrap_or_else(|| "none".to_string());

  let mut lines = vec![
    Line::from(vec![Span::raw("state  "), state]),
    Line::from(format!("item   {}", title)),
    Line::from(format!("error  {}", error)),
  ];
  if let Some(status) = &app.status {
    lines[2] = Line::from(format!("failed {}", status)).red();
  }

  let block = Block::default().borders(Borders::ALL).title(" Player ");
  frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_events(frame: &mut Frame, app: &App, area: Rect) {
  let height = area.height.saturating_sub(2) as usize;
  let lines = app.events.lines();
  let visible: Vec<ListItem> = lines
    .iter()
    .skip(lines.len().saturating_sub(height))
    .map(|line| ListItem::new(line.as_str()))
    .collect();

  let list = List::new(visible)
    .block(Block::default().borders(Borders::ALL).title(format!(" Published ({}) ", app.events.len())));
  frame.render_widget(list, area);
}

fn state_color(state: PlaybackState) -> Color {
  match state {
    PlaybackState::Playing | PlaybackState::Resumed => Color::Green,
    PlaybackState::Paused | PlaybackState::Waiting => Color::Yellow,
    PlaybackState::Error => Color::Red,
    PlaybackState::Idle | PlaybackState::Stopped => Color::Gray,
  }
}

pub fn handle_event(app: &mut App, key_event: KeyEvent) {
  match key_event.code {
    KeyCode::Char(' ') => app.toggle_pause(),
    KeyCode::Char('n') | KeyCode::Right => {
      let result = app.session.skip_to_next();
      app.record(result);
    },
    KeyCode::Char('p') | KeyCode::Left => {
      let result = app.session.skip_to_prev();
      app.record(result);
    },
    KeyCode::Char('s') => {
      let result = app.session.stop();
      app.record(result);
    },
    KeyCode::Char('r') => app.replay(),
    KeyCode::Char('x') => app.backend.finish_current(),
    KeyCode::Char('f') => app.fail_backend(),
    KeyCode::Char('e') => app.raise_external_error(),
    _ => {}
  }
}
