use std::sync::Arc;

use crossterm::event::{ KeyCode, KeyEvent };
use ratatui::{
  layout::Alignment,
  text::Text,
  widgets::Paragraph,
  Frame,
};

use player::Item;

use crate::widget::{ logo, util::centered_rows };
use crate::App;

pub fn draw(frame: &mut Frame, playlist: &[Arc<Item>]) {
  let logo = logo();
  let body = match playlist.len() {
    0 => Text::from("empty playlist - press enter anyway, q to quit"),
    n => Text::from(format!("{} item(s) queued - press enter to play, q to quit", n)),
  };

  let rows = centered_rows(frame.area(), &[5, 1]);
  let (logo_area, text_area) = (rows[0], rows[1]);

  let logo_paragraph = Paragraph::new(logo).alignment(Alignment::Center);
  frame.render_widget(logo_paragraph, logo_area);

  let body_paragraph = Paragraph::new(body).alignment(Alignment::Center);
  frame.render_widget(body_paragraph, text_area);
}

pub fn handle_event(app: &mut App, key_event: KeyEvent) {
  if let KeyCode::Enter | KeyCode::Char(' ') = key_event.code {
    app.start();
  }
}
