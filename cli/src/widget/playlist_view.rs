use std::sync::Arc;

use ratatui::{
  layout::Rect,
  style::{Style, Stylize},
  widgets::{Block, Borders, List, ListItem, ListState},
  Frame
};

use player::Item;

/// Queue listing with the item the backend is on highlighted
pub struct PlaylistView<'a> {
  items: &'a [Arc<Item>],
  state: ListState,
}

impl<'a> PlaylistView<'a> {
  pub fn new(items: &'a [Arc<Item>], current: Option<&Item>) -> Self {
    let mut state = ListState::default();
    state.select(current.and_then(|current| {
      items.iter().position(|item| item.id == current.id)
    }));

    Self { items, state }
  }

  pub fn draw(&mut self, frame: &mut Frame, area: Rect) {
    let list_items: Vec<ListItem> = self.items
      .iter()
      .map(|item| ListItem::new(format!("{}  ({})", item.title, item.source_uri)))
      .collect();

    let list = List::new(list_items)
      .block(Block::default().borders(Borders::ALL).title(" Queue "))
      .highlight_style(Style::new().reversed())
      .highlight_symbol(">> ");

    frame.render_stateful_widget(list, area, &mut self.state);
  }
}
