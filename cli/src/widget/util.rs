use std::rc::Rc;

use ratatui::layout::{ Constraint, Direction, Layout, Rect };

/// Stack rows of fixed `heights` in the vertical middle of `area`
pub fn centered_rows(area: Rect, heights: &[u16]) -> Rc<[Rect]> {
  let total: u16 = heights.iter().sum();
  let padding = area.height.saturating_sub(total) / 2;

  let band = Rect {
    y: area.y + padding,
    height: total.min(area.height),
    ..area
  };

  Layout::default()
    .direction(Direction::Vertical)
    .constraints(heights.iter().map(|h| Constraint::Length(*h)))
    .split(band)
}
