use ratatui::prelude::*;

const PANE_CONSTRAINTS: [Constraint; 4] = [
  Constraint::Length(1), // Inline error
  Constraint::Length(3), // Counter
  Constraint::Length(3), // Text input
  Constraint::Min(0),    // Users
];

const STATUS_HORIZONTAL_CONSTRAINTS: [Constraint; 2] = [
  Constraint::Percentage(70), // help note
  Constraint::Percentage(30), // pending effects
];

const STATUS_CONSTRAINT: Constraint = Constraint::Length(1);

pub struct LayoutRects {
  pub panes: Vec<Rect>,
  pub status_left: Rect,
  pub status_right: Rect,
}

pub struct PaneRects {
  pub error: Rect,
  pub counter: Rect,
  pub input: Rect,
  pub users: Rect,
}

/// Splits the screen into `pane_count` equal columns above a one-line status bar.
pub fn get_layout(area: Rect, pane_count: usize) -> LayoutRects {
  let main_layout = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Min(0), STATUS_CONSTRAINT].as_ref())
    .split(area);

  let pane_count = pane_count.max(1) as u32;
  let panes = Layout::default()
    .direction(Direction::Horizontal)
    .constraints((0..pane_count).map(|_| Constraint::Ratio(1, pane_count)).collect::<Vec<_>>())
    .split(main_layout[0]);

  let status_layout = Layout::default()
    .direction(Direction::Horizontal)
    .constraints(STATUS_HORIZONTAL_CONSTRAINTS.as_ref())
    .split(main_layout[1]);

  LayoutRects { panes: panes.to_vec(), status_left: status_layout[0], status_right: status_layout[1] }
}

pub fn get_pane_layout(pane: Rect) -> PaneRects {
  let vertical_layout =
    Layout::default().direction(Direction::Vertical).constraints(PANE_CONSTRAINTS.as_ref()).split(pane);

  PaneRects { error: vertical_layout[0], counter: vertical_layout[1], input: vertical_layout[2], users: vertical_layout[3] }
}

pub fn get_notification_layout(rect: Rect, content: &str, i: u16) -> Rect {
  let line_width = (content.lines().map(|line| line.chars().count()).max().unwrap_or(0) as u16 + 4).min(rect.width);
  let line_height = (content.lines().count() as u16 + 2).min(rect.height);
  let right = rect.width.saturating_sub(line_width + 1);
  let bottom = rect.height.saturating_sub(line_height + i * 3 + 2);

  Rect::new(right, bottom, line_width, line_height)
}
