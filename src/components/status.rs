use color_eyre::eyre::Result;
use ratatui::prelude::*;

use super::{Component, Frame, ViewState};
use crate::{
  action::{AppAction, TuiAction},
  layout::get_layout,
  runtime::EffectKey,
  ui::small_help_widget::SmallHelpWidget,
};

/// Right half of the status bar: named effects still in flight.
#[derive(Default)]
pub struct Status {
  content: String,
}

impl Status {
  pub fn new() -> Self {
    Self::default()
  }
}

pub fn pending_summary(pending: &[EffectKey]) -> String {
  if pending.is_empty() {
    return String::new();
  }
  let names: Vec<&str> = pending.iter().map(EffectKey::as_str).collect();
  format!("pending: {}", names.join(", "))
}

impl Component for Status {
  fn update(&mut self, action: AppAction) -> Result<Option<AppAction>> {
    if let AppAction::Tui(TuiAction::Status(content)) = action {
      self.content = content;
    }
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect, state: &ViewState) -> Result<()> {
    let layout = get_layout(area, state.panes.len());
    let status = SmallHelpWidget::new(self.content.clone(), Color::Yellow, Alignment::Right);
    f.render_widget(status, layout.status_right);
    Ok(())
  }
}
