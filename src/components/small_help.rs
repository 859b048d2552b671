use color_eyre::eyre::Result;
use ratatui::prelude::*;

use super::{Component, Frame, ViewState};
use crate::{layout::get_layout, mode::Mode, ui::small_help_widget::SmallHelpWidget};

#[derive(Default)]
pub struct SmallHelp;

impl SmallHelp {
  pub fn new() -> Self {
    Self
  }
}

pub fn help_for(mode: Mode) -> &'static str {
  match mode {
    Mode::Normal => {
      "<+> increment, <-> decrement, <]>/<[> delayed, <f> fetch users, <i> type, <Tab> switch pane, <q> quit"
    },
    Mode::Input => "Input: type to debounce an increment, <Esc> back, <Tab> switch pane",
  }
}

impl Component for SmallHelp {
  fn draw(&mut self, f: &mut Frame<'_>, area: Rect, state: &ViewState) -> Result<()> {
    let layout = get_layout(area, state.panes.len());
    let small_help = SmallHelpWidget::new(help_for(state.mode).to_string(), Color::Blue, Alignment::Left);
    f.render_widget(small_help, layout.status_left);
    Ok(())
  }
}
