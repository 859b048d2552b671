use color_eyre::eyre::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;

use crate::{
  action::AppAction,
  config::Config,
  counter::AppState,
  mode::Mode,
  tui::{Event, Frame},
};

pub mod counter_pane;
pub mod notifications;
pub mod small_help;
pub mod status;

/// Snapshot handed to every component on each event and frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
  pub panes: Vec<AppState>,
  pub focused: usize,
  pub mode: Mode,
}

impl ViewState {
  pub fn is_focused(&self, pane: usize) -> bool {
    self.focused == pane
  }
}

pub trait Component {
  #[allow(unused_variables)]
  fn register_action_handler(&mut self, tx: UnboundedSender<AppAction>) -> Result<()> {
    Ok(())
  }

  #[allow(unused_variables)]
  fn register_config_handler(&mut self, config: Config) -> Result<()> {
    Ok(())
  }

  #[allow(unused_variables)]
  fn init(&mut self, area: Rect) -> Result<()> {
    Ok(())
  }

  fn handle_events(&mut self, event: Option<Event>, state: &ViewState) -> Result<Option<AppAction>> {
    let r = match event {
      Some(Event::Key(key_event)) => self.handle_key_events(key_event, state)?,
      Some(Event::Mouse(mouse_event)) => self.handle_mouse_events(mouse_event, state)?,
      _ => None,
    };
    Ok(r)
  }

  #[allow(unused_variables)]
  fn handle_key_events(&mut self, key: KeyEvent, state: &ViewState) -> Result<Option<AppAction>> {
    Ok(None)
  }

  #[allow(unused_variables)]
  fn handle_mouse_events(&mut self, mouse: MouseEvent, state: &ViewState) -> Result<Option<AppAction>> {
    Ok(None)
  }

  #[allow(unused_variables)]
  fn update(&mut self, action: AppAction) -> Result<Option<AppAction>> {
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect, state: &ViewState) -> Result<()>;
}
