use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{
  prelude::*,
  widgets::*,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use super::{Component, Frame, ViewState};
use crate::{
  action::AppAction,
  counter::{Action, AppState},
  layout::{get_layout, get_pane_layout},
  mode::Mode,
  runtime::Dispatch,
};

/// One counter app: inline error, counter, text input and fetched users.
pub struct CounterPane {
  index: usize,
  title: String,
  input: Input,
  dispatch: Box<dyn Dispatch<Action>>,
}

impl CounterPane {
  pub fn new(index: usize, title: impl Into<String>, dispatch: Box<dyn Dispatch<Action>>) -> Self {
    Self { index, title: title.into(), input: Input::default(), dispatch }
  }

  fn pane_state<'a>(&self, state: &'a ViewState) -> Option<&'a AppState> {
    state.panes.get(self.index)
  }

  fn border_style(&self, state: &ViewState) -> Style {
    match (state.is_focused(self.index), state.mode) {
      (true, Mode::Input) => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
      (true, Mode::Normal) => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
      (false, _) => Style::default(),
    }
  }
}

impl Component for CounterPane {
  fn handle_key_events(&mut self, key: KeyEvent, state: &ViewState) -> Result<Option<AppAction>> {
    if state.mode != Mode::Input || !state.is_focused(self.index) {
      return Ok(None);
    }
    if let Some(change) = self.input.handle_event(&crossterm::event::Event::Key(key)) {
      if change.value {
        self.dispatch.dispatch(Action::ChangeInput { value: self.input.value().to_string() });
      }
    }
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect, state: &ViewState) -> Result<()> {
    let Some(pane) = self.pane_state(state) else { return Ok(()) };
    let Some(rect) = get_layout(area, state.panes.len()).panes.get(self.index).copied() else { return Ok(()) };

    let block = Block::bordered()
      .border_type(BorderType::Rounded)
      .title_top(Line::from(self.title.as_str()).left_aligned())
      .border_style(self.border_style(state));
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    let layout = get_pane_layout(inner);

    if let Some(error) = &pane.error {
      let error_line = Paragraph::new(format!("Oh... {error}")).style(Style::default().fg(Color::Red));
      f.render_widget(error_line, layout.error);
    }

    let counter = Paragraph::new(pane.counter.to_string())
      .alignment(Alignment::Center)
      .style(Style::default().add_modifier(Modifier::BOLD))
      .block(Block::bordered().border_type(BorderType::Rounded).title("Counter"));
    f.render_widget(counter, layout.counter);

    let width = layout.input.width.max(3) - 3;
    let scroll = self.input.visual_scroll(width as usize);
    let input = Paragraph::new(self.input.value())
      .style(Style::default().fg(Color::White))
      .scroll((0, scroll as u16))
      .block(Block::bordered().border_type(BorderType::Rounded).title("Input"));
    f.render_widget(input, layout.input);

    if state.mode == Mode::Input && state.is_focused(self.index) {
      f.set_cursor_position((
        layout.input.x + ((self.input.visual_cursor()).max(scroll) - scroll) as u16 + 1,
        layout.input.y + 1,
      ));
    }

    let users = Paragraph::new(pane.users_json())
      .wrap(Wrap { trim: false })
      .block(Block::bordered().border_type(BorderType::Rounded).title(format!("Users ({})", pane.users.len())));
    f.render_widget(users, layout.users);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crossterm::event::{KeyCode, KeyModifiers};
  use pretty_assertions::assert_eq;
  use ratatui::{backend::TestBackend, Terminal};

  use super::*;
  use crate::runtime::FetchError;

  #[derive(Clone, Default)]
  struct Recorder(Arc<Mutex<Vec<Action>>>);

  impl Dispatch<Action> for Recorder {
    fn dispatch(&self, action: Action) {
      self.0.lock().unwrap().push(action);
    }
  }

  fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::empty())
  }

  fn view(focused: usize, mode: Mode) -> ViewState {
    ViewState { panes: vec![AppState::new(), AppState::new()], focused, mode }
  }

  #[test]
  fn every_edit_dispatches_the_full_value() {
    let recorder = Recorder::default();
    let mut pane = CounterPane::new(0, "App1", Box::new(recorder.clone()));
    let state = view(0, Mode::Input);

    pane.handle_key_events(key('h'), &state).unwrap();
    pane.handle_key_events(key('i'), &state).unwrap();
    pane.handle_key_events(KeyEvent::new(KeyCode::Backspace, KeyModifiers::empty()), &state).unwrap();

    assert_eq!(*recorder.0.lock().unwrap(), vec![
      Action::ChangeInput { value: "h".into() },
      Action::ChangeInput { value: "hi".into() },
      Action::ChangeInput { value: "h".into() },
    ]);
  }

  #[test]
  fn keys_are_ignored_outside_input_mode_or_focus() {
    let recorder = Recorder::default();
    let mut pane = CounterPane::new(1, "App2", Box::new(recorder.clone()));

    pane.handle_key_events(key('a'), &view(1, Mode::Normal)).unwrap();
    pane.handle_key_events(key('a'), &view(0, Mode::Input)).unwrap();
    pane.handle_key_events(KeyEvent::new(KeyCode::Left, KeyModifiers::empty()), &view(1, Mode::Input)).unwrap();

    assert!(recorder.0.lock().unwrap().is_empty());
  }

  #[test]
  fn draws_error_counter_and_users() {
    let mut pane = CounterPane::new(0, "App1", Box::new(Recorder::default()));
    let state = ViewState {
      panes: vec![AppState { counter: 7, error: Some(FetchError::Status { status: 503 }), users: vec![] }],
      focused: 0,
      mode: Mode::Normal,
    };
    let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
    terminal
      .draw(|f| {
        let area = f.area();
        pane.draw(f, area, &state).unwrap();
      })
      .unwrap();

    let rendered: String = terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect();
    assert!(rendered.contains("App1"));
    assert!(rendered.contains("Oh... "));
    assert!(rendered.contains("503"));
    assert!(rendered.contains('7'));
    assert!(rendered.contains("Users (0)"));
  }
}
