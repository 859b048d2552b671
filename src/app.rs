use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::Rect;
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::{
  action::{AppAction, TuiAction},
  components::{
    counter_pane::CounterPane,
    notifications::{NotificationEnum, Notifications},
    small_help::SmallHelp,
    status::{pending_summary, Status},
    Component, ViewState,
  },
  config::Config,
  counter::{Action, AppState, Counter},
  meta::{MetaAction, MetaApp, MetaState},
  mode::Mode,
  runtime::{Dispatch, Effects, FetchError, Mapped, Runtime, Update},
  tui,
};

/// A program whose state can be shown as a row of counter panes.
pub trait Panes: Update {
  fn titles() -> Vec<&'static str>;

  /// Wraps a pane's action into the program's root action, one entry per pane.
  fn routes() -> Vec<fn(Action) -> Self::Action>;

  fn panes(state: &Self::State) -> Vec<AppState>;
}

impl Panes for Counter {
  fn titles() -> Vec<&'static str> {
    vec!["Counter"]
  }

  fn routes() -> Vec<fn(Action) -> Action> {
    vec![std::convert::identity as fn(Action) -> Action]
  }

  fn panes(state: &AppState) -> Vec<AppState> {
    vec![state.clone()]
  }
}

impl Panes for MetaApp {
  fn titles() -> Vec<&'static str> {
    vec!["App1", "App2"]
  }

  fn routes() -> Vec<fn(Action) -> MetaAction> {
    vec![MetaAction::App1 as fn(Action) -> MetaAction, MetaAction::App2]
  }

  fn panes(state: &MetaState) -> Vec<AppState> {
    vec![state.app1.clone(), state.app2.clone()]
  }
}

pub struct App {
  pub config: Config,
  pub tick_rate: f64,
  pub frame_rate: f64,
  pub components: Vec<Box<dyn Component>>,
  pub should_quit: bool,
  pub should_suspend: bool,
  pub mode: Mode,
  pub focused: usize,
  pub last_tick_key_events: Vec<KeyEvent>,
}

impl App {
  pub fn new(config: Config, tick_rate: f64, frame_rate: f64) -> Self {
    Self {
      config,
      tick_rate,
      frame_rate,
      components: Vec::new(),
      should_quit: false,
      should_suspend: false,
      mode: Mode::Normal,
      focused: 0,
      last_tick_key_events: Vec::new(),
    }
  }

  fn view(&self, panes: Vec<AppState>) -> ViewState {
    ViewState { panes, focused: self.focused, mode: self.mode }
  }

  fn binding_for(&self, keys: &[KeyEvent]) -> Option<AppAction> {
    self.config.keybindings.get(&self.mode).and_then(|bindings| bindings.get(keys)).cloned()
  }

  fn draw(&mut self, tui: &mut tui::Tui, state: &ViewState, action_tx: &UnboundedSender<AppAction>) -> Result<()> {
    let mut errors = Vec::new();
    tui.draw(|f| {
      let area = f.area();
      for component in self.components.iter_mut() {
        if let Err(e) = component.draw(f, area, state) {
          errors.push(e);
        }
      }
    })?;
    for e in errors {
      action_tx.send(AppAction::Tui(TuiAction::Error(format!("Failed to draw: {:?}", e))))?;
    }
    Ok(())
  }

  pub async fn run<P: Panes>(&mut self, program: P, initial_state: P::State, effects: Effects) -> Result<()> {
    log::info!("Starting app..");
    let titles = P::titles();
    let mut runtime = Runtime::start(program, initial_state, effects).await;
    let dispatcher = runtime.dispatcher();
    let routes: Vec<Mapped<Action, P::Action>> = P::routes().into_iter().map(|wrap| dispatcher.map(wrap)).collect();

    let (action_tx, mut action_rx) = mpsc::unbounded_channel();

    self.components.clear();
    for (index, route) in routes.iter().enumerate() {
      let title = titles.get(index).copied().unwrap_or("Counter");
      self.components.push(Box::new(CounterPane::new(index, title, Box::new(route.clone()))));
    }
    self.components.push(Box::new(Notifications::new()));
    self.components.push(Box::new(SmallHelp::new()));
    self.components.push(Box::new(Status::new()));

    let mut tui = tui::Tui::new()?.tick_rate(self.tick_rate).frame_rate(self.frame_rate);
    tui.enter()?;

    for component in self.components.iter_mut() {
      component.register_action_handler(action_tx.clone())?;
    }

    for component in self.components.iter_mut() {
      component.register_config_handler(self.config.clone())?;
    }

    let size = tui.size()?;
    for component in self.components.iter_mut() {
      component.init(Rect::new(0, 0, size.width, size.height))?;
    }

    let mut known_errors: Vec<Option<FetchError>> = vec![None; routes.len()];
    let mut status = String::new();

    loop {
      let state = self.view(P::panes(&runtime.state()));
      for (notification, known) in new_errors(&titles, &state.panes, &mut known_errors) {
        log::info!("{known}");
        action_tx.send(AppAction::Tui(TuiAction::Notify(notification)))?;
      }

      if let Some(e) = tui.next().await {
        match e {
          tui::Event::Quit => action_tx.send(AppAction::Tui(TuiAction::Quit))?,
          tui::Event::Tick => action_tx.send(AppAction::Tui(TuiAction::Tick))?,
          tui::Event::Render => action_tx.send(AppAction::Tui(TuiAction::Render))?,
          tui::Event::Resize(x, y) => action_tx.send(AppAction::Tui(TuiAction::Resize(x, y)))?,
          tui::Event::Key(key) => {
            let key = normalize_key(key);
            if let Some(app_action) = self.binding_for(&[key]) {
              log::info!("Got action: {app_action:?}");
              action_tx.send(app_action)?;
            } else {
              // If the key was not handled as a single key action,
              // then consider it for multi-key combinations.
              self.last_tick_key_events.push(key);

              if let Some(app_action) = self.binding_for(&self.last_tick_key_events) {
                log::info!("Got action: {app_action:?}");
                action_tx.send(app_action)?;
              }
            }
          },
          _ => {},
        }
        for component in self.components.iter_mut() {
          if let Some(action) = component.handle_events(Some(e.clone()), &state)? {
            action_tx.send(action)?;
          }
        }
      }

      let mut rendered = false;
      while let Ok(action) = action_rx.try_recv() {
        if action != AppAction::Tui(TuiAction::Tick) && action != AppAction::Tui(TuiAction::Render) {
          log::debug!("{action:?}");
        }
        match &action {
          AppAction::Counter(counter_action) => match routes.get(self.focused) {
            Some(route) => route.dispatch(counter_action.clone()),
            None => log::warn!("No pane {} to receive {counter_action}", self.focused),
          },
          AppAction::Tui(TuiAction::Tick) => {
            self.last_tick_key_events.drain(..);
            let pending = pending_summary(&runtime.pending_effects());
            if pending != status {
              status = pending.clone();
              action_tx.send(AppAction::Tui(TuiAction::Status(pending)))?;
            }
          },
          AppAction::Tui(TuiAction::Quit) => self.should_quit = true,
          AppAction::Tui(TuiAction::Suspend) => self.should_suspend = true,
          AppAction::Tui(TuiAction::Resume) => self.should_suspend = false,
          AppAction::Tui(TuiAction::FocusNext) => self.focused = cycle_focus(self.focused, routes.len(), true),
          AppAction::Tui(TuiAction::FocusPrevious) => self.focused = cycle_focus(self.focused, routes.len(), false),
          AppAction::Tui(TuiAction::ChangeMode(mode)) => self.mode = *mode,
          AppAction::Tui(TuiAction::Error(message)) => log::error!("{message}"),
          AppAction::Tui(TuiAction::Resize(w, h)) => {
            tui.resize(Rect::new(0, 0, *w, *h))?;
            let state = self.view(P::panes(&runtime.state()));
            self.draw(&mut tui, &state, &action_tx)?;
          },
          AppAction::Tui(TuiAction::Render) => {
            if !rendered {
              rendered = true;
              let state = self.view(P::panes(&runtime.state()));
              self.draw(&mut tui, &state, &action_tx)?;
            }
          },
          _ => {},
        }
        for component in self.components.iter_mut() {
          if let Some(action) = component.update(action.clone())? {
            action_tx.send(action)?
          };
        }
      }

      if self.should_suspend {
        tui.suspend()?;
        action_tx.send(AppAction::Tui(TuiAction::Resume))?;
        tui = tui::Tui::new()?.tick_rate(self.tick_rate).frame_rate(self.frame_rate);
        tui.enter()?;
      } else if self.should_quit {
        tui.stop()?;
        break;
      }
    }
    runtime.shutdown();
    tui.exit()?;
    Ok(())
  }
}

/// Terminals report shifted symbols like `+` with SHIFT set; bindings name the symbol alone.
fn normalize_key(key: KeyEvent) -> KeyEvent {
  match key.code {
    KeyCode::Char(c) if key.modifiers == KeyModifiers::SHIFT && !c.is_ascii_alphabetic() => {
      KeyEvent::new(key.code, KeyModifiers::empty())
    },
    _ => key,
  }
}

fn cycle_focus(current: usize, count: usize, forward: bool) -> usize {
  if count == 0 {
    return 0;
  }
  if forward {
    (current + 1) % count
  } else {
    (current + count - 1) % count
  }
}

/// Notifications for panes whose error changed to a new value since the last check.
fn new_errors(
  titles: &[&str],
  panes: &[AppState],
  known: &mut Vec<Option<FetchError>>,
) -> Vec<(NotificationEnum, String)> {
  known.resize(panes.len(), None);
  let mut fresh = Vec::new();
  for (index, pane) in panes.iter().enumerate() {
    if pane.error != known[index] {
      known[index] = pane.error.clone();
      if let Some(error) = &pane.error {
        let title = titles.get(index).copied().unwrap_or("Counter");
        let message = format!("{title}: {error}");
        fresh.push((NotificationEnum::Error(message.clone()), message));
      }
    }
  }
  fresh
}
