//! Two independent counter apps sharing one state tree and one dispatcher.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{
  counter::{Action, AppState, Counter},
  runtime::{Embed, Lens, Next, Update},
};

#[derive(Default, Deserialize, Serialize, Clone, PartialEq, Debug)]
pub struct MetaState {
  pub app1: AppState,
  pub app2: AppState,
}

#[derive(Display, Debug, Clone, PartialEq)]
pub enum MetaAction {
  App1(Action),
  App2(Action),
}

impl MetaAction {
  fn into_app1(self) -> Option<Action> {
    match self {
      Self::App1(action) => Some(action),
      Self::App2(_) => None,
    }
  }

  fn into_app2(self) -> Option<Action> {
    match self {
      Self::App2(action) => Some(action),
      Self::App1(_) => None,
    }
  }
}

fn app1(state: &MetaState) -> &AppState {
  &state.app1
}

fn set_app1(state: MetaState, app1: AppState) -> MetaState {
  MetaState { app1, ..state }
}

fn app2(state: &MetaState) -> &AppState {
  &state.app2
}

fn set_app2(state: MetaState, app2: AppState) -> MetaState {
  MetaState { app2, ..state }
}

pub struct MetaApp {
  app1: Embed<Counter, MetaState, MetaAction>,
  app2: Embed<Counter, MetaState, MetaAction>,
}

impl MetaApp {
  pub fn new(counter: Counter) -> Self {
    Self {
      app1: Embed::new(counter.clone(), Lens::new(app1, set_app1), MetaAction::App1, MetaAction::into_app1),
      app2: Embed::new(counter, Lens::new(app2, set_app2), MetaAction::App2, MetaAction::into_app2),
    }
  }
}

impl Update for MetaApp {
  type Action = MetaAction;
  type State = MetaState;

  fn update(&self, action: MetaAction, state: MetaState) -> Next<MetaState, MetaAction> {
    match action {
      MetaAction::App1(_) => self.app1.update(action, state),
      MetaAction::App2(_) => self.app2.update(action, state),
    }
  }
}
