use std::time::Duration;

use super::{action::Action, state::AppState};
use crate::runtime::{Command, EffectKey, HttpRequest, Next, Update};

pub const DELAY: Duration = Duration::from_millis(1000);
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);
pub const INPUT_DEBOUNCE: EffectKey = EffectKey::new("my-debounce");
pub const USERS_RETRY: EffectKey = EffectKey::new("my-retry");

/// How `FetchUsers` builds its request. `retries: None` issues a single
/// attempt; `Some(n)` retries up to `n` attempts under [`USERS_RETRY`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
  pub users_url: String,
  pub timeout: Duration,
  pub retries: Option<u32>,
}

impl Default for FetchSettings {
  fn default() -> Self {
    Self {
      users_url: "https://jsonplaceholder.typicode.com/users".to_string(),
      timeout: Duration::from_millis(1000),
      retries: None,
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct Counter {
  fetch: FetchSettings,
}

impl Counter {
  pub fn new(fetch: FetchSettings) -> Self {
    Self { fetch }
  }

  fn fetch_users(&self) -> Command<Action> {
    let request = HttpRequest::get(self.fetch.users_url.as_str(), self.fetch.timeout);
    match self.fetch.retries {
      Some(attempts) => Command::retry_json(USERS_RETRY, attempts, request, Action::users_fetched),
      None => Command::get_json(request, Action::users_fetched),
    }
  }
}

impl Update for Counter {
  type Action = Action;
  type State = AppState;

  fn update(&self, action: Action, state: AppState) -> Next<AppState, Action> {
    match action {
      Action::Increment => Next::state(AppState { counter: state.counter.wrapping_add(1), ..state }),
      Action::Decrement => Next::state(AppState { counter: state.counter.wrapping_sub(1), ..state }),
      Action::DelayedIncrement => Next::with(state, Command::delay(DELAY, Action::Increment)),
      Action::DelayedDecrement => Next::with(state, Command::delay(DELAY, Action::Decrement)),
      Action::FetchUsers => {
        Next::with(AppState { counter: state.counter.wrapping_add(1), ..state }, self.fetch_users())
      },
      Action::UsersFetched { users } => Next::state(AppState { users, ..state }),
      Action::Error { error } => Next::state(AppState { error: Some(error), ..state }),
      Action::ChangeInput { .. } => {
        Next::with(state, Command::debounce(INPUT_DEBOUNCE, DEBOUNCE_WINDOW, Action::Increment))
      },
      Action::Noop => Next::state(state),
    }
  }
}
