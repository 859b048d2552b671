use strum::Display;

use super::state::User;
use crate::runtime::FetchError;

#[derive(Display, Debug, Clone, PartialEq)]
pub enum Action {
  Noop,
  Increment,
  Decrement,
  DelayedIncrement,
  DelayedDecrement,
  FetchUsers,
  UsersFetched { users: Vec<User> },
  Error { error: FetchError },
  ChangeInput { value: String },
}

impl Action {
  /// Settles a users request into the action that records its outcome.
  pub fn users_fetched(outcome: Result<Vec<User>, FetchError>) -> Self {
    match outcome {
      Ok(users) => Self::UsersFetched { users },
      Err(error) => Self::Error { error },
    }
  }
}
