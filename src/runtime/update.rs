use std::fmt::Debug;

use super::command::Command;

/// Result of folding one action into state: the next state plus whatever side
/// effects the transition asks for, in order.
pub struct Next<S, A> {
  pub state: S,
  pub commands: Vec<Command<A>>,
}

impl<S, A> Next<S, A> {
  pub fn state(state: S) -> Self {
    Self { state, commands: Vec::new() }
  }

  pub fn with(state: S, command: Command<A>) -> Self {
    Self { state, commands: vec![command] }
  }
}

impl<S: Debug, A: Debug> Debug for Next<S, A> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Next").field("state", &self.state).field("commands", &self.commands).finish()
  }
}

/// A pure state transition. Implementations must not block, panic, or touch
/// anything outside `(action, state)`.
pub trait Update: Send + Sync + 'static {
  type State: Clone + Send + Sync + 'static;
  type Action: Clone + Debug + Send + Sync + 'static;

  fn update(&self, action: Self::Action, state: Self::State) -> Next<Self::State, Self::Action>;
}
