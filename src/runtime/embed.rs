use std::fmt::Debug;

use super::update::{Next, Update};

/// Accessor pair for one child slice of a parent state.
pub struct Lens<P, C> {
  pub get: fn(&P) -> &C,
  pub set: fn(P, C) -> P,
}

impl<P, C> Lens<P, C> {
  pub const fn new(get: fn(&P) -> &C, set: fn(P, C) -> P) -> Self {
    Self { get, set }
  }
}

impl<P, C> Clone for Lens<P, C> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<P, C> Copy for Lens<P, C> {}

/// Runs a child program against its slice of a parent state, under a tagged
/// parent action. Parent actions the child does not own leave the state alone.
pub struct Embed<U: Update, P, PA> {
  child: U,
  lens: Lens<P, U::State>,
  wrap: fn(U::Action) -> PA,
  unwrap: fn(PA) -> Option<U::Action>,
}

impl<U: Update, P, PA> Embed<U, P, PA> {
  pub fn new(child: U, lens: Lens<P, U::State>, wrap: fn(U::Action) -> PA, unwrap: fn(PA) -> Option<U::Action>) -> Self {
    Self { child, lens, wrap, unwrap }
  }
}

impl<U, P, PA> Update for Embed<U, P, PA>
where
  U: Update,
  P: Clone + Send + Sync + 'static,
  PA: Clone + Debug + Send + Sync + 'static,
{
  type Action = PA;
  type State = P;

  fn update(&self, action: PA, state: P) -> Next<P, PA> {
    let Some(action) = (self.unwrap)(action) else {
      return Next::state(state);
    };

    let child_state = (self.lens.get)(&state).clone();
    let Next { state: child_state, commands } = self.child.update(action, child_state);
    let wrap = self.wrap;

    Next { state: (self.lens.set)(state, child_state), commands: commands.into_iter().map(|c| c.map(wrap)).collect() }
  }
}
