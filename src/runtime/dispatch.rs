use std::fmt::Debug;

use tokio::sync::mpsc::UnboundedSender;

/// Anything that accepts actions. Dispatching never blocks and never fails from
/// the caller's point of view.
pub trait Dispatch<A>: Send + Sync {
  fn dispatch(&self, action: A);
}

/// Handle onto a runtime's dispatch queue.
#[derive(Debug)]
pub struct Dispatcher<A> {
  tx: UnboundedSender<A>,
}

impl<A> Clone for Dispatcher<A> {
  fn clone(&self) -> Self {
    Self { tx: self.tx.clone() }
  }
}

impl<A> Dispatcher<A> {
  pub fn new(tx: UnboundedSender<A>) -> Self {
    Self { tx }
  }

  /// A dispatcher for a child program whose actions reach this queue wrapped.
  pub fn map<C>(&self, wrap: fn(C) -> A) -> Mapped<C, A> {
    Mapped { inner: self.clone(), wrap }
  }
}

impl<A: Debug + Send> Dispatch<A> for Dispatcher<A> {
  fn dispatch(&self, action: A) {
    if let Err(e) = self.tx.send(action) {
      tracing::warn!(action = ?e.0, "dispatch after the runtime shut down");
    }
  }
}

pub struct Mapped<C, A> {
  inner: Dispatcher<A>,
  wrap: fn(C) -> A,
}

impl<C, A> Clone for Mapped<C, A> {
  fn clone(&self) -> Self {
    Self { inner: self.inner.clone(), wrap: self.wrap }
  }
}

impl<C, A: Debug + Send> Dispatch<C> for Mapped<C, A> {
  fn dispatch(&self, action: C) {
    self.inner.dispatch((self.wrap)(action));
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use tokio::sync::mpsc;

  use super::*;

  #[derive(Debug, PartialEq)]
  enum Root {
    Child(u8),
  }

  #[test]
  fn mapped_dispatcher_wraps_child_actions() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let child = Dispatcher::new(tx).map(Root::Child);

    child.dispatch(1);
    child.dispatch(2);

    assert_eq!(rx.try_recv().ok(), Some(Root::Child(1)));
    assert_eq!(rx.try_recv().ok(), Some(Root::Child(2)));
  }

  #[test]
  fn dispatch_after_shutdown_is_dropped() {
    let (tx, rx) = mpsc::unbounded_channel::<Root>();
    drop(rx);
    Dispatcher::new(tx).dispatch(Root::Child(3));
  }
}
