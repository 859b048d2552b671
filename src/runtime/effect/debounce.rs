use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use redux_rs::{middlewares::thunk::Thunk, StoreApi};

use crate::runtime::registry::{EffectRegistry, Lease};

/// Dispatches `action` once `window` passes without a newer trigger on the
/// same key.
pub struct DebounceThunk<A> {
  registry: Arc<EffectRegistry>,
  lease: Lease,
  window: Duration,
  action: A,
}

impl<A> DebounceThunk<A> {
  pub fn new(registry: Arc<EffectRegistry>, lease: Lease, window: Duration, action: A) -> Self {
    Self { registry, lease, window, action }
  }
}

#[async_trait]
impl<S, A, Api> Thunk<S, A, Api> for DebounceThunk<A>
where
  S: Send + Sync + 'static,
  A: Clone + Send + Sync + 'static,
  Api: StoreApi<S, A> + Send + Sync + 'static,
{
  async fn execute(&self, store: Arc<Api>) {
    tokio::select! {
      _ = self.lease.superseded() => return,
      _ = tokio::time::sleep(self.window) => {},
    }

    self.registry.release(&self.lease);
    tracing::debug!(key = %self.lease.key(), "debounce window elapsed");
    store.dispatch(self.action.clone()).await;
  }
}
