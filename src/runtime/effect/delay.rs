use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use redux_rs::{middlewares::thunk::Thunk, StoreApi};

pub struct DelayThunk<A> {
  pub after: Duration,
  pub action: A,
}

impl<A> DelayThunk<A> {
  pub fn new(after: Duration, action: A) -> Self {
    Self { after, action }
  }
}

#[async_trait]
impl<S, A, Api> Thunk<S, A, Api> for DelayThunk<A>
where
  S: Send + Sync + 'static,
  A: Clone + Send + Sync + 'static,
  Api: StoreApi<S, A> + Send + Sync + 'static,
{
  async fn execute(&self, store: Arc<Api>) {
    tokio::time::sleep(self.after).await;
    store.dispatch(self.action.clone()).await;
  }
}
