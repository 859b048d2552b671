use std::{sync::Arc, time::Duration};

use redux_rs::{middlewares::thunk::Thunk, StoreApi};
use reqwest::Client;

use super::{command::Command, registry::EffectRegistry};

pub mod debounce;
pub mod delay;
pub mod fetch;

#[derive(Debug, Clone)]
pub struct EffectSettings {
  /// Wait before attempt `n + 1` of a retried request is `retry_backoff * n`.
  pub retry_backoff: Duration,
}

impl Default for EffectSettings {
  fn default() -> Self {
    Self { retry_backoff: Duration::from_millis(200) }
  }
}

/// Interprets [`Command`]s as thunks run against the store.
#[derive(Debug, Clone)]
pub struct Effects {
  client: Client,
  registry: Arc<EffectRegistry>,
  settings: EffectSettings,
}

impl Effects {
  pub fn new(settings: EffectSettings) -> reqwest::Result<Self> {
    let client = Client::builder().user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))).build()?;
    Ok(Self::with_client(client, settings))
  }

  pub fn with_client(client: Client, settings: EffectSettings) -> Self {
    Self { client, registry: Arc::new(EffectRegistry::new()), settings }
  }

  pub fn registry(&self) -> &Arc<EffectRegistry> {
    &self.registry
  }

  /// Named effects claim their registry slot here, in command order, before the
  /// thunk is scheduled.
  pub fn thunk<S, A, Api>(&self, command: Command<A>) -> Box<dyn Thunk<S, A, Api> + Send + Sync>
  where
    S: Send + Sync + 'static,
    A: Clone + Send + Sync + 'static,
    Api: StoreApi<S, A> + Send + Sync + 'static,
  {
    match command {
      Command::Delay { after, action } => Box::new(delay::DelayThunk::new(after, action)),
      Command::Debounce { key, window, action } => {
        let lease = self.registry.supersede(&key);
        Box::new(debounce::DebounceThunk::new(self.registry.clone(), lease, window, action))
      },
      Command::Ajax { request, settle } => {
        Box::new(fetch::FetchThunk::new(self.client.clone(), request, settle, 1, self.settings.retry_backoff, None))
      },
      Command::Retry { key, attempts, request, settle } => {
        let lease = self.registry.supersede(&key);
        Box::new(fetch::FetchThunk::new(
          self.client.clone(),
          request,
          settle,
          attempts,
          self.settings.retry_backoff,
          Some((self.registry.clone(), lease)),
        ))
      },
    }
  }
}
