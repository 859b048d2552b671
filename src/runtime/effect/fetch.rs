use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use redux_rs::{middlewares::thunk::Thunk, StoreApi};
use reqwest::Client;
use serde_json::Value;

use crate::runtime::{
  command::{HttpRequest, Settle},
  error::FetchError,
  registry::{EffectRegistry, Lease},
};

/// GETs a JSON document, retrying transient failures up to `attempts` times,
/// and dispatches whatever `settle` makes of the final outcome.
pub struct FetchThunk<A> {
  client: Client,
  request: HttpRequest,
  settle: Settle<A>,
  attempts: u32,
  backoff: Duration,
  lease: Option<(Arc<EffectRegistry>, Lease)>,
}

impl<A> FetchThunk<A> {
  pub fn new(
    client: Client,
    request: HttpRequest,
    settle: Settle<A>,
    attempts: u32,
    backoff: Duration,
    lease: Option<(Arc<EffectRegistry>, Lease)>,
  ) -> Self {
    Self { client, request, settle, attempts: attempts.max(1), backoff, lease }
  }

  async fn attempt_all(&self) -> Result<Value, FetchError> {
    let mut attempt = 1;
    loop {
      match get_json(&self.client, &self.request).await {
        Ok(body) => return Ok(body),
        Err(error) if error.is_retryable() && attempt < self.attempts => {
          tracing::warn!(url = %self.request.url, attempt, %error, "request failed, retrying");
          tokio::time::sleep(self.backoff * attempt).await;
          attempt += 1;
        },
        Err(error) if error.is_retryable() && self.attempts > 1 => {
          return Err(FetchError::Exhausted { attempts: attempt, last: Box::new(error) });
        },
        Err(error) => return Err(error),
      }
    }
  }
}

#[async_trait]
impl<S, A, Api> Thunk<S, A, Api> for FetchThunk<A>
where
  S: Send + Sync + 'static,
  A: Send + Sync + 'static,
  Api: StoreApi<S, A> + Send + Sync + 'static,
{
  async fn execute(&self, store: Arc<Api>) {
    let outcome = match &self.lease {
      Some((registry, lease)) => {
        let outcome = tokio::select! {
          _ = lease.superseded() => {
            tracing::debug!(key = %lease.key(), "request superseded");
            return;
          },
          outcome = self.attempt_all() => outcome,
        };
        registry.release(lease);
        outcome
      },
      None => self.attempt_all().await,
    };

    if let Err(error) = &outcome {
      tracing::info!(url = %self.request.url, %error, "request settled with an error");
    }
    store.dispatch((self.settle)(outcome)).await;
  }
}

pub async fn get_json(client: &Client, request: &HttpRequest) -> Result<Value, FetchError> {
  let response = client
    .get(&request.url)
    .timeout(request.timeout)
    .send()
    .await
    .map_err(|e| classify(e, request))?;

  let status = response.status();
  if !status.is_success() {
    return Err(FetchError::Status { status: status.as_u16() });
  }

  response.json::<Value>().await.map_err(|e| if e.is_timeout() { classify(e, request) } else { FetchError::Decode(e.to_string()) })
}

fn classify(error: reqwest::Error, request: &HttpRequest) -> FetchError {
  if error.is_timeout() {
    FetchError::Timeout { url: request.url.clone(), timeout_ms: request.timeout.as_millis() as u64 }
  } else {
    FetchError::Transport(error.to_string())
  }
}
