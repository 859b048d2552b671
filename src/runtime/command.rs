use std::{borrow::Cow, fmt, sync::Arc, time::Duration};

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::FetchError;

/// Turns the settled outcome of an HTTP command into the follow-up action.
pub type Settle<A> = Arc<dyn Fn(Result<Value, FetchError>) -> A + Send + Sync>;

/// Process-wide name of a debounced or retried effect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectKey(Cow<'static, str>);

impl EffectKey {
  pub const fn new(name: &'static str) -> Self {
    Self(Cow::Borrowed(name))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl From<String> for EffectKey {
  fn from(name: String) -> Self {
    Self(Cow::Owned(name))
  }
}

impl fmt::Display for EffectKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
  pub url: String,
  pub timeout: Duration,
}

impl HttpRequest {
  pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
    Self { url: url.into(), timeout }
  }
}

/// A side effect described as data. The update function returns these and the
/// effect runtime interprets them; nothing in here runs on its own.
pub enum Command<A> {
  Delay { after: Duration, action: A },
  Debounce { key: EffectKey, window: Duration, action: A },
  Ajax { request: HttpRequest, settle: Settle<A> },
  Retry { key: EffectKey, attempts: u32, request: HttpRequest, settle: Settle<A> },
}

impl<A> Command<A> {
  pub fn delay(after: Duration, action: A) -> Self {
    Self::Delay { after, action }
  }

  pub fn debounce(key: EffectKey, window: Duration, action: A) -> Self {
    Self::Debounce { key, window, action }
  }

  /// Single GET whose JSON body is decoded into `T` before reaching `on_settled`.
  pub fn get_json<T, F>(request: HttpRequest, on_settled: F) -> Self
  where
    T: DeserializeOwned,
    F: Fn(Result<T, FetchError>) -> A + Send + Sync + 'static,
  {
    Self::Ajax { request, settle: decode_with(on_settled) }
  }

  /// Like [`Command::get_json`], but retried up to `attempts` times under `key`.
  pub fn retry_json<T, F>(key: EffectKey, attempts: u32, request: HttpRequest, on_settled: F) -> Self
  where
    T: DeserializeOwned,
    F: Fn(Result<T, FetchError>) -> A + Send + Sync + 'static,
  {
    Self::Retry { key, attempts: attempts.max(1), request, settle: decode_with(on_settled) }
  }

  pub fn key(&self) -> Option<&EffectKey> {
    match self {
      Self::Debounce { key, .. } | Self::Retry { key, .. } => Some(key),
      Self::Delay { .. } | Self::Ajax { .. } => None,
    }
  }

  /// Re-targets the command so whatever action it eventually produces is
  /// passed through `wrap` first.
  pub fn map<B, F>(self, wrap: F) -> Command<B>
  where
    A: 'static,
    F: Fn(A) -> B + Send + Sync + 'static,
  {
    match self {
      Self::Delay { after, action } => Command::Delay { after, action: wrap(action) },
      Self::Debounce { key, window, action } => Command::Debounce { key, window, action: wrap(action) },
      Self::Ajax { request, settle } => {
        Command::Ajax { request, settle: Arc::new(move |outcome: Result<Value, FetchError>| wrap(settle(outcome))) }
      },
      Self::Retry { key, attempts, request, settle } => Command::Retry {
        key,
        attempts,
        request,
        settle: Arc::new(move |outcome: Result<Value, FetchError>| wrap(settle(outcome))),
      },
    }
  }
}

fn decode_with<T, A, F>(on_settled: F) -> Settle<A>
where
  T: DeserializeOwned,
  F: Fn(Result<T, FetchError>) -> A + Send + Sync + 'static,
{
  Arc::new(move |outcome: Result<Value, FetchError>| {
    on_settled(outcome.and_then(|body| serde_json::from_value(body).map_err(|e| FetchError::Decode(e.to_string()))))
  })
}

impl<A: fmt::Debug> fmt::Debug for Command<A> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Delay { after, action } => f.debug_struct("Delay").field("after", after).field("action", action).finish(),
      Self::Debounce { key, window, action } => {
        f.debug_struct("Debounce").field("key", key).field("window", window).field("action", action).finish()
      },
      Self::Ajax { request, .. } => f.debug_struct("Ajax").field("request", request).finish_non_exhaustive(),
      Self::Retry { key, attempts, request, .. } => {
        f.debug_struct("Retry")
          .field("key", key)
          .field("attempts", attempts)
          .field("request", request)
          .finish_non_exhaustive()
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use serde_json::json;

  use super::*;

  #[derive(Debug, Clone, PartialEq)]
  enum Inner {
    Ping,
    Got(Result<Vec<u8>, FetchError>),
  }

  #[derive(Debug, Clone, PartialEq)]
  enum Outer {
    Inner(Inner),
  }

  fn request() -> HttpRequest {
    HttpRequest::get("http://localhost/bytes", Duration::from_millis(35))
  }

  #[test]
  fn map_wraps_timer_actions() {
    let command = Command::delay(Duration::from_secs(1), Inner::Ping).map(Outer::Inner);
    match command {
      Command::Delay { after, action } => {
        assert_eq!(after, Duration::from_secs(1));
        assert_eq!(action, Outer::Inner(Inner::Ping));
      },
      other => panic!("unexpected command {other:?}"),
    }
  }

  #[test]
  fn map_wraps_settled_fetches() {
    let command = Command::get_json(request(), Inner::Got).map(Outer::Inner);
    let Command::Ajax { settle, .. } = command else { panic!("expected an ajax command") };

    assert_eq!(settle(Ok(json!([1, 2, 3]))), Outer::Inner(Inner::Got(Ok(vec![1, 2, 3]))));
    assert_eq!(
      settle(Err(FetchError::Status { status: 503 })),
      Outer::Inner(Inner::Got(Err(FetchError::Status { status: 503 })))
    );
  }

  #[test]
  fn undecodable_body_settles_as_decode_error() {
    let Command::Ajax { settle, .. } = Command::get_json(request(), Inner::Got) else { panic!("expected ajax") };

    match settle(Ok(json!({ "not": "a list" }))) {
      Inner::Got(Err(FetchError::Decode(_))) => {},
      other => panic!("unexpected action {other:?}"),
    }
  }

  #[test]
  fn retry_keeps_at_least_one_attempt() {
    let command = Command::retry_json(EffectKey::new("my-retry"), 0, request(), Inner::Got);
    assert_eq!(command.key(), Some(&EffectKey::new("my-retry")));
    match command {
      Command::Retry { attempts, .. } => assert_eq!(attempts, 1),
      other => panic!("unexpected command {other:?}"),
    }
  }
}
