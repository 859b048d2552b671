use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an HTTP command failed. Carried as data in actions and state, so it is
/// cloneable and comparable rather than wrapping the transport's error type.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum FetchError {
  #[error("request to {url} timed out after {timeout_ms}ms")]
  Timeout { url: String, timeout_ms: u64 },
  #[error("request failed: {0}")]
  Transport(String),
  #[error("server answered with status {status}")]
  Status { status: u16 },
  #[error("could not decode response: {0}")]
  Decode(String),
  #[error("gave up after {attempts} attempts: {last}")]
  Exhausted { attempts: u32, last: Box<FetchError> },
}

impl FetchError {
  pub fn is_retryable(&self) -> bool {
    match self {
      Self::Timeout { .. } | Self::Transport(_) => true,
      Self::Status { status } => *status >= 500,
      Self::Decode(_) | Self::Exhausted { .. } => false,
    }
  }
}
