use std::{
  collections::HashMap,
  sync::{
    atomic::{AtomicU64, Ordering},
    Mutex, MutexGuard, PoisonError,
  },
};

use tokio_util::sync::CancellationToken;

use super::command::EffectKey;

/// Claim on a named effect slot. Cancelled as soon as a newer command with the
/// same key arrives.
#[derive(Debug, Clone)]
pub struct Lease {
  key: EffectKey,
  id: u64,
  token: CancellationToken,
}

impl Lease {
  pub fn key(&self) -> &EffectKey {
    &self.key
  }

  #[cfg(test)]
  pub fn is_superseded(&self) -> bool {
    self.token.is_cancelled()
  }

  pub async fn superseded(&self) {
    self.token.cancelled().await
  }
}

/// Pending named effects, at most one per key.
#[derive(Debug, Default)]
pub struct EffectRegistry {
  slots: Mutex<HashMap<EffectKey, Lease>>,
  next_id: AtomicU64,
}

impl EffectRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Takes the slot for `key`, cancelling whichever effect held it.
  pub fn supersede(&self, key: &EffectKey) -> Lease {
    let lease =
      Lease { key: key.clone(), id: self.next_id.fetch_add(1, Ordering::Relaxed), token: CancellationToken::new() };
    if let Some(previous) = self.slots().insert(key.clone(), lease.clone()) {
      tracing::debug!(key = %key, "superseding pending effect");
      previous.token.cancel();
    }
    lease
  }

  /// Frees the slot, unless a newer lease already replaced this one.
  pub fn release(&self, lease: &Lease) {
    let mut slots = self.slots();
    if slots.get(&lease.key).is_some_and(|current| current.id == lease.id) {
      slots.remove(&lease.key);
    }
  }

  pub fn pending(&self) -> Vec<EffectKey> {
    let mut keys: Vec<EffectKey> = self.slots().keys().cloned().collect();
    keys.sort();
    keys
  }

  pub fn cancel_all(&self) {
    for (_, lease) in self.slots().drain() {
      lease.token.cancel();
    }
  }

  fn slots(&self) -> MutexGuard<'_, HashMap<EffectKey, Lease>> {
    self.slots.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  const DEBOUNCE: EffectKey = EffectKey::new("my-debounce");
  const RETRY: EffectKey = EffectKey::new("my-retry");

  #[test]
  fn newer_lease_cancels_the_older_one() {
    let registry = EffectRegistry::new();
    let first = registry.supersede(&DEBOUNCE);
    let second = registry.supersede(&DEBOUNCE);

    assert!(first.is_superseded());
    assert!(!second.is_superseded());
    assert_eq!(registry.pending(), vec![DEBOUNCE]);
  }

  #[test]
  fn stale_release_keeps_the_current_slot() {
    let registry = EffectRegistry::new();
    let first = registry.supersede(&DEBOUNCE);
    let second = registry.supersede(&DEBOUNCE);

    registry.release(&first);
    assert_eq!(registry.pending(), vec![DEBOUNCE]);

    registry.release(&second);
    assert!(registry.pending().is_empty());
  }

  #[test]
  fn keys_are_independent() {
    let registry = EffectRegistry::new();
    let debounce = registry.supersede(&DEBOUNCE);
    let retry = registry.supersede(&RETRY);

    assert!(!debounce.is_superseded());
    assert_eq!(registry.pending(), vec![DEBOUNCE, RETRY]);

    registry.cancel_all();
    assert!(debounce.is_superseded());
    assert!(retry.is_superseded());
    assert!(registry.pending().is_empty());
  }
}
