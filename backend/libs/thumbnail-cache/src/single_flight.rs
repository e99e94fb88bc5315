//! Per-key mutual exclusion within one process
//!
//! Serializes lookups for the same cache key so concurrent first requests do
//! not each render a thumbnail into a different slot. Does nothing for
//! replicas running in other processes.

use crate::keys::CacheKey;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct KeyLocks {
    locks: DashMap<CacheKey, Arc<Mutex<()>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other caller holds `key`
    pub async fn acquire(self: &Arc<Self>, key: &CacheKey) -> KeyGuard {
        let lock = self
            .locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let guard = lock.lock_owned().await;

        KeyGuard {
            locks: Arc::clone(self),
            key: key.clone(),
            guard: Some(guard),
        }
    }

    /// Number of keys currently locked or awaited
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Releases the key on drop and forgets it once nobody is waiting
#[derive(Debug)]
pub struct KeyGuard {
    locks: Arc<KeyLocks>,
    key: CacheKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks
            .locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}
