//! Per-session lock registry
//!
//! Every read-modify-write of a session document runs while holding the lock
//! for its token; different tokens use different mutexes.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;

/// Thread-safe map from session token to its mutation lock
pub struct TokenLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl TokenLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Get (or create) the lock for a token.
    ///
    /// The returned `Arc` is cloned out of the map so the shard guard is
    /// released before the caller blocks on the mutex.
    pub fn for_token(&self, token: &str) -> Arc<Mutex<()>> {
        if let Some(lock) = self.locks.get(token) {
            return Arc::clone(lock.value());
        }
        Arc::clone(
            self.locks
                .entry(token.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        )
    }

    /// Drop the lock entry of a deleted session
    pub fn forget(&self, token: &str) {
        self.locks.remove(token);
    }

    /// Drop the lock entry for a token unless another caller still holds it.
    ///
    /// The caller must have released its own clone first.
    pub fn release_if_unused(&self, token: &str) {
        self.locks
            .remove_if(token, |_, lock| Arc::strong_count(lock) == 1);
    }

    /// Number of tokens with a lock entry
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl Default for TokenLocks {
    fn default() -> Self {
        Self::new()
    }
}
