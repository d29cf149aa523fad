//! Mutual-exclusion token for the check-then-clear step.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Advisory lock shared by every waiter of a relay.
///
/// Acquisition is bounded; the caller decides what a timeout means.
#[derive(Debug, Clone, Default)]
pub struct ExclusionToken {
    inner: Arc<Mutex<()>>,
}

/// Held token. Dropping it releases the lock.
#[derive(Debug)]
pub struct TokenGuard {
    _guard: OwnedMutexGuard<()>,
}

impl ExclusionToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to take the token, giving up after `bound`.
    ///
    /// Returns `None` if the token is still held elsewhere when `bound` elapses.
    pub async fn acquire(&self, bound: Duration) -> Option<TokenGuard> {
        tokio::time::timeout(bound, self.inner.clone().lock_owned())
            .await
            .ok()
            .map(|guard| TokenGuard { _guard: guard })
    }

    /// Whether some caller currently holds the token.
    pub fn is_held(&self) -> bool {
        self.inner.try_lock().is_err()
    }
}
