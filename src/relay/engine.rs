//! Signal relay: set and consume the shared event flag.
//!
//! # Responsibilities
//! - `signal()`: mark the event pending
//! - `wait()`: poll until the event is pending, then consume it under the token
//!
//! # Design Decisions
//! - At most one pending event; repeated signals collapse
//! - The flag is re-checked after taking the token so two waiters never
//!   consume the same signal
//! - A waiter that loses that race sleeps out the interval before checking again
//! - Every wait is bounded by `max_wait / poll_interval` attempts

use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

use crate::config::{LockPolicy, SignalConfig};
use crate::observability::metrics;
use crate::relay::delay::{Delay, TokioDelay};
use crate::relay::store::{FlagStore, MemoryStore, StoreError};
use crate::relay::token::ExclusionToken;

/// Failure while signalling or waiting.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The single event channel shared by all requests.
pub struct SignalRelay {
    store: Arc<dyn FlagStore>,
    token: ExclusionToken,
    delay: Arc<dyn Delay>,
    config: SignalConfig,
}

impl SignalRelay {
    /// Create a relay backed by an in-memory store and the tokio timer.
    pub fn new(config: SignalConfig) -> Self {
        let store = Arc::new(MemoryStore::new(config.flag_ttl()));
        Self::with_parts(config, store, Arc::new(TokioDelay))
    }

    /// Create a relay over an explicit store and delay.
    pub fn with_parts(
        config: SignalConfig,
        store: Arc<dyn FlagStore>,
        delay: Arc<dyn Delay>,
    ) -> Self {
        Self {
            store,
            token: ExclusionToken::new(),
            delay,
            config,
        }
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// The token serializing waiters of this relay.
    pub fn token(&self) -> &ExclusionToken {
        &self.token
    }

    /// Whether an unconsumed signal is waiting.
    pub fn is_pending(&self) -> Result<bool, RelayError> {
        Ok(self.store.is_set(&self.config.event_key)?)
    }

    /// Mark the event pending. Always reports success.
    pub fn signal(&self) -> Result<bool, RelayError> {
        self.store.set(&self.config.event_key)?;
        metrics::record_signal();
        tracing::debug!(key = %self.config.event_key, "Event signalled");
        Ok(true)
    }

    /// Block until a signal is consumed by this call or the attempt budget runs out.
    ///
    /// Returns `true` if this call consumed the event and `false` on timeout.
    pub async fn wait(&self) -> Result<bool, RelayError> {
        let _active = metrics::ActiveWaiter::enter();
        let started = Instant::now();
        let key = self.config.event_key.as_str();
        let attempts = self.config.attempt_budget();
        let interval = self.config.poll_interval();

        for attempt in 0..attempts {
            if self.store.is_set(key)? && self.try_consume(key, attempt).await? {
                tracing::debug!(attempt, elapsed = ?started.elapsed(), "Event consumed");
                metrics::record_wait("event", started);
                return Ok(true);
            }
            self.delay.sleep(interval).await;
        }

        tracing::debug!(attempts, "Wait timed out");
        metrics::record_wait("timeout", started);
        Ok(false)
    }

    /// Take the token and clear the flag if it is still set.
    async fn try_consume(&self, key: &str, attempt: u64) -> Result<bool, RelayError> {
        let guard = self.token.acquire(self.config.lock_timeout()).await;

        if guard.is_none() {
            metrics::record_lock_timeout();
            match self.config.lock_policy {
                LockPolicy::Strict => {
                    tracing::debug!(attempt, "Exclusion token busy, skipping attempt");
                    return Ok(false);
                }
                LockPolicy::Permissive => {
                    tracing::warn!(
                        attempt,
                        lock_timeout_ms = self.config.lock_timeout_ms,
                        "Exclusion token not acquired, re-checking without it"
                    );
                }
            }
        }

        if self.store.is_set(key)? {
            self.store.clear(key)?;
            return Ok(true);
        }

        drop(guard);
        metrics::record_lost_race();
        tracing::debug!(attempt, "Event taken by another waiter");
        Ok(false)
    }
}

impl std::fmt::Debug for SignalRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalRelay")
            .field("config", &self.config)
            .field("token_held", &self.token.is_held())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future::{self, BoxFuture, FutureExt};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Returns immediately and counts how often it was asked to sleep.
    #[derive(Default)]
    struct CountingDelay {
        sleeps: AtomicU64,
    }

    impl Delay for CountingDelay {
        fn sleep(&self, _duration: Duration) -> BoxFuture<'static, ()> {
            self.sleeps.fetch_add(1, Ordering::SeqCst);
            future::ready(()).boxed()
        }
    }

    /// Answers `is_set` from a script, then reports absent.
    #[derive(Default)]
    struct ScriptedStore {
        answers: Mutex<VecDeque<bool>>,
        clears: AtomicU64,
    }

    impl FlagStore for ScriptedStore {
        fn is_set(&self, _key: &str) -> Result<bool, StoreError> {
            Ok(self.answers.lock().unwrap().pop_front().unwrap_or(false))
        }

        fn set(&self, _key: &str) -> Result<(), StoreError> {
            Ok(())
        }

        fn clear(&self, _key: &str) -> Result<(), StoreError> {
            self.clears.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingStore;

    impl FlagStore for FailingStore {
        fn is_set(&self, _key: &str) -> Result<bool, StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }

        fn set(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }

        fn clear(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }
    }

    fn short_config() -> SignalConfig {
        SignalConfig {
            max_wait_ms: 1_000,
            poll_interval_ms: 100,
            lock_timeout_ms: 500,
            ..SignalConfig::default()
        }
    }

    fn counting_relay(config: SignalConfig) -> (SignalRelay, Arc<CountingDelay>) {
        let delay = Arc::new(CountingDelay::default());
        let store = Arc::new(MemoryStore::new(config.flag_ttl()));
        let relay = SignalRelay::with_parts(config, store, delay.clone());
        (relay, delay)
    }

    #[tokio::test]
    async fn test_signal_then_wait_consumes_flag() {
        let (relay, delay) = counting_relay(short_config());

        assert!(relay.signal().unwrap());
        assert!(relay.wait().await.unwrap());
        assert_eq!(delay.sleeps.load(Ordering::SeqCst), 0);
        assert!(!relay.is_pending().unwrap());

        // Nothing left to consume
        assert!(!relay.wait().await.unwrap());
        assert_eq!(delay.sleeps.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn test_wait_without_signal_uses_full_budget() {
        let (relay, delay) = counting_relay(SignalConfig::default());

        assert!(!relay.wait().await.unwrap());
        assert_eq!(delay.sleeps.load(Ordering::SeqCst), 337);
    }

    #[tokio::test]
    async fn test_repeated_signals_collapse() {
        let (relay, _) = counting_relay(short_config());

        for _ in 0..5 {
            assert!(relay.signal().unwrap());
        }

        assert!(relay.wait().await.unwrap());
        assert!(!relay.wait().await.unwrap());
    }

    #[tokio::test]
    async fn test_lost_race_releases_token_and_sleeps() {
        let store = Arc::new(ScriptedStore::default());
        // Seen before the token, gone after it
        store.answers.lock().unwrap().extend([true, false]);
        let delay = Arc::new(CountingDelay::default());
        let config = SignalConfig {
            max_wait_ms: 300,
            poll_interval_ms: 100,
            ..SignalConfig::default()
        };
        let relay = SignalRelay::with_parts(config, store.clone(), delay.clone());

        assert!(!relay.wait().await.unwrap());
        assert_eq!(delay.sleeps.load(Ordering::SeqCst), 3);
        assert_eq!(store.clears.load(Ordering::SeqCst), 0);
        assert!(!relay.token().is_held());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_wakes_on_later_signal() {
        let relay = Arc::new(SignalRelay::new(short_config()));

        let waiter = {
            let relay = relay.clone();
            tokio::spawn(async move { relay.wait().await.unwrap() })
        };

        tokio::time::sleep(Duration::from_millis(350)).await;
        relay.signal().unwrap();

        assert!(waiter.await.unwrap());
        assert!(!relay.is_pending().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_waiters_consume_once() {
        let relay = Arc::new(SignalRelay::new(short_config()));

        let waiters: Vec<_> = (0..2)
            .map(|_| {
                let relay = relay.clone();
                tokio::spawn(async move { relay.wait().await.unwrap() })
            })
            .collect();

        tokio::time::sleep(Duration::from_millis(250)).await;
        relay.signal().unwrap();

        let mut consumed = 0;
        for waiter in waiters {
            if waiter.await.unwrap() {
                consumed += 1;
            }
        }
        assert_eq!(consumed, 1);
        assert!(!relay.is_pending().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_permissive_policy_proceeds_without_token() {
        let relay = SignalRelay::new(short_config());
        let _held = relay.token().acquire(Duration::from_millis(1)).await.unwrap();

        relay.signal().unwrap();
        let started = tokio::time::Instant::now();

        assert!(relay.wait().await.unwrap());
        assert!(started.elapsed() >= Duration::from_millis(500));
        assert!(!relay.is_pending().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_strict_policy_skips_attempt() {
        let config = SignalConfig {
            lock_policy: LockPolicy::Strict,
            ..short_config()
        };
        let relay = SignalRelay::new(config);
        let _held = relay.token().acquire(Duration::from_millis(1)).await.unwrap();

        relay.signal().unwrap();

        assert!(!relay.wait().await.unwrap());
        assert!(relay.is_pending().unwrap());
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let relay = SignalRelay::with_parts(
            short_config(),
            Arc::new(FailingStore),
            Arc::new(CountingDelay::default()),
        );

        assert!(matches!(relay.signal(), Err(RelayError::Store(_))));
        assert!(matches!(relay.wait().await, Err(RelayError::Store(_))));
    }
}
