//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the wake relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Signal relay timings and event key.
    pub relay: SignalConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// What a waiter does when the exclusion token cannot be taken in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LockPolicy {
    /// Re-check and consume the flag without holding the token.
    #[default]
    Permissive,
    /// Skip this poll iteration and sleep.
    Strict,
}

/// Signal relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Store key holding the event flag.
    pub event_key: String,

    /// Longest a single wait request blocks, in milliseconds.
    pub max_wait_ms: u64,

    /// Delay between flag checks, in milliseconds.
    pub poll_interval_ms: u64,

    /// Upper bound on acquiring the exclusion token, in milliseconds.
    pub lock_timeout_ms: u64,

    /// Lifetime of an unconsumed flag in the store, in seconds.
    pub flag_ttl_secs: u64,

    /// Behaviour on token acquisition timeout.
    pub lock_policy: LockPolicy,
}

impl SignalConfig {
    pub fn max_wait(&self) -> Duration {
        Duration::from_millis(self.max_wait_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    pub fn flag_ttl(&self) -> Duration {
        Duration::from_secs(self.flag_ttl_secs)
    }

    /// Number of flag checks a wait performs before timing out.
    ///
    /// Integer floor of `max_wait / poll_interval`; zero when the interval is zero.
    pub fn attempt_budget(&self) -> u64 {
        self.max_wait_ms.checked_div(self.poll_interval_ms).unwrap_or(0)
    }
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            event_key: "MCLITE_WAKER_EVENT".to_string(),
            max_wait_ms: 270_000,
            poll_interval_ms: 800,
            lock_timeout_ms: 30_000,
            flag_ttl_secs: 600,
            lock_policy: LockPolicy::Permissive,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    /// Must exceed the relay's maximum wait.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 300 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_attempt_budget() {
        let config = SignalConfig::default();
        assert_eq!(config.attempt_budget(), 337);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: RelayConfig = toml::from_str(
            r#"
            [relay]
            poll_interval_ms = 100
            lock_policy = "strict"
            "#,
        )
        .unwrap();

        assert_eq!(config.relay.poll_interval_ms, 100);
        assert_eq!(config.relay.lock_policy, LockPolicy::Strict);
        assert_eq!(config.relay.max_wait_ms, 270_000);
        assert_eq!(config.relay.event_key, "MCLITE_WAKER_EVENT");
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_zero_interval_budget() {
        let config = SignalConfig {
            poll_interval_ms: 0,
            ..SignalConfig::default()
        };
        assert_eq!(config.attempt_budget(), 0);
    }
}
