//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, address parses)
//! - Check cross-field constraints (request timeout outlives a wait)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::RelayConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("observability.metrics_address `{0}` is not a socket address")]
    MetricsAddress(String),

    #[error("relay.event_key must not be empty")]
    EmptyEventKey,

    #[error("relay.{0} must be greater than zero")]
    Zero(&'static str),

    #[error("relay.max_wait_ms ({max_wait_ms}) is shorter than one poll interval ({poll_interval_ms})")]
    NoAttempts { max_wait_ms: u64, poll_interval_ms: u64 },

    #[error("timeouts.request_secs ({request_secs}s) must exceed relay.max_wait_ms ({max_wait_ms}ms)")]
    RequestTimeoutTooShort { request_secs: u64, max_wait_ms: u64 },
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let relay = &config.relay;

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if relay.event_key.is_empty() {
        errors.push(ValidationError::EmptyEventKey);
    }

    if relay.poll_interval_ms == 0 {
        errors.push(ValidationError::Zero("poll_interval_ms"));
    } else if relay.attempt_budget() == 0 {
        errors.push(ValidationError::NoAttempts {
            max_wait_ms: relay.max_wait_ms,
            poll_interval_ms: relay.poll_interval_ms,
        });
    }

    if relay.lock_timeout_ms == 0 {
        errors.push(ValidationError::Zero("lock_timeout_ms"));
    }

    if relay.flag_ttl_secs == 0 {
        errors.push(ValidationError::Zero("flag_ttl_secs"));
    }

    if config.timeouts.request_secs.saturating_mul(1000) <= relay.max_wait_ms {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request_secs: config.timeouts.request_secs,
            max_wait_ms: relay.max_wait_ms,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
