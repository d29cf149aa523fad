//! Event flag storage.
//!
//! # Responsibilities
//! - Hold presence markers keyed by name
//! - Expire markers that are never consumed
//!
//! # Design Decisions
//! - Presence only: a signalled key carries no payload
//! - Re-setting a key refreshes its expiry
//! - Expired entries are dropped lazily on read

use dashmap::DashMap;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// Failure reported by a flag store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("flag store unavailable: {0}")]
    Unavailable(String),
}

/// A shared, expiring set of flags visible to every request handler.
pub trait FlagStore: Send + Sync {
    /// Whether `key` is currently present.
    fn is_set(&self, key: &str) -> Result<bool, StoreError>;

    /// Mark `key` present.
    fn set(&self, key: &str) -> Result<(), StoreError>;

    /// Remove `key` if present.
    fn clear(&self, key: &str) -> Result<(), StoreError>;
}

/// In-process flag store with a fixed time-to-live per entry.
#[derive(Debug)]
pub struct MemoryStore {
    /// key -> expiry instant.
    entries: DashMap<String, Instant>,
    ttl: Duration,
}

impl MemoryStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Number of entries held, including ones that expired but were not read since.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FlagStore for MemoryStore {
    fn is_set(&self, key: &str) -> Result<bool, StoreError> {
        let now = Instant::now();
        let expires_at = self.entries.get(key).map(|entry| *entry.value());

        match expires_at {
            Some(at) if at > now => Ok(true),
            Some(_) => {
                self.entries.remove_if(key, |_, at| *at <= now);
                tracing::debug!(key = %key, "Flag expired unconsumed");
                Ok(false)
            }
            None => Ok(false),
        }
    }

    fn set(&self, key: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), Instant::now() + self.ttl);
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}
