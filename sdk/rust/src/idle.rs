use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use crate::client::{WakerClient, WakerError};

/// Producer-side helper that only signals when the consumer may have gone idle.
///
/// A consumer stops polling its bus some time after its last wake, so a
/// producer only needs to signal again once that window has passed.
#[derive(Debug)]
pub struct IdleWaker {
    client: WakerClient,
    idle_timeout: Duration,
    last_wake: Mutex<Option<Instant>>,
}

impl IdleWaker {
    pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(300);

    pub fn new(client: WakerClient, idle_timeout: Duration) -> Self {
        Self {
            client,
            idle_timeout,
            last_wake: Mutex::new(None),
        }
    }

    /// True if no wake was sent yet, or the last one is older than the idle timeout.
    pub fn is_idle(&self) -> bool {
        match *self.last_wake.lock().unwrap_or_else(|e| e.into_inner()) {
            Some(at) => at.elapsed() > self.idle_timeout,
            None => true,
        }
    }

    /// Record that the consumer was just woken.
    pub fn mark_woken(&self) {
        *self.last_wake.lock().unwrap_or_else(|e| e.into_inner()) = Some(Instant::now());
    }

    /// Signal unconditionally.
    pub async fn wake(&self) -> Result<bool, WakerError> {
        let result = self.client.signal().await?;
        self.mark_woken();
        tracing::debug!(relay = %self.client.relay_url(), "Wake signal sent");
        Ok(result)
    }

    /// Signal only if the consumer may be idle. Returns whether a signal was sent.
    pub async fn wake_if_idle(&self) -> Result<bool, WakerError> {
        if !self.is_idle() {
            return Ok(false);
        }
        self.wake().await
    }
}
