//! Metrics collection and exposition.
//!
//! # Metrics
//! - `waker_signals_total` (counter): signal calls
//! - `waker_waits_total` (counter): finished waits by outcome (event, timeout)
//! - `waker_wait_duration_seconds` (histogram): time a wait blocked
//! - `waker_active_waiters` (gauge): waits currently blocked
//! - `waker_lost_races_total` (counter): flag gone after taking the token
//! - `waker_lock_timeouts_total` (counter): token not acquired within its bound
//! - `waker_http_requests_total` (counter): requests by route, status

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);

    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to install Prometheus recorder"),
    }
}

pub fn record_signal() {
    metrics::counter!("waker_signals_total").increment(1);
}

pub fn record_wait(outcome: &'static str, started: Instant) {
    metrics::counter!("waker_waits_total", "outcome" => outcome).increment(1);
    metrics::histogram!("waker_wait_duration_seconds").record(started.elapsed().as_secs_f64());
}

pub fn record_lost_race() {
    metrics::counter!("waker_lost_races_total").increment(1);
}

pub fn record_lock_timeout() {
    metrics::counter!("waker_lock_timeouts_total").increment(1);
}

pub fn record_request(route: &'static str, status: u16) {
    metrics::counter!(
        "waker_http_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
}

/// Counts a blocked waiter for as long as it is alive.
pub struct ActiveWaiter(());

impl ActiveWaiter {
    pub fn enter() -> Self {
        metrics::gauge!("waker_active_waiters").increment(1.0);
        Self(())
    }
}

impl Drop for ActiveWaiter {
    fn drop(&mut self) {
        metrics::gauge!("waker_active_waiters").decrement(1.0);
    }
}
