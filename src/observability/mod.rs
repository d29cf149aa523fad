//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! relay + http produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every request span
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
