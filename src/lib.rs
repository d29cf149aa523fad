//! Wake Signal Relay Library
//!
//! One client signals an event over HTTP; another long-polls until the
//! event arrives or its wait window closes.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;

pub use config::schema::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use relay::SignalRelay;
