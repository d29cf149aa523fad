//! Wake Signal Relay
//!
//! Lets a producer wake an idle message-bus poller without the poller
//! having to poll the bus continuously.
//!
//! # Architecture Overview
//!
//! ```text
//!     GET /?signal=1              GET /?wait=1
//!          │                           │
//!          ▼                           ▼
//!   ┌─────────────┐             ┌─────────────┐
//!   │ http server │             │ http server │
//!   └──────┬──────┘             └──────┬──────┘
//!          │ signal()                  │ wait()   poll every interval
//!          ▼                           ▼
//!   ┌──────────────────────────────────────────┐
//!   │               SignalRelay                 │
//!   │  ┌────────────┐        ┌───────────────┐  │
//!   │  │ flag store │        │ exclusion     │  │
//!   │  │ (TTL)      │        │ token         │  │
//!   │  └────────────┘        └───────────────┘  │
//!   └──────────────────────────────────────────┘
//!          │                           │
//!          ▼                           ▼
//!         [1]                   [1] event / [] timeout
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use waker_relay::config::load_or_default;
use waker_relay::http::HttpServer;
use waker_relay::lifecycle::{signals, Shutdown};
use waker_relay::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "waker-relay")]
#[command(about = "HTTP wake signal relay with long-poll waits", long_about = None)]
struct Args {
    /// Path to a TOML config file.
    #[arg(short, long, env = "WAKER_CONFIG")]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_or_default(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);

    tracing::info!("waker-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_path = ?args.config,
        bind_address = %config.listener.bind_address,
        event_key = %config.relay.event_key,
        attempt_budget = config.relay.attempt_budget(),
        lock_policy = ?config.relay.lock_policy,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_handler(shutdown);

    let server = HttpServer::new(config);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
