//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use waker_relay::config::{RelayConfig, SignalConfig};
use waker_relay::{HttpServer, Shutdown, SignalRelay};

/// A relay server running on an ephemeral local port.
#[allow(dead_code)]
pub struct TestRelay {
    pub addr: SocketAddr,
    pub relay: Arc<SignalRelay>,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<()>,
}

impl TestRelay {
    #[allow(dead_code)]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Short timings so a full wait window fits in a test.
pub fn fast_config() -> SignalConfig {
    SignalConfig {
        max_wait_ms: 1_500,
        poll_interval_ms: 20,
        lock_timeout_ms: 1_000,
        ..SignalConfig::default()
    }
}

/// Start a relay server with the given relay settings.
pub async fn start_relay(signal: SignalConfig) -> TestRelay {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.relay = signal;
    config.timeouts.request_secs = 30;

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config);
    let relay = server.relay().clone();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    let handle = tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestRelay {
        addr,
        relay,
        shutdown,
        handle,
    }
}

/// Client without connection pooling, so shutdown is never held up.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
