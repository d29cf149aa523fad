//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the wake and health handlers
//! - Wire up middleware (request ID, tracing, request timeout)
//! - Bind server to listener
//! - Dispatch wake requests to the signal relay
//! - Drain in-flight waits on shutdown

use axum::{
    body::Body,
    extract::{Query, State},
    http::{HeaderMap, Request},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::http::request::{request_id, MakeRequestUuid, WakeAction, WakeParams};
use crate::http::response::WakeResponse;
use crate::observability::metrics;
use crate::relay::SignalRelay;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<SignalRelay>,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub version: &'static str,
    pub status: &'static str,
}

/// HTTP server for the wake relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
    relay: Arc<SignalRelay>,
}

impl HttpServer {
    /// Create a new HTTP server with an in-memory relay built from the config.
    pub fn new(config: RelayConfig) -> Self {
        let relay = Arc::new(SignalRelay::new(config.relay.clone()));
        Self::with_relay(config, relay)
    }

    /// Create a server around an existing relay.
    pub fn with_relay(config: RelayConfig, relay: Arc<SignalRelay>) -> Self {
        let state = AppState {
            relay: relay.clone(),
        };
        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            relay,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(wake_handler))
            .route("/health", get(health_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request_id(request.headers()),
                        )
                    }))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// Router with state and middleware applied.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain open requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            event_key = %self.config.relay.event_key,
            max_wait_ms = self.config.relay.max_wait_ms,
            poll_interval_ms = self.config.relay.poll_interval_ms,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown requested, draining open waits");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// The relay served by this server.
    pub fn relay(&self) -> &Arc<SignalRelay> {
        &self.relay
    }
}

/// Wake handler: `?signal=1` sets the event, `?wait=1` long-polls for it.
async fn wake_handler(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response {
    let request_id = request_id(&headers);
    let action = WakeParams::from_pairs(pairs).action();

    let outcome = match action {
        WakeAction::Wait => state.relay.wait().await,
        WakeAction::Signal => state.relay.signal(),
        WakeAction::Idle => Ok(false),
    };

    match outcome {
        Ok(result) => {
            tracing::debug!(request_id = %request_id, action = action.as_str(), result, "Wake request done");
            metrics::record_request(action.as_str(), 200);
            WakeResponse(result).into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, action = action.as_str(), error = %e, "Relay operation failed");
            metrics::record_request(action.as_str(), 500);
            e.into_response()
        }
    }
}

async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}
