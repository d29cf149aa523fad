//! Request parsing and identification.
//!
//! # Responsibilities
//! - Decide which relay operation a query string asks for
//! - Generate a unique request ID (UUID v4) for tracing
//!
//! # Design Decisions
//! - A parameter counts only when present with a non-empty value
//! - `wait` wins when both parameters are given
//! - A repeated key keeps its first value
//! - Request ID added as early as possible; a caller-supplied one is kept

use axum::http::{HeaderMap, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Query parameters of the wake endpoint.
#[derive(Debug, Default)]
pub struct WakeParams {
    pub wait: Option<String>,
    pub signal: Option<String>,
}

/// Relay operation selected by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeAction {
    Wait,
    Signal,
    Idle,
}

impl WakeAction {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            WakeAction::Wait => "wait",
            WakeAction::Signal => "signal",
            WakeAction::Idle => "none",
        }
    }
}

impl WakeParams {
    /// Build from decoded query pairs, keeping the first value of each key.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "wait" => &mut params.wait,
                "signal" => &mut params.signal,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        params
    }

    pub fn action(&self) -> WakeAction {
        if is_truthy(self.wait.as_deref()) {
            WakeAction::Wait
        } else if is_truthy(self.signal.as_deref()) {
            WakeAction::Signal
        } else {
            WakeAction::Idle
        }
    }
}

fn is_truthy(value: Option<&str>) -> bool {
    matches!(value, Some(v) if !v.is_empty())
}

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let value = HeaderValue::from_str(&Uuid::new_v4().to_string()).ok()?;
        Some(RequestId::new(value))
    }
}

/// Request ID of a request, or `"unknown"` when none was set.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}
