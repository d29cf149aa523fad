//! Response encoding.
//!
//! A true result is the JSON array `[1]`; false or no-op is `[]`.
//! Relay failures become `500 Internal Server Error`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::relay::RelayError;

/// Outcome of a wake request, encoded as a JSON array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakeResponse(pub bool);

impl WakeResponse {
    /// JSON value sent on the wire.
    pub fn payload(&self) -> Vec<u8> {
        if self.0 {
            vec![1]
        } else {
            Vec::new()
        }
    }
}

impl From<bool> for WakeResponse {
    fn from(value: bool) -> Self {
        Self(value)
    }
}

impl IntoResponse for WakeResponse {
    fn into_response(self) -> Response {
        Json(self.payload()).into_response()
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, "Relay store failure").into_response()
    }
}
