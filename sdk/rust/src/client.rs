use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WakerError {
    #[error("request to relay failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("relay returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected relay response `{0}`")]
    Body(String),
}

/// Body of the relay's health endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub version: String,
    pub status: String,
}

/// HTTP client for a wake relay.
#[derive(Debug, Clone)]
pub struct WakerClient {
    client: Client,
    relay_url: String,
}

impl WakerClient {
    pub fn new(relay_url: &str) -> Self {
        Self::with_client(Client::new(), relay_url)
    }

    /// Use a preconfigured client. Its timeout must outlast the relay's max wait.
    pub fn with_client(client: Client, relay_url: &str) -> Self {
        Self {
            client,
            relay_url: relay_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn relay_url(&self) -> &str {
        &self.relay_url
    }

    /// Signal the event. The relay always answers `true`.
    pub async fn signal(&self) -> Result<bool, WakerError> {
        self.call("signal").await
    }

    /// Long-poll for the event. `true` if it was consumed by this call, `false` on timeout.
    pub async fn wait(&self) -> Result<bool, WakerError> {
        self.call("wait").await
    }

    pub async fn health(&self) -> Result<HealthStatus, WakerError> {
        let resp = self
            .client
            .get(format!("{}/health", self.relay_url))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(WakerError::Status { status: status.as_u16(), body });
        }

        Ok(resp.json().await?)
    }

    async fn call(&self, param: &str) -> Result<bool, WakerError> {
        let resp = self
            .client
            .get(format!("{}/?{}=1", self.relay_url, param))
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(WakerError::Status { status: status.as_u16(), body: text });
        }

        decode_result(&text)
    }
}

/// Decode a relay body: a non-empty JSON array is `true`, `[]` is `false`.
pub fn decode_result(body: &str) -> Result<bool, WakerError> {
    match serde_json::from_str::<Vec<serde_json::Value>>(body) {
        Ok(items) => Ok(!items.is_empty()),
        Err(_) => Err(WakerError::Body(body.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_result() {
        assert!(decode_result("[1]").unwrap());
        assert!(!decode_result("[]").unwrap());
        assert!(matches!(decode_result("true"), Err(WakerError::Body(_))));
        assert!(matches!(decode_result(""), Err(WakerError::Body(_))));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = WakerClient::new("http://relay.local:8080/");
        assert_eq!(client.relay_url(), "http://relay.local:8080");
    }
}
