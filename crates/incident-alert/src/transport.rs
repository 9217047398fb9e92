//! Outbound HTTP capability.
//!
//! The dispatcher only needs "POST this JSON, give me status and body", so
//! the transport sits behind a trait and tests swap in a recording fake.

use async_trait::async_trait;
use tracing::debug;

use crate::error::AlertError;

/// Status and raw body text of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Trait for sending a JSON body to a URL.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST `body` with `Content-Type: application/json`.
    ///
    /// A response with any status is `Ok`; only failures to complete the
    /// exchange are errors.
    async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse, AlertError>;
}

/// `reqwest`-backed transport. No timeout or retry beyond client defaults.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a transport around an existing client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse, AlertError> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(AlertError::transport)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(AlertError::transport)?;

        debug!(status, bytes = body.len(), "Received response");

        Ok(HttpResponse { status, body })
    }
}
