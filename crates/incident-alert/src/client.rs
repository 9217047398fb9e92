//! incident.io Alert Events V2 client.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::alert::{AlertRequest, AlertResponse};
use crate::error::AlertError;
use crate::transport::{HttpTransport, ReqwestTransport};

/// Production API base URL.
pub const DEFAULT_API_URL: &str = "https://api.incident.io";

/// Placeholder written in place of the token in log output.
const REDACTED: &str = "***";

/// Client for the HTTP alert source endpoint.
///
/// The token travels only in the query string, so the full request URL is
/// secret-bearing and is never logged unredacted.
pub struct IncidentIoClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl IncidentIoClient {
    /// Create a client for the production API.
    #[must_use]
    pub fn new() -> Self {
        Self::with_transport(DEFAULT_API_URL, Arc::new(ReqwestTransport::new()))
    }

    /// Create a client against a specific base URL and transport.
    #[must_use]
    pub fn with_transport(base_url: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint for an alert source, with the token URL-encoded as a query parameter.
    #[must_use]
    pub fn alert_event_url(&self, alert_source_config_id: &str, token: &str) -> String {
        format!(
            "{}/v2/alert_events/http/{alert_source_config_id}?token={}",
            self.base_url,
            urlencoding::encode(token)
        )
    }

    /// Send one alert event.
    ///
    /// # Errors
    ///
    /// - [`AlertError::Transport`] if the request could not be completed
    /// - [`AlertError::Api`] for a non-2xx status, carrying the raw body text
    /// - [`AlertError::InvalidResponse`] if a 2xx body is not an alert response
    pub async fn send_alert(
        &self,
        alert_source_config_id: &str,
        token: &str,
        payload: &AlertRequest,
    ) -> Result<AlertResponse, AlertError> {
        let url = self.alert_event_url(alert_source_config_id, token);
        let body = serde_json::to_string(payload).map_err(AlertError::Serialization)?;

        debug!(
            url = %self.alert_event_url(alert_source_config_id, REDACTED),
            "Sending alert to incident.io"
        );
        if let Ok(pretty) = serde_json::to_string_pretty(payload) {
            debug!("Payload: {pretty}");
        }

        let response = self.transport.post_json(&url, body).await?;

        if !response.is_success() {
            warn!(
                status = response.status,
                body = %response.body,
                "incident.io rejected alert event"
            );
            return Err(AlertError::Api {
                status: response.status,
                body: response.body,
            });
        }

        serde_json::from_str(&response.body).map_err(AlertError::InvalidResponse)
    }
}

impl Default for IncidentIoClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{accepted_response, sample_request, FakeTransport};

    #[test]
    fn test_alert_event_url_encodes_token() {
        let client = IncidentIoClient::with_transport(
            "https://api.incident.io/",
            Arc::new(FakeTransport::new(accepted_response())),
        );

        assert_eq!(
            client.alert_event_url("test-config-id", "test-token"),
            "https://api.incident.io/v2/alert_events/http/test-config-id?token=test-token"
        );
        assert_eq!(
            client.alert_event_url("cfg", "a b&c=d/e"),
            "https://api.incident.io/v2/alert_events/http/cfg?token=a%20b%26c%3Dd%2Fe"
        );
    }

    #[tokio::test]
    async fn test_send_alert_success() {
        let transport = Arc::new(FakeTransport::new(accepted_response()));
        let client = IncidentIoClient::with_transport(DEFAULT_API_URL, transport.clone());

        let response = client
            .send_alert("cfg", "tok", &sample_request())
            .await
            .unwrap();

        assert_eq!(response.deduplication_key, "test-key");
        assert_eq!(response.message, "Event accepted for processing");
        assert_eq!(response.status, "success");

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url,
            "https://api.incident.io/v2/alert_events/http/cfg?token=tok"
        );
        assert!(requests[0].body.contains("\"title\":\"Test Alert\""));
    }

    #[tokio::test]
    async fn test_send_alert_any_2xx_is_success() {
        let transport = Arc::new(FakeTransport::new(crate::transport::HttpResponse {
            status: 200,
            ..accepted_response()
        }));
        let client = IncidentIoClient::with_transport(DEFAULT_API_URL, transport);

        assert!(client.send_alert("cfg", "tok", &sample_request()).await.is_ok());
    }

    #[tokio::test]
    async fn test_send_alert_api_error_keeps_raw_body() {
        let transport = Arc::new(FakeTransport::new(crate::transport::HttpResponse {
            status: 400,
            body: "Bad Request".to_string(),
        }));
        let client = IncidentIoClient::with_transport(DEFAULT_API_URL, transport);

        let err = client
            .send_alert("cfg", "tok", &sample_request())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(400));
        assert_eq!(
            err.to_string(),
            "incident.io API request failed with status 400: Bad Request"
        );
    }

    #[tokio::test]
    async fn test_send_alert_unparseable_success_body() {
        let transport = Arc::new(FakeTransport::new(crate::transport::HttpResponse {
            status: 202,
            body: "accepted".to_string(),
        }));
        let client = IncidentIoClient::with_transport(DEFAULT_API_URL, transport);

        let err = client
            .send_alert("cfg", "tok", &sample_request())
            .await
            .unwrap_err();
        assert!(matches!(err, AlertError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let transport = Arc::new(FakeTransport::failing("connection refused"));
        let client = IncidentIoClient::with_transport(DEFAULT_API_URL, transport);

        let err = client
            .send_alert("cfg", "tok", &sample_request())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "connection refused");
    }
}
