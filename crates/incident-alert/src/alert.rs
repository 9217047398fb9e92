//! Alert event types for the incident.io Alert Events V2 API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::AlertError;

/// Whether the alert is raising or clearing an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    /// The alert condition is active
    Firing,
    /// The alert condition has cleared
    Resolved,
}

impl AlertStatus {
    /// Wire name for this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Firing => "firing",
            Self::Resolved => "resolved",
        }
    }
}

impl FromStr for AlertStatus {
    type Err = AlertError;

    /// Exact, case-sensitive match. Anything else is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "firing" => Ok(Self::Firing),
            "resolved" => Ok(Self::Resolved),
            other => Err(AlertError::InvalidStatus(other.to_string())),
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body for `POST /v2/alert_events/http/{config_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRequest {
    pub title: String,
    pub status: AlertStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub deduplication_key: String,
    pub source_url: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Body returned by incident.io when an alert event is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AlertResponse {
    pub deduplication_key: String,
    pub message: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_parse_is_exact() {
        assert_eq!("firing".parse::<AlertStatus>().unwrap(), AlertStatus::Firing);
        assert_eq!(
            "resolved".parse::<AlertStatus>().unwrap(),
            AlertStatus::Resolved
        );

        for bad in ["Firing", "RESOLVED", " firing", "ok", ""] {
            let err = bad.parse::<AlertStatus>().unwrap_err();
            assert!(err.to_string().contains("Invalid status"), "{bad}");
        }
    }

    #[test]
    fn test_description_omitted_when_none() {
        let request = AlertRequest {
            title: "Deploy failed".to_string(),
            status: AlertStatus::Firing,
            description: None,
            deduplication_key: "42".to_string(),
            source_url: "https://example.com".to_string(),
            metadata: Map::new(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "Deploy failed",
                "status": "firing",
                "deduplication_key": "42",
                "source_url": "https://example.com",
                "metadata": {}
            })
        );
    }

    #[test]
    fn test_response_parses_documented_body() {
        let response: AlertResponse = serde_json::from_str(
            r#"{"deduplication_key":"test-key","message":"Event accepted for processing","status":"success"}"#,
        )
        .unwrap();
        assert_eq!(response.deduplication_key, "test-key");
        assert_eq!(response.status, "success");
    }
}
