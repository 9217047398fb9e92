//! Shared fixtures for unit tests.

use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Map;

use crate::actions::Reporter;
use crate::alert::{AlertRequest, AlertStatus};
use crate::context::ExecutionContext;
use crate::error::AlertError;
use crate::inputs::ActionInputs;
use crate::transport::{HttpResponse, HttpTransport};

/// Context of a fully populated push run.
pub fn full_context() -> ExecutionContext {
    let env = HashMap::from([
        ("GITHUB_WORKFLOW", "Test Workflow"),
        ("GITHUB_RUN_ID", "123456"),
        ("GITHUB_RUN_NUMBER", "1"),
        ("GITHUB_RUN_ATTEMPT", "1"),
        ("GITHUB_JOB", "test-job"),
        ("GITHUB_ACTOR", "test-actor"),
        ("GITHUB_REPOSITORY", "test-owner/test-repo"),
        ("GITHUB_REF", "refs/heads/main"),
        ("GITHUB_SHA", "abc123"),
        ("GITHUB_EVENT_NAME", "push"),
    ]);
    ExecutionContext::from_lookup(|k| env.get(k).map(ToString::to_string))
}

/// Only the required inputs.
pub fn minimal_inputs() -> ActionInputs {
    ActionInputs {
        token: Some("test-token".to_string()),
        title: Some("Test Alert".to_string()),
        status: Some("firing".to_string()),
        ..ActionInputs::default()
    }
}

/// Every input set.
pub fn full_inputs() -> ActionInputs {
    ActionInputs {
        alert_source_config_id: Some("test-config-id".to_string()),
        description: Some("Test description".to_string()),
        deduplication_key: Some("test-key".to_string()),
        source_url: Some("https://example.com".to_string()),
        metadata: Some(r#"{"service": "test-service"}"#.to_string()),
        ..minimal_inputs()
    }
}

pub fn sample_request() -> AlertRequest {
    AlertRequest {
        title: "Test Alert".to_string(),
        status: AlertStatus::Firing,
        description: None,
        deduplication_key: "test-key".to_string(),
        source_url: "https://example.com".to_string(),
        metadata: Map::new(),
    }
}

/// The documented 202 body.
pub fn accepted_response() -> HttpResponse {
    HttpResponse {
        status: 202,
        body: r#"{"deduplication_key":"test-key","message":"Event accepted for processing","status":"success"}"#
            .to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub body: String,
}

/// Transport that records requests and returns a canned result.
pub struct FakeTransport {
    response: Result<HttpResponse, String>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeTransport {
    pub fn new(response: HttpResponse) -> Self {
        Self {
            response: Ok(response),
            requests: Mutex::new(vec![]),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            requests: Mutex::new(vec![]),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse, AlertError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            body,
        });
        self.response.clone().map_err(AlertError::Other)
    }
}

/// Reporter that keeps everything in memory.
#[derive(Default)]
pub struct MemoryReporter {
    outputs: Mutex<Vec<(String, String)>>,
    failure: Mutex<Option<String>>,
    masks: Mutex<Vec<String>>,
}

impl MemoryReporter {
    pub fn outputs(&self) -> Vec<(String, String)> {
        self.outputs.lock().unwrap().clone()
    }

    pub fn output(&self, name: &str) -> Option<String> {
        self.outputs()
            .into_iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn failure(&self) -> Option<String> {
        self.failure.lock().unwrap().clone()
    }

    pub fn masks(&self) -> Vec<String> {
        self.masks.lock().unwrap().clone()
    }
}

impl Reporter for MemoryReporter {
    fn set_outputs(&self, outputs: &[(&str, &str)]) -> Result<(), AlertError> {
        self.outputs.lock().unwrap().extend(
            outputs
                .iter()
                .map(|(name, value)| ((*name).to_string(), (*value).to_string())),
        );
        Ok(())
    }

    fn set_failed(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    fn mask(&self, secret: &str) {
        self.masks.lock().unwrap().push(secret.to_string());
    }
}

/// Cloneable in-memory writer standing in for stdout.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
