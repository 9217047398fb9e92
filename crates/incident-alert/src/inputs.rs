//! Step inputs and their validation.
//!
//! The runner exposes each `with:` input as an `INPUT_<NAME>` environment
//! variable. Values are trimmed and an empty value is treated exactly like a
//! missing one.

use serde_json::{Map, Value};

use crate::alert::AlertStatus;
use crate::error::AlertError;

/// Alert source config used when the caller leaves `alert-source-config-id` blank.
pub const DEFAULT_ALERT_SOURCE_CONFIG_ID: &str = "01GW2G3V0S59R238FAHPDS1R66";

pub const INPUT_TOKEN: &str = "incident-io-token";
pub const INPUT_ALERT_SOURCE_CONFIG_ID: &str = "alert-source-config-id";
pub const INPUT_TITLE: &str = "title";
pub const INPUT_STATUS: &str = "status";
pub const INPUT_DESCRIPTION: &str = "description";
pub const INPUT_DEDUPLICATION_KEY: &str = "deduplication-key";
pub const INPUT_SOURCE_URL: &str = "source-url";
pub const INPUT_METADATA: &str = "metadata";

/// Environment variable the runner uses for an input name.
///
/// `incident-io-token` becomes `INPUT_INCIDENT-IO-TOKEN`; hyphens are kept,
/// spaces become underscores.
#[must_use]
pub fn input_env_name(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Raw inputs as supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct ActionInputs {
    pub token: Option<String>,
    pub alert_source_config_id: Option<String>,
    pub title: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub deduplication_key: Option<String>,
    pub source_url: Option<String>,
    pub metadata: Option<String>,
}

/// Inputs after required checks, status parsing and metadata parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInputs {
    pub token: String,
    pub alert_source_config_id: String,
    pub title: String,
    pub status: AlertStatus,
    pub description: Option<String>,
    pub deduplication_key: Option<String>,
    pub source_url: Option<String>,
    pub metadata: Map<String, Value>,
}

impl ActionInputs {
    /// Read all inputs from `INPUT_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read all inputs through an arbitrary environment lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(&input_env_name(name));

        Self {
            token: get(INPUT_TOKEN),
            alert_source_config_id: get(INPUT_ALERT_SOURCE_CONFIG_ID),
            title: get(INPUT_TITLE),
            status: get(INPUT_STATUS),
            description: get(INPUT_DESCRIPTION),
            deduplication_key: get(INPUT_DEDUPLICATION_KEY),
            source_url: get(INPUT_SOURCE_URL),
            metadata: get(INPUT_METADATA),
        }
    }

    /// Layer explicitly supplied values over these inputs.
    ///
    /// Any field set in `overrides` wins; unset fields keep their current value.
    #[must_use]
    pub fn with_overrides(self, overrides: Self) -> Self {
        Self {
            token: overrides.token.or(self.token),
            alert_source_config_id: overrides
                .alert_source_config_id
                .or(self.alert_source_config_id),
            title: overrides.title.or(self.title),
            status: overrides.status.or(self.status),
            description: overrides.description.or(self.description),
            deduplication_key: overrides.deduplication_key.or(self.deduplication_key),
            source_url: overrides.source_url.or(self.source_url),
            metadata: overrides.metadata.or(self.metadata),
        }
    }

    /// Check required inputs and parse the typed ones.
    ///
    /// # Errors
    ///
    /// Returns [`AlertError::MissingInput`] for an absent required input,
    /// [`AlertError::InvalidStatus`] for a status other than `firing` or
    /// `resolved`, and [`AlertError::InvalidMetadata`] when metadata is not a
    /// JSON object.
    pub fn validate(self) -> Result<ValidatedInputs, AlertError> {
        let token = required(self.token, INPUT_TOKEN)?;
        let alert_source_config_id = normalize(self.alert_source_config_id)
            .unwrap_or_else(|| DEFAULT_ALERT_SOURCE_CONFIG_ID.to_string());
        let title = required(self.title, INPUT_TITLE)?;
        let status = required(self.status, INPUT_STATUS)?.parse::<AlertStatus>()?;
        let metadata = parse_metadata(normalize(self.metadata).as_deref())?;

        Ok(ValidatedInputs {
            token,
            alert_source_config_id,
            title,
            status,
            description: normalize(self.description),
            deduplication_key: normalize(self.deduplication_key),
            source_url: normalize(self.source_url),
            metadata,
        })
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, name: &str) -> Result<String, AlertError> {
    normalize(value).ok_or_else(|| AlertError::MissingInput(name.to_string()))
}

/// Parse the metadata input. Absent metadata is an empty object.
fn parse_metadata(raw: Option<&str>) -> Result<Map<String, Value>, AlertError> {
    let Some(raw) = raw else {
        return Ok(Map::new());
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(AlertError::InvalidMetadata(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
        Err(e) => Err(AlertError::InvalidMetadata(e.to_string())),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
