//! Alert payload construction.

use chrono::{DateTime, Utc};

use crate::alert::AlertRequest;
use crate::context::ExecutionContext;
use crate::error::AlertError;
use crate::inputs::ValidatedInputs;

/// Metadata key holding the run context. Always overwrites a user value.
pub const GITHUB_METADATA_KEY: &str = "github";

/// Build the request body from validated inputs and the run context.
///
/// - `deduplication_key`: the input, else the run id, else `now` in epoch
///   milliseconds, so a key is always sent.
/// - `source_url`: the input, else the workflow run page.
/// - `metadata`: the user object with `github` set to the run context.
///
/// # Errors
///
/// Returns [`AlertError::Serialization`] if the run context cannot be
/// converted to JSON.
pub fn build_payload(
    inputs: &ValidatedInputs,
    context: &ExecutionContext,
    now: DateTime<Utc>,
) -> Result<AlertRequest, AlertError> {
    let deduplication_key = inputs
        .deduplication_key
        .clone()
        .or_else(|| context.run_id().map(ToString::to_string))
        .unwrap_or_else(|| now.timestamp_millis().to_string());

    let source_url = inputs
        .source_url
        .clone()
        .unwrap_or_else(|| context.run_url());

    let mut metadata = inputs.metadata.clone();
    metadata.insert(
        GITHUB_METADATA_KEY.to_string(),
        serde_json::to_value(context).map_err(AlertError::Serialization)?,
    );

    Ok(AlertRequest {
        title: inputs.title.clone(),
        status: inputs.status,
        description: inputs.description.clone(),
        deduplication_key,
        source_url,
        metadata,
    })
}
