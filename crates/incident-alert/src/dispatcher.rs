//! The alert dispatch sequence.
//!
//! Validate → build payload → send → interpret, then report either both
//! outputs or a single failure reason. Nothing is retried.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::actions::{Reporter, OUTPUT_DEDUPLICATION_KEY, OUTPUT_RESPONSE_STATUS};
use crate::client::IncidentIoClient;
use crate::context::ExecutionContext;
use crate::error::AlertError;
use crate::inputs::ActionInputs;
use crate::payload::build_payload;

/// `response-status` reported for a dry run.
pub const DRY_RUN_STATUS: &str = "dry-run";

/// Values published as step outputs after a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub deduplication_key: String,
    pub response_status: String,
    pub message: String,
}

/// Runs one alert dispatch against a client and reports to the runner.
pub struct Dispatcher {
    client: IncidentIoClient,
    reporter: Arc<dyn Reporter>,
    clock: fn() -> DateTime<Utc>,
    dry_run: bool,
}

impl Dispatcher {
    #[must_use]
    pub fn new(client: IncidentIoClient, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            client,
            reporter,
            clock: Utc::now,
            dry_run: false,
        }
    }

    /// Replace the wall clock used for the last-resort deduplication key.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Build and log the payload without sending it.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Perform the dispatch without reporting.
    ///
    /// # Errors
    ///
    /// Any validation, transport, API or response error, unchanged.
    pub async fn dispatch(
        &self,
        inputs: ActionInputs,
        context: &ExecutionContext,
    ) -> Result<DispatchOutcome, AlertError> {
        if let Some(token) = inputs.token.as_deref().map(str::trim) {
            self.reporter.mask(token);
            // The request URL carries the encoded form.
            let encoded = urlencoding::encode(token);
            if encoded != token {
                self.reporter.mask(&encoded);
            }
        }

        let inputs = inputs.validate()?;
        let payload = build_payload(&inputs, context, (self.clock)())?;

        info!("Sending alert to incident.io...");
        info!("Title: {}", payload.title);
        info!("Status: {}", payload.status);
        info!("Deduplication Key: {}", payload.deduplication_key);

        if self.dry_run {
            let pretty =
                serde_json::to_string_pretty(&payload).map_err(AlertError::Serialization)?;
            info!("Dry run, not sending. Payload:\n{pretty}");
            return Ok(DispatchOutcome {
                deduplication_key: payload.deduplication_key,
                response_status: DRY_RUN_STATUS.to_string(),
                message: "Dry run".to_string(),
            });
        }

        let response = self
            .client
            .send_alert(&inputs.alert_source_config_id, &inputs.token, &payload)
            .await?;

        info!("Alert sent successfully!");
        info!("Response: {}", response.message);

        Ok(DispatchOutcome {
            deduplication_key: response.deduplication_key,
            response_status: response.status,
            message: response.message,
        })
    }

    /// Dispatch and report the result. Returns `true` on success.
    ///
    /// Every error ends here as the step's single failure reason.
    pub async fn run(&self, inputs: ActionInputs, context: &ExecutionContext) -> bool {
        let result = match self.dispatch(inputs, context).await {
            Ok(outcome) => self.publish(&outcome),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                self.reporter.set_failed(&e.to_string());
                false
            }
        }
    }

    fn publish(&self, outcome: &DispatchOutcome) -> Result<(), AlertError> {
        self.reporter.set_outputs(&[
            (OUTPUT_DEDUPLICATION_KEY, outcome.deduplication_key.as_str()),
            (OUTPUT_RESPONSE_STATUS, outcome.response_status.as_str()),
        ])
    }
}
