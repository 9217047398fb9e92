//! CI pipeline step that forwards an alert event to incident.io.
//!
//! One run sends exactly one event to the Alert Events V2 HTTP source:
//! inputs are validated, the payload is completed from the GitHub Actions
//! run context, a single POST is made, and the step either publishes the
//! `deduplication-key` and `response-status` outputs or fails with one
//! message.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use incident_alert::{ActionInputs, ActionsReporter, Dispatcher, ExecutionContext, IncidentIoClient};
//!
//! # async fn example() {
//! let dispatcher = Dispatcher::new(
//!     IncidentIoClient::new(),
//!     Arc::new(ActionsReporter::from_env()),
//! );
//!
//! let ok = dispatcher
//!     .run(ActionInputs::from_env(), &ExecutionContext::from_env())
//!     .await;
//! # }
//! ```
//!
//! # Configuration
//!
//! Inputs are read from the runner's `INPUT_*` variables:
//!
//! - `INPUT_INCIDENT-IO-TOKEN`: API token (required)
//! - `INPUT_ALERT-SOURCE-CONFIG-ID`: alert source config, defaults to a built-in id
//! - `INPUT_TITLE`, `INPUT_STATUS`: required; status is `firing` or `resolved`
//! - `INPUT_DESCRIPTION`, `INPUT_DEDUPLICATION-KEY`, `INPUT_SOURCE-URL`, `INPUT_METADATA`
//!
//! # Architecture
//!
//! - [`HttpTransport`] is the only network seam; [`ReqwestTransport`] implements it
//! - [`IncidentIoClient`] builds the endpoint URL and interprets responses
//! - [`Reporter`] publishes outputs; [`ActionsReporter`] speaks the runner protocol
//! - [`Dispatcher`] ties the steps together

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod actions;
pub mod alert;
pub mod client;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod inputs;
pub mod payload;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_utils;

pub use actions::{ActionsReporter, Reporter};
pub use alert::{AlertRequest, AlertResponse, AlertStatus};
pub use client::IncidentIoClient;
pub use context::ExecutionContext;
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use error::AlertError;
pub use inputs::{ActionInputs, ValidatedInputs};
pub use payload::build_payload;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
