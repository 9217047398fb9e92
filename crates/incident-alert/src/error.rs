//! Error types for the alert dispatcher.

use thiserror::Error;

/// Errors that can occur while validating inputs or sending an alert event.
///
/// The `Display` output of every variant is what the pipeline sees as the
/// failure reason, so the message shapes are part of the step's contract.
#[derive(Debug, Error)]
pub enum AlertError {
    /// A required input was absent or empty
    #[error("Input required and not supplied: {0}")]
    MissingInput(String),

    /// Status was something other than `firing` or `resolved`
    #[error("Invalid status: {0}. Must be either \"firing\" or \"resolved\"")]
    InvalidStatus(String),

    /// Metadata input was not a JSON object
    #[error("Failed to parse metadata JSON: {0}")]
    InvalidMetadata(String),

    /// incident.io answered with a non-success status
    #[error("incident.io API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    /// HTTP request failed before a response was received.
    ///
    /// Built with [`AlertError::transport`] so the request URL, which carries
    /// the token, is stripped first.
    #[error("{}", describe_chain(.0))]
    Transport(#[source] reqwest::Error),

    /// Success response whose body is not an alert event response
    #[error("Failed to parse incident.io response: {0}")]
    InvalidResponse(#[source] serde_json::Error),

    /// Payload serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Writing a step output failed
    #[error("Failed to write step output: {0}")]
    Output(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl AlertError {
    /// Wrap a transport error, dropping the request URL it carries.
    #[must_use]
    pub fn transport(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }

    /// HTTP status code for API errors.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// `reqwest` keeps the cause (connection refused, DNS failure) in the source
/// chain rather than in its own message.
fn describe_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
