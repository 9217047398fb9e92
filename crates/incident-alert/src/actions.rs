//! Reporting results back to the GitHub Actions runner.
//!
//! Outputs go to the file named by `GITHUB_OUTPUT`; failures, masks and the
//! legacy output form are workflow commands written to stdout.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tracing::debug;

use crate::error::AlertError;

/// Environment variable naming the step output file.
const ENV_GITHUB_OUTPUT: &str = "GITHUB_OUTPUT";

/// Output names exposed by the step.
pub const OUTPUT_DEDUPLICATION_KEY: &str = "deduplication-key";
pub const OUTPUT_RESPONSE_STATUS: &str = "response-status";

/// Sink for step outputs and the failure signal.
pub trait Reporter: Send + Sync {
    /// Publish step outputs together.
    ///
    /// Either every output is recorded or, on error, none of them is.
    ///
    /// # Errors
    ///
    /// Returns [`AlertError::Output`] if the outputs cannot be recorded.
    fn set_outputs(&self, outputs: &[(&str, &str)]) -> Result<(), AlertError>;

    /// Publish a single named step output.
    ///
    /// # Errors
    ///
    /// Returns [`AlertError::Output`] if the output cannot be recorded.
    fn set_output(&self, name: &str, value: &str) -> Result<(), AlertError> {
        self.set_outputs(&[(name, value)])
    }

    /// Mark the step as failed with a human-readable reason.
    fn set_failed(&self, message: &str);

    /// Register a secret so the runner scrubs it from logs.
    fn mask(&self, secret: &str);
}

/// Reporter speaking the runner's file and workflow-command protocol.
pub struct ActionsReporter {
    output_file: Option<PathBuf>,
    stdout: Mutex<Box<dyn Write + Send>>,
    failed: AtomicBool,
}

impl ActionsReporter {
    /// Create a reporter from `GITHUB_OUTPUT`, writing commands to stdout.
    #[must_use]
    pub fn from_env() -> Self {
        let output_file = std::env::var(ENV_GITHUB_OUTPUT)
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self::new(output_file, Box::new(std::io::stdout()))
    }

    #[must_use]
    pub fn new(output_file: Option<PathBuf>, stdout: Box<dyn Write + Send>) -> Self {
        Self {
            output_file,
            stdout: Mutex::new(stdout),
            failed: AtomicBool::new(false),
        }
    }

    /// Whether `set_failed` has been called.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }

    fn command(&self, line: &str) {
        if let Ok(mut out) = self.stdout.lock() {
            // Nothing sensible to do if stdout is gone.
            let _ = writeln!(out, "{line}");
            let _ = out.flush();
        }
    }
}

impl Reporter for ActionsReporter {
    fn set_outputs(&self, outputs: &[(&str, &str)]) -> Result<(), AlertError> {
        let Some(path) = &self.output_file else {
            let lines: Vec<String> = outputs
                .iter()
                .map(|(name, value)| {
                    format!(
                        "::set-output name={}::{}",
                        escape_property(name),
                        escape_data(value)
                    )
                })
                .collect();
            self.command(&lines.join("\n"));
            return Ok(());
        };

        let mut entries = String::new();
        for (name, value) in outputs {
            let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
            entries.push_str(&format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"));
        }

        // One write so a failure never leaves a partial set of outputs.
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(entries.as_bytes())?;

        debug!(count = outputs.len(), "Step outputs written");
        Ok(())
    }

    fn set_failed(&self, message: &str) {
        self.failed.store(true, Ordering::SeqCst);
        self.command(&format!("::error::{}", escape_data(message)));
    }

    fn mask(&self, secret: &str) {
        if !secret.is_empty() {
            self.command(&format!("::add-mask::{}", escape_data(secret)));
        }
    }
}

/// Escape a workflow command message.
fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escape a workflow command property value.
fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}
