//! incident-alert - send one alert event to incident.io from a CI job.
//!
//! Inputs come from the runner's `INPUT_*` variables; a flag given on the
//! command line takes precedence, so the binary also works from a shell:
//!
//! ```bash
//! incident-alert --incident-io-token "$TOKEN" --title "Deploy failed" --status firing
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use incident_alert::client::DEFAULT_API_URL;
use incident_alert::{
    ActionInputs, ActionsReporter, Dispatcher, ExecutionContext, IncidentIoClient,
    ReqwestTransport,
};

/// Set to `1` by the runner when step debug logging is enabled.
const ENV_RUNNER_DEBUG: &str = "RUNNER_DEBUG";

#[derive(Parser)]
#[command(name = "incident-alert")]
#[command(about = "Send an alert event to incident.io")]
#[command(version)]
struct Cli {
    /// incident.io API token
    #[arg(long)]
    incident_io_token: Option<String>,

    /// Alert source config id (defaults to the built-in source)
    #[arg(long)]
    alert_source_config_id: Option<String>,

    /// Alert title
    #[arg(long)]
    title: Option<String>,

    /// Alert status: firing or resolved
    #[arg(long)]
    status: Option<String>,

    /// Alert description
    #[arg(long)]
    description: Option<String>,

    /// Deduplication key (defaults to the run id)
    #[arg(long)]
    deduplication_key: Option<String>,

    /// Source URL (defaults to the workflow run page)
    #[arg(long)]
    source_url: Option<String>,

    /// Extra metadata as a JSON object
    #[arg(long)]
    metadata: Option<String>,

    /// incident.io API base URL
    #[arg(long, env = "INCIDENT_IO_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Build and log the payload without sending it
    #[arg(long, env = "INPUT_DRY-RUN", action = ArgAction::SetTrue, value_parser = FalseyValueParser::new())]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Inputs given as flags; unset flags fall through to `INPUT_*`.
    fn flag_inputs(&self) -> ActionInputs {
        ActionInputs {
            token: self.incident_io_token.clone(),
            alert_source_config_id: self.alert_source_config_id.clone(),
            title: self.title.clone(),
            status: self.status.clone(),
            description: self.description.clone(),
            deduplication_key: self.deduplication_key.clone(),
            source_url: self.source_url.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let debug = verbose || std::env::var(ENV_RUNNER_DEBUG).is_ok_and(|v| v == "1");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init()
        .context("failed to initialize logging")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let client = IncidentIoClient::with_transport(&cli.api_url, Arc::new(ReqwestTransport::new()));
    let dispatcher = Dispatcher::new(client, Arc::new(ActionsReporter::from_env()))
        .with_dry_run(cli.dry_run);

    let context = ExecutionContext::from_env();

    let inputs = ActionInputs::from_env().with_overrides(cli.flag_inputs());

    if dispatcher.run(inputs, &context).await {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
