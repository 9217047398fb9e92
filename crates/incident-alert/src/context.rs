//! GitHub Actions run context attached to every alert.

use serde::{Serialize, Serializer};

/// Value substituted for any context variable the runner did not set.
pub const UNKNOWN: &str = "unknown";

const ENV_WORKFLOW: &str = "GITHUB_WORKFLOW";
const ENV_RUN_ID: &str = "GITHUB_RUN_ID";
const ENV_RUN_NUMBER: &str = "GITHUB_RUN_NUMBER";
const ENV_RUN_ATTEMPT: &str = "GITHUB_RUN_ATTEMPT";
const ENV_JOB: &str = "GITHUB_JOB";
const ENV_ACTOR: &str = "GITHUB_ACTOR";
const ENV_REPOSITORY: &str = "GITHUB_REPOSITORY";
const ENV_REF: &str = "GITHUB_REF";
const ENV_SHA: &str = "GITHUB_SHA";
const ENV_EVENT_NAME: &str = "GITHUB_EVENT_NAME";

/// Snapshot of the workflow run taken once at dispatch time.
///
/// Fields keep track of whether the runner actually set them so the
/// deduplication key fallback can tell a real run id from the sentinel.
/// Serialized, every absent field becomes `"unknown"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionContext {
    #[serde(serialize_with = "or_unknown")]
    workflow: Option<String>,
    #[serde(rename = "workflow_id", serialize_with = "or_unknown")]
    run_id: Option<String>,
    #[serde(rename = "workflow_run_number", serialize_with = "or_unknown")]
    run_number: Option<String>,
    #[serde(rename = "workflow_attempt", serialize_with = "or_unknown")]
    run_attempt: Option<String>,
    #[serde(serialize_with = "or_unknown")]
    job: Option<String>,
    #[serde(serialize_with = "or_unknown")]
    actor: Option<String>,
    #[serde(serialize_with = "or_unknown")]
    repository: Option<String>,
    #[serde(rename = "ref", serialize_with = "or_unknown")]
    git_ref: Option<String>,
    #[serde(serialize_with = "or_unknown")]
    sha: Option<String>,
    #[serde(serialize_with = "or_unknown")]
    event_name: Option<String>,
}

#[allow(clippy::ref_option)]
fn or_unknown<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or(UNKNOWN))
}

impl ExecutionContext {
    /// Read the context from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the context from an arbitrary variable lookup.
    ///
    /// Empty values count as unset, matching how the runner leaves
    /// variables blank for events that have no value for them.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Self {
            workflow: get(ENV_WORKFLOW),
            run_id: get(ENV_RUN_ID),
            run_number: get(ENV_RUN_NUMBER),
            run_attempt: get(ENV_RUN_ATTEMPT),
            job: get(ENV_JOB),
            actor: get(ENV_ACTOR),
            repository: get(ENV_REPOSITORY),
            git_ref: get(ENV_REF),
            sha: get(ENV_SHA),
            event_name: get(ENV_EVENT_NAME),
        }
    }

    /// Run id, if the runner provided one.
    #[must_use]
    pub fn run_id(&self) -> Option<&str> {
        self.run_id.as_deref()
    }

    /// Repository in `owner/repo` form, or `"unknown"`.
    #[must_use]
    pub fn repository(&self) -> &str {
        self.repository.as_deref().unwrap_or(UNKNOWN)
    }

    /// Link to the workflow run page.
    ///
    /// Missing parts are filled with the sentinel verbatim; the result is
    /// still a well-formed URL.
    #[must_use]
    pub fn run_url(&self) -> String {
        format!(
            "https://github.com/{}/actions/runs/{}",
            self.repository(),
            self.run_id().unwrap_or(UNKNOWN)
        )
    }
}
