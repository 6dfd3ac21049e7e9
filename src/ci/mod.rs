//! CI provider abstraction
//!
//! The orchestrator drives a remote CI system through six operations:
//! trigger, two run listings, run detail, cancel, and per-job logs. The
//! trait keeps the wire encoding out of the core; implementations must be
//! safe for concurrent use by many validation runs.

mod github;

pub use github::GitHubCi;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CiError;
use crate::repo::RepoId;

/// Remote run status as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteStatus {
    /// Accepted but not started
    Queued,
    /// Currently executing
    InProgress,
    /// Finished; see the conclusion
    Completed,
    /// Any status string we do not model
    #[serde(other)]
    Other,
}

/// Conclusion of a completed remote run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunConclusion {
    /// The run succeeded
    Success,
    /// The run failed
    Failure,
    /// The run was cancelled remotely
    Cancelled,
    /// The run timed out remotely
    TimedOut,
    /// Any conclusion string we do not model
    #[serde(other)]
    Other,
}

/// One run in a listing, carrying the correlation evidence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Remote run identifier
    pub id: u64,
    /// Display title of the run
    pub title: String,
    /// Message of the triggering commit
    pub commit_message: String,
    /// Browser URL of the run
    pub html_url: String,
}

/// Detail of a single remote run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunDetail {
    /// Remote run identifier
    pub id: u64,
    /// Current status
    pub status: RemoteStatus,
    /// Conclusion once completed
    pub conclusion: Option<RunConclusion>,
    /// Browser URL of the run
    pub html_url: String,
    /// When the run started
    pub started_at: Option<DateTime<Utc>>,
    /// When the run was last updated
    pub updated_at: Option<DateTime<Utc>>,
}

/// One job of a remote run with its log location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobLog {
    /// Remote job identifier
    pub job_id: u64,
    /// Job name
    pub name: String,
    /// Job status
    pub status: RemoteStatus,
    /// Job conclusion once completed
    pub conclusion: Option<RunConclusion>,
    /// Ephemeral log URL
    pub log_url: String,
}

/// Remote CI operations
#[async_trait::async_trait]
pub trait CiProvider: Send + Sync {
    /// Trigger a workflow run
    ///
    /// Returns the remote run id only when the provider reports one
    /// synchronously; GitHub's dispatch endpoint does not, so callers must be
    /// prepared to discover the run later.
    async fn trigger_workflow(
        &self,
        repo: &RepoId,
        workflow: &str,
        git_ref: &str,
        inputs: &HashMap<String, String>,
    ) -> Result<Option<u64>, CiError>;

    /// List recent runs of one workflow, newest first
    async fn list_workflow_runs(
        &self,
        repo: &RepoId,
        workflow: &str,
        per_page: u8,
    ) -> Result<Vec<RunSummary>, CiError>;

    /// List recent runs across the whole repository, newest first
    async fn list_repo_runs(&self, repo: &RepoId, per_page: u8) -> Result<Vec<RunSummary>, CiError>;

    /// Fetch detail for one run
    async fn get_run(&self, repo: &RepoId, run_id: u64) -> Result<RunDetail, CiError>;

    /// Request cancellation of one run
    async fn cancel_run(&self, repo: &RepoId, run_id: u64) -> Result<(), CiError>;

    /// List jobs and their log locations for one run
    async fn list_job_logs(&self, repo: &RepoId, run_id: u64) -> Result<Vec<JobLog>, CiError>;
}
