//! GitHub Actions provider via the gh CLI

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::CiError;
use crate::repo::RepoId;
use crate::utils::gh::{self, GhFailure};

use super::{CiProvider, JobLog, RemoteStatus, RunConclusion, RunDetail, RunSummary};

/// GitHub Actions implementation of [`CiProvider`]
///
/// Stateless apart from the gh CLI's own credential store, so a single
/// instance can serve many concurrent validation runs.
#[derive(Debug, Default, Clone)]
pub struct GitHubCi;

impl GitHubCi {
    /// Create a provider backed by the authenticated gh CLI session
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Deserialize)]
struct RunsResponse {
    workflow_runs: Vec<ApiRun>,
}

#[derive(Debug, Deserialize)]
struct JobsResponse {
    jobs: Vec<ApiJob>,
}

#[derive(Debug, Deserialize)]
struct ApiRun {
    id: u64,
    #[serde(default)]
    display_title: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    head_commit: Option<ApiCommit>,
    #[serde(default)]
    html_url: String,
    status: RemoteStatus,
    conclusion: Option<RunConclusion>,
    #[serde(default)]
    run_started_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Deserialize)]
struct ApiCommit {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ApiJob {
    id: u64,
    name: String,
    status: RemoteStatus,
    conclusion: Option<RunConclusion>,
}

impl ApiRun {
    fn into_summary(self) -> RunSummary {
        RunSummary {
            id: self.id,
            title: self.display_title.or(self.name).unwrap_or_default(),
            commit_message: self.head_commit.map(|c| c.message).unwrap_or_default(),
            html_url: self.html_url,
        }
    }

    fn into_detail(self) -> RunDetail {
        RunDetail {
            id: self.id,
            status: self.status,
            conclusion: self.conclusion,
            html_url: self.html_url,
            started_at: self.run_started_at,
            updated_at: self.updated_at,
        }
    }
}

fn map_query_failure(failure: GhFailure, subject: &str) -> CiError {
    match failure {
        GhFailure::Http { status: 404, .. } => CiError::NotFound {
            subject: subject.to_string(),
        },
        GhFailure::Http {
            status: 401 | 403,
            stderr,
        } => CiError::Unauthorized { message: stderr },
        GhFailure::Http { stderr, .. } => CiError::Transient { message: stderr },
        GhFailure::Spawn { command } => CiError::CommandFailed { command },
        GhFailure::NonZero { command, .. } => CiError::CommandFailed { command },
    }
}

fn map_cancel_failure(failure: GhFailure, subject: &str) -> CiError {
    match failure {
        GhFailure::Http { status: 404, .. } => CiError::NotFound {
            subject: subject.to_string(),
        },
        GhFailure::Http { status: 401, stderr } => CiError::Unauthorized { message: stderr },
        GhFailure::Http { status: 403, stderr } => CiError::PermissionDenied { message: stderr },
        GhFailure::Http { status: 409, .. } => CiError::NotCancellable {
            subject: subject.to_string(),
        },
        GhFailure::Http { stderr, .. } => CiError::Transient { message: stderr },
        GhFailure::Spawn { command } => CiError::CommandFailed { command },
        GhFailure::NonZero { command, .. } => CiError::CommandFailed { command },
    }
}

fn decode<T: for<'de> Deserialize<'de>>(payload: &[u8]) -> Result<T, CiError> {
    serde_json::from_slice(payload).map_err(|e| CiError::Malformed {
        message: e.to_string(),
    })
}

#[async_trait::async_trait]
impl CiProvider for GitHubCi {
    async fn trigger_workflow(
        &self,
        repo: &RepoId,
        workflow: &str,
        git_ref: &str,
        inputs: &HashMap<String, String>,
    ) -> Result<Option<u64>, CiError> {
        let endpoint = format!("repos/{}/actions/workflows/{}/dispatches", repo, workflow);
        let ref_field = format!("ref={}", git_ref);
        let mut args = vec![
            "api",
            "-X",
            "POST",
            endpoint.as_str(),
            "-f",
            ref_field.as_str(),
        ];

        // Sort for a stable command line
        let mut input_fields: Vec<String> = inputs
            .iter()
            .map(|(k, v)| format!("inputs[{}]={}", k, v))
            .collect();
        input_fields.sort();
        for field in &input_fields {
            args.push("-f");
            args.push(field.as_str());
        }

        gh::run(&args)
            .await
            .map_err(|f| map_query_failure(f, &endpoint))?;

        // The dispatch endpoint returns 204 with no body; the run id must be
        // discovered by correlation later.
        Ok(None)
    }

    async fn list_workflow_runs(
        &self,
        repo: &RepoId,
        workflow: &str,
        per_page: u8,
    ) -> Result<Vec<RunSummary>, CiError> {
        let endpoint = format!(
            "repos/{}/actions/workflows/{}/runs?per_page={}",
            repo, workflow, per_page
        );
        let stdout = gh::run(&["api", &endpoint])
            .await
            .map_err(|f| map_query_failure(f, &endpoint))?;

        let response: RunsResponse = decode(&stdout)?;
        Ok(response
            .workflow_runs
            .into_iter()
            .map(ApiRun::into_summary)
            .collect())
    }

    async fn list_repo_runs(&self, repo: &RepoId, per_page: u8) -> Result<Vec<RunSummary>, CiError> {
        let endpoint = format!("repos/{}/actions/runs?per_page={}", repo, per_page);
        let stdout = gh::run(&["api", &endpoint])
            .await
            .map_err(|f| map_query_failure(f, &endpoint))?;

        let response: RunsResponse = decode(&stdout)?;
        Ok(response
            .workflow_runs
            .into_iter()
            .map(ApiRun::into_summary)
            .collect())
    }

    async fn get_run(&self, repo: &RepoId, run_id: u64) -> Result<RunDetail, CiError> {
        let endpoint = format!("repos/{}/actions/runs/{}", repo, run_id);
        let stdout = gh::run(&["api", &endpoint])
            .await
            .map_err(|f| map_query_failure(f, &endpoint))?;

        let run: ApiRun = decode(&stdout)?;
        Ok(run.into_detail())
    }

    async fn cancel_run(&self, repo: &RepoId, run_id: u64) -> Result<(), CiError> {
        let endpoint = format!("repos/{}/actions/runs/{}/cancel", repo, run_id);
        gh::run(&["api", "-X", "POST", &endpoint])
            .await
            .map(|_| ())
            .map_err(|f| map_cancel_failure(f, &format!("run {}", run_id)))
    }

    async fn list_job_logs(&self, repo: &RepoId, run_id: u64) -> Result<Vec<JobLog>, CiError> {
        let endpoint = format!("repos/{}/actions/runs/{}/jobs", repo, run_id);
        let stdout = gh::run(&["api", &endpoint])
            .await
            .map_err(|f| map_query_failure(f, &endpoint))?;

        let response: JobsResponse = decode(&stdout)?;
        Ok(response
            .jobs
            .into_iter()
            .map(|job| JobLog {
                log_url: format!(
                    "https://api.github.com/repos/{}/actions/jobs/{}/logs",
                    repo, job.id
                ),
                job_id: job.id,
                name: job.name,
                status: job.status,
                conclusion: job.conclusion,
            })
            .collect())
    }
}
