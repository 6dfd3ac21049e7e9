//! Validation run orchestration
//!
//! One [`Orchestrator`] serves one repository/workflow pair and owns every
//! run it starts. Each run sits behind its own async mutex, so polls for a
//! run are strictly sequential and a cancel arriving between or during polls
//! cannot corrupt `attempts` or `state`. Every provider call carries a
//! per-call timeout independent of the poll cadence.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::ci::{CiProvider, JobLog, RemoteStatus, RunConclusion};
use crate::error::{CiError, GatecheckError};
use crate::repo::RepoId;

use super::discovery::discover_remote_run;
use super::state::{transition, RunEvent, RunState};

static RUN_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Workflow input carrying the local run id, echoed into the remote run name
/// so discovery can correlate it back
pub const RUN_ID_INPUT: &str = "gatecheckRunId";

/// Poll loop bounds
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    /// Delay between polls
    pub interval: Duration,
    /// Timeout applied to every individual provider call
    pub call_timeout: Duration,
    /// Poll attempts before the run becomes `Timeout`
    pub max_attempts: u32,
    /// Page size for discovery listings
    pub discovery_page_size: u8,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            call_timeout: Duration::from_secs(20),
            max_attempts: 90,
            discovery_page_size: 20,
        }
    }
}

/// Mutable record of one validation run
#[derive(Debug)]
struct ValidationRun {
    local_run_id: String,
    remote_run_id: Option<u64>,
    state: RunState,
    attempts: u32,
    cancel_requested: bool,
    conclusion: Option<RunConclusion>,
    html_url: Option<String>,
    started_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ValidationRun {
    fn new(local_run_id: String) -> Self {
        let now = Utc::now();
        Self {
            local_run_id,
            remote_run_id: None,
            state: RunState::Starting,
            attempts: 0,
            cancel_requested: false,
            conclusion: None,
            html_url: None,
            started_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, event: RunEvent) {
        let next = transition(self.state, event);
        if next != self.state {
            debug!(
                local_run_id = %self.local_run_id,
                from = ?self.state,
                to = ?next,
                "Run state transition"
            );
            self.state = next;
        }
        self.updated_at = Utc::now();
    }
}

/// Coarse status bucket for callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    /// Triggered but remote run not yet observed
    Pending,
    /// Remote run observed and still executing
    Running,
    /// Run reached a terminal state
    Completed,
}

/// Caller-visible snapshot of a validation run
#[derive(Debug, Clone, Serialize)]
pub struct RunStatus {
    /// Local run id
    pub local_run_id: String,
    /// Remote run id, once discovered
    pub remote_run_id: Option<u64>,
    /// Detailed state
    pub state: RunState,
    /// Coarse status bucket
    pub status: StatusKind,
    /// Remote conclusion, once completed
    pub conclusion: Option<RunConclusion>,
    /// Browser URL of the remote run
    pub html_url: Option<String>,
    /// Polls issued so far
    pub attempts: u32,
    /// Per-job log locations, when requested and available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<Vec<JobLog>>,
}

/// Outcome of a cancellation request
#[derive(Debug, Clone, Serialize)]
pub struct CancelOutcome {
    /// Whether the remote system accepted the request
    pub accepted: bool,
    /// Why it was not accepted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CancelOutcome {
    fn accepted() -> Self {
        Self {
            accepted: true,
            reason: None,
        }
    }

    fn rejected(reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            reason: Some(reason.into()),
        }
    }
}

/// Orchestrates validation runs for one repository/workflow pair
pub struct Orchestrator {
    provider: Arc<dyn CiProvider>,
    repo: RepoId,
    workflow: String,
    git_ref: String,
    policy: PollPolicy,
    runs: std::sync::Mutex<HashMap<String, Arc<Mutex<ValidationRun>>>>,
}

impl Orchestrator {
    /// Create an orchestrator
    pub fn new(
        provider: Arc<dyn CiProvider>,
        repo: RepoId,
        workflow: impl Into<String>,
        git_ref: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            repo,
            workflow: workflow.into(),
            git_ref: git_ref.into(),
            policy: PollPolicy::default(),
            runs: std::sync::Mutex::new(HashMap::new()),
        }
    }

    /// Override the poll policy
    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Trigger the validation workflow and register a new run
    ///
    /// Trigger failures are surfaced without retry: the dispatch creates a
    /// new remote run each time, so a blind retry could start two.
    pub async fn start(&self) -> Result<String, GatecheckError> {
        let local_run_id = generate_run_id(&self.repo);
        let handle = Arc::new(Mutex::new(ValidationRun::new(local_run_id.clone())));
        self.runs
            .lock()
            .expect("run registry poisoned")
            .insert(local_run_id.clone(), Arc::clone(&handle));

        let mut run = handle.lock().await;
        info!(
            local_run_id = %local_run_id,
            repo = %self.repo,
            workflow = %self.workflow,
            "Triggering validation workflow"
        );

        let mut inputs = HashMap::new();
        inputs.insert(RUN_ID_INPUT.to_string(), local_run_id.clone());

        let triggered = tokio::time::timeout(
            self.policy.call_timeout,
            self.provider
                .trigger_workflow(&self.repo, &self.workflow, &self.git_ref, &inputs),
        )
        .await
        .unwrap_or_else(|_| {
            Err(CiError::Transient {
                message: "trigger call timed out".to_string(),
            })
        });

        match triggered {
            Ok(remote_run_id) => {
                run.remote_run_id = remote_run_id;
                run.apply(RunEvent::Triggered);
                Ok(local_run_id)
            }
            Err(e) => {
                run.apply(RunEvent::Failed);
                Err(e.into())
            }
        }
    }

    /// Read the current status without polling the remote system
    pub async fn status(&self, local_run_id: &str) -> Result<RunStatus, GatecheckError> {
        let handle = self.handle(local_run_id)?;
        let run = handle.lock().await;
        Ok(status_of(&run, None))
    }

    /// Issue one poll cycle for a run
    ///
    /// A poll on a terminal run is a no-op returning the final status.
    /// Transient provider failures leave state untouched; the attempts
    /// ceiling bounds how long a transient-error storm can go on.
    pub async fn poll(
        &self,
        local_run_id: &str,
        include_jobs: bool,
    ) -> Result<RunStatus, GatecheckError> {
        let handle = self.handle(local_run_id)?;
        let mut run = handle.lock().await;

        if run.state.is_terminal() {
            return Ok(status_of(&run, None));
        }

        run.attempts += 1;
        run.updated_at = Utc::now();

        if run.attempts > self.policy.max_attempts {
            warn!(
                local_run_id = %run.local_run_id,
                attempts = run.attempts,
                "Attempts ceiling exceeded"
            );
            run.apply(RunEvent::AttemptsExhausted);
            return Ok(status_of(&run, None));
        }

        let Some(remote_run_id) = run.remote_run_id else {
            self.poll_discovery(&mut run).await?;
            return Ok(status_of(&run, None));
        };
        let fetched = tokio::time::timeout(
            self.policy.call_timeout,
            self.provider.get_run(&self.repo, remote_run_id),
        )
        .await
        .unwrap_or_else(|_| {
            Err(CiError::Transient {
                message: "get-run call timed out".to_string(),
            })
        });

        let detail = match fetched {
            Ok(detail) => detail,
            Err(e) if e.is_retryable() => {
                warn!(local_run_id = %run.local_run_id, error = %e, "Poll failed; will retry");
                return Ok(status_of(&run, None));
            }
            Err(e) => {
                run.apply(RunEvent::Failed);
                return Err(e.into());
            }
        };

        if !detail.html_url.is_empty() {
            run.html_url = Some(detail.html_url.clone());
        }

        match detail.status {
            RemoteStatus::Completed => {
                let conclusion = detail.conclusion.unwrap_or(RunConclusion::Other);
                let cancel_requested = run.cancel_requested;
                run.conclusion = Some(conclusion);
                run.apply(RunEvent::RemoteCompleted {
                    conclusion,
                    cancel_requested,
                });
                info!(
                    local_run_id = %run.local_run_id,
                    conclusion = ?conclusion,
                    state = ?run.state,
                    "Validation run completed"
                );
            }
            RemoteStatus::Queued | RemoteStatus::InProgress | RemoteStatus::Other => {
                run.apply(RunEvent::RemoteRunning);
            }
        }

        let jobs = if include_jobs && run.state.is_terminal() {
            self.fetch_jobs(remote_run_id).await
        } else {
            None
        };

        Ok(status_of(&run, jobs))
    }

    /// Request cancellation of a run
    ///
    /// Only valid while `Triggered` or `Running`; any other state is a
    /// no-op. Acceptance does not mean the run has stopped — the next poll
    /// resolves the true terminal state from the remote system.
    pub async fn cancel(&self, local_run_id: &str) -> Result<CancelOutcome, GatecheckError> {
        let handle = self.handle(local_run_id)?;
        let mut run = handle.lock().await;

        if !matches!(run.state, RunState::Triggered | RunState::Running) {
            return Ok(CancelOutcome::rejected("not-cancellable"));
        }

        let Some(remote_run_id) = run.remote_run_id else {
            return Ok(CancelOutcome::rejected("run-not-discovered"));
        };

        run.cancel_requested = true;
        run.apply(RunEvent::CancelRequested);
        info!(local_run_id = %run.local_run_id, remote_run_id, "Requesting cancellation");

        let cancelled = tokio::time::timeout(
            self.policy.call_timeout,
            self.provider.cancel_run(&self.repo, remote_run_id),
        )
        .await
        .unwrap_or_else(|_| {
            Err(CiError::Transient {
                message: "cancel call timed out".to_string(),
            })
        });

        match cancelled {
            Ok(()) => Ok(CancelOutcome::accepted()),
            Err(e @ CiError::Unauthorized { .. }) => {
                run.apply(RunEvent::Failed);
                Err(e.into())
            }
            Err(CiError::PermissionDenied { .. }) => {
                run.cancel_requested = false;
                run.apply(RunEvent::CancelRejected);
                Ok(CancelOutcome::rejected("permission-denied"))
            }
            Err(CiError::NotFound { .. }) => {
                run.cancel_requested = false;
                run.apply(RunEvent::CancelRejected);
                Ok(CancelOutcome::rejected("not-found"))
            }
            Err(CiError::NotCancellable { .. }) => {
                // Run already finished; the next poll reports the real outcome
                run.cancel_requested = false;
                run.apply(RunEvent::CancelRejected);
                Ok(CancelOutcome::rejected("not-cancellable"))
            }
            Err(e) => {
                run.cancel_requested = false;
                run.apply(RunEvent::CancelRejected);
                warn!(local_run_id = %run.local_run_id, error = %e, "Cancel request failed");
                Ok(CancelOutcome::rejected("transient"))
            }
        }
    }

    /// Drive the poll loop on an interval until the run is terminal
    pub async fn run_to_completion(
        &self,
        local_run_id: &str,
        include_jobs: bool,
    ) -> Result<RunStatus, GatecheckError> {
        let mut interval = tokio::time::interval(self.policy.interval);
        loop {
            interval.tick().await;
            let status = self.poll(local_run_id, include_jobs).await?;
            if status.state.is_terminal() {
                return Ok(status);
            }
        }
    }

    /// Drop a terminal run from the registry
    pub fn evict(&self, local_run_id: &str) {
        self.runs
            .lock()
            .expect("run registry poisoned")
            .remove(local_run_id);
    }

    fn handle(&self, local_run_id: &str) -> Result<Arc<Mutex<ValidationRun>>, GatecheckError> {
        self.runs
            .lock()
            .expect("run registry poisoned")
            .get(local_run_id)
            .cloned()
            .ok_or_else(|| {
                GatecheckError::InvalidInput(format!("unknown run id '{}'", local_run_id))
            })
    }

    async fn poll_discovery(&self, run: &mut ValidationRun) -> Result<(), GatecheckError> {
        let discovered = discover_remote_run(
            self.provider.as_ref(),
            &self.repo,
            &self.workflow,
            &run.local_run_id,
            self.policy.discovery_page_size,
            self.policy.call_timeout,
        )
        .await;

        match discovered {
            Ok(Some(summary)) => {
                run.remote_run_id = Some(summary.id);
                run.html_url = Some(summary.html_url);
                run.apply(RunEvent::RemoteRunning);
                Ok(())
            }
            Ok(None) => {
                // Not listable yet; stay pending for the next cycle
                run.updated_at = Utc::now();
                Ok(())
            }
            Err(e @ CiError::Unauthorized { .. }) => {
                run.apply(RunEvent::Failed);
                Err(e.into())
            }
            Err(e) => {
                warn!(local_run_id = %run.local_run_id, error = %e, "Discovery failed; will retry");
                Ok(())
            }
        }
    }

    async fn fetch_jobs(&self, remote_run_id: u64) -> Option<Vec<JobLog>> {
        // Best effort; a failure here never changes run state
        match tokio::time::timeout(
            self.policy.call_timeout,
            self.provider.list_job_logs(&self.repo, remote_run_id),
        )
        .await
        {
            Ok(Ok(jobs)) => Some(jobs),
            Ok(Err(e)) => {
                warn!(remote_run_id, error = %e, "Could not fetch job logs");
                None
            }
            Err(_) => {
                warn!(remote_run_id, "Job log fetch timed out");
                None
            }
        }
    }
}

fn status_of(run: &ValidationRun, jobs: Option<Vec<JobLog>>) -> RunStatus {
    let status = match run.state {
        RunState::Starting | RunState::Triggered => StatusKind::Pending,
        RunState::Running | RunState::Cancelling => StatusKind::Running,
        _ => StatusKind::Completed,
    };

    RunStatus {
        local_run_id: run.local_run_id.clone(),
        remote_run_id: run.remote_run_id,
        state: run.state,
        status,
        conclusion: run.conclusion,
        html_url: run.html_url.clone(),
        attempts: run.attempts,
        jobs,
    }
}

/// Generate a local run id: 12 hex chars of a digest over the repository,
/// the current time, and a process-wide counter
fn generate_run_id(repo: &RepoId) -> String {
    let counter = RUN_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut hasher = Sha256::new();
    hasher.update(repo.to_string().as_bytes());
    hasher.update(Utc::now().to_rfc3339().as_bytes());
    hasher.update(counter.to_le_bytes());
    let digest = hasher.finalize();
    let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    hex[..12].to_string()
}
