//! Remote run discovery
//!
//! The workflow-dispatch endpoint does not return a run id, so the
//! orchestrator correlates its locally generated run id against recent runs:
//! a candidate matches when its display title or triggering commit message
//! contains the local id as a literal substring. The workflow-scoped listing
//! is consulted first, then the whole repository as a fallback; the first
//! match in provider order (newest first) wins. Each listing call carries
//! its own timeout.

use std::future::Future;
use std::time::Duration;

use crate::ci::{CiProvider, RunSummary};
use crate::error::CiError;
use crate::repo::RepoId;

/// Find the first candidate containing the local run id
pub fn correlate<'a>(candidates: &'a [RunSummary], local_run_id: &str) -> Option<&'a RunSummary> {
    candidates
        .iter()
        .find(|run| run.title.contains(local_run_id) || run.commit_message.contains(local_run_id))
}

/// Discover the remote run for a local run id
///
/// Returns `Ok(None)` when no candidate matches; a just-triggered run may not
/// be listable yet, so absence is "pending", never an error.
pub async fn discover_remote_run(
    provider: &dyn CiProvider,
    repo: &RepoId,
    workflow: &str,
    local_run_id: &str,
    per_page: u8,
    call_timeout: Duration,
) -> Result<Option<RunSummary>, CiError> {
    let scoped = listed(
        provider.list_workflow_runs(repo, workflow, per_page),
        call_timeout,
    )
    .await?;
    if let Some(found) = correlate(&scoped, local_run_id) {
        tracing::debug!(
            local_run_id = local_run_id,
            remote_run_id = found.id,
            "Correlated run in workflow-scoped listing"
        );
        return Ok(Some(found.clone()));
    }

    let repo_wide = listed(provider.list_repo_runs(repo, per_page), call_timeout).await?;
    if let Some(found) = correlate(&repo_wide, local_run_id) {
        tracing::debug!(
            local_run_id = local_run_id,
            remote_run_id = found.id,
            "Correlated run in repository-wide listing"
        );
        return Ok(Some(found.clone()));
    }

    tracing::debug!(local_run_id = local_run_id, "No matching remote run yet");
    Ok(None)
}

async fn listed<F>(call: F, call_timeout: Duration) -> Result<Vec<RunSummary>, CiError>
where
    F: Future<Output = Result<Vec<RunSummary>, CiError>>,
{
    tokio::time::timeout(call_timeout, call)
        .await
        .unwrap_or_else(|_| {
            Err(CiError::Transient {
                message: "listing call timed out".to_string(),
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: u64, title: &str, commit: &str) -> RunSummary {
        RunSummary {
            id,
            title: title.to_string(),
            commit_message: commit.to_string(),
            html_url: format!("https://example.test/runs/{}", id),
        }
    }

    #[test]
    fn test_matches_title_substring() {
        let runs = vec![
            summary(2, "unrelated", "chore: bump"),
            summary(1, "validation run for abc123", "merge"),
        ];
        assert_eq!(correlate(&runs, "abc123").unwrap().id, 1);
    }

    #[test]
    fn test_matches_commit_message_substring() {
        let runs = vec![summary(7, "validate", "trigger gatecheck abc123")];
        assert_eq!(correlate(&runs, "abc123").unwrap().id, 7);
    }

    #[test]
    fn test_first_match_wins_in_provider_order() {
        let runs = vec![
            summary(9, "run for abc123", "x"),
            summary(3, "older run for abc123", "y"),
        ];
        assert_eq!(correlate(&runs, "abc123").unwrap().id, 9);
    }

    #[test]
    fn test_no_match_is_none() {
        let runs = vec![summary(1, "something else", "nothing here")];
        assert!(correlate(&runs, "abc123").is_none());
    }
}
