//! GitHub-hosted repository snapshot via the gh CLI

use serde::Deserialize;

use crate::error::SnapshotError;
use crate::repo::RepoId;
use crate::utils::gh::{self, GhFailure};

use super::RepoSnapshot;

/// Snapshot of a GitHub repository at a fixed ref
pub struct GitHubSnapshot {
    repo: RepoId,
    git_ref: String,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    default_branch: Option<String>,
}

impl GitHubSnapshot {
    /// Create a snapshot of `repo` at `git_ref` (branch, tag, or commit)
    pub fn new(repo: RepoId, git_ref: impl Into<String>) -> Self {
        Self {
            repo,
            git_ref: git_ref.into(),
        }
    }

    fn map_failure(failure: GhFailure, subject: String) -> SnapshotError {
        match failure {
            GhFailure::Http { status: 404, .. } => SnapshotError::NotFound { subject },
            GhFailure::Http { status: 401, .. } | GhFailure::Http { status: 403, .. } => {
                SnapshotError::Unauthorized { subject }
            }
            GhFailure::Http { stderr, .. } => SnapshotError::Transient { message: stderr },
            GhFailure::Spawn { command } | GhFailure::NonZero { command, .. } => {
                SnapshotError::Transient {
                    message: format!("{} failed", command),
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl RepoSnapshot for GitHubSnapshot {
    fn name(&self) -> String {
        self.repo.to_string()
    }

    async fn list_files(&self) -> Result<Vec<String>, SnapshotError> {
        let endpoint = format!(
            "repos/{}/git/trees/{}?recursive=1",
            self.repo, self.git_ref
        );
        let stdout = gh::run(&["api", &endpoint])
            .await
            .map_err(|f| Self::map_failure(f, self.repo.to_string()))?;

        let response: TreeResponse =
            serde_json::from_slice(&stdout).map_err(|e| SnapshotError::Transient {
                message: format!("unexpected tree payload: {}", e),
            })?;

        if response.truncated {
            tracing::warn!(repo = %self.repo, "git tree listing truncated by the API");
        }

        Ok(response
            .tree
            .into_iter()
            .filter(|e| e.kind == "blob")
            .map(|e| e.path)
            .collect())
    }

    async fn read_file(&self, path: &str) -> Result<String, SnapshotError> {
        let endpoint = format!(
            "repos/{}/contents/{}?ref={}",
            self.repo, path, self.git_ref
        );
        let stdout = gh::run(&[
            "api",
            &endpoint,
            "-H",
            "Accept: application/vnd.github.raw",
        ])
        .await
        .map_err(|f| Self::map_failure(f, path.to_string()))?;

        String::from_utf8(stdout).map_err(|_| SnapshotError::Transient {
            message: format!("{} is not valid UTF-8", path),
        })
    }

    async fn default_branch(&self) -> Result<Option<String>, SnapshotError> {
        let endpoint = format!("repos/{}", self.repo);
        let stdout = gh::run(&["api", &endpoint])
            .await
            .map_err(|f| Self::map_failure(f, self.repo.to_string()))?;

        let response: RepoResponse =
            serde_json::from_slice(&stdout).map_err(|e| SnapshotError::Transient {
                message: format!("unexpected repo payload: {}", e),
            })?;

        Ok(response.default_branch)
    }
}
