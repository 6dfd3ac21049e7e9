//! Repository snapshot providers
//!
//! The rule engine never talks to a source host directly; it sees a
//! repository through the narrow [`RepoSnapshot`] seam: the full path list,
//! file contents on demand, and (when the provider knows it) the default
//! branch. Providers are read-only and safe to share across concurrent
//! evaluations.

mod filesystem;
mod github;
mod memory;

pub use filesystem::FsSnapshot;
pub use github::GitHubSnapshot;
pub use memory::MemorySnapshot;

use crate::error::SnapshotError;

/// Read-only view of a repository at a fixed ref
#[async_trait::async_trait]
pub trait RepoSnapshot: Send + Sync {
    /// Repository display name for reports
    fn name(&self) -> String;

    /// List every file path in the repository, relative to its root
    async fn list_files(&self) -> Result<Vec<String>, SnapshotError>;

    /// Read the UTF-8 content of a file
    async fn read_file(&self, path: &str) -> Result<String, SnapshotError>;

    /// The repository's default branch, if the provider knows it
    async fn default_branch(&self) -> Result<Option<String>, SnapshotError>;
}
