//! In-memory snapshot for tests and benchmarks

use std::collections::BTreeMap;

use crate::error::SnapshotError;

use super::RepoSnapshot;

/// Snapshot backed by an in-memory path/content map
#[derive(Debug, Default, Clone)]
pub struct MemorySnapshot {
    name: String,
    files: BTreeMap<String, String>,
    default_branch: Option<String>,
}

impl MemorySnapshot {
    /// Create an empty snapshot
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: BTreeMap::new(),
            default_branch: None,
        }
    }

    /// Add a file with content
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Set the reported default branch
    pub fn with_default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = Some(branch.into());
        self
    }
}

#[async_trait::async_trait]
impl RepoSnapshot for MemorySnapshot {
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn list_files(&self) -> Result<Vec<String>, SnapshotError> {
        Ok(self.files.keys().cloned().collect())
    }

    async fn read_file(&self, path: &str) -> Result<String, SnapshotError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| SnapshotError::NotFound {
                subject: path.to_string(),
            })
    }

    async fn default_branch(&self) -> Result<Option<String>, SnapshotError> {
        Ok(self.default_branch.clone())
    }
}
