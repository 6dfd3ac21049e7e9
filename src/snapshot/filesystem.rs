//! Local filesystem snapshot

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::SnapshotError;

use super::RepoSnapshot;

/// Snapshot of a local directory
///
/// The file list is gathered once at construction; contents are read on
/// demand. Gitignored files and the `.git` directory are excluded, matching
/// what a source host would serve.
pub struct FsSnapshot {
    root: PathBuf,
    files: Vec<String>,
}

impl FsSnapshot {
    /// Create a snapshot of the given directory
    pub fn new(root: PathBuf) -> Self {
        let files = scan_directory(&root);
        Self { root, files }
    }
}

#[async_trait::async_trait]
impl RepoSnapshot for FsSnapshot {
    fn name(&self) -> String {
        self.root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string()
    }

    async fn list_files(&self) -> Result<Vec<String>, SnapshotError> {
        Ok(self.files.clone())
    }

    async fn read_file(&self, path: &str) -> Result<String, SnapshotError> {
        let full = self.root.join(path);
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => SnapshotError::NotFound {
                    subject: path.to_string(),
                },
                _ => SnapshotError::Io {
                    path: path.to_string(),
                    source: e,
                },
            })
    }

    async fn default_branch(&self) -> Result<Option<String>, SnapshotError> {
        // Only a hosting provider can answer authoritatively
        Ok(None)
    }
}

fn scan_directory(root: &Path) -> Vec<String> {
    let mut files = Vec::new();

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .ignore(true)
        .parents(true)
        .build();

    for entry in walker.flatten() {
        let path = entry.path();

        if path == root {
            continue;
        }

        if path.components().any(|c| c.as_os_str() == ".git") {
            continue;
        }

        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }

        if let Some(relative) = path.strip_prefix(root).ok().and_then(|p| p.to_str()) {
            if !relative.is_empty() {
                files.push(relative.replace('\\', "/"));
            }
        }
    }

    files.sort();
    files
}
