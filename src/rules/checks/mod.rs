//! Check groups
//!
//! Each group implements one slice of the ruleset and returns findings; the
//! engine runs them in a fixed order. Groups read file contents through
//! [`CheckContext::read_or_warn`], which converts fetch failures into
//! warning findings so the evaluation always returns partial results.

pub mod deployment;
pub mod files;
pub mod infra;
pub mod readme;
pub mod workflows;

use crate::config::RulesetConfig;
use crate::error::GatecheckError;
use crate::rules::report::{Finding, Rule, Severity};
use crate::snapshot::RepoSnapshot;

/// One group of related checks
#[async_trait::async_trait]
pub trait CheckGroup: Send + Sync {
    /// Group name for logging
    fn name(&self) -> &'static str;

    /// Run the group's checks
    async fn run(&self, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, GatecheckError>;
}

/// Shared inputs for a check group
pub struct CheckContext<'a> {
    /// The ruleset being evaluated
    pub config: &'a RulesetConfig,
    /// The repository under evaluation
    pub snapshot: &'a dyn RepoSnapshot,
    /// The indexed file list
    pub index: &'a FileIndex,
}

impl CheckContext<'_> {
    /// Read a file, degrading failure to a warning finding
    pub async fn read_or_warn(&self, path: &str, findings: &mut Vec<Finding>) -> Option<String> {
        match self.snapshot.read_file(path).await {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::warn!(path = path, error = %e, "Failed to read file content");
                findings.push(
                    Finding::issue(
                        Rule::UnreadableFile {
                            path: path.to_string(),
                        },
                        Severity::Warning,
                        format!("Could not read {}", path),
                    )
                    .with_detail(e.to_string())
                    .with_file_path(path),
                );
                None
            }
        }
    }
}

/// Sorted index over the repository's file paths
///
/// Comparisons are case-insensitive; original casing is retained for display.
pub struct FileIndex {
    entries: Vec<FileEntry>,
}

struct FileEntry {
    original: String,
    lower: String,
}

impl FileIndex {
    /// Build an index from a path list
    pub fn new(mut paths: Vec<String>) -> Self {
        paths.sort();
        let entries = paths
            .into_iter()
            .map(|original| {
                let lower = original.to_lowercase();
                FileEntry { original, lower }
            })
            .collect();
        Self { entries }
    }

    /// Number of indexed paths
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find a path by case-insensitive exact match, returning original casing
    pub fn find_exact(&self, path: &str) -> Option<&str> {
        let needle = path.to_lowercase();
        self.entries
            .iter()
            .find(|e| e.lower == needle)
            .map(|e| e.original.as_str())
    }

    /// Original-cased paths under a folder prefix (case-insensitive)
    pub fn under_folder(&self, folder: &str) -> Vec<&str> {
        let mut prefix = folder.to_lowercase();
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        self.entries
            .iter()
            .filter(|e| e.lower.starts_with(&prefix))
            .map(|e| e.original.as_str())
            .collect()
    }

    /// First path whose lowercased form matches the regex, original casing
    pub fn find_matching(&self, re: &regex::Regex) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| re.is_match(&e.lower))
            .map(|e| e.original.as_str())
    }
}
