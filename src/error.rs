//! Error types for gatecheck
//!
//! Errors are structured kinds with human-readable messages so callers can
//! branch on the condition (re-auth, retry, give up) instead of parsing
//! strings. Evidence-level absence (a missing file, a missing resource) is
//! never an error — the rule engine reports those as findings.

use thiserror::Error;

/// Main error type for gatecheck
#[derive(Error, Debug)]
pub enum GatecheckError {
    /// Misconfigured ruleset or inputs; surfaced verbatim, never retried
    #[error("Ruleset error: {0}")]
    Ruleset(#[from] RulesetError),

    /// Repository snapshot provider failures
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// CI provider failures
    #[error("CI provider error: {0}")]
    Ci(#[from] CiError),

    /// Malformed caller input (bad repo ref, unknown run id)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Errors from loading or validating a ruleset
#[derive(Error, Debug)]
pub enum RulesetError {
    /// Failed to read the ruleset file
    #[error("Failed to read ruleset '{path}': {source}")]
    FileRead {
        /// Path to the ruleset file
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Failed to parse the ruleset file
    #[error("Failed to parse ruleset: {0}")]
    Parse(#[from] toml::de::Error),

    /// A workflow pattern is not a valid regex
    #[error("Invalid workflow pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// The regex compile error
        source: regex::Error,
    },

    /// Unknown preset name
    #[error("Unknown preset '{name}' (expected standard, partner, or minimal)")]
    UnknownPreset {
        /// The requested preset name
        name: String,
    },
}

/// Errors from a repository snapshot provider
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The repository or file does not exist
    #[error("Not found: {subject}")]
    NotFound {
        /// Repository ref or file path that was not found
        subject: String,
    },

    /// Credential invalid or missing for the snapshot source
    #[error("Unauthorized access to {subject}")]
    Unauthorized {
        /// Repository ref being accessed
        subject: String,
    },

    /// Network or rate-limit failure; safe to retry
    #[error("Transient snapshot failure: {message}")]
    Transient {
        /// What failed
        message: String,
    },

    /// Local filesystem read failure
    #[error("Failed to read '{path}': {source}")]
    Io {
        /// Path that failed to read
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },
}

/// Errors from the CI provider
///
/// `Unauthorized` is kept distinct from other failures because it is usually
/// unrecoverable without operator intervention; the orchestrator terminates a
/// run immediately on it instead of retrying.
#[derive(Error, Debug)]
pub enum CiError {
    /// Remote run, workflow, or repository absent
    #[error("Not found: {subject}")]
    NotFound {
        /// What was not found
        subject: String,
    },

    /// Credential invalid or expired; terminal, never retried
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Provider-supplied detail
        message: String,
    },

    /// Caller lacks permission for the operation (e.g. cancel)
    #[error("Permission denied: {message}")]
    PermissionDenied {
        /// Provider-supplied detail
        message: String,
    },

    /// The run already finished and can no longer be cancelled
    #[error("Run is no longer cancellable: {subject}")]
    NotCancellable {
        /// The run in question
        subject: String,
    },

    /// Network, rate-limit, or timeout failure; the poll loop continues
    #[error("Transient CI failure: {message}")]
    Transient {
        /// What failed
        message: String,
    },

    /// The provider subprocess could not be spawned or exited abnormally
    #[error("Command failed: {command}")]
    CommandFailed {
        /// The command that failed
        command: String,
    },

    /// The provider returned a payload we could not decode
    #[error("Malformed provider response: {message}")]
    Malformed {
        /// Decode failure detail
        message: String,
    },
}

impl CiError {
    /// Whether the poll loop may continue after this error
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CiError::Transient { .. } | CiError::CommandFailed { .. } | CiError::Malformed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_is_not_retryable() {
        let err = CiError::Unauthorized {
            message: "bad token".to_string(),
        };
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_transient_is_retryable() {
        let err = CiError::Transient {
            message: "rate limited".to_string(),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn test_error_messages_are_structured() {
        let err = GatecheckError::Ci(CiError::NotFound {
            subject: "run 42".to_string(),
        });
        assert_eq!(err.to_string(), "CI provider error: Not found: run 42");
    }
}
