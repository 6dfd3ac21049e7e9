//! Exit codes for the CLI
//!
//! Standard exit codes used by gatecheck for CI/CD integration.
//!
//! | Code | Constant | Meaning |
//! |------|----------|---------|
//! | 0 | `SUCCESS` | Compliant audit, or validation run succeeded |
//! | 1 | `ISSUES` | Error-severity findings, or validation run failed |
//! | 2 | `WARNINGS` | Warning-severity findings only, or validation timed out |
//! | 3 | `ERROR` | Runtime error (config, filesystem, network) |
//! | 4 | `INVALID_ARGS` | Invalid arguments (unknown preset, malformed repo) |

/// Success - fully compliant or operation completed normally
pub const SUCCESS: i32 = 0;

/// Error-severity findings, or the validation run failed or was cancelled
pub const ISSUES: i32 = 1;

/// Warning-severity findings only, or the validation run timed out locally
pub const WARNINGS: i32 = 2;

/// Runtime error (file not found, network error, gh unavailable)
pub const ERROR: i32 = 3;

/// Invalid arguments (unknown preset, malformed owner/name reference)
pub const INVALID_ARGS: i32 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [SUCCESS, ISSUES, WARNINGS, ERROR, INVALID_ARGS];
        for i in 0..codes.len() {
            for j in (i + 1)..codes.len() {
                assert_ne!(codes[i], codes[j]);
            }
        }
    }

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(SUCCESS, 0);
        assert_eq!(ISSUES, 1);
        assert_eq!(WARNINGS, 2);
        assert_eq!(ERROR, 3);
        assert_eq!(INVALID_ARGS, 4);
    }
}
