//! GitHub CLI subprocess plumbing
//!
//! All GitHub traffic goes through the `gh` CLI so authentication is the
//! operator's existing `gh auth` session. Calls are async so callers can wrap
//! them in their own timeouts.

use lazy_static::lazy_static;
use regex::Regex;
use tokio::process::Command;

lazy_static! {
    // gh prints e.g. "gh: Not Found (HTTP 404)" on API failures
    static ref HTTP_STATUS: Regex = Regex::new(r"\(HTTP (\d{3})\)").unwrap();
}

/// A failed `gh` invocation
#[derive(Debug)]
pub enum GhFailure {
    /// The binary could not be spawned
    Spawn {
        /// The command that failed to start
        command: String,
    },
    /// gh reported an HTTP error from the API
    Http {
        /// HTTP status code parsed from stderr
        status: u16,
        /// gh's stderr output
        stderr: String,
    },
    /// gh exited non-zero without a recognizable HTTP status
    NonZero {
        /// The command that failed
        command: String,
        /// gh's stderr output
        stderr: String,
    },
}

/// Check whether the gh CLI is available and authenticated
pub async fn is_authenticated() -> bool {
    Command::new("gh")
        .args(["auth", "status"])
        .output()
        .await
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Run `gh` with the given arguments and return raw stdout
pub async fn run(args: &[&str]) -> Result<Vec<u8>, GhFailure> {
    let command = format!("gh {}", args.join(" "));

    let output = Command::new("gh")
        .args(args)
        .output()
        .await
        .map_err(|_| GhFailure::Spawn {
            command: command.clone(),
        })?;

    if output.status.success() {
        return Ok(output.stdout);
    }

    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    if let Some(status) = HTTP_STATUS
        .captures(&stderr)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u16>().ok())
    {
        return Err(GhFailure::Http { status, stderr });
    }

    Err(GhFailure::NonZero { command, stderr })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_regex() {
        let stderr = "gh: Not Found (HTTP 404)";
        let caps = HTTP_STATUS.captures(stderr).unwrap();
        assert_eq!(&caps[1], "404");
    }

    #[test]
    fn test_http_status_regex_no_match() {
        assert!(HTTP_STATUS.captures("command not found: gh").is_none());
    }
}
