//! CLI commands module

pub mod audit;
pub mod cancel;
pub mod init;
pub mod validate;

use clap::Args;
use std::path::PathBuf;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Preset to use (standard, partner, minimal)
    #[arg(short, long, value_name = "PRESET")]
    pub preset: Option<String>,

    /// Force overwrite an existing ruleset file
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the audit command
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Audit a remote repository (owner/name) instead of the working directory
    #[arg(short, long, value_name = "OWNER/NAME")]
    pub repo: Option<String>,

    /// Git ref to audit when --repo is used
    #[arg(long, value_name = "REF", default_value = "HEAD")]
    pub git_ref: String,

    /// Output format (terminal, json)
    #[arg(short, long, default_value = "terminal")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Repository to validate (owner/name)
    #[arg(short, long, value_name = "OWNER/NAME")]
    pub repo: String,

    /// Workflow file name to trigger
    #[arg(short, long, value_name = "FILE", default_value = "validate.yml")]
    pub workflow: String,

    /// Git ref to run the workflow on
    #[arg(long, value_name = "REF", default_value = "main")]
    pub git_ref: String,

    /// Trigger the run and exit without polling
    #[arg(long)]
    pub no_wait: bool,

    /// Include per-job log locations in the final status
    #[arg(long)]
    pub jobs: bool,

    /// Seconds between polls
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub interval: u64,

    /// Timeout in seconds for each individual remote call
    #[arg(long, value_name = "SECS", default_value_t = 20)]
    pub call_timeout: u64,

    /// Poll attempts before giving up
    #[arg(long, value_name = "N", default_value_t = 90)]
    pub max_attempts: u32,
}

/// Arguments for the cancel command
#[derive(Args, Debug)]
pub struct CancelArgs {
    /// Repository the run belongs to (owner/name)
    #[arg(short, long, value_name = "OWNER/NAME")]
    pub repo: String,

    /// Remote run id to cancel
    #[arg(long, value_name = "ID")]
    pub run_id: u64,
}

/// Output format for the audit command
#[derive(Debug, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}
