//! # CLI Module
//!
//! This module defines the command-line interface for gatecheck using `clap`.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `init` | Initialize a new ruleset file |
//! | `audit` | Evaluate a repository against the ruleset |
//! | `validate` | Trigger and follow a remote validation run |
//! | `cancel` | Request cancellation of a remote run |
//!
//! ## Global Options
//!
//! - `-v, --verbose` - Increase verbosity level (use multiple times: -v, -vv, -vvv)
//! - `-c, --config <FILE>` - Path to the ruleset file
//! - `-C, --directory <DIR>` - Working directory (defaults to current directory)
//!
//! ## Submodules
//!
//! - [`commands`] - Command implementations
//! - [`exit_codes`] - Standardized exit codes
//! - [`output`] - Report output formatters (JSON, Terminal)

pub mod commands;
pub mod exit_codes;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{AuditArgs, CancelArgs, InitArgs, ValidateArgs};

/// gatecheck - Audit azd template repositories and validate deployability
#[derive(Parser, Debug)]
#[command(name = "gatecheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the ruleset file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Working directory (defaults to current directory)
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new ruleset file
    Init(InitArgs),

    /// Evaluate a repository against the ruleset
    Audit(AuditArgs),

    /// Trigger the validation workflow and follow it to completion
    Validate(ValidateArgs),

    /// Request cancellation of a remote workflow run
    Cancel(CancelArgs),
}
