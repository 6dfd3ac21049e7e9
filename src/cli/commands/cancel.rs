//! Cancel command - request cancellation of a remote run

use anyhow::Result;
use colored::Colorize;

use super::CancelArgs;
use crate::ci::{CiProvider, GitHubCi};
use crate::cli::exit_codes;
use crate::error::CiError;
use crate::repo::RepoId;
use crate::utils::gh;

pub async fn execute(args: CancelArgs) -> Result<i32> {
    let repo = match RepoId::parse(&args.repo) {
        Ok(repo) => repo,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return Ok(exit_codes::INVALID_ARGS);
        }
    };

    if !gh::is_authenticated().await {
        eprintln!(
            "{} gh CLI is not authenticated. Run 'gh auth login' first.",
            "Error:".red().bold()
        );
        return Ok(exit_codes::ERROR);
    }

    let provider = GitHubCi::new();
    match provider.cancel_run(&repo, args.run_id).await {
        Ok(()) => {
            println!(
                "{} Cancellation of run {} accepted. The run may still take a moment to stop.",
                "Success:".green().bold(),
                args.run_id
            );
            Ok(exit_codes::SUCCESS)
        }
        Err(CiError::NotCancellable { .. }) => {
            eprintln!(
                "{} Run {} has already finished and cannot be cancelled.",
                "Error:".red().bold(),
                args.run_id
            );
            Ok(exit_codes::ISSUES)
        }
        Err(CiError::NotFound { .. }) => {
            eprintln!(
                "{} Run {} was not found in {}.",
                "Error:".red().bold(),
                args.run_id,
                repo
            );
            Ok(exit_codes::ISSUES)
        }
        Err(CiError::PermissionDenied { .. }) => {
            eprintln!(
                "{} Not permitted to cancel runs in {}.",
                "Error:".red().bold(),
                repo
            );
            Ok(exit_codes::ISSUES)
        }
        Err(e) => Err(e.into()),
    }
}
