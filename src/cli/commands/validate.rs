//! Validate command - trigger the validation workflow and follow it

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;

use super::ValidateArgs;
use crate::ci::GitHubCi;
use crate::cli::exit_codes;
use crate::orchestrator::{Orchestrator, PollPolicy, RunState, RunStatus};
use crate::repo::RepoId;
use crate::utils::gh;

pub async fn execute(args: ValidateArgs) -> Result<i32> {
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

    let policy = PollPolicy {
        interval: Duration::from_secs(args.interval),
        call_timeout: Duration::from_secs(args.call_timeout),
        max_attempts: args.max_attempts,
        ..PollPolicy::default()
    };

    let orchestrator = Orchestrator::new(
        Arc::new(GitHubCi::new()),
        repo.clone(),
        args.workflow.clone(),
        args.git_ref.clone(),
    )
    .with_policy(policy);

    eprintln!(
        "{} {} on {} (ref {})",
        "Triggering".dimmed(),
        args.workflow.cyan(),
        repo.to_string().white().bold(),
        args.git_ref.yellow()
    );
    let local_run_id = orchestrator.start().await?;
    println!("Run id: {}", local_run_id.cyan());

    if args.no_wait {
        eprintln!("{}", "Not waiting for completion (--no-wait).".dimmed());
        return Ok(exit_codes::SUCCESS);
    }

    eprintln!(
        "{}",
        format!(
            "Polling every {}s, up to {} attempts...",
            args.interval, args.max_attempts
        )
        .dimmed()
    );
    let status = orchestrator.run_to_completion(&local_run_id, args.jobs).await?;
    print_final(&status);

    let exit_code = match status.state {
        RunState::CompletedSuccess => exit_codes::SUCCESS,
        RunState::Timeout => exit_codes::WARNINGS,
        RunState::Error => exit_codes::ERROR,
        _ => exit_codes::ISSUES,
    };

    Ok(exit_code)
}

fn print_final(status: &RunStatus) {
    let state_label = match status.state {
        RunState::CompletedSuccess => "succeeded".green().bold(),
        RunState::CompletedFailure => "failed".red().bold(),
        RunState::Cancelled => "cancelled".yellow().bold(),
        RunState::Timeout => "timed out (local polling budget)".yellow().bold(),
        _ => format!("{:?}", status.state).normal(),
    };

    println!("\nValidation run {}", state_label);
    if let Some(remote_run_id) = status.remote_run_id {
        println!("  Remote run: {}", remote_run_id);
    }
    if let Some(url) = &status.html_url {
        println!("  URL: {}", url.cyan());
    }
    println!("  Polls: {}", status.attempts);

    if let Some(jobs) = &status.jobs {
        println!("  Jobs:");
        for job in jobs {
            let conclusion = job
                .conclusion
                .map(|c| format!("{:?}", c).to_lowercase())
                .unwrap_or_else(|| "pending".to_string());
            println!("    {} [{}] {}", "•".dimmed(), conclusion, job.name);
            println!("      {} {}", "└─".dimmed(), job.log_url.dimmed());
        }
    }
}
