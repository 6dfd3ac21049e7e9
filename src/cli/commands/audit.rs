//! Audit command - evaluate a repository against the ruleset
//!
//! Evaluates the working directory by default, or a remote repository when
//! `--repo owner/name` is given. The exit code encodes the outcome so CI can
//! gate on it directly.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;

use super::{AuditArgs, OutputFormat};
use crate::cli::exit_codes;
use crate::cli::output::{JsonOutput, ReportRenderer, TerminalOutput};
use crate::config::{loader, RulesetConfig};
use crate::repo::RepoId;
use crate::rules::engine::RuleEngine;
use crate::snapshot::{FsSnapshot, GitHubSnapshot, RepoSnapshot};
use crate::utils::gh;

pub async fn execute(
    args: AuditArgs,
    directory: &Path,
    config_path: Option<&Path>,
) -> Result<i32> {
    let config = load_config(directory, config_path)?;

    let snapshot: Box<dyn RepoSnapshot> = match &args.repo {
        Some(reference) => {
            let repo = match RepoId::parse(reference) {
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
            Box::new(GitHubSnapshot::new(repo, args.git_ref.clone()))
        }
        None => Box::new(FsSnapshot::new(directory.to_path_buf())),
    };

    eprintln!("{}", "Evaluating repository...".dimmed());
    let engine = RuleEngine::new(config);
    let report = engine.evaluate(snapshot.as_ref()).await?;

    let renderer: Box<dyn ReportRenderer> = match args.format {
        OutputFormat::Terminal => Box::new(TerminalOutput::new()),
        OutputFormat::Json => Box::new(JsonOutput::new()),
    };
    let rendered = renderer.render(&report)?;

    if let Some(output_path) = args.output {
        std::fs::write(&output_path, &rendered)
            .with_context(|| format!("failed to write {}", output_path.display()))?;
        eprintln!("Report written to: {}", output_path.display());
    } else {
        println!("{rendered}");
    }

    let exit_code = if report.has_errors() {
        exit_codes::ISSUES
    } else if report.has_warnings() {
        exit_codes::WARNINGS
    } else {
        exit_codes::SUCCESS
    };

    Ok(exit_code)
}

fn load_config(directory: &Path, config_path: Option<&Path>) -> Result<RulesetConfig> {
    match config_path {
        Some(path) => loader::load_ruleset(path)
            .with_context(|| format!("failed to load ruleset {}", path.display())),
        None => {
            let default_path: PathBuf = directory.join(loader::RULESET_FILENAME);
            if default_path.exists() {
                loader::load_ruleset(&default_path)
                    .with_context(|| format!("failed to load ruleset {}", default_path.display()))
            } else {
                Ok(RulesetConfig::default())
            }
        }
    }
}
