//! Init command - write a ruleset file from a preset

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

use super::InitArgs;
use crate::cli::exit_codes;
use crate::config::{loader, Preset};

pub async fn execute(args: InitArgs, directory: &Path) -> Result<i32> {
    let config_path = directory.join(loader::RULESET_FILENAME);

    if config_path.exists() && !args.force {
        eprintln!(
            "{} {} already exists. Use --force to overwrite.",
            "Error:".red().bold(),
            loader::RULESET_FILENAME
        );
        return Ok(exit_codes::ISSUES);
    }

    let preset = match args.preset.as_deref() {
        Some(name) => match Preset::from_string(name) {
            Some(preset) => preset,
            None => {
                eprintln!(
                    "{} Unknown preset '{}'. Available: standard, partner, minimal",
                    "Error:".red().bold(),
                    name
                );
                return Ok(exit_codes::INVALID_ARGS);
            }
        },
        None => Preset::Standard,
    };

    let config = preset.ruleset();
    fs::write(&config_path, loader::to_toml(&config))
        .with_context(|| format!("failed to write {}", config_path.display()))?;

    println!(
        "{} Created {} with preset '{}'",
        "Success:".green().bold(),
        loader::RULESET_FILENAME.cyan(),
        preset.name().yellow()
    );

    println!("\nNext steps:");
    println!("  1. Review and customize {}", loader::RULESET_FILENAME.cyan());
    println!("  2. Run {} to evaluate the repository", "gatecheck audit".cyan());
    println!(
        "  3. Run {} to exercise the deployment workflow",
        "gatecheck validate".cyan()
    );

    Ok(exit_codes::SUCCESS)
}
