//! gatecheck - Audit azd template repositories and validate deployability
//!
//! This is the main entry point for the CLI application.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gatecheck::cli::{self, exit_codes, Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let directory = cli.directory.unwrap_or_else(|| PathBuf::from("."));
    let config_path = cli.config;

    let result = match cli.command {
        Commands::Init(args) => cli::commands::init::execute(args, &directory).await,
        Commands::Audit(args) => {
            cli::commands::audit::execute(args, &directory, config_path.as_deref()).await
        }
        Commands::Validate(args) => cli::commands::validate::execute(args).await,
        Commands::Cancel(args) => cli::commands::cancel::execute(args).await,
    };

    match result {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(exit_codes::ERROR);
        }
    }
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}
