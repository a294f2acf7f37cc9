//! csjar - Checkstyle jar provider
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use csjar::cli::{Cli, Commands};
use csjar::config::ConfigManager;
use csjar::error::{CsjarError, CsjarResult};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        // Checkstyle already reported its findings
        Err(e @ CsjarError::ToolExited(_)) => ExitCode::from(e.exit_code()),
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> CsjarResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("csjar=warn"),
        1 => EnvFilter::new("csjar=info"),
        _ => EnvFilter::new("csjar=debug"),
    };

    // stdout carries jar paths and command lines, keep logs off it
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    debug!("Using config file {}", config_manager.path().display());

    let mut config = config_manager.load().await?;
    if let Some(version) = cli.use_version {
        config.checkstyle.version = version;
    }
    if let Some(dir) = cli.cache_dir {
        config.cache.dir = Some(dir);
    }

    match cli.command {
        Commands::Resolve => csjar::cli::commands::resolve(&config).await,
        Commands::Fetch => csjar::cli::commands::fetch(&config).await,
        Commands::Command(args) => csjar::cli::commands::command(args, &config).await,
        Commands::Run(args) => csjar::cli::commands::run(args, &config).await,
        Commands::Cache(args) => csjar::cli::commands::cache(args, &config).await,
        Commands::Config(args) => {
            csjar::cli::commands::config(args, &config, &config_manager).await
        }
    }
}
