//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// csjar - Checkstyle jar provider
///
/// Resolves the Checkstyle version to use, keeps the matching all-in-one
/// jar in a local cache and runs it.
#[derive(Parser, Debug)]
#[command(name = "csjar")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CSJAR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Checkstyle version ("latest" or a release such as 10.12.4)
    #[arg(long = "use-version", global = true, env = "CSJAR_VERSION")]
    pub use_version: Option<String>,

    /// Jar cache directory
    #[arg(long, global = true, env = "CSJAR_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the concrete Checkstyle version that would be used
    Resolve,

    /// Make sure the jar is cached and print its path
    Fetch,

    /// Print the Checkstyle command line for a file
    Command(TargetArgs),

    /// Run Checkstyle on a file
    Run(RunArgs),

    /// Manage the jar cache
    Cache(CacheArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the `command` subcommand
#[derive(Parser, Debug)]
pub struct TargetArgs {
    /// File to check
    pub target: String,

    /// Checkstyle configuration file (overrides checkstyle.config)
    #[arg(long)]
    pub checks: Option<String>,

    /// Print the argument vector as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// File to check
    pub target: String,

    /// Checkstyle configuration file (overrides checkstyle.config)
    #[arg(long)]
    pub checks: Option<String>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for list command
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// List cached jars
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show the cache directory
    Path,

    /// Remove every jar except the one for the configured version
    Clean,

    /// Remove every cached jar
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
