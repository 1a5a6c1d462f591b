//! gdslim CLI - build-profile generation for godot-cpp GDExtension plugins
//!
//! Decides which subset of the engine class catalogue a plugin needs,
//! generates the matching `feature_profile` JSON, and flips the profile
//! flags in the plugin's SConstruct.
//!
//! # Usage
//!
//! ```bash
//! # Show the active profile
//! gdslim status
//!
//! # Inspect the feature-domain buckets
//! gdslim classify
//!
//! # Preview which classes the plugin uses
//! gdslim detect --closure
//!
//! # Switch profiles
//! gdslim set 2d --disable-xr
//! gdslim set custom
//! gdslim set none
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;
mod progress;

/// gdslim - engine class-catalogue trimming for GDExtension builds
#[derive(Parser, Debug)]
#[command(name = "gdslim")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Args, Debug, Clone)]
struct GlobalOptions {
    /// Plugin root directory (defaults to the current directory)
    #[arg(long, short = 'r', global = true, env = "GDSLIM_ROOT")]
    root: Option<PathBuf>,

    /// Path to a configuration file (bypasses the global/local merge)
    #[arg(long, short = 'c', global = true, env = "GDSLIM_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the class catalogue (extension_api.json)
    #[arg(long, global = true, env = "GDSLIM_API_JSON")]
    api_json: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

impl GlobalOptions {
    /// Convert global options to config overrides
    fn to_config_overrides(&self) -> gdslim_config::ConfigOverrides {
        gdslim_config::ConfigOverrides {
            api_json: self.api_json.clone(),
            ..Default::default()
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the active build profile and its class counts
    Status(commands::status::StatusArgs),

    /// Classify catalogue classes into feature domains
    Classify(commands::classify::ClassifyArgs),

    /// Detect engine-class usage in the plugin source tree
    Detect(commands::detect::DetectArgs),

    /// Select and generate a build profile
    Set(commands::set::SetArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = if cli.global.quiet {
        Level::ERROR
    } else if cli.global.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Status(args) => commands::status::execute(args, cli.global),
        Commands::Classify(args) => commands::classify::execute(args, cli.global),
        Commands::Detect(args) => commands::detect::execute(args, cli.global),
        Commands::Set(args) => commands::set::execute(args, cli.global),
    }
}
