//! Multiaspect CLI - aspect-ratio bucketing and condition-image preparation.
//!
//! # Usage
//!
//! ```bash
//! # Bucket a directory of training images
//! multiaspect index ./dataset --output buckets.json
//!
//! # Per-image records, including skipped files
//! multiaspect index ./dataset --format jsonl
//!
//! # Prepare a condition image at 1024
//! multiaspect prepare pose.png --output pose_1024.png
//!
//! # View configuration
//! multiaspect config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Multiaspect - aspect-ratio bucketing for image training sets.
#[derive(Parser, Debug)]
#[command(name = "multiaspect")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Group images into buckets keyed by rounded aspect ratio
    Index(cli::index::IndexArgs),

    /// Resize an image into a condition image at a target resolution
    Prepare(cli::prepare::PrepareArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match multiaspect_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `multiaspect config path`."
            );
            multiaspect_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Multiaspect v{}", multiaspect_core::VERSION);

    match cli.command {
        Commands::Index(args) => cli::index::execute(args, config).await,
        Commands::Prepare(args) => cli::prepare::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, config).await,
    }
}
