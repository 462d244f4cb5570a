//! The `multiaspect index` command: bucket a directory of images by aspect ratio.

pub mod types;
mod workers;

pub use types::OutputFormat;

use anyhow::Context;
use clap::Args;
use multiaspect_core::{Config, FileDiscovery, OutputFormat as CoreOutputFormat, OutputWriter};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use workers::IndexOutcome;

use super::expand_path;

/// Arguments for the `index` command.
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Image file or directory to index
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (defaults to `output.format` from config)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Number of parallel workers
    #[arg(short, long)]
    pub parallel: Option<usize>,

    /// Decimal digits kept in bucket keys
    #[arg(long)]
    pub rounding: Option<u32>,

    /// Write compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

/// Execute the index command.
pub async fn execute(args: IndexArgs, mut config: Config) -> anyhow::Result<()> {
    apply_overrides(&args, &mut config)?;

    let input = expand_path(&args.input);
    if !input.exists() {
        anyhow::bail!("Input not found: {}", input.display());
    }

    let discovery = FileDiscovery::new(config.processing.clone());
    let files = discovery.discover(&input);
    if files.is_empty() {
        tracing::warn!("No supported image files found at {:?}", input);
    } else {
        tracing::info!(
            "Found {} image(s) to index ({} bytes)",
            files.len(),
            FileDiscovery::total_size(&files)
        );
    }

    let root = FileDiscovery::storage_root(&input);
    let show_progress = args.output.is_some() && files.len() > 1;
    let outcome = workers::run(files, root, &config, show_progress).await?;

    let format = resolve_format(&args, &config)?;
    let pretty = config.output.pretty && !args.compact;
    match &args.output {
        Some(path) => {
            let path = expand_path(path);
            let file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_outcome(BufWriter::new(file), format, pretty, &outcome)?;
            tracing::info!("Output written to {:?}", path);
        }
        None => write_outcome(io::stdout().lock(), format, pretty, &outcome)?,
    }

    eprintln!(
        "Indexed {} image(s) into {} bucket(s), {} skipped",
        outcome.bucketed(),
        outcome.index.len(),
        outcome.skipped()
    );
    Ok(())
}

fn apply_overrides(args: &IndexArgs, config: &mut Config) -> anyhow::Result<()> {
    if let Some(parallel) = args.parallel {
        config.processing.parallel_workers = parallel;
    }
    if let Some(rounding) = args.rounding {
        config.bucket.rounding = rounding;
    }
    config.validate()?;
    Ok(())
}

fn resolve_format(args: &IndexArgs, config: &Config) -> anyhow::Result<CoreOutputFormat> {
    match args.format {
        Some(format) => Ok(format.into()),
        None => CoreOutputFormat::parse(&config.output.format)
            .with_context(|| format!("Unknown output format: {}", config.output.format)),
    }
}

/// JSON writes the index; JSON Lines writes one record per image.
fn write_outcome<W: Write>(
    writer: W,
    format: CoreOutputFormat,
    pretty: bool,
    outcome: &IndexOutcome,
) -> anyhow::Result<()> {
    let mut writer = OutputWriter::new(writer, format, pretty);
    match format {
        CoreOutputFormat::Json => writer.write_index(&outcome.index)?,
        CoreOutputFormat::JsonLines => {
            for record in &outcome.records {
                writer.write_record(record)?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}
