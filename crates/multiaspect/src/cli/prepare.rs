//! The `multiaspect prepare` command: write a condition image.

use anyhow::Context;
use clap::Args;
use image::ImageFormat;
use multiaspect_core::{Config, Multiaspect};
use std::path::PathBuf;

use super::expand_path;

/// Arguments for the `prepare` command.
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Source image
    #[arg(required = true)]
    pub input: PathBuf,

    /// Destination; the extension selects the encoding
    #[arg(short, long)]
    pub output: PathBuf,

    /// Target resolution (defaults to `condition.resolution` from config)
    #[arg(short, long)]
    pub resolution: Option<u32>,
}

/// Execute the prepare command.
pub async fn execute(args: PrepareArgs, mut config: Config) -> anyhow::Result<()> {
    let input = expand_path(&args.input);
    let output = expand_path(&args.output);

    let format = ImageFormat::from_path(&output)
        .with_context(|| format!("Unsupported output extension: {}", output.display()))?;
    if let Some(resolution) = args.resolution {
        config.condition.resolution = resolution;
    }
    config.validate()?;

    let bytes = std::fs::read(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let multiaspect = Multiaspect::new(config);
    let encoded =
        tokio::task::spawn_blocking(move || multiaspect.preparer().prepare_bytes(&bytes, format))
            .await?
            .with_context(|| format!("Failed to prepare {}", input.display()))?;

    std::fs::write(&output, encoded)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    tracing::info!("Condition image written to {:?}", output);
    Ok(())
}
