//! Transforms a room photo with Gemini image generation.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use roomgen::{ImageModel, TracingObserver, TransformJob};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "room-transform")]
#[command(about = "Generate a redesigned room image from a photo and a prompt (img2img)")]
#[command(version)]
struct Cli {
    /// Image generation prompt
    #[arg(long)]
    prompt: String,

    /// Input image path (before)
    #[arg(long)]
    input: PathBuf,

    /// Output image path (after)
    #[arg(long)]
    output: PathBuf,

    /// Image model to use
    #[arg(long, value_enum, default_value = "flash-image-preview")]
    model: ImageModelArg,

    /// Credential file (defaults to gemini_config.json next to the executable)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ImageModelArg {
    FlashImagePreview,
    FlashImage,
}

impl From<ImageModelArg> for ImageModel {
    fn from(arg: ImageModelArg) -> Self {
        match arg {
            ImageModelArg::FlashImagePreview => ImageModel::FlashImagePreview,
            ImageModelArg::FlashImage => ImageModel::FlashImage,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    roomgen::cli::init();
    roomgen::cli::report(run(cli).await)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = roomgen::cli::connect(cli.config)?;

    let job = TransformJob::new(cli.prompt, &cli.input, &cli.output).with_model(cli.model.into());
    let outcome = job
        .run(&client, &TracingObserver)
        .await
        .with_context(|| format!("transforming {}", cli.input.display()))?;

    tracing::debug!(mime_type = %outcome.mime_type, bytes = outcome.bytes, "done");
    Ok(())
}
