//! Builds a shopping list from before/after room photos.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use roomgen::{ShoppingListJob, TextModel, TracingObserver};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "shopping-list")]
#[command(about = "Generate a shopping list from before/after images")]
#[command(version)]
struct Cli {
    /// Before image path
    #[arg(long)]
    before: PathBuf,

    /// After image path
    #[arg(long)]
    after: PathBuf,

    /// Output JSON path
    #[arg(long)]
    output: PathBuf,

    /// Text model to use
    #[arg(long, value_enum, default_value = "flash-2.0-exp")]
    model: TextModelArg,

    /// Credential file (defaults to gemini_config.json next to the executable)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TextModelArg {
    #[value(name = "flash-2.0-exp")]
    Flash20Exp,
    #[value(name = "flash-2.5")]
    Flash25,
}

impl From<TextModelArg> for TextModel {
    fn from(arg: TextModelArg) -> Self {
        match arg {
            TextModelArg::Flash20Exp => TextModel::Flash20Exp,
            TextModelArg::Flash25 => TextModel::Flash25,
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

    ShoppingListJob::new(&cli.before, &cli.after, &cli.output)
        .with_model(cli.model.into())
        .run(&client, &TracingObserver)
        .await
        .with_context(|| {
            format!(
                "comparing {} with {}",
                cli.before.display(),
                cli.after.display()
            )
        })?;
    Ok(())
}
