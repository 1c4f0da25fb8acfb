//! Plumbing shared by the binaries.

use crate::credentials::CredentialResolver;
use crate::error::StudioError;
use crate::gemini::{GeminiClient, DEFAULT_BASE_URL};
use crate::observer::TracingObserver;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable overriding the API root.
pub const BASE_URL_VAR: &str = "GEMINI_BASE_URL";

/// Loads `.env` and installs a stderr `tracing` subscriber.
pub fn init() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false),
        )
        .init();
}

/// Resolves the API key and builds a client.
pub fn connect(config: Option<PathBuf>) -> Result<GeminiClient, StudioError> {
    let mut resolver = CredentialResolver::new();
    if let Some(path) = config {
        resolver = resolver.with_config_path(path);
    }
    let key = resolver.resolve(&TracingObserver)?;
    let base_url = std::env::var(BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    Ok(GeminiClient::builder(key).base_url(base_url).build())
}

/// Logs a failure and maps it to the process exit status.
pub fn report(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
