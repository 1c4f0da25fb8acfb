//! API key resolution.
//!
//! The key is looked up in `gemini_config.json` first and in the
//! `GEMINI_API_KEY` environment variable second. Only a short prefix of the
//! key is ever reported.

use crate::error::{Result, StudioError};
use crate::observer::{Diagnostic, Observer};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Name of the environment variable and of the config file key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// File name of the local credential file.
pub const CONFIG_FILE_NAME: &str = "gemini_config.json";

/// Number of leading characters of a key shown in diagnostics.
const PREFIX_CHARS: usize = 10;

/// Where a credential was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// The local JSON config file at the given path.
    ConfigFile(PathBuf),
    /// The process environment.
    Environment,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigFile(path) => write!(f, "config file {}", path.display()),
            Self::Environment => write!(f, "environment"),
        }
    }
}

/// A resolved API key.
#[derive(Clone)]
pub struct ApiKey {
    value: String,
    source: CredentialSource,
}

impl ApiKey {
    /// Returns the full secret, for use in request headers only.
    pub fn expose(&self) -> &str {
        &self.value
    }

    /// Returns where the key came from.
    pub fn source(&self) -> &CredentialSource {
        &self.source
    }

    /// Returns the leading characters of the key, safe to log.
    ///
    /// Never more than half the key, so short keys are not shown whole.
    pub fn prefix(&self) -> String {
        let shown = PREFIX_CHARS.min(self.value.chars().count() / 2);
        self.value.chars().take(shown).collect()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("prefix", &format_args!("{}...", self.prefix()))
            .field("source", &self.source)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct CredentialFile {
    #[serde(rename = "GEMINI_API_KEY", default)]
    gemini_api_key: Option<String>,
}

/// Resolves the Gemini API key from the config file or environment.
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    config_path: Option<PathBuf>,
}

impl Default for CredentialResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialResolver {
    /// Creates a resolver that reads `gemini_config.json` next to the
    /// running executable.
    pub fn new() -> Self {
        let config_path = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)));
        Self { config_path }
    }

    /// Reads the config file from `path` instead of the default location.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Returns the config file location this resolver checks, if any.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Resolves the key against the process environment.
    pub fn resolve(&self, observer: &dyn Observer) -> Result<ApiKey> {
        self.resolve_with(|name| std::env::var(name).ok(), observer)
    }

    /// Resolves the key, reading environment variables through `lookup`.
    pub fn resolve_with<F>(&self, lookup: F, observer: &dyn Observer) -> Result<ApiKey>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_file = match self.config_path.as_deref() {
            Some(path) if path.exists() => {
                let key = read_config_key(path)?;
                let source = CredentialSource::ConfigFile(path.to_path_buf());
                match key {
                    Some(value) => Some(ApiKey { value, source }),
                    None => {
                        observer.notify(&Diagnostic::CredentialAbsent { source });
                        None
                    }
                }
            }
            _ => None,
        };

        let key = from_file
            .or_else(|| {
                let found = lookup(API_KEY_VAR)
                    .filter(|v| !v.trim().is_empty())
                    .map(|value| ApiKey {
                        value,
                        source: CredentialSource::Environment,
                    });
                if found.is_none() {
                    observer.notify(&Diagnostic::CredentialAbsent {
                        source: CredentialSource::Environment,
                    });
                }
                found
            })
            .ok_or(StudioError::MissingCredential)?;

        observer.notify(&Diagnostic::CredentialLoaded {
            source: key.source.clone(),
            prefix: key.prefix(),
        });
        Ok(key)
    }
}

fn read_config_key(path: &Path) -> Result<Option<String>> {
    let config_error = |message: String| StudioError::Config {
        path: path.to_path_buf(),
        message,
    };
    let raw = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
    let file: CredentialFile =
        serde_json::from_str(&raw).map_err(|e| config_error(e.to_string()))?;
    Ok(file.gemini_api_key.filter(|v| !v.trim().is_empty()))
}
