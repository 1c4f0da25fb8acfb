//! Error types for room generation.

use std::path::PathBuf;
use std::time::Duration;

/// Errors that can occur while resolving credentials or invoking a model.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    /// No API key in the config file or the environment.
    #[error("GEMINI_API_KEY not found in config file or environment")]
    MissingCredential,

    /// The credential file exists but could not be read.
    #[error("invalid config file {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Source image path does not exist.
    #[error("input image not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Source image exists but is not a decodable image.
    #[error("cannot decode input image {}: {source}", .path.display())]
    UndecodableInput {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The service answered but no part carried image data.
    #[error("no image data received from Gemini{}", reason_suffix(.reason))]
    NoImageReturned { reason: Option<String> },

    /// The service answered but the response had no text.
    #[error("no response text received from Gemini{}", reason_suffix(.reason))]
    NoContentReturned { reason: Option<String> },

    /// API key rejected.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limit or quota exceeded.
    #[error("rate limited (429 RESOURCE_EXHAUSTED): {message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
    },

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to decode base64 data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// I/O error (e.g., saving file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn reason_suffix(reason: &Option<String>) -> String {
    match reason {
        Some(r) => format!(" ({r})"),
        None => String::new(),
    }
}

/// Coarse failure classes reported at the process boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No credential could be found.
    MissingCredential,
    /// Credential file unreadable or malformed.
    Config,
    /// Caller supplied an unusable argument.
    InvalidRequest,
    /// A source image is missing or undecodable.
    InputNotFound,
    /// Image generation produced no image.
    NoImageReturned,
    /// Text generation produced no text.
    NoContentReturned,
    /// Transport or service-level failure.
    ServiceError,
    /// Local filesystem failure.
    Io,
}

impl StudioError {
    /// Returns the failure class for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingCredential => ErrorKind::MissingCredential,
            Self::Config { .. } => ErrorKind::Config,
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::InputNotFound(_) | Self::UndecodableInput { .. } => ErrorKind::InputNotFound,
            Self::NoImageReturned { .. } => ErrorKind::NoImageReturned,
            Self::NoContentReturned { .. } => ErrorKind::NoContentReturned,
            Self::Auth(_)
            | Self::Api { .. }
            | Self::RateLimited { .. }
            | Self::Network(_)
            | Self::Decode(_)
            | Self::Json(_) => ErrorKind::ServiceError,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Returns true if the service refused the call for quota reasons.
    ///
    /// Only used to print a hint; nothing retries on it.
    pub fn is_quota_exhausted(&self) -> bool {
        if matches!(self, Self::RateLimited { .. }) {
            return true;
        }
        if self.kind() != ErrorKind::ServiceError {
            return false;
        }
        let text = self.to_string();
        text.contains("RESOURCE_EXHAUSTED") || text.contains("429")
    }

    /// Returns the delay the service suggested, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Result type alias for room generation operations.
pub type Result<T> = std::result::Result<T, StudioError>;

/// Parses a `Retry-After` header given in whole seconds.
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Maximum number of characters of a service error body kept in messages.
const MAX_ERROR_MESSAGE_CHARS: usize = 500;

/// Collapses whitespace and truncates an error body for display.
pub(crate) fn sanitize_error_message(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_ERROR_MESSAGE_CHARS {
        return collapsed;
    }
    let mut truncated: String = collapsed.chars().take(MAX_ERROR_MESSAGE_CHARS).collect();
    truncated.push_str("...");
    truncated
}
