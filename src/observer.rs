//! Progress and troubleshooting events emitted by the invokers.

use crate::credentials::CredentialSource;
use crate::source::ImageRole;
use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;

/// Number of prompt characters echoed in diagnostics.
const PROMPT_PREVIEW_CHARS: usize = 100;

/// A single diagnostic event.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// An API key was found.
    CredentialLoaded {
        /// Where it came from.
        source: CredentialSource,
        /// Leading characters of the key.
        prefix: String,
    },
    /// A credential location was checked and held no key.
    CredentialAbsent {
        /// The location that was checked.
        source: CredentialSource,
    },
    /// The model about to be called.
    ModelSelected {
        /// API model identifier.
        model: String,
    },
    /// The prompt about to be sent, truncated.
    Prompt {
        /// Leading characters of the prompt.
        preview: String,
    },
    /// A source image was read and decoded.
    SourceLoaded {
        /// What the image is used as.
        role: ImageRole,
        /// Path it was read from.
        path: PathBuf,
        /// Decoded width in pixels.
        width: u32,
        /// Decoded height in pixels.
        height: u32,
    },
    /// The request is in flight.
    Requesting {
        /// What is being generated.
        task: &'static str,
    },
    /// A generated image was written.
    ImageSaved {
        /// Destination path.
        path: PathBuf,
        /// Bytes written.
        bytes: usize,
    },
    /// A shopping list file was written.
    ShoppingListSaved {
        /// Destination path.
        path: PathBuf,
    },
    /// The generated shopping list text.
    ShoppingListText {
        /// Full response text.
        text: String,
    },
    /// The service reported quota exhaustion.
    QuotaExhausted,
}

impl Diagnostic {
    /// Builds a prompt preview event.
    pub fn prompt(prompt: &str) -> Self {
        let mut preview: String = prompt.chars().take(PROMPT_PREVIEW_CHARS).collect();
        if prompt.chars().count() > PROMPT_PREVIEW_CHARS {
            preview.push_str("...");
        }
        Self::Prompt { preview }
    }

    /// Returns true for events that indicate something went wrong.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::QuotaExhausted)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CredentialLoaded { source, prefix } => {
                write!(f, "loaded API key from {source}: {prefix}...")
            }
            Self::CredentialAbsent { source } => write!(f, "no API key in {source}"),
            Self::ModelSelected { model } => write!(f, "model: {model}"),
            Self::Prompt { preview } => write!(f, "prompt: {preview}"),
            Self::SourceLoaded {
                role,
                path,
                width,
                height,
            } => write!(
                f,
                "{role} image: {} ({width}x{height})",
                path.display()
            ),
            Self::Requesting { task } => write!(f, "generating {task}..."),
            Self::ImageSaved { path, bytes } => {
                write!(f, "image saved to {} ({bytes} bytes)", path.display())
            }
            Self::ShoppingListSaved { path } => {
                write!(f, "shopping list saved to {}", path.display())
            }
            Self::ShoppingListText { text } => write!(f, "\n{text}"),
            Self::QuotaExhausted => write!(
                f,
                "Gemini API quota exceeded. The free tier allows only a few requests \
                 per minute; wait about 60 seconds before trying again or move to a \
                 paid tier."
            ),
        }
    }
}

/// Receives diagnostics from credential resolution and the invokers.
pub trait Observer: Send + Sync {
    /// Called once per event, in order.
    fn notify(&self, event: &Diagnostic);
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn notify(&self, event: &Diagnostic) {
        if event.is_warning() {
            tracing::warn!("{event}");
        } else {
            tracing::info!("{event}");
        }
    }
}

/// Collects diagnostics in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Diagnostic>>,
}

impl RecordingObserver {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every event received so far.
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Returns the rendered text of every event received so far.
    pub fn messages(&self) -> Vec<String> {
        self.events().iter().map(ToString::to_string).collect()
    }
}

impl Observer for RecordingObserver {
    fn notify(&self, event: &Diagnostic) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
