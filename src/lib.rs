#![warn(missing_docs)]
//! roomgen - Gemini-backed room redesign tools.
//!
//! Two single-request invokers share one credential resolver:
//!
//! - [`TransformJob`] sends a prompt and a room photo to an image model and
//!   writes the returned image.
//! - [`ShoppingListJob`] sends before/after photos to a text model and writes
//!   the returned shopping list as JSON.
//!
//! # Quick Start
//!
//! ```no_run
//! use roomgen::{CredentialResolver, GeminiClient, TracingObserver, TransformJob};
//!
//! #[tokio::main]
//! async fn main() -> roomgen::Result<()> {
//!     let observer = TracingObserver;
//!     let key = CredentialResolver::new().resolve(&observer)?;
//!     let client = GeminiClient::builder(key).build();
//!     let job = TransformJob::new("Scandinavian living room", "before.jpg", "after.png");
//!     job.run(&client, &observer).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `cli` (default): the `room-transform`, `shopping-list` and
//!   `design-prompt` binaries.

pub mod brief;
pub mod credentials;
mod error;
pub mod gemini;
pub mod observer;
pub mod shopping;
pub mod source;
pub mod transform;

#[cfg(feature = "cli")]
#[doc(hidden)]
pub mod cli;

#[cfg(test)]
mod testing;

// Re-export error types at crate root
pub use error::{ErrorKind, Result, StudioError};

pub use brief::{DesignBrief, Materials};
pub use credentials::{ApiKey, CredentialResolver, CredentialSource};
pub use gemini::{GeminiClient, GeminiClientBuilder, GenerativeBackend, ImageModel, TextModel};
pub use observer::{Diagnostic, Observer, RecordingObserver, TracingObserver};
pub use shopping::{ShoppingListJob, ShoppingListRecord};
pub use source::{ImageFormat, ImageRole, SourceImage};
pub use transform::{TransformJob, TransformOutcome};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{Result, StudioError};
    pub use crate::gemini::{GeminiClient, GenerativeBackend};
    pub use crate::observer::{Observer, TracingObserver};
    pub use crate::{CredentialResolver, ShoppingListJob, TransformJob};
}
