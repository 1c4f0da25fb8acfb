//! Image-to-image room transformation.

use crate::error::{Result, StudioError};
use crate::gemini::{GenerateContentRequest, GenerativeBackend, ImageModel};
use crate::observer::{Diagnostic, Observer};
use crate::source::{ImageRole, SourceImage};
use std::path::{Path, PathBuf};

/// One transformation: prompt + source image in, generated image out.
#[derive(Debug, Clone)]
pub struct TransformJob {
    prompt: String,
    input: PathBuf,
    output: PathBuf,
    model: ImageModel,
}

/// What a successful transformation wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutcome {
    /// Destination path.
    pub output: PathBuf,
    /// Number of bytes written.
    pub bytes: usize,
    /// MIME type the service reported for the image.
    pub mime_type: String,
}

impl TransformJob {
    /// Creates a job using the default image model.
    pub fn new(
        prompt: impl Into<String>,
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            input: input.into(),
            output: output.into(),
            model: ImageModel::default(),
        }
    }

    /// Sets the image model.
    pub fn with_model(mut self, model: ImageModel) -> Self {
        self.model = model;
        self
    }

    /// Destination path.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Runs the job: one request, one file write.
    ///
    /// Nothing is written unless the response carries image data. Quota
    /// errors emit [`Diagnostic::QuotaExhausted`] before being returned.
    pub async fn run(
        &self,
        backend: &dyn GenerativeBackend,
        observer: &dyn Observer,
    ) -> Result<TransformOutcome> {
        if self.prompt.trim().is_empty() {
            return Err(StudioError::InvalidRequest("prompt must not be empty".into()));
        }

        observer.notify(&Diagnostic::ModelSelected {
            model: self.model.as_str().to_string(),
        });
        observer.notify(&Diagnostic::prompt(&self.prompt));

        let source = SourceImage::load(&self.input)?;
        let (width, height) = source.dimensions();
        observer.notify(&Diagnostic::SourceLoaded {
            role: ImageRole::Source,
            path: self.input.clone(),
            width,
            height,
        });

        let request = GenerateContentRequest::new(self.prompt.as_str())
            .with_image(&source)
            .with_image_response();

        observer.notify(&Diagnostic::Requesting {
            task: "transformed image",
        });
        let response = backend
            .generate_content(self.model.as_str(), &request)
            .await
            .map_err(|e| {
                if e.is_quota_exhausted() {
                    observer.notify(&Diagnostic::QuotaExhausted);
                }
                e
            })?;

        let blob = response
            .first_inline_data()
            .ok_or_else(|| StudioError::NoImageReturned {
                reason: response.empty_reason(),
            })?;
        let data = blob.decode()?;
        if data.is_empty() {
            return Err(StudioError::NoImageReturned {
                reason: response.empty_reason(),
            });
        }

        std::fs::write(&self.output, &data)?;
        observer.notify(&Diagnostic::ImageSaved {
            path: self.output.clone(),
            bytes: data.len(),
        });

        Ok(TransformOutcome {
            output: self.output.clone(),
            bytes: data.len(),
            mime_type: blob.mime_type.clone(),
        })
    }
}
