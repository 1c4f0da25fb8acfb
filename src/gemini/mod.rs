//! Gemini `generateContent` client.

mod types;

pub use types::{
    Blob, Candidate, CandidateContent, GenerateContentRequest, GenerateContentResponse, Part,
    PromptFeedback,
};

use crate::credentials::ApiKey;
use crate::error::{parse_retry_after, sanitize_error_message, Result, StudioError};
use async_trait::async_trait;
use serde::Deserialize;

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Image-output model variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageModel {
    /// Gemini 2.5 Flash Image, preview release.
    #[default]
    FlashImagePreview,
    /// Gemini 2.5 Flash Image, stable release.
    FlashImage,
}

impl ImageModel {
    /// Returns the API model identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FlashImagePreview => "gemini-2.5-flash-image-preview",
            Self::FlashImage => "gemini-2.5-flash-image",
        }
    }
}

/// Text-output model variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextModel {
    /// Gemini 2.0 Flash, experimental release.
    #[default]
    Flash20Exp,
    /// Gemini 2.5 Flash.
    Flash25,
}

impl TextModel {
    /// Returns the API model identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flash20Exp => "gemini-2.0-flash-exp",
            Self::Flash25 => "gemini-2.5-flash",
        }
    }
}

/// Something that can answer a `generateContent` call.
///
/// [`GeminiClient`] is the network implementation; tests substitute canned
/// responses.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Sends one request to `model` and returns the parsed response.
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse>;
}

/// Builder for GeminiClient.
#[derive(Debug, Clone)]
pub struct GeminiClientBuilder {
    api_key: ApiKey,
    base_url: String,
}

impl GeminiClientBuilder {
    /// Overrides the API root, e.g. to point at a local stub server.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builds the client.
    pub fn build(self) -> GeminiClient {
        GeminiClient {
            client: reqwest::Client::new(),
            api_key: self.api_key,
            base_url: self.base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// HTTP client for the Gemini API.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: ApiKey,
    base_url: String,
}

impl GeminiClient {
    /// Creates a `GeminiClientBuilder` authenticating with `api_key`.
    pub fn builder(api_key: ApiKey) -> GeminiClientBuilder {
        GeminiClientBuilder {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", self.api_key.expose())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let text = response.text().await.unwrap_or_default();
            return Err(parse_error(status.as_u16(), &text, &headers));
        }

        Ok(response.json().await?)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Turns a non-2xx response into a typed error.
///
/// The Gemini error body looks like
/// `{"error": {"code": 429, "status": "RESOURCE_EXHAUSTED", "message": ".."}}`.
fn parse_error(status: u16, text: &str, headers: &reqwest::header::HeaderMap) -> StudioError {
    let message = match serde_json::from_str::<ErrorEnvelope>(text) {
        Ok(ErrorEnvelope { error }) => match (error.status, error.message) {
            (Some(s), Some(m)) => format!("{s}: {m}"),
            (Some(s), None) => s,
            (None, Some(m)) => m,
            (None, None) => text.to_string(),
        },
        Err(_) => text.to_string(),
    };
    let message = sanitize_error_message(&message);

    match status {
        429 => StudioError::RateLimited {
            message,
            retry_after: parse_retry_after(headers).map(std::time::Duration::from_secs),
        },
        401 | 403 => StudioError::Auth(message),
        _ => StudioError::Api { status, message },
    }
}
