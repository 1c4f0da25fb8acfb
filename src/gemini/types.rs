//! `generateContent` request and response envelopes.

use crate::error::{Result, StudioError};
use crate::source::SourceImage;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Body of a `models/{model}:generateContent` call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize)]
struct Content {
    parts: Vec<RequestPart>,
}

/// A part in a request - either text or inline image data.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum RequestPart {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: RequestBlob,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestBlob {
    mime_type: String,
    data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<String>,
}

impl GenerateContentRequest {
    /// Starts a single-turn request with a text prompt as its first part.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![RequestPart::Text {
                    text: prompt.into(),
                }],
            }],
            generation_config: None,
        }
    }

    /// Appends an image as base64 inline data.
    pub fn with_image(mut self, image: &SourceImage) -> Self {
        let part = RequestPart::InlineData {
            inline_data: RequestBlob {
                mime_type: image.format().mime_type().to_string(),
                data: base64::engine::general_purpose::STANDARD.encode(image.data()),
            },
        };
        if let Some(content) = self.contents.first_mut() {
            content.parts.push(part);
        }
        self
    }

    /// Asks for an image-only response.
    pub fn with_image_response(mut self) -> Self {
        self.generation_config = Some(GenerationConfig {
            response_modalities: vec!["IMAGE".to_string()],
        });
        self
    }

    /// Number of parts in the request.
    pub fn part_count(&self) -> usize {
        self.contents.iter().map(|c| c.parts.len()).sum()
    }
}

/// Response of a `generateContent` call.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates, possibly empty.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Prompt-level feedback, set when the prompt was blocked.
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// One generated candidate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content, absent when generation was stopped.
    #[serde(default)]
    pub content: Option<CandidateContent>,
    /// Why generation stopped (`STOP`, `SAFETY`, ...).
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Content of a candidate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    /// Ordered parts.
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One part of a candidate's content.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Text payload.
    #[serde(default)]
    pub text: Option<String>,
    /// Binary payload.
    #[serde(default)]
    pub inline_data: Option<Blob>,
    /// Set on reasoning parts that are not part of the answer.
    #[serde(default)]
    pub thought: Option<bool>,
}

/// Inline binary data, base64-encoded on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    /// MIME type reported by the service.
    #[serde(default)]
    pub mime_type: String,
    /// Base64 payload.
    #[serde(default)]
    pub data: String,
}

impl Blob {
    /// Decodes the base64 payload.
    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(self.data.trim())
            .map_err(|e| StudioError::Decode(e.to_string()))
    }
}

/// Prompt-level feedback.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Why the prompt was blocked.
    #[serde(default)]
    pub block_reason: Option<String>,
    /// Human-readable explanation of the block.
    #[serde(default)]
    pub block_reason_message: Option<String>,
}

impl Part {
    fn payload(&self) -> Option<&Blob> {
        self.inline_data.as_ref().filter(|b| !b.data.trim().is_empty())
    }

    fn answer_text(&self) -> Option<&str> {
        if self.thought == Some(true) {
            return None;
        }
        self.text.as_deref()
    }
}

impl GenerateContentResponse {
    /// Every part of every candidate, in order.
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
    }

    /// The first part across all candidates carrying non-empty inline data.
    pub fn first_inline_data(&self) -> Option<&Blob> {
        self.parts().find_map(Part::payload)
    }

    /// Concatenated answer text of the first candidate, if non-empty.
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(Part::answer_text)
            .collect();
        (!text.is_empty()).then_some(text)
    }

    /// Explains an empty response: the prompt block reason, else the first
    /// finish reason that is not `STOP`.
    pub fn empty_reason(&self) -> Option<String> {
        if let Some(feedback) = &self.prompt_feedback {
            if let Some(reason) = &feedback.block_reason {
                return Some(
                    feedback
                        .block_reason_message
                        .clone()
                        .unwrap_or_else(|| format!("prompt blocked: {reason}")),
                );
            }
        }
        self.candidates
            .iter()
            .filter_map(|c| c.finish_reason.as_deref())
            .find(|r| *r != "STOP")
            .map(|r| format!("finish reason: {r}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization_uses_camel_case() {
        let req = GenerateContentRequest::new("A cosy loft").with_image_response();
        let json = serde_json::to_value(&req).unwrap();

        assert_eq!(json["contents"][0]["parts"][0]["text"], "A cosy loft");
        assert_eq!(
            json["generationConfig"]["responseModalities"],
            serde_json::json!(["IMAGE"])
        );
        assert!(json.get("generation_config").is_none());
    }

    #[test]
    fn test_text_only_request_omits_generation_config() {
        let req = GenerateContentRequest::new("Compare");
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("generationConfig").is_none());
        assert_eq!(req.part_count(), 1);
    }

    #[test]
    fn test_inline_data_found_in_later_candidate() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "here you go"}, {"inlineData": {"mimeType": "image/png", "data": ""}}]}},
                {"content": {"parts": [{"inlineData": {"mimeType": "image/png", "data": "AQID"}}]}}
            ]
        }"#;
        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();

        let blob = resp.first_inline_data().unwrap();
        assert_eq!(blob.mime_type, "image/png");
        assert_eq!(blob.decode().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_no_inline_data() {
        let json = r#"{"candidates": [{"content": {"parts": [{}]}}, {}]}"#;
        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert!(resp.first_inline_data().is_none());
        assert_eq!(resp.parts().count(), 1);
    }

    #[test]
    fn test_text_skips_thoughts_and_joins_parts() {
        let json = r#"{
            "candidates": [{"content": {"parts": [
                {"text": "thinking", "thought": true},
                {"text": "Sample "},
                {"text": "list"}
            ]}}]
        }"#;
        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.text().as_deref(), Some("Sample list"));
    }

    #[test]
    fn test_text_absent() {
        let resp: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.text().is_none());

        let json = r#"{"candidates": [{"content": {"parts": [{"text": ""}]}}]}"#;
        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert!(resp.text().is_none());
    }

    #[test]
    fn test_empty_reason() {
        let json = r#"{
            "candidates": [],
            "promptFeedback": {"blockReason": "SAFETY"}
        }"#;
        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            resp.empty_reason().as_deref(),
            Some("prompt blocked: SAFETY")
        );

        let json = r#"{"candidates": [{"finishReason": "STOP"}, {"finishReason": "IMAGE_SAFETY"}]}"#;
        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            resp.empty_reason().as_deref(),
            Some("finish reason: IMAGE_SAFETY")
        );

        let resp = GenerateContentResponse::default();
        assert!(resp.empty_reason().is_none());
    }

    #[test]
    fn test_bad_base64_is_decode_error() {
        let blob = Blob {
            mime_type: "image/png".into(),
            data: "!!!".into(),
        };
        assert!(matches!(blob.decode(), Err(StudioError::Decode(_))));
    }
}
