//! Shared test doubles.

use crate::error::Result;
use crate::gemini::{GenerateContentRequest, GenerateContentResponse, GenerativeBackend};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;

/// Replays one canned outcome and records what it was asked.
pub(crate) struct MockBackend {
    reply: Mutex<Option<Result<GenerateContentResponse>>>,
    calls: Mutex<Vec<(String, serde_json::Value)>>,
}

impl MockBackend {
    pub(crate) fn replying(value: serde_json::Value) -> Self {
        Self::with(Ok(serde_json::from_value(value).unwrap()))
    }

    pub(crate) fn with(reply: Result<GenerateContentResponse>) -> Self {
        Self {
            reply: Mutex::new(Some(reply)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<(String, serde_json::Value)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeBackend for MockBackend {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), serde_json::to_value(request).unwrap()));
        self.reply
            .lock()
            .unwrap()
            .take()
            .expect("backend called more than once")
    }
}

/// Writes a small PNG into `dir` and returns its path.
pub(crate) fn room_png(dir: &tempfile::TempDir) -> PathBuf {
    named_png(dir, "before.png")
}

pub(crate) fn named_png(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    image::RgbImage::new(8, 6).save(&path).unwrap();
    path
}
