//! Before/after comparison that produces a shopping list.

use crate::error::{Result, StudioError};
use crate::gemini::{GenerateContentRequest, GenerativeBackend, TextModel};
use crate::observer::{Diagnostic, Observer};
use crate::source::{ImageRole, SourceImage};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Instruction sent ahead of the before and after images.
pub const SHOPPING_LIST_PROMPT: &str = "\
Compare these two room images (before and after) and create a detailed shopping list for the transformation.

ANALYZE:
- What furniture pieces were added or changed?
- What decor items are new?
- What lighting fixtures are different?
- What colors/materials are used for walls, floors, curtains?
- What accessories and styling elements were added?

GENERATE A STRUCTURED SHOPPING LIST with:
1. **Furniture** (sofas, chairs, tables, storage)
   - Item name
   - Estimated price range
   - Priority (Must-have / Nice-to-have)
   - Alternative budget options

2. **Lighting** (ceiling lights, lamps, fixtures)
   - Item name
   - Estimated price range
   - Priority

3. **Decor & Accessories** (artwork, plants, cushions, rugs)
   - Item name
   - Estimated price range
   - Priority

4. **Materials & Finishes** (paint colors, flooring, curtains)
   - Item name
   - Color/material specifications
   - Estimated price range

5. **Total Estimated Budget**
   - Low budget option
   - Medium budget option
   - High budget option

6. **Shopping Recommendations**
   - Where to shop for each category
   - Tips for finding similar items
   - DIY alternatives

Format the response as a practical, actionable shopping guide. Be specific about colors, styles, and materials. Include realistic price estimates in USD.";

/// The JSON document written by a shopping-list run.
///
/// Field order is the key order in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingListRecord {
    /// Generated shopping list text.
    pub shopping_list: String,
    /// Before image path as given.
    pub before_image: String,
    /// After image path as given.
    pub after_image: String,
    /// After image modification time, seconds since the Unix epoch.
    pub generated_at: String,
}

impl ShoppingListRecord {
    /// Writes the record as pretty-printed UTF-8 JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// One comparison: before + after images in, JSON shopping list out.
#[derive(Debug, Clone)]
pub struct ShoppingListJob {
    before: PathBuf,
    after: PathBuf,
    output: PathBuf,
    model: TextModel,
}

impl ShoppingListJob {
    /// Creates a job using the default text model.
    pub fn new(
        before: impl Into<PathBuf>,
        after: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
            output: output.into(),
            model: TextModel::default(),
        }
    }

    /// Sets the text model.
    pub fn with_model(mut self, model: TextModel) -> Self {
        self.model = model;
        self
    }

    /// Destination path.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Runs the job: one request, one JSON file.
    pub async fn run(
        &self,
        backend: &dyn GenerativeBackend,
        observer: &dyn Observer,
    ) -> Result<ShoppingListRecord> {
        observer.notify(&Diagnostic::ModelSelected {
            model: self.model.as_str().to_string(),
        });

        let before = load(&self.before, ImageRole::Before, observer)?;
        let after = load(&self.after, ImageRole::After, observer)?;

        let request = GenerateContentRequest::new(SHOPPING_LIST_PROMPT)
            .with_image(&before)
            .with_image(&after);

        observer.notify(&Diagnostic::Requesting {
            task: "shopping list",
        });
        let response = backend
            .generate_content(self.model.as_str(), &request)
            .await?;

        let shopping_list = response
            .text()
            .ok_or_else(|| StudioError::NoContentReturned {
                reason: response.empty_reason(),
            })?;

        let record = ShoppingListRecord {
            shopping_list,
            before_image: self.before.to_string_lossy().into_owned(),
            after_image: self.after.to_string_lossy().into_owned(),
            generated_at: after.modified_timestamp()?,
        };
        record.save(&self.output)?;

        observer.notify(&Diagnostic::ShoppingListSaved {
            path: self.output.clone(),
        });
        observer.notify(&Diagnostic::ShoppingListText {
            text: record.shopping_list.clone(),
        });
        Ok(record)
    }
}

fn load(path: &Path, role: ImageRole, observer: &dyn Observer) -> Result<SourceImage> {
    let image = SourceImage::load(path)?;
    let (width, height) = image.dimensions();
    observer.notify(&Diagnostic::SourceLoaded {
        role,
        path: path.to_path_buf(),
        width,
        height,
    });
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::RecordingObserver;
    use crate::testing::{named_png, MockBackend};
    use crate::ErrorKind;
    use serde_json::json;

    fn text_reply(text: &str) -> MockBackend {
        MockBackend::replying(json!({
            "candidates": [{"content": {"parts": [{"text": text}]}, "finishReason": "STOP"}]
        }))
    }

    #[tokio::test]
    async fn test_writes_record() {
        let dir = tempfile::tempdir().unwrap();
        let before = named_png(&dir, "before.png");
        let after = named_png(&dir, "after.png");
        let output = dir.path().join("list.json");
        let backend = text_reply("Sample list");
        let observer = RecordingObserver::new();

        ShoppingListJob::new(&before, &after, &output)
            .run(&backend, &observer)
            .await
            .unwrap();

        let written: ShoppingListRecord =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written.shopping_list, "Sample list");
        assert_eq!(written.before_image, before.to_string_lossy());
        assert_eq!(written.after_image, after.to_string_lossy());
        assert!(!written.generated_at.is_empty());
        assert!(observer.events().contains(&Diagnostic::ShoppingListText {
            text: "Sample list".into()
        }));
    }

    #[tokio::test]
    async fn test_request_has_prompt_then_both_images() {
        let dir = tempfile::tempdir().unwrap();
        let before = named_png(&dir, "before.png");
        let after = named_png(&dir, "after.png");
        let backend = text_reply("ok");

        ShoppingListJob::new(&before, &after, dir.path().join("list.json"))
            .with_model(TextModel::Flash25)
            .run(&backend, &RecordingObserver::new())
            .await
            .unwrap();

        let calls = backend.calls();
        let (model, body) = &calls[0];
        assert_eq!(model, "gemini-2.5-flash");
        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0]["text"], SHOPPING_LIST_PROMPT);
        assert!(parts[1].get("inlineData").is_some());
        assert!(parts[2].get("inlineData").is_some());
        assert!(body.get("generationConfig").is_none());
    }

    #[tokio::test]
    async fn test_file_layout_keeps_key_order_and_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let before = named_png(&dir, "before.png");
        let after = named_png(&dir, "after.png");
        let output = dir.path().join("list.json");
        let backend = text_reply("Canapé en lin – 499 €");

        ShoppingListJob::new(&before, &after, &output)
            .run(&backend, &RecordingObserver::new())
            .await
            .unwrap();

        let raw = std::fs::read_to_string(&output).unwrap();
        assert!(raw.contains("Canapé en lin – 499 €"));
        assert!(!raw.contains("\\u"));
        assert!(raw.starts_with("{\n  \"shopping_list\""));

        let positions: Vec<usize> = ["shopping_list", "before_image", "after_image", "generated_at"]
            .iter()
            .map(|key| raw.find(&format!("\"{key}\"")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_no_text_is_no_content() {
        let dir = tempfile::tempdir().unwrap();
        let before = named_png(&dir, "before.png");
        let after = named_png(&dir, "after.png");
        let output = dir.path().join("list.json");
        let backend = MockBackend::replying(json!({
            "candidates": [],
            "promptFeedback": {"blockReason": "OTHER"}
        }));

        let err = ShoppingListJob::new(&before, &after, &output)
            .run(&backend, &RecordingObserver::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NoContentReturned);
        assert!(err.to_string().contains("OTHER"));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_missing_after_image() {
        let dir = tempfile::tempdir().unwrap();
        let before = named_png(&dir, "before.png");
        let backend = text_reply("unused");

        let err = ShoppingListJob::new(
            &before,
            dir.path().join("after.png"),
            dir.path().join("list.json"),
        )
        .run(&backend, &RecordingObserver::new())
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InputNotFound);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_service_error_passes_through() {
        let dir = tempfile::tempdir().unwrap();
        let before = named_png(&dir, "before.png");
        let after = named_png(&dir, "after.png");
        let backend = MockBackend::with(Err(StudioError::Api {
            status: 503,
            message: "UNAVAILABLE".into(),
        }));

        let err = ShoppingListJob::new(&before, &after, dir.path().join("list.json"))
            .run(&backend, &RecordingObserver::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ServiceError);
    }
}
