//! Call-shape fallback chain.
//!
//! Tries the backend with increasingly conservative call shapes and stops
//! at the first attempt producing non-empty text. Failure reasons are
//! accumulated; only when every shape is exhausted does the combined
//! diagnostic surface as a single error.

use switchboard_types::error::TaskError;
use switchboard_types::llm::{
    CallShape, CompletionRequest, IMAGE_MISSING_SENTINEL,
};

use crate::extract::extract_code;
use crate::llm::backend::CompletionBackend;

/// Run `request` down the [`CallShape::LADDER`], first success wins.
///
/// - A successful attempt with empty text counts as a failure and falls
///   through to the next shape.
/// - When `secret_intent` is set, every successful answer is passed
///   through the 14-digit extractor and the extracted code is preferred.
/// - When images are present and only the image-blind degraded shape
///   succeeded, the answer is forced to the `image_missing` sentinel
///   rather than silently ignoring the images. Secret extraction still
///   wins over the sentinel.
pub async fn dispatch_with_fallback<B: CompletionBackend>(
    backend: &B,
    request: &CompletionRequest,
    secret_intent: bool,
) -> Result<String, TaskError> {
    let mut failures: Vec<String> = Vec::new();

    for shape in CallShape::LADDER {
        match backend.complete(shape, request).await {
            Ok(text) if !text.trim().is_empty() => {
                tracing::debug!(shape = %shape, "completion attempt succeeded");
                if secret_intent {
                    if let Some(code) = extract_code(&text) {
                        return Ok(code);
                    }
                }
                if request.has_images() && !shape.supports_images() {
                    return Ok(IMAGE_MISSING_SENTINEL.to_string());
                }
                return Ok(text);
            }
            Ok(_) => {
                tracing::warn!(shape = %shape, "completion attempt returned empty text");
                failures.push(format!("{shape}: empty completion"));
            }
            Err(err) => {
                tracing::warn!(shape = %shape, error = %err, "completion attempt failed");
                failures.push(format!("{shape}: {err}"));
            }
        }
    }

    Err(TaskError::Execution(failures.join("; ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard_types::llm::{BackendError, ImageRef};

    /// Mock backend with a canned result per call shape.
    struct MockBackend {
        tool_augmented: Result<String, String>,
        plain: Result<String, String>,
        degraded: Result<String, String>,
    }

    impl MockBackend {
        fn all_ok(text: &str) -> Self {
            Self {
                tool_augmented: Ok(text.to_string()),
                plain: Ok(text.to_string()),
                degraded: Ok(text.to_string()),
            }
        }
    }

    impl CompletionBackend for MockBackend {
        async fn complete(
            &self,
            shape: CallShape,
            _request: &CompletionRequest,
        ) -> Result<String, BackendError> {
            let slot = match shape {
                CallShape::ToolAugmented => &self.tool_augmented,
                CallShape::Plain => &self.plain,
                CallShape::DegradedChat => &self.degraded,
            };
            slot.clone().map_err(|msg| BackendError::Request(msg))
        }
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            system: "test".to_string(),
            user_text: "hello".to_string(),
            images: Vec::new(),
        }
    }

    fn request_with_image() -> CompletionRequest {
        CompletionRequest {
            images: vec![ImageRef::Uri { uri: "https://example.com/x.png".to_string() }],
            ..request()
        }
    }

    #[tokio::test]
    async fn test_first_shape_wins() {
        let backend = MockBackend::all_ok("answer");
        let out = dispatch_with_fallback(&backend, &request(), false).await.unwrap();
        assert_eq!(out, "answer");
    }

    #[tokio::test]
    async fn test_falls_through_to_plain() {
        let backend = MockBackend {
            tool_augmented: Err("tool backend down".to_string()),
            plain: Ok("plain answer".to_string()),
            degraded: Ok("never reached".to_string()),
        };
        let out = dispatch_with_fallback(&backend, &request(), false).await.unwrap();
        assert_eq!(out, "plain answer");
    }

    #[tokio::test]
    async fn test_empty_text_falls_through() {
        let backend = MockBackend {
            tool_augmented: Ok("   ".to_string()),
            plain: Ok("real answer".to_string()),
            degraded: Ok("never reached".to_string()),
        };
        let out = dispatch_with_fallback(&backend, &request(), false).await.unwrap();
        assert_eq!(out, "real answer");
    }

    #[tokio::test]
    async fn test_all_shapes_exhausted_accumulates_errors() {
        let backend = MockBackend {
            tool_augmented: Err("first".to_string()),
            plain: Err("second".to_string()),
            degraded: Err("third".to_string()),
        };
        let err = dispatch_with_fallback(&backend, &request(), false).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("first"), "missing first error: {msg}");
        assert!(msg.contains("second"), "missing second error: {msg}");
        assert!(msg.contains("third"), "missing third error: {msg}");
        assert!(msg.contains("tool_augmented"), "missing shape name: {msg}");
    }

    #[tokio::test]
    async fn test_secret_intent_extracts_code() {
        let backend = MockBackend::all_ok("the page shows 1234-5678-9012-34 as the value");
        let out = dispatch_with_fallback(&backend, &request(), true).await.unwrap();
        assert_eq!(out, "12345678901234");
    }

    #[tokio::test]
    async fn test_secret_intent_without_code_keeps_text() {
        let backend = MockBackend::all_ok("no digits to be found");
        let out = dispatch_with_fallback(&backend, &request(), true).await.unwrap();
        assert_eq!(out, "no digits to be found");
    }

    #[tokio::test]
    async fn test_degraded_shape_with_images_forces_sentinel() {
        let backend = MockBackend {
            tool_augmented: Err("down".to_string()),
            plain: Err("down".to_string()),
            degraded: Ok("a guess without seeing the image".to_string()),
        };
        let out = dispatch_with_fallback(&backend, &request_with_image(), false).await.unwrap();
        assert_eq!(out, IMAGE_MISSING_SENTINEL);
    }

    #[tokio::test]
    async fn test_secret_extraction_beats_image_sentinel() {
        let backend = MockBackend {
            tool_augmented: Err("down".to_string()),
            plain: Err("down".to_string()),
            degraded: Ok("code 12345678901234".to_string()),
        };
        let out = dispatch_with_fallback(&backend, &request_with_image(), true).await.unwrap();
        assert_eq!(out, "12345678901234");
    }

    #[tokio::test]
    async fn test_images_on_capable_shape_keep_text() {
        let backend = MockBackend::all_ok("a tabby cat");
        let out = dispatch_with_fallback(&backend, &request_with_image(), false).await.unwrap();
        assert_eq!(out, "a tabby cat");
    }
}
