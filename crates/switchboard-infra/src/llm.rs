//! HTTP completion backend.
//!
//! One reqwest client serves all three call shapes against an
//! OpenAI-compatible API: the two structured shapes post to `/responses`
//! (with and without the tool declaration), the degraded shape posts
//! flattened chat turns to `/chat/completions` with a token cap and fixed
//! low temperature.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and only exposed
//! while building the Authorization header; the struct deliberately does
//! not derive `Debug`.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use switchboard_core::extract::extract_backend_text;
use switchboard_core::llm::backend::CompletionBackend;
use switchboard_types::llm::{
    BackendError, CallShape, CompletionRequest, ImageRef, Message, MessageRole, ToolSpec,
    DEGRADED_CHAT_MAX_TOKENS, DEGRADED_CHAT_TEMPERATURE,
};

/// Completion backend over an OpenAI-compatible HTTP API.
pub struct HttpCompletionBackend {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl HttpCompletionBackend {
    /// Per-call timeout. Generations can run long; the fallback ladder
    /// above this bounds total latency, not this client.
    const TIMEOUT: Duration = Duration::from_secs(300);

    pub fn new(api_key: SecretString, base_url: String, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Self::TIMEOUT)
            .build()
            .expect("failed to create reqwest client");
        Self {
            client,
            api_key,
            base_url,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Structured content entries for the user turn, images last.
    fn user_content(request: &CompletionRequest) -> Vec<serde_json::Value> {
        let mut content = vec![serde_json::json!({
            "type": "input_text",
            "text": request.user_text,
        })];
        for image in &request.images {
            let image_url = match image {
                ImageRef::Uri { uri } => uri.clone(),
                ImageRef::Inline { mime_type, data } => {
                    format!("data:{mime_type};base64,{data}")
                }
            };
            content.push(serde_json::json!({
                "type": "input_image",
                "image_url": image_url,
            }));
        }
        content
    }

    fn structured_body(&self, request: &CompletionRequest, with_tools: bool) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "input": [
                {
                    "role": "system",
                    "content": [{"type": "input_text", "text": request.system}],
                },
                {
                    "role": "user",
                    "content": Self::user_content(request),
                },
            ],
        });
        if with_tools {
            body["tools"] = serde_json::json!([ToolSpec::code_interpreter()]);
            body["tool_choice"] = serde_json::json!("auto");
        }
        body
    }

    fn chat_body(&self, request: &CompletionRequest) -> serde_json::Value {
        let messages = [
            Message {
                role: MessageRole::System,
                content: request.system.clone(),
            },
            Message {
                role: MessageRole::User,
                content: request.user_text.clone(),
            },
        ];
        serde_json::json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": DEGRADED_CHAT_MAX_TOKENS,
            "temperature": DEGRADED_CHAT_TEMPERATURE,
        })
    }

    async fn post(&self, url: &str, body: &serde_json::Value) -> Result<String, BackendError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(self.api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|err| BackendError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 => BackendError::AuthenticationFailed,
                code => BackendError::Status { status: code, message },
            });
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|err| BackendError::Deserialization(err.to_string()))?;

        match extract_backend_text(&payload) {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(BackendError::EmptyCompletion),
        }
    }
}

impl CompletionBackend for HttpCompletionBackend {
    async fn complete(
        &self,
        shape: CallShape,
        request: &CompletionRequest,
    ) -> Result<String, BackendError> {
        match shape {
            CallShape::ToolAugmented => {
                self.post(&self.url("/responses"), &self.structured_body(request, true))
                    .await
            }
            CallShape::Plain => {
                self.post(&self.url("/responses"), &self.structured_body(request, false))
                    .await
            }
            CallShape::DegradedChat => {
                self.post(&self.url("/chat/completions"), &self.chat_body(request))
                    .await
            }
        }
    }
}
