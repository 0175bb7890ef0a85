//! LLM request types and the call-shape ladder.
//!
//! A [`CompletionRequest`] carries everything the completion backend needs
//! for one attempt: the system prompt (with memory prefix already folded
//! in), conversation messages, and any inline image references. The
//! [`CallShape`] enum names the three increasingly conservative ways the
//! same request can be put to the backend.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a message in an LLM conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single message in an LLM conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

/// An inline image attached to a request.
///
/// Either a retrievable URI or base64-encoded bytes with a mime type.
/// Parts with bytes but no mime type default to `image/png`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ImageRef {
    Uri { uri: String },
    Inline { mime_type: String, data: String },
}

/// A tool declaration passed to the backend on the tool-augmented shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ToolSpec {
    /// The hosted code-execution tool the tool-augmented shape declares.
    pub fn code_interpreter() -> Self {
        Self {
            kind: "code_interpreter".to_string(),
        }
    }
}

/// Request to the completion backend, independent of call shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// System prompt, with any memory/history prefix already appended.
    pub system: String,
    /// The user's request text.
    pub user_text: String,
    /// Inline images from the request parts, if any.
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

impl CompletionRequest {
    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }
}

/// One particular way of structuring a request to the completion backend.
///
/// The dispatch layer tries shapes in [`CallShape::LADDER`] order and stops
/// at the first attempt that produces non-empty text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallShape {
    /// Structured turns with inline images and a tool declaration list,
    /// tool-choice "auto".
    ToolAugmented,
    /// Same structured turns, no tools.
    Plain,
    /// Flattened role/content chat pairs with a token cap and fixed low
    /// temperature. Cannot carry images.
    DegradedChat,
}

impl CallShape {
    /// The fallback order: most capable first, most conservative last.
    pub const LADDER: [CallShape; 3] =
        [CallShape::ToolAugmented, CallShape::Plain, CallShape::DegradedChat];

    /// Whether this shape can carry inline image parts.
    pub fn supports_images(&self) -> bool {
        !matches!(self, CallShape::DegradedChat)
    }
}

impl fmt::Display for CallShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallShape::ToolAugmented => write!(f, "tool_augmented"),
            CallShape::Plain => write!(f, "plain"),
            CallShape::DegradedChat => write!(f, "degraded_chat"),
        }
    }
}

/// Token cap applied on the degraded chat shape.
pub const DEGRADED_CHAT_MAX_TOKENS: u32 = 1200;

/// Temperature applied on the degraded chat shape.
pub const DEGRADED_CHAT_TEMPERATURE: f64 = 0.2;

/// Sentinel answer emitted when images are present but only the image-blind
/// degraded shape succeeded.
pub const IMAGE_MISSING_SENTINEL: &str = "image_missing";

/// Errors from completion backend calls.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Request(String),

    #[error("backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("failed to parse backend payload: {0}")]
    Deserialization(String),

    #[error("backend produced no usable text")]
    EmptyCompletion,
}
