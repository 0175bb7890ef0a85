//! Task transport shapes.
//!
//! An inbound [`TaskRequest`] is what the transport hands the orchestrator:
//! free-form text, identity metadata, optional file/image parts, and the
//! visible conversation history. Outbound [`TaskEvent`]s are the signals
//! the orchestrator emits back through the sink.

use serde::{Deserialize, Serialize};

/// Kind of an attached request part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartKind {
    File,
    Image,
}

/// A file or image part attached to a request.
///
/// Carries a declared mime type, a retrievable URI, or inline
/// base64-encoded bytes; any combination may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestPart {
    pub kind: Option<PartKind>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    /// Base64-encoded payload, when the part is inline.
    #[serde(default)]
    pub bytes: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

/// One turn of the visible conversation history. Read-only to the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: String,
    pub text: String,
}

/// An inbound request as delivered by the transport.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskRequest {
    #[serde(default)]
    pub text: String,
    /// Identity metadata; `user_id` / `userId` / `uid` select the memory
    /// record, otherwise the "global" sentinel is used.
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub parts: Vec<RequestPart>,
    #[serde(default)]
    pub history: Vec<HistoryTurn>,
}

/// Signals emitted to the transport sink over the life of one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskEvent {
    /// Work has started.
    Working,
    /// A produced output artifact.
    Artifact { name: String, text: String },
    /// An interim status message.
    Status { message: String },
    /// Terminal: the task completed with this message.
    Complete { message: String },
    /// Terminal: the task failed with this message.
    Failed { message: String },
    /// Terminal: the task was cancelled.
    Cancelled { message: String },
}

impl TaskEvent {
    /// Whether this event ends the task.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskEvent::Complete { .. } | TaskEvent::Failed { .. } | TaskEvent::Cancelled { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_request_minimal_deserialize() {
        let req: TaskRequest = serde_json::from_str(r#"{"text":"hello"}"#).unwrap();
        assert_eq!(req.text, "hello");
        assert!(req.parts.is_empty());
        assert!(req.history.is_empty());
    }

    #[test]
    fn test_request_part_deserialize() {
        let part: RequestPart = serde_json::from_str(
            r#"{"kind":"file","mime_type":"image/png","filename":"cat.png"}"#,
        )
        .unwrap();
        assert_eq!(part.kind, Some(PartKind::File));
        assert_eq!(part.mime_type.as_deref(), Some("image/png"));
        assert!(part.bytes.is_none());
    }

    #[test]
    fn test_task_event_terminal() {
        assert!(!TaskEvent::Working.is_terminal());
        assert!(!TaskEvent::Status { message: "x".into() }.is_terminal());
        assert!(TaskEvent::Complete { message: "done".into() }.is_terminal());
        assert!(TaskEvent::Failed { message: "no".into() }.is_terminal());
        assert!(TaskEvent::Cancelled { message: "stop".into() }.is_terminal());
    }

    #[test]
    fn test_task_event_serde_tag() {
        let json = serde_json::to_string(&TaskEvent::Artifact {
            name: "agent_output".to_string(),
            text: "42".to_string(),
        })
        .unwrap();
        assert!(json.contains(r#""type":"artifact""#));
    }
}
