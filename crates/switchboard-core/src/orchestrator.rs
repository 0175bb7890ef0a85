//! Per-request coordinator.
//!
//! Drives one task from inbound request to terminal event: memory
//! ingestion, the pair-query short-circuit, routing, dispatch to the
//! browsing or completion collaborator, answer extraction, and note
//! persistence. Generic over the four trait seams so tests can run the
//! whole lifecycle against mocks.

use tokio_util::sync::CancellationToken;

use switchboard_types::error::TaskError;
use switchboard_types::llm::CompletionRequest;
use switchboard_types::memory::{user_key, DEFAULT_SUMMARY_CHARS};
use switchboard_types::route::Route;
use switchboard_types::task::{TaskEvent, TaskRequest};

use crate::browse::BrowsingAgent;
use crate::extract::{extract_code, has_secret_intent, memory_note, pair_query_key};
use crate::llm::backend::CompletionBackend;
use crate::llm::dispatch::dispatch_with_fallback;
use crate::memory::{tail_chars, MemoryStore};
use crate::pairs::scan_history;
use crate::parts::collect_image_refs;
use crate::router::classify_request;
use crate::sink::TaskSink;

/// System prompt sent on every completion call.
pub const SYSTEM_PROMPT: &str = "Switchboard: multi-skill agent.\n\
Abilities: math, hashing (SHA-512/MD5), vision Q&A, web browsing, code gen/exec, long-term memory.\n\
If a task asks for a 14-digit secret from a page, return ONLY that 14-digit number.";

/// Instruction prepended to the user turn when image parts are attached.
const VISION_INSTRUCTION: &str =
    "Classify the main object in the image. Reply with a single lowercase label only.";

/// Character cap on the joined history prefix, kept from the tail.
const HISTORY_PREFIX_CHARS: usize = 2000;

/// Coordinates one task at a time across the memory store, the completion
/// backend, and the browsing agent.
pub struct Orchestrator<M, B, W> {
    memory: M,
    backend: B,
    browser: W,
    max_history_turns: usize,
}

impl<M, B, W> Orchestrator<M, B, W>
where
    M: MemoryStore,
    B: CompletionBackend,
    W: BrowsingAgent,
{
    pub fn new(memory: M, backend: B, browser: W, max_history_turns: usize) -> Self {
        Self {
            memory,
            backend,
            browser,
            max_history_turns,
        }
    }

    /// Run one request to a terminal event on `sink`.
    ///
    /// Store failures are logged and degraded, never surfaced to the
    /// requester. Cancellation discards the in-flight dispatch result and
    /// emits a cancelled terminal event.
    pub async fn execute<S: TaskSink>(
        &self,
        request: &TaskRequest,
        sink: &S,
        cancel: CancellationToken,
    ) {
        sink.emit(TaskEvent::Working).await;

        let text = request.text.trim();
        if text.is_empty() {
            self.fail(sink, &TaskError::MissingInput.to_string()).await;
            return;
        }

        let user = user_key(&request.metadata);
        self.ingest_memory(&user, request).await;

        if let Some(key) = pair_query_key(text) {
            if let Some(answer) = self.resolve_pair_query(&user, &key, request).await {
                tracing::info!(user = %user, key = %key, "pair query answered without backend");
                self.complete(sink, &answer).await;
                return;
            }
        }

        let memory_prefix = self.memory_prefix(&user, request).await;
        let route = classify_request(text, &request.parts);
        tracing::info!(route = %route, "routing decision");

        let dispatch = self.dispatch(route, text, &memory_prefix, request);
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::info!("task cancelled");
                sink.emit(TaskEvent::Cancelled {
                    message: "Task cancelled by user".to_string(),
                })
                .await;
                return;
            }
            outcome = dispatch => outcome,
        };

        match outcome {
            Ok(answer) => {
                if let Some(note) = memory_note(&answer) {
                    if let Err(err) = self.memory.append_note(&user, &note).await {
                        tracing::warn!(error = %err, "failed to persist answer note");
                    }
                }
                self.complete(sink, &answer).await;
            }
            Err(err) => self.fail(sink, &err.to_string()).await,
        }
    }

    /// Extract pairs from the input and every history turn, and persist a
    /// trailing "memory note:" marker from the input.
    async fn ingest_memory(&self, user: &str, request: &TaskRequest) {
        if let Err(err) = self.memory.ingest_text_for_pairs(user, &request.text).await {
            tracing::warn!(error = %err, "pair ingest from input failed");
        }
        if let Some(note) = memory_note(&request.text) {
            if let Err(err) = self.memory.append_note(user, &note).await {
                tracing::warn!(error = %err, "failed to persist input note");
            }
        }
        for turn in &request.history {
            if turn.text.is_empty() {
                continue;
            }
            if let Err(err) = self.memory.ingest_text_for_pairs(user, &turn.text).await {
                tracing::warn!(error = %err, "pair ingest from history failed");
            }
        }
    }

    /// Resolve a "paired with N" query: this user's map, then the global
    /// index with rebuild, then an ad-hoc scan of the visible history.
    async fn resolve_pair_query(
        &self,
        user: &str,
        key: &str,
        request: &TaskRequest,
    ) -> Option<String> {
        match self.memory.find_pair(user, key).await {
            Ok(Some(value)) => return Some(value),
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "per-user pair lookup failed"),
        }
        match self.memory.find_pair_any(key).await {
            Ok(Some(value)) => return Some(value),
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "global pair lookup failed"),
        }
        scan_history(&request.history, key)
    }

    /// Build the prompt prefix: a bounded recent-history transcript plus
    /// the long-term memory summary.
    async fn memory_prefix(&self, user: &str, request: &TaskRequest) -> String {
        let mut prefix = String::new();

        let start = request.history.len().saturating_sub(self.max_history_turns);
        let lines: Vec<String> = request.history[start..]
            .iter()
            .filter(|turn| !turn.text.is_empty())
            .map(|turn| format!("{}: {}", turn.role, turn.text))
            .collect();
        if !lines.is_empty() {
            let joined = tail_chars(&lines.join("\n"), HISTORY_PREFIX_CHARS);
            prefix.push_str("Prior conversation:\n");
            prefix.push_str(&joined);
        }

        let summary = match self.memory.summary(user, DEFAULT_SUMMARY_CHARS).await {
            Ok(summary) => summary,
            Err(err) => {
                tracing::warn!(error = %err, "memory summary failed");
                String::new()
            }
        };
        if !summary.is_empty() {
            if !prefix.is_empty() {
                prefix.push_str("\n\n");
            }
            prefix.push_str("Long-term memory:\n");
            prefix.push_str(&summary);
        }

        prefix
    }

    /// Route-specific dispatch: the browsing agent for `web`, the
    /// call-shape fallback chain for everything else.
    async fn dispatch(
        &self,
        route: Route,
        text: &str,
        memory_prefix: &str,
        request: &TaskRequest,
    ) -> Result<String, TaskError> {
        if route == Route::Web {
            return Ok(self.handle_web(text).await);
        }

        let images = collect_image_refs(&request.parts);
        let user_text = if images.is_empty() {
            text.to_string()
        } else {
            format!("{VISION_INSTRUCTION}\n{text}")
        };
        let system = if memory_prefix.is_empty() {
            SYSTEM_PROMPT.to_string()
        } else {
            format!("{SYSTEM_PROMPT}\n\n{memory_prefix}")
        };
        let completion = CompletionRequest {
            system,
            user_text,
            images,
        };

        let secret = has_secret_intent(text);
        dispatch_with_fallback(&self.backend, &completion, secret).await
    }

    /// Delegate to the browsing agent. A browse failure is never fatal:
    /// the error is folded into a placeholder answer.
    async fn handle_web(&self, text: &str) -> String {
        let answer = match self.browser.run_task(text).await {
            Ok(answer) => answer,
            Err(err) => {
                tracing::warn!(error = %err, "browsing agent failed");
                format!("(browser timed out: {err})")
            }
        };
        if has_secret_intent(text) {
            if let Some(code) = extract_code(&answer) {
                return code;
            }
        }
        answer
    }

    async fn complete<S: TaskSink>(&self, sink: &S, answer: &str) {
        sink.emit(TaskEvent::Artifact {
            name: "agent_output".to_string(),
            text: answer.to_string(),
        })
        .await;
        sink.emit(TaskEvent::Status {
            message: answer.to_string(),
        })
        .await;
        sink.emit(TaskEvent::Complete {
            message: answer.to_string(),
        })
        .await;
    }

    async fn fail<S: TaskSink>(&self, sink: &S, message: &str) {
        sink.emit(TaskEvent::Artifact {
            name: "agent_error".to_string(),
            text: message.to_string(),
        })
        .await;
        sink.emit(TaskEvent::Failed {
            message: message.to_string(),
        })
        .await;
    }
}
