//! CompletionBackend trait definition.
//!
//! The single abstraction over the generative completion collaborator.
//! One implementation (HTTP, in `switchboard-infra`) serves all three
//! [`CallShape`]s; mocks in tests swap in canned results per shape.

use switchboard_types::llm::{BackendError, CallShape, CompletionRequest};

/// A generative completion backend.
///
/// `complete` sends one request using one particular call shape and
/// returns the extracted completion text. Latency and model behavior are
/// opaque to the core; the implementation must bound every call with a
/// timeout.
pub trait CompletionBackend: Send + Sync {
    /// Send `request` using `shape` and return the completion text.
    ///
    /// An empty completion is an error ([`BackendError::EmptyCompletion`]),
    /// not an empty `Ok` -- the dispatch chain treats only non-empty text
    /// as success.
    fn complete(
        &self,
        shape: CallShape,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<String, BackendError>> + Send;
}
