use thiserror::Error;

/// Errors from memory store operations.
///
/// The orchestrator treats every variant as recoverable: a failing store
/// degrades to an empty in-memory document and is never surfaced to the
/// requester.
#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("store I/O error: {0}")]
    Io(String),

    #[error("store document failed to serialize: {0}")]
    Serialize(String),
}

/// Errors from the browsing collaborator.
#[derive(Debug, Error)]
pub enum BrowseError {
    #[error("browsing agent timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("browsing agent gave up after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },

    #[error("browsing agent request failed: {0}")]
    Request(String),
}

/// Terminal task failures surfaced to the transport.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("No input provided.")]
    MissingInput,

    #[error("Execution error: {0}")]
    Execution(String),
}
