//! Browsing agent seam.

use switchboard_types::error::BrowseError;

/// A delegated web-browsing collaborator.
///
/// `run_task` hands off a natural-language task and returns the
/// collaborator's final textual answer. Retries and per-call timeouts are
/// the implementation's concern; the orchestrator only sees the final
/// result or the exhausted error.
pub trait BrowsingAgent: Send + Sync {
    /// Delegate one browsing task and return the final answer text.
    fn run_task(
        &self,
        task: &str,
    ) -> impl std::future::Future<Output = Result<String, BrowseError>> + Send;
}
