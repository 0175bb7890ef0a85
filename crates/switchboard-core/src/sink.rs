//! Task event sink seam.

use switchboard_types::task::TaskEvent;

/// Receives the event stream for one task.
///
/// Transports implement this to forward events to their wire format; tests
/// implement it with a locked `Vec` to assert on the emitted sequence.
/// Emission is fire-and-forget: a sink that can no longer deliver (client
/// gone) must swallow the event rather than error back into the
/// orchestrator.
pub trait TaskSink: Send + Sync {
    /// Deliver one event to the transport.
    fn emit(&self, event: TaskEvent) -> impl std::future::Future<Output = ()> + Send;
}
