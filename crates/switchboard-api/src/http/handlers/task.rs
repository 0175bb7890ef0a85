//! Task submission and cancellation.
//!
//! `POST /api/v1/tasks` runs one request through the orchestrator and
//! returns the full event transcript plus the extracted final answer.
//! `POST /api/v1/tasks/{id}/cancel` fires the cancellation token of an
//! in-flight task; the submitting request then finishes with a cancelled
//! terminal event.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use switchboard_core::sink::TaskSink;
use switchboard_types::task::{TaskEvent, TaskRequest};

use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Sink that records the event stream for the HTTP response.
#[derive(Default)]
struct CollectingSink {
    events: Mutex<Vec<TaskEvent>>,
}

impl TaskSink for CollectingSink {
    async fn emit(&self, event: TaskEvent) {
        self.events.lock().await.push(event);
    }
}

/// Result of one task run, returned in the response envelope.
#[derive(Debug, Serialize)]
pub struct TaskResult {
    pub task_id: String,
    /// Terminal state: `completed`, `failed`, or `cancelled`.
    pub state: String,
    /// The final answer text, when the task completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// The full event transcript, in emission order.
    pub events: Vec<TaskEvent>,
}

/// POST /api/v1/tasks - Run one task to completion.
pub async fn submit_task(
    State(state): State<AppState>,
    Json(request): Json<TaskRequest>,
) -> ApiResponse<TaskResult> {
    let start = Instant::now();
    let task_id = uuid::Uuid::now_v7().to_string();
    tracing::info!(task_id = %task_id, "task received");

    let cancel = CancellationToken::new();
    state.tasks.insert(task_id.clone(), cancel.clone());

    let sink = CollectingSink::default();
    state.orchestrator.execute(&request, &sink, cancel).await;

    state.tasks.remove(&task_id);
    let events = sink.events.into_inner();

    let terminal = events.iter().rev().find(|event| event.is_terminal());
    let state_name = match terminal {
        Some(TaskEvent::Complete { .. }) => "completed",
        Some(TaskEvent::Failed { .. }) => "failed",
        Some(TaskEvent::Cancelled { .. }) => "cancelled",
        _ => "failed",
    };
    let answer = match terminal {
        Some(TaskEvent::Complete { message }) => Some(message.clone()),
        _ => None,
    };

    ApiResponse::success(
        TaskResult {
            task_id: task_id.clone(),
            state: state_name.to_string(),
            answer,
            events,
        },
        task_id,
        start.elapsed().as_millis() as u64,
    )
}

#[derive(Debug, Serialize)]
pub struct CancelResult {
    pub task_id: String,
    pub cancelled: bool,
}

/// POST /api/v1/tasks/{id}/cancel - Cancel an in-flight task.
pub async fn cancel_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> axum::response::Response {
    use axum::response::IntoResponse;

    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    match state.tasks.get(&task_id) {
        Some(entry) => {
            entry.value().cancel();
            ApiResponse::success(
                CancelResult {
                    task_id,
                    cancelled: true,
                },
                request_id,
                start.elapsed().as_millis() as u64,
            )
            .into_response()
        }
        None => ApiResponse::error(
            "TASK_NOT_FOUND",
            &format!("no in-flight task with id '{task_id}'"),
            request_id,
            start.elapsed().as_millis() as u64,
        )
        .into_response(),
    }
}
