//! Task execution handler.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::http::responses::{TaskQuery, TaskResponse};
use crate::state::AppState;

/// Run a task through the agent and return its report.
///
/// Dropping this future (client disconnect) cancels the task, killing the
/// agent and removing its workspace.
pub async fn run_task(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TaskQuery>,
) -> impl IntoResponse {
    info!(task = %query.q, "Received task");

    let output = state.executor.run(&query.q).await;

    Json(TaskResponse {
        task: query.q,
        agent: state.agent_label.clone(),
        output,
        email: state.contact_email.clone(),
    })
}
