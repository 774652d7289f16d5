//! Service descriptor handler.

use axum::{response::IntoResponse, Json};

use crate::http::responses::ServiceInfo;

/// Fixed descriptor telling clients how to use the service.
pub async fn root() -> impl IntoResponse {
    Json(ServiceInfo {
        message: "Aider CLI Coding Agent API",
        usage: "GET /task?q=your_task_description",
        example: "/task?q=Write and run a program that prints the greatest common divisor of 482 and 564",
        status: "online",
    })
}
