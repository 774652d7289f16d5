//! HTTP request and response types.

use serde::{Deserialize, Serialize};

/// Query string for the task endpoint.
#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    /// Task description.
    pub q: String,
}

/// Response body for the task endpoint.
///
/// Returned with status 200 for every outcome; failures are carried in
/// `output`.
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub task: String,
    pub agent: String,
    pub output: String,
    pub email: String,
}

/// Response body for the root endpoint.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: &'static str,
    pub usage: &'static str,
    pub example: &'static str,
    pub status: &'static str,
}
