//! Error types for the task runner.

use std::time::Duration;

use agentrun_core::CoreError;
use thiserror::Error;

/// Errors raised by the individual pipeline stages.
///
/// None of these reach the caller of [`crate::TaskRunner::run`]; the runner
/// folds them into a `TaskOutcome` first.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Workspace directory could not be created.
    #[error("failed to create workspace: {0}")]
    Workspace(#[source] std::io::Error),

    /// Workspace contents could not be listed.
    #[error("failed to list workspace: {0}")]
    Listing(#[source] std::io::Error),

    /// Child process could not be started.
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting on the child process failed.
    #[error("failed to wait for '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Child process exceeded its time budget and was killed.
    #[error("'{program}' timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    /// Runner is no longer accepting tasks.
    #[error("task runner is shut down")]
    Closed,

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl RunnerError {
    /// Returns true if this error is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
