//! Core domain errors.

use thiserror::Error;

/// Core domain errors for agentrun.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Command template could not be tokenized.
    #[error("Invalid command template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    /// Command template has no program to run.
    #[error("Command template is empty")]
    EmptyCommand,

    /// Command template never references its placeholder.
    #[error("Command template '{template}' must contain {placeholder}")]
    MissingPlaceholder {
        template: String,
        placeholder: &'static str,
    },

    /// Script runtime specification is malformed.
    #[error("Invalid script runtime '{0}': expected <extension>=<command template>")]
    InvalidRuntime(String),
}
