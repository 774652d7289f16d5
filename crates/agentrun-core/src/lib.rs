//! agentrun Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Subprocesses or the filesystem
//! - HTTP
//! - Runtime specifics
//!
//! Everything the task runner produces is modelled here and rendered
//! into the final text report at the boundary.

pub mod command;
pub mod error;
pub mod ids;
pub mod report;
pub mod status;

// Re-export commonly used types
pub use command::CommandTemplate;
pub use error::CoreError;
pub use ids::RunId;
pub use report::{
    Artifact, ArtifactContent, CapturedOutput, ScriptOutcome, TaskOutcome, TaskReport,
    TIMEOUT_MESSAGE,
};
pub use status::TaskStatus;
