//! Task report model and its text rendering.
//!
//! The runner fills these types stage by stage; `Display` turns a finished
//! [`TaskReport`] into the aggregated text handed back to the caller.

use std::fmt;
use std::time::Duration;

use crate::status::TaskStatus;

/// Output returned when the agent exceeds its timeout.
pub const TIMEOUT_MESSAGE: &str = "Task timed out";

/// Captured output of a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Standard output, lossily decoded as UTF-8.
    pub stdout: String,
    /// Standard error, lossily decoded as UTF-8.
    pub stderr: String,
    /// Exit code, `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl CapturedOutput {
    /// Build from raw process output.
    pub fn from_bytes(stdout: &[u8], stderr: &[u8], exit_code: Option<i32>) -> Self {
        Self {
            stdout: String::from_utf8_lossy(stdout).into_owned(),
            stderr: String::from_utf8_lossy(stderr).into_owned(),
            exit_code,
        }
    }

    /// Returns true if the process exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Result of running a produced script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptOutcome {
    /// Script ran to completion (with any exit status).
    Completed(CapturedOutput),
    /// Script exceeded the script timeout and was killed.
    TimedOut(Duration),
    /// Script could not be started.
    Failed(String),
}

/// Content of an artifact as read from the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactContent {
    Text(String),
    /// Read failed; holds the reason.
    Unreadable(String),
}

/// A file the agent left at the top level of the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub content: ArtifactContent,
    /// Present only for files matching a configured script runtime.
    pub execution: Option<ScriptOutcome>,
}

impl Artifact {
    /// Returns true if the artifact was executed as a script.
    pub fn was_executed(&self) -> bool {
        self.execution.is_some()
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\nFile: {}\n", self.name)?;

        match &self.content {
            ArtifactContent::Text(content) => {
                writeln!(f, "{}", content)?;
                if let Some(execution) = &self.execution {
                    write!(f, "\n=== EXECUTING {} ===\n", self.name)?;
                    write!(f, "{}", execution)?;
                }
                Ok(())
            }
            ArtifactContent::Unreadable(reason) => {
                writeln!(f, "Could not read/execute file: {}", reason)
            }
        }
    }
}

impl fmt::Display for ScriptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptOutcome::Completed(output) => {
                f.write_str(&output.stdout)?;
                if !output.stderr.is_empty() {
                    write!(f, "\nErrors: {}\n", output.stderr)?;
                }
                Ok(())
            }
            ScriptOutcome::TimedOut(limit) => {
                write!(f, "\nErrors: script timed out after {:?}\n", limit)
            }
            ScriptOutcome::Failed(reason) => write!(f, "\nErrors: {}\n", reason),
        }
    }
}

/// Full report for a completed agent invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    /// Agent name used in the output heading (e.g. `aider`).
    pub agent_name: String,
    pub agent: CapturedOutput,
    /// Artifacts in workspace listing order.
    pub artifacts: Vec<Artifact>,
}

impl TaskReport {
    /// Number of artifacts that were executed as scripts.
    pub fn executed_count(&self) -> usize {
        self.artifacts.iter().filter(|a| a.was_executed()).count()
    }
}

impl fmt::Display for TaskReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "=== {} OUTPUT ===\n{}\n",
            self.agent_name.to_uppercase(),
            self.agent.stdout
        )?;

        if !self.agent.stderr.is_empty() {
            write!(f, "\n=== STDERR ===\n{}\n", self.agent.stderr)?;
        }

        f.write_str("\n=== FILES CREATED ===\n")?;
        for artifact in &self.artifacts {
            write!(f, "{}", artifact)?;
        }
        Ok(())
    }
}

/// Final outcome of one task invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Completed(TaskReport),
    /// Agent exceeded its timeout; no artifacts were collected.
    TimedOut,
    /// Any other failure, with its description.
    Failed(String),
}

impl TaskOutcome {
    /// Status for logging.
    pub fn status(&self) -> TaskStatus {
        match self {
            TaskOutcome::Completed(_) => TaskStatus::Completed,
            TaskOutcome::TimedOut => TaskStatus::TimedOut,
            TaskOutcome::Failed(_) => TaskStatus::Failed,
        }
    }

    /// Render the outcome as the string returned to callers.
    pub fn into_output(self) -> String {
        match self {
            TaskOutcome::Completed(report) => report.to_string(),
            TaskOutcome::TimedOut => TIMEOUT_MESSAGE.to_string(),
            TaskOutcome::Failed(reason) => format!("Error: {}", reason),
        }
    }
}
