//! Status of a finished task invocation.

use std::fmt;

/// How a task invocation ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    /// Agent ran to completion and a full report was assembled.
    #[default]
    Completed,
    /// Agent exceeded its timeout.
    TimedOut,
    /// Setup, invocation or report assembly failed.
    Failed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Completed => "completed",
            Self::TimedOut => "timed_out",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}
