//! Bounded subprocess execution.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use agentrun_core::{CapturedOutput, CoreError};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::RunnerError;

/// Kills the child's whole process group when dropped.
///
/// Each child leads its own group, so anything it started in the
/// background goes down with it on every exit path: normal exit, timeout,
/// or the caller dropping the future.
#[cfg(unix)]
struct ProcessGroup {
    pgid: Option<nix::unistd::Pid>,
}

#[cfg(unix)]
impl ProcessGroup {
    fn new(pid: Option<u32>) -> Self {
        Self {
            pgid: pid.map(|pid| nix::unistd::Pid::from_raw(pid as i32)),
        }
    }
}

#[cfg(unix)]
impl Drop for ProcessGroup {
    fn drop(&mut self) {
        use nix::errno::Errno;
        use nix::sys::signal::{killpg, Signal};

        let Some(pgid) = self.pgid else {
            return;
        };

        match killpg(pgid, Signal::SIGKILL) {
            Ok(()) => debug!(pgid = pgid.as_raw(), "Killed leftover process group"),
            // Group already empty
            Err(Errno::ESRCH) => {}
            Err(e) => warn!(pgid = pgid.as_raw(), error = %e, "Failed to kill process group"),
        }
    }
}

/// Without process groups only the direct child is killed (`kill_on_drop`).
#[cfg(not(unix))]
struct ProcessGroup;

#[cfg(not(unix))]
impl ProcessGroup {
    fn new(_pid: Option<u32>) -> Self {
        Self
    }
}

/// Run `argv` inside `working_dir`, capturing stdout and stderr.
///
/// The child and every process it started are killed if it outlives
/// `timeout`, if the returned future is dropped before completion, and
/// after it exits.
pub async fn run_bounded(
    argv: &[String],
    working_dir: &Path,
    timeout: Duration,
) -> Result<CapturedOutput, RunnerError> {
    let (program, args) = argv.split_first().ok_or(CoreError::EmptyCommand)?;

    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    #[cfg(unix)]
    cmd.process_group(0);

    debug!(
        program = %program,
        working_dir = %working_dir.display(),
        timeout_ms = timeout.as_millis() as u64,
        "Spawning process"
    );

    let child = cmd.spawn().map_err(|source| RunnerError::Spawn {
        program: program.clone(),
        source,
    })?;
    let _group = ProcessGroup::new(child.id());

    // Dropping the wait future on timeout drops the child, which kills it.
    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => {
            let captured = CapturedOutput::from_bytes(
                &output.stdout,
                &output.stderr,
                output.status.code(),
            );
            debug!(
                program = %program,
                exit_code = ?captured.exit_code,
                stdout_len = captured.stdout.len(),
                stderr_len = captured.stderr.len(),
                "Process exited"
            );
            Ok(captured)
        }
        Ok(Err(source)) => Err(RunnerError::Wait {
            program: program.clone(),
            source,
        }),
        Err(_) => {
            warn!(
                program = %program,
                timeout_ms = timeout.as_millis() as u64,
                "Process timed out, killing process group"
            );
            Err(RunnerError::Timeout {
                program: program.clone(),
                timeout,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), script.to_string()]
    }

    #[tokio::test]
    async fn test_captures_stdout_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let out = run_bounded(
            &sh("echo out; echo err >&2; exit 3"),
            dir.path(),
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        assert_eq!(out.stdout, "out\n");
        assert_eq!(out.stderr, "err\n");
        assert_eq!(out.exit_code, Some(3));
        assert!(!out.success());
    }

    #[tokio::test]
    async fn test_runs_in_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        run_bounded(&sh("printf x > marker"), dir.path(), Duration::from_secs(5))
            .await
            .unwrap();
        assert!(dir.path().join("marker").is_file());
    }

    #[tokio::test]
    async fn test_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_bounded(&sh("sleep 5"), dir.path(), Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let argv = vec!["agentrun-no-such-program".to_string()];
        let err = run_bounded(&argv, dir.path(), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, RunnerError::Spawn { .. }));
        assert!(err.to_string().starts_with("failed to spawn 'agentrun-no-such-program'"));
    }

    #[tokio::test]
    async fn test_empty_argv() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_bounded(&[], dir.path(), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, RunnerError::Core(CoreError::EmptyCommand)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_background_children() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let marker = outside.path().join("marker");
        let script = format!("(sleep 1; echo alive > '{}') & sleep 5", marker.display());

        let err = run_bounded(&sh(&script), dir.path(), Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(err.is_timeout());

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!marker.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_kills_detached_children() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let marker = outside.path().join("marker");
        let script = format!(
            "(sleep 1; echo alive > '{}') >/dev/null 2>&1 & echo started",
            marker.display()
        );

        let out = run_bounded(&sh(&script), dir.path(), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(out.stdout, "started\n");

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!marker.exists());
    }
}
