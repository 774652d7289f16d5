//! The task pipeline: workspace, agent, artifacts, report.

use std::sync::Arc;

use agentrun_core::{
    Artifact, ArtifactContent, RunId, ScriptOutcome, TaskOutcome, TaskReport,
};
use async_trait::async_trait;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::config::{RunnerConfig, ScriptRuntime};
use crate::error::RunnerError;
use crate::process::run_bounded;
use crate::workspace::{Workspace, WorkspaceEntry};

/// Recorded instead of running a script whose name cannot be passed as text.
const NON_UTF8_NAME: &str = "file name is not valid UTF-8";

/// Anything that turns a task description into a report string.
///
/// Implementations must never fail: every error is rendered into the
/// returned string.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    /// Run a task and return the report.
    async fn run(&self, task: &str) -> String;
}

/// Runs tasks through the external agent, one workspace per task.
#[derive(Clone)]
pub struct TaskRunner {
    config: Arc<RunnerConfig>,
    slots: Arc<Semaphore>,
}

impl TaskRunner {
    /// Create a runner with the given configuration.
    pub fn new(config: RunnerConfig) -> Self {
        let slots = Arc::new(Semaphore::new(config.max_concurrent_tasks.max(1)));
        Self {
            config: Arc::new(config),
            slots,
        }
    }

    /// Number of tasks that could start right now without waiting.
    pub fn available_slots(&self) -> usize {
        self.slots.available_permits()
    }

    /// Run a task to its final outcome.
    ///
    /// Waits for a free slot first when the concurrency cap is reached.
    pub async fn execute(&self, task: &str) -> TaskOutcome {
        let run_id = RunId::generate();

        if self.slots.available_permits() == 0 {
            info!(run_id = %run_id, "All task slots busy, waiting");
        }
        let _permit = match self.slots.acquire().await {
            Ok(permit) => permit,
            Err(_) => return TaskOutcome::Failed(RunnerError::Closed.to_string()),
        };

        info!(run_id = %run_id, task = %task, "Starting agent task");

        let outcome = match self.run_in_workspace(&run_id, task).await {
            Ok(report) => TaskOutcome::Completed(report),
            Err(e) if e.is_timeout() => TaskOutcome::TimedOut,
            Err(e) => TaskOutcome::Failed(e.to_string()),
        };

        match &outcome {
            TaskOutcome::Completed(report) => info!(
                run_id = %run_id,
                artifacts = report.artifacts.len(),
                executed = report.executed_count(),
                "Task completed"
            ),
            TaskOutcome::TimedOut => error!(
                run_id = %run_id,
                timeout_secs = self.config.agent_timeout.as_secs(),
                "Task timed out"
            ),
            TaskOutcome::Failed(reason) => error!(run_id = %run_id, error = %reason, "Task failed"),
        }

        outcome
    }

    /// Create the workspace, run the pipeline in it, then remove it.
    async fn run_in_workspace(&self, run_id: &RunId, task: &str) -> Result<TaskReport, RunnerError> {
        let workspace = Workspace::create(self.config.workspace_root.as_deref(), run_id)?;

        let result = self.build_report(run_id, &workspace, task).await;

        let path = workspace.path().to_path_buf();
        if let Err(e) = workspace.close() {
            warn!(run_id = %run_id, path = %path.display(), error = %e, "Failed to remove workspace");
        }

        result
    }

    async fn build_report(
        &self,
        run_id: &RunId,
        workspace: &Workspace,
        task: &str,
    ) -> Result<TaskReport, RunnerError> {
        let argv = self.config.agent_command.render_task(task);
        let agent = run_bounded(&argv, workspace.path(), self.config.agent_timeout).await?;

        if !agent.success() {
            warn!(
                run_id = %run_id,
                exit_code = ?agent.exit_code,
                stderr_len = agent.stderr.len(),
                "Agent exited unsuccessfully"
            );
        }

        let mut artifacts = Vec::new();
        for entry in workspace.files().await? {
            artifacts.push(self.inspect_artifact(run_id, workspace, entry).await);
        }

        Ok(TaskReport {
            agent_name: self.config.agent_name.clone(),
            agent,
            artifacts,
        })
    }

    /// Read one artifact and execute it if it is a known script type.
    ///
    /// Never fails: problems are recorded in the returned artifact.
    async fn inspect_artifact(
        &self,
        run_id: &RunId,
        workspace: &Workspace,
        entry: WorkspaceEntry,
    ) -> Artifact {
        let content = match tokio::fs::read_to_string(&entry.path).await {
            Ok(content) => content,
            Err(e) => {
                warn!(run_id = %run_id, file = %entry.name, error = %e, "Could not read artifact");
                return Artifact {
                    name: entry.name,
                    content: ArtifactContent::Unreadable(e.to_string()),
                    execution: None,
                };
            }
        };

        let execution = match self.config.runtime_for(&entry.name) {
            Some(runtime) => Some(match entry.path.file_name().and_then(|n| n.to_str()) {
                Some(file_name) => self.execute_script(run_id, workspace, runtime, file_name).await,
                None => {
                    warn!(run_id = %run_id, file = %entry.name, "Script name is not valid UTF-8");
                    ScriptOutcome::Failed(NON_UTF8_NAME.to_string())
                }
            }),
            None => None,
        };

        Artifact {
            name: entry.name,
            content: ArtifactContent::Text(content),
            execution,
        }
    }

    async fn execute_script(
        &self,
        run_id: &RunId,
        workspace: &Workspace,
        runtime: &ScriptRuntime,
        file_name: &str,
    ) -> ScriptOutcome {
        info!(
            run_id = %run_id,
            file = %file_name,
            runtime = %runtime.command,
            "Executing produced script"
        );

        let argv = runtime.command.render_file(file_name);
        match run_bounded(&argv, workspace.path(), self.config.script_timeout).await {
            Ok(output) => {
                debug!(run_id = %run_id, file = %file_name, exit_code = ?output.exit_code, "Script finished");
                ScriptOutcome::Completed(output)
            }
            Err(RunnerError::Timeout { timeout, .. }) => {
                warn!(run_id = %run_id, file = %file_name, "Script timed out");
                ScriptOutcome::TimedOut(timeout)
            }
            Err(e) => {
                warn!(run_id = %run_id, file = %file_name, error = %e, "Script could not be executed");
                ScriptOutcome::Failed(e.to_string())
            }
        }
    }
}

#[async_trait]
impl TaskExecutor for TaskRunner {
    async fn run(&self, task: &str) -> String {
        self.execute(task).await.into_output()
    }
}
