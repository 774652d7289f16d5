//! Server configuration.

use std::path::PathBuf;
use std::time::Duration;

use agentrun_core::{CommandTemplate, CoreError};
use agentrun_runner::{RunnerConfig, ScriptRuntime};
use clap::Parser;

/// agentrun server - run tasks through a command-line coding agent over HTTP
#[derive(Debug, Clone, Parser)]
#[command(name = "agentrun-server")]
#[command(about = "HTTP server that delegates tasks to a command-line coding agent", long_about = None)]
pub struct Config {
    /// HTTP bind address
    #[arg(long, env = "AGENTRUN_BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: String,

    /// Log file (appended to, in addition to console output)
    #[arg(long, env = "AGENTRUN_LOG_FILE", default_value = "agent_runs.log")]
    pub log_file: PathBuf,

    /// Agent command template; `{task}` is replaced by the task description
    #[arg(
        long,
        env = "AGENTRUN_AGENT_COMMAND",
        default_value = "aider --yes --message {task} --no-git"
    )]
    pub agent_command: CommandTemplate,

    /// Agent name used in the report heading
    #[arg(long, env = "AGENTRUN_AGENT_NAME", default_value = "aider")]
    pub agent_name: String,

    /// Agent label returned in task responses
    #[arg(long, env = "AGENTRUN_AGENT_LABEL", default_value = "aider-cli")]
    pub agent_label: String,

    /// Contact email returned in task responses
    #[arg(long, env = "AGENTRUN_CONTACT_EMAIL", default_value = "admin@localhost")]
    pub contact_email: String,

    /// Agent timeout in seconds
    #[arg(long, env = "AGENTRUN_AGENT_TIMEOUT_SECS", default_value = "60")]
    pub agent_timeout_secs: u64,

    /// Timeout for each produced script in seconds
    #[arg(long, env = "AGENTRUN_SCRIPT_TIMEOUT_SECS", default_value = "10")]
    pub script_timeout_secs: u64,

    /// Script runtime as `<extension>=<command template>` (repeatable)
    #[arg(
        long = "script-runtime",
        env = "AGENTRUN_SCRIPT_RUNTIMES",
        value_delimiter = ';',
        default_value = "py=python3 {file}"
    )]
    pub script_runtimes: Vec<ScriptRuntime>,

    /// Maximum concurrent tasks; further requests wait for a slot
    #[arg(long, env = "AGENTRUN_MAX_CONCURRENT_TASKS", default_value = "4")]
    pub max_concurrent_tasks: usize,

    /// Directory for task workspaces (defaults to the system temp dir)
    #[arg(long, env = "AGENTRUN_WORKSPACE_ROOT")]
    pub workspace_root: Option<PathBuf>,
}

impl Config {
    /// Build and validate the task runner configuration.
    pub fn runner_config(&self) -> Result<RunnerConfig, CoreError> {
        let config = RunnerConfig::default()
            .with_agent_command(self.agent_command.clone())
            .with_agent_name(self.agent_name.clone())
            .with_agent_timeout(Duration::from_secs(self.agent_timeout_secs))
            .with_script_runtimes(self.script_runtimes.clone())
            .with_script_timeout(Duration::from_secs(self.script_timeout_secs))
            .with_max_concurrent_tasks(self.max_concurrent_tasks);

        let config = match &self.workspace_root {
            Some(root) => config.with_workspace_root(root),
            None => config,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_configuration() {
        let config = Config::try_parse_from(["agentrun-server"]).unwrap();
        let runner = config.runner_config().unwrap();
        let defaults = RunnerConfig::default();

        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.agent_label, "aider-cli");
        assert_eq!(runner.agent_command.render_task("x"), defaults.agent_command.render_task("x"));
        assert_eq!(runner.agent_timeout, defaults.agent_timeout);
        assert_eq!(runner.script_timeout, defaults.script_timeout);
        assert_eq!(runner.script_runtimes, defaults.script_runtimes);
        assert_eq!(runner.max_concurrent_tasks, 4);
        assert!(runner.workspace_root.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = Config::try_parse_from([
            "agentrun-server",
            "--agent-command",
            "claude -p {task}",
            "--agent-timeout-secs",
            "120",
            "--script-runtime",
            "py=python3 {file}",
            "--script-runtime",
            "js=node {file}",
            "--max-concurrent-tasks",
            "2",
            "--workspace-root",
            "/var/tmp/agentrun",
        ])
        .unwrap();
        let runner = config.runner_config().unwrap();

        assert_eq!(runner.agent_command.program(), "claude");
        assert_eq!(runner.agent_timeout, Duration::from_secs(120));
        assert_eq!(runner.script_runtimes.len(), 2);
        assert!(runner.runtime_for("app.js").is_some());
        assert_eq!(runner.max_concurrent_tasks, 2);
        assert_eq!(runner.workspace_root, Some(PathBuf::from("/var/tmp/agentrun")));
    }

    #[test]
    fn test_invalid_template_rejected() {
        let result = Config::try_parse_from(["agentrun-server", "--agent-command", "aider '"]);
        assert!(result.is_err());

        let result = Config::try_parse_from(["agentrun-server", "--script-runtime", "python3"]);
        assert!(result.is_err());

        let result = Config::try_parse_from(["agentrun-server", "--script-runtime", "py=python3"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_agent_template_without_task_rejected() {
        let config =
            Config::try_parse_from(["agentrun-server", "--agent-command", "aider --yes"]).unwrap();
        let err = config.runner_config().unwrap_err();
        assert!(matches!(err, CoreError::MissingPlaceholder { .. }));
    }
}
