//! Runner configuration.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use agentrun_core::command::{FILE_PLACEHOLDER, TASK_PLACEHOLDER};
use agentrun_core::{CommandTemplate, CoreError};

/// Maps a file extension to the command used to execute it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRuntime {
    /// Extension without the leading dot, e.g. `py`.
    pub extension: String,

    /// Command template; `{file}` is replaced by the artifact file name.
    pub command: CommandTemplate,
}

impl ScriptRuntime {
    /// Create a runtime for files ending in `.{extension}`.
    pub fn new(extension: impl Into<String>, command: CommandTemplate) -> Self {
        let extension = extension.into();
        Self {
            extension: extension.trim_start_matches('.').to_string(),
            command,
        }
    }

    /// The reference runtime: `python3 {file}` for `.py` files.
    pub fn python() -> Self {
        Self::new("py", CommandTemplate::from_parts("python3", ["{file}"]))
    }

    /// Returns true if `file_name` should be run with this runtime.
    pub fn matches(&self, file_name: &str) -> bool {
        Path::new(file_name)
            .extension()
            .is_some_and(|ext| ext == self.extension.as_str())
    }
}

impl FromStr for ScriptRuntime {
    type Err = CoreError;

    /// Parse `<extension>=<command template>`, e.g. `py=python3 {file}`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (extension, command) = s
            .split_once('=')
            .ok_or_else(|| CoreError::InvalidRuntime(s.to_string()))?;

        let extension = extension.trim();
        if extension.is_empty() || extension == "." {
            return Err(CoreError::InvalidRuntime(s.to_string()));
        }

        let command = CommandTemplate::parse(command)?;
        command.require(FILE_PLACEHOLDER)?;
        Ok(Self::new(extension, command))
    }
}

/// Task runner configuration.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Agent invocation; `{task}` is replaced by the task description.
    pub agent_command: CommandTemplate,

    /// Agent name, used as the heading of the agent output block.
    pub agent_name: String,

    /// Upper bound for the agent process.
    pub agent_timeout: Duration,

    /// Runtimes for executing produced scripts.
    pub script_runtimes: Vec<ScriptRuntime>,

    /// Upper bound for each produced script.
    pub script_timeout: Duration,

    /// Maximum number of tasks running at once; further tasks wait.
    pub max_concurrent_tasks: usize,

    /// Directory under which workspaces are created (system temp dir if unset).
    pub workspace_root: Option<PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            agent_command: CommandTemplate::from_parts(
                "aider",
                ["--yes", "--message", "{task}", "--no-git"],
            ),
            agent_name: "aider".to_string(),
            agent_timeout: Duration::from_secs(60),
            script_runtimes: vec![ScriptRuntime::python()],
            script_timeout: Duration::from_secs(10),
            max_concurrent_tasks: 4,
            workspace_root: None,
        }
    }
}

impl RunnerConfig {
    /// Set the agent command template.
    pub fn with_agent_command(mut self, command: CommandTemplate) -> Self {
        self.agent_command = command;
        self
    }

    /// Set the agent name.
    pub fn with_agent_name(mut self, name: impl Into<String>) -> Self {
        self.agent_name = name.into();
        self
    }

    /// Set the agent timeout.
    pub fn with_agent_timeout(mut self, timeout: Duration) -> Self {
        self.agent_timeout = timeout;
        self
    }

    /// Replace the script runtimes.
    pub fn with_script_runtimes(mut self, runtimes: Vec<ScriptRuntime>) -> Self {
        self.script_runtimes = runtimes;
        self
    }

    /// Set the script timeout.
    pub fn with_script_timeout(mut self, timeout: Duration) -> Self {
        self.script_timeout = timeout;
        self
    }

    /// Set the concurrency cap. Zero is treated as one.
    pub fn with_max_concurrent_tasks(mut self, max: usize) -> Self {
        self.max_concurrent_tasks = max.max(1);
        self
    }

    /// Create workspaces under `root` instead of the system temp dir.
    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(root.into());
        self
    }

    /// Check that every template references its placeholder.
    ///
    /// An agent template without `{task}` would silently drop every task.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.agent_command.require(TASK_PLACEHOLDER)?;
        for runtime in &self.script_runtimes {
            runtime.command.require(FILE_PLACEHOLDER)?;
        }
        Ok(())
    }

    /// First runtime whose extension matches `file_name`.
    pub fn runtime_for(&self, file_name: &str) -> Option<&ScriptRuntime> {
        self.script_runtimes.iter().find(|rt| rt.matches(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference_configuration() {
        let config = RunnerConfig::default();
        assert_eq!(
            config.agent_command.render_task("do it"),
            vec!["aider", "--yes", "--message", "do it", "--no-git"]
        );
        assert_eq!(config.agent_timeout, Duration::from_secs(60));
        assert_eq!(config.script_timeout, Duration::from_secs(10));
        assert_eq!(config.script_runtimes, vec![ScriptRuntime::python()]);
        assert!(config.workspace_root.is_none());
    }

    #[test]
    fn test_runtime_matching() {
        let config = RunnerConfig::default();
        assert!(config.runtime_for("gcd.py").is_some());
        assert!(config.runtime_for("notes.txt").is_none());
        assert!(config.runtime_for("py").is_none());
        assert!(config.runtime_for("archive.py.txt").is_none());
    }

    #[test]
    fn test_parse_runtime_spec() {
        let runtime: ScriptRuntime = "sh=sh {file}".parse().unwrap();
        assert_eq!(runtime.extension, "sh");
        assert_eq!(runtime.command.render_file("run.sh"), vec!["sh", "run.sh"]);

        let dotted: ScriptRuntime = ".js=node {file}".parse().unwrap();
        assert_eq!(dotted.extension, "js");
    }

    #[test]
    fn test_parse_runtime_spec_errors() {
        assert!(matches!(
            "python3 {file}".parse::<ScriptRuntime>(),
            Err(CoreError::InvalidRuntime(_))
        ));
        assert!(matches!(
            "=python3 {file}".parse::<ScriptRuntime>(),
            Err(CoreError::InvalidRuntime(_))
        ));
        assert!(matches!(
            "py=".parse::<ScriptRuntime>(),
            Err(CoreError::EmptyCommand)
        ));
        assert!(matches!(
            "py=python3 main.py".parse::<ScriptRuntime>(),
            Err(CoreError::MissingPlaceholder { .. })
        ));
    }

    #[test]
    fn test_validate() {
        assert!(RunnerConfig::default().validate().is_ok());

        let no_task = RunnerConfig::default()
            .with_agent_command(CommandTemplate::from_parts("aider", ["--yes"]));
        assert!(matches!(
            no_task.validate(),
            Err(CoreError::MissingPlaceholder { placeholder: "{task}", .. })
        ));

        let no_file = RunnerConfig::default().with_script_runtimes(vec![ScriptRuntime::new(
            "py",
            CommandTemplate::from_parts("python3", ["main.py"]),
        )]);
        assert!(matches!(
            no_file.validate(),
            Err(CoreError::MissingPlaceholder { placeholder: "{file}", .. })
        ));
    }

    #[test]
    fn test_builder() {
        let config = RunnerConfig::default()
            .with_agent_name("claude")
            .with_agent_timeout(Duration::from_secs(5))
            .with_script_timeout(Duration::from_secs(1))
            .with_max_concurrent_tasks(0)
            .with_script_runtimes(vec![])
            .with_workspace_root("/tmp/agentrun");

        assert_eq!(config.agent_name, "claude");
        assert_eq!(config.max_concurrent_tasks, 1);
        assert!(config.runtime_for("a.py").is_none());
        assert_eq!(config.workspace_root, Some(PathBuf::from("/tmp/agentrun")));
    }
}
