//! Command templates for the agent and script runtimes.
//!
//! A template is tokenized once with shell quoting rules, then rendered
//! per invocation by substituting a placeholder inside each token. The
//! substituted value is never re-split, so a task description with spaces
//! or quotes always arrives as a single argument.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Placeholder replaced by the task description in agent templates.
pub const TASK_PLACEHOLDER: &str = "{task}";

/// Placeholder replaced by the artifact file name in script templates.
pub const FILE_PLACEHOLDER: &str = "{file}";

/// Tokenized argv template, e.g. `aider --yes --message {task} --no-git`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    source: String,
    argv: Vec<String>,
}

impl CommandTemplate {
    /// Parse a template string using shell-words quoting rules.
    pub fn parse(template: &str) -> Result<Self, CoreError> {
        let argv = shell_words::split(template).map_err(|e| CoreError::InvalidTemplate {
            template: template.to_string(),
            reason: e.to_string(),
        })?;

        if argv.is_empty() {
            return Err(CoreError::EmptyCommand);
        }

        Ok(Self {
            source: template.to_string(),
            argv,
        })
    }

    /// Build a template from a program and its arguments.
    pub fn from_parts<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = vec![program.into()];
        argv.extend(args.into_iter().map(Into::into));
        Self {
            source: shell_words::join(&argv),
            argv,
        }
    }

    /// The program name (first token).
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    /// Returns true if any token references `placeholder`.
    pub fn uses(&self, placeholder: &str) -> bool {
        self.argv.iter().any(|arg| arg.contains(placeholder))
    }

    /// Fail unless some token references `placeholder`.
    pub fn require(&self, placeholder: &'static str) -> Result<(), CoreError> {
        if self.uses(placeholder) {
            Ok(())
        } else {
            Err(CoreError::MissingPlaceholder {
                template: self.source.clone(),
                placeholder,
            })
        }
    }

    /// Render the full argv, substituting `placeholder` with `value`.
    pub fn render(&self, placeholder: &str, value: &str) -> Vec<String> {
        self.argv
            .iter()
            .map(|arg| arg.replace(placeholder, value))
            .collect()
    }

    /// Render an agent invocation for a task description.
    pub fn render_task(&self, task: &str) -> Vec<String> {
        self.render(TASK_PLACEHOLDER, task)
    }

    /// Render a script invocation for an artifact file name.
    pub fn render_file(&self, file: &str) -> Vec<String> {
        self.render(FILE_PLACEHOLDER, file)
    }
}

impl FromStr for CommandTemplate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
