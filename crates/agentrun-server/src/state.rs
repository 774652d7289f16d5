//! Shared application state.

use std::sync::Arc;

use agentrun_core::CoreError;
use agentrun_runner::{TaskExecutor, TaskRunner};

use crate::config::Config;

/// Shared application state.
pub struct AppState {
    /// Runs tasks and renders their reports.
    pub executor: Arc<dyn TaskExecutor>,

    /// Agent label echoed in task responses.
    pub agent_label: String,

    /// Contact email echoed in task responses.
    pub contact_email: String,
}

impl AppState {
    /// Create a new AppState wrapped in Arc.
    pub fn new(
        executor: Arc<dyn TaskExecutor>,
        agent_label: impl Into<String>,
        contact_email: impl Into<String>,
    ) -> Arc<Self> {
        Arc::new(Self {
            executor,
            agent_label: agent_label.into(),
            contact_email: contact_email.into(),
        })
    }

    /// Create the state with a [`TaskRunner`] built from the server config.
    pub fn from_config(config: &Config) -> Result<Arc<Self>, CoreError> {
        let runner = TaskRunner::new(config.runner_config()?);
        Ok(Self::new(
            Arc::new(runner),
            config.agent_label.clone(),
            config.contact_email.clone(),
        ))
    }
}
