//! agentrun task runner.
//!
//! Drives an external coding agent inside a throwaway workspace and turns
//! everything it leaves behind into a single text report.
//!
//! # Example
//!
//! ```rust,no_run
//! use agentrun_runner::{RunnerConfig, TaskExecutor, TaskRunner};
//!
//! async fn run() {
//!     let runner = TaskRunner::new(RunnerConfig::default());
//!     let report = runner.run("Write a program that prints 42").await;
//!     println!("{}", report);
//! }
//! ```

pub mod config;
pub mod error;
pub mod process;
pub mod runner;
pub mod workspace;

pub use config::{RunnerConfig, ScriptRuntime};
pub use error::RunnerError;
pub use runner::{TaskExecutor, TaskRunner};
pub use workspace::{Workspace, WorkspaceEntry};
