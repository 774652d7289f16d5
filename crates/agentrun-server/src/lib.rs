//! agentrun HTTP server library.
//!
//! Wires the task runner behind a small HTTP surface: a service
//! descriptor at `/`, task execution at `/task`, and `/health`.

pub mod config;
pub mod http;
pub mod logging;
pub mod state;

pub use config::Config;
pub use state::AppState;
