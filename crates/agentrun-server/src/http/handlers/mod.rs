//! HTTP request handlers.

mod health;
mod root;
mod task;

pub use health::health_check;
pub use root::root;
pub use task::run_task;
