//! agentrun server

use std::net::SocketAddr;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use agentrun_server::{http, logging, AppState, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();

    // Initialize tracing (console + log file)
    logging::init(&config.log_file)?;

    let addr: SocketAddr = config.bind_addr.parse()?;
    let state = AppState::from_config(&config)?;

    info!(
        addr = %addr,
        agent = %config.agent_command,
        agent_timeout_secs = config.agent_timeout_secs,
        script_timeout_secs = config.script_timeout_secs,
        max_concurrent_tasks = config.max_concurrent_tasks,
        "Starting agentrun server"
    );

    let router = http::create_router(state);
    let listener = TcpListener::bind(addr).await?;

    info!("HTTP server listening on {}", addr);

    if let Err(e) = axum::serve(listener, router).await {
        tracing::error!(error = %e, "HTTP server error");
        return Err(e.into());
    }

    Ok(())
}
