//! Web form server command

use crate::config::CliConfigLoader;
use crate::runner::AgentRunner;
use crate::web::{router, AppState};
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use stock_agent_core::AgentConfig;
use tracing::info;

/// Serve the form until Ctrl-C
pub async fn serve_command(
    bind: SocketAddr,
    config_loader: CliConfigLoader,
    max_steps: Option<usize>,
) -> Result<()> {
    let app_config = config_loader.load().await?;

    let mut agent_config = AgentConfig::default();
    if let Some(steps) = max_steps {
        agent_config.max_steps = steps;
    }

    let runner = AgentRunner::new(&app_config, agent_config)?;
    info!("Using model: {}", runner.model());
    let app = router(AppState::new(Arc::new(runner)));

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    let local_addr = listener.local_addr()?;
    info!("Listening on http://{}", local_addr);
    println!("Stock Price AI Assistant running at http://{}", local_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
            }
        })
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}
