//! One-shot console query

use crate::config::CliConfigLoader;
use crate::output::{CliOutputConfig, CliOutputHandler};
use crate::runner::AgentRunner;
use anyhow::Result;
use stock_agent_core::AgentConfig;
use tracing::{debug, info};

/// Query used when none is given on the command line
pub const DEFAULT_QUERY: &str = "what is the current price of Apple Inc. (AAPL)?";

/// Answer a single query and print the result
pub async fn ask_command(
    query: Option<String>,
    config_loader: CliConfigLoader,
    max_steps: Option<usize>,
    debug_output: bool,
) -> Result<()> {
    let query = query.unwrap_or_else(|| DEFAULT_QUERY.to_string());

    let app_config = config_loader.load().await?;
    info!("Using protocol: {}", app_config.llm.protocol);
    info!("Using model: {}", app_config.llm.model);
    debug!("Quote source: {}", app_config.quote_base_url);

    let mut agent_config = AgentConfig::default();
    if let Some(steps) = max_steps {
        agent_config.max_steps = steps;
    }

    let cli_output = Box::new(CliOutputHandler::new(CliOutputConfig {
        show_activity: debug_output,
    }));
    let mut agent = AgentRunner::new(&app_config, agent_config)?.build(cli_output)?;

    let run = agent.run(&query).await?;
    println!("{}", run.output);

    Ok(())
}
