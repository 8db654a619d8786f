//! Direct price lookup without the model

use crate::config::CliConfigLoader;
use anyhow::{Context, Result};
use std::sync::Arc;
use stock_agent_core::tools::builtin::StockPriceTool;
use stock_agent_core::YahooQuoteSource;
use tracing::info;

/// Print the price lookup tool's record for `symbol`
pub async fn quote_command(symbol: String, config_loader: CliConfigLoader) -> Result<()> {
    let base_url = config_loader.load_quote_base_url().await?;
    info!("Looking up {} via {}", symbol, base_url);

    let tool = StockPriceTool::new(Arc::new(YahooQuoteSource::with_base_url(base_url)?));
    let quote = tool
        .lookup(&symbol)
        .await
        .with_context(|| format!("Failed to look up {}", symbol))?;

    println!("{}", serde_json::to_string_pretty(&quote)?);
    Ok(())
}
