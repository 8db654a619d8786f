//! Price lookup tool

use crate::error::Result;
use crate::quote::QuoteSource;
use crate::stock::StockQuote;
use crate::tools::{Tool, ToolCall, ToolExample, ToolFactory, ToolResult};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

pub const STOCK_PRICE_TOOL_NAME: &str = "get_stock_price";

#[derive(Debug, Deserialize)]
struct StockPriceArgs {
    symbol: String,
}

/// Looks up the last traded price of a ticker
pub struct StockPriceTool {
    source: Arc<dyn QuoteSource>,
}

impl StockPriceTool {
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self { source }
    }

    /// Fetch and round a quote without going through a [`ToolCall`]
    pub async fn lookup(&self, symbol: &str) -> Result<StockQuote> {
        let last = self.source.last_price(symbol).await?;
        Ok(StockQuote::from(&last))
    }
}

#[async_trait]
impl Tool for StockPriceTool {
    fn name(&self) -> &str {
        STOCK_PRICE_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Get the current stock price for a ticker symbol.\n\
         Returns the last traded price rounded to two decimals and its currency."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "symbol": {
                    "type": "string",
                    "description": "Ticker symbol, e.g. AAPL"
                }
            },
            "required": ["symbol"]
        })
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let args: StockPriceArgs = call.parse_parameters()?;
        tracing::debug!("{} via {}: {}", STOCK_PRICE_TOOL_NAME, self.source.name(), args.symbol);

        let quote = self.lookup(&args.symbol).await?;
        let data = serde_json::to_value(&quote)?;
        let content = data.to_string();

        Ok(ToolResult::success(call.id, content).with_data(data))
    }

    fn examples(&self) -> Vec<ToolExample> {
        vec![ToolExample {
            description: "Look up Apple's share price".to_string(),
            parameters: json!({"symbol": "AAPL"}),
            expected_result: r#"{"price": 227.52, "currency": "USD"}"#.to_string(),
        }]
    }
}

/// Factory that hands every created tool the same quote source
pub struct StockPriceToolFactory {
    source: Arc<dyn QuoteSource>,
}

impl StockPriceToolFactory {
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self { source }
    }
}

impl ToolFactory for StockPriceToolFactory {
    fn create(&self) -> Box<dyn Tool> {
        Box::new(StockPriceTool::new(self.source.clone()))
    }

    fn tool_name(&self) -> &str {
        STOCK_PRICE_TOOL_NAME
    }

    fn tool_description(&self) -> &str {
        "Get the current stock price for a ticker symbol"
    }
}
