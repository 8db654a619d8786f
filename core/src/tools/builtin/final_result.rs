//! Structured answer tool
//!
//! The model ends a run by calling this tool with a [`StockPriceResult`].
//! The agent loop reads the validated record back from the result data.

use crate::error::{Result, ToolError};
use crate::impl_tool_factory;
use crate::stock::StockPriceResult;
use crate::tools::{Tool, ToolCall, ToolExample, ToolResult};
use async_trait::async_trait;
use serde_json::json;

pub const FINAL_RESULT_TOOL_NAME: &str = "final_result";

/// Accepts the model's final answer
pub struct FinalResultTool;

impl FinalResultTool {
    pub fn new() -> Self {
        Self
    }

    /// Parse and validate a candidate answer
    pub fn parse(call: &ToolCall) -> Result<StockPriceResult> {
        let result: StockPriceResult = call.parse_parameters()?;
        result
            .validate()
            .map_err(|message| ToolError::InvalidParameters { message })?;
        Ok(result)
    }
}

impl Default for FinalResultTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for FinalResultTool {
    fn name(&self) -> &str {
        FINAL_RESULT_TOOL_NAME
    }

    fn description(&self) -> &str {
        "The final response which ends this conversation. Call it once the \
         price has been looked up with get_stock_price."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        StockPriceResult::json_schema()
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let result = Self::parse(&call)?;
        let data = serde_json::to_value(&result)?;
        Ok(ToolResult::success(call.id, "Final result processed.".to_string()).with_data(data))
    }

    fn examples(&self) -> Vec<ToolExample> {
        vec![ToolExample {
            description: "Answer a question about Apple".to_string(),
            parameters: json!({
                "symbol": "AAPL",
                "price": 227.52,
                "currency": "USD",
                "message": "Apple Inc. (AAPL) is currently trading at $227.52."
            }),
            expected_result: "Final result processed.".to_string(),
        }]
    }
}

impl_tool_factory!(
    FinalResultToolFactory,
    FinalResultTool,
    FINAL_RESULT_TOOL_NAME,
    "Return the structured stock price answer"
);
