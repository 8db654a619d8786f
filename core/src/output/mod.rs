//! Output abstraction for agent runs
//!
//! The agent loop reports progress as [`AgentEvent`]s. Front ends decide how
//! to show them: the console prints tool activity, the web server only logs.

use crate::tools::{ToolCall, ToolResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result type for output handlers
pub type OutputResult = std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Output handler that discards all events
pub struct NullOutput;

#[async_trait]
impl AgentOutput for NullOutput {
    async fn emit_event(&self, _event: AgentEvent) -> OutputResult {
        Ok(())
    }
}

/// Status of tool execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolExecutionStatus {
    Executing,
    Success,
    Error,
}

/// Tool execution information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolExecutionInfo {
    /// Tool call id assigned by the model
    pub execution_id: String,
    pub tool_name: String,
    pub parameters: HashMap<String, serde_json::Value>,
    pub status: ToolExecutionStatus,
    /// Tool result, once completed
    pub result: Option<ToolResult>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ToolExecutionInfo {
    /// Snapshot a tool call at the given status
    pub fn from_call(
        tool_call: &ToolCall,
        status: ToolExecutionStatus,
        result: Option<&ToolResult>,
    ) -> Self {
        let parameters = match &tool_call.parameters {
            serde_json::Value::Object(map) => {
                map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
            }
            other => HashMap::from([("raw_parameters".to_string(), other.clone())]),
        };

        Self {
            execution_id: tool_call.id.clone(),
            tool_name: tool_call.name.clone(),
            parameters,
            status,
            result: result.cloned(),
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Fold one response's usage into the running total
    pub fn add(&mut self, usage: &crate::llm::Usage) {
        self.input_tokens += usage.prompt_tokens;
        self.output_tokens += usage.completion_tokens;
        self.total_tokens += usage.total_tokens;
    }
}

/// Run-level context shared with output handlers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentExecutionContext {
    /// Run identifier, used to correlate log lines
    pub run_id: String,
    /// User query being answered
    pub query: String,
    pub model: String,
    pub max_steps: usize,
    pub current_step: usize,
    pub execution_time: std::time::Duration,
    pub token_usage: TokenUsage,
}

/// Events that can be emitted during an agent run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AgentEvent {
    ExecutionStarted {
        context: AgentExecutionContext,
    },
    ExecutionCompleted {
        context: AgentExecutionContext,
        success: bool,
        summary: String,
    },
    /// A model request is about to be made
    StepStarted {
        step_number: usize,
    },
    ToolExecutionStarted {
        tool_info: ToolExecutionInfo,
    },
    ToolExecutionCompleted {
        tool_info: ToolExecutionInfo,
    },
    /// The model's answer was rejected and it has been asked to try again
    ResultRetry {
        retry: usize,
        max_retries: usize,
        reason: String,
    },
    /// Emitted after each model call
    TokenUsageUpdated {
        token_usage: TokenUsage,
    },
}

/// Abstract output interface for agent runs
#[async_trait]
pub trait AgentOutput: Send + Sync {
    /// Emit an agent event
    async fn emit_event(&self, event: AgentEvent) -> OutputResult;

    /// Emit token usage update
    async fn emit_token_update(&self, token_usage: TokenUsage) -> OutputResult {
        self.emit_event(AgentEvent::TokenUsageUpdated { token_usage })
            .await
    }

    /// Flush any buffered output
    async fn flush(&self) -> OutputResult {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_execution_info_copies_object_parameters() {
        let call = ToolCall::new("get_stock_price", json!({"symbol": "AAPL"}));
        let info = ToolExecutionInfo::from_call(&call, ToolExecutionStatus::Executing, None);
        assert_eq!(info.execution_id, call.id);
        assert_eq!(info.parameters["symbol"], json!("AAPL"));
        assert!(info.result.is_none());
    }

    #[test]
    fn test_execution_info_wraps_non_object_parameters() {
        let call = ToolCall::new("get_stock_price", json!("AAPL"));
        let info = ToolExecutionInfo::from_call(&call, ToolExecutionStatus::Error, None);
        assert_eq!(info.parameters["raw_parameters"], json!("AAPL"));
    }

    #[test]
    fn test_token_usage_accumulates() {
        let mut total = TokenUsage::default();
        let usage = crate::llm::Usage {
            prompt_tokens: 120,
            completion_tokens: 30,
            total_tokens: 150,
        };
        total.add(&usage);
        total.add(&usage);
        assert_eq!(total.total_tokens, 300);
        assert_eq!(total.input_tokens, 240);
    }

    #[tokio::test]
    async fn test_null_output_accepts_everything() {
        let output = NullOutput;
        assert!(output.info("hello").await.is_ok());
        assert!(output.emit_token_update(TokenUsage::default()).await.is_ok());
    }
}
