//! Terminal formatting for tool activity

use colored::Colorize;
use stock_agent_core::output::{ToolExecutionInfo, ToolExecutionStatus};

const MAX_RESULT_CHARS: usize = 200;

/// Formats tool executions as one status line plus an optional result line
#[derive(Debug, Default, Clone, Copy)]
pub struct ToolFormatter;

impl ToolFormatter {
    pub fn new() -> Self {
        Self
    }

    /// `⏺ get_stock_price(symbol=AAPL)` with the dot colored by status
    pub fn format_tool_status(&self, info: &ToolExecutionInfo) -> String {
        let dot = match info.status {
            ToolExecutionStatus::Executing => "⏺".white(),
            ToolExecutionStatus::Success => "⏺".green(),
            ToolExecutionStatus::Error => "⏺".red(),
        };
        format!("{} {}({})", dot, info.tool_name.bold(), format_arguments(info))
    }

    /// Result content under the status line, truncated
    pub fn format_tool_result(&self, info: &ToolExecutionInfo) -> Option<String> {
        let result = info.result.as_ref()?;
        let content = result.content.trim();
        if content.is_empty() {
            return None;
        }

        let mut display: String = content.chars().take(MAX_RESULT_CHARS).collect();
        if content.chars().count() > MAX_RESULT_CHARS {
            display.push_str("...");
        }

        let display = if result.success {
            display.dimmed()
        } else {
            display.red()
        };
        Some(format!("  ⎿  {}", display))
    }
}

/// `key=value` pairs sorted by key; strings unquoted
fn format_arguments(info: &ToolExecutionInfo) -> String {
    let mut pairs: Vec<(&String, &serde_json::Value)> = info.parameters.iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    pairs
        .into_iter()
        .map(|(key, value)| match value {
            serde_json::Value::String(s) => format!("{}={}", key, s),
            other => format!("{}={}", key, other),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
