//! CLI output handler implementation

use super::formatters::ToolFormatter;
use async_trait::async_trait;
use colored::Colorize;
use stock_agent_core::output::{AgentEvent, AgentOutput, OutputResult};
use tracing::{debug, warn};

/// CLI output configuration
#[derive(Debug, Clone, Default)]
pub struct CliOutputConfig {
    /// Print tool calls and run statistics to stdout
    pub show_activity: bool,
}

/// CLI output handler that formats events for terminal display
pub struct CliOutputHandler {
    config: CliOutputConfig,
    tool_formatter: ToolFormatter,
}

impl CliOutputHandler {
    /// Create a new CLI output handler
    pub fn new(config: CliOutputConfig) -> Self {
        Self {
            config,
            tool_formatter: ToolFormatter::new(),
        }
    }
}

#[async_trait]
impl AgentOutput for CliOutputHandler {
    async fn emit_event(&self, event: AgentEvent) -> OutputResult {
        match event {
            AgentEvent::ExecutionStarted { context } => {
                debug!("Run {} started: {}", context.run_id, context.query);
            }

            AgentEvent::ExecutionCompleted {
                context,
                success,
                summary,
            } => {
                if success {
                    debug!("Run completed: {}", summary);
                } else {
                    debug!("Run failed: {}", summary);
                }

                if self.config.show_activity {
                    println!(
                        "{}",
                        format!(
                            "{} steps in {:.2}s",
                            context.current_step,
                            context.execution_time.as_secs_f64()
                        )
                        .dimmed()
                    );
                    let usage = &context.token_usage;
                    if usage.total_tokens > 0 {
                        println!(
                            "{}",
                            format!(
                                "Tokens: {} input + {} output = {} total",
                                usage.input_tokens, usage.output_tokens, usage.total_tokens
                            )
                            .dimmed()
                        );
                    }
                }
            }

            AgentEvent::StepStarted { step_number } => {
                debug!("Step {}", step_number);
            }

            AgentEvent::ToolExecutionStarted { tool_info } => {
                debug!("Calling {} ({})", tool_info.tool_name, tool_info.execution_id);
            }

            AgentEvent::ToolExecutionCompleted { tool_info } => {
                if self.config.show_activity {
                    println!("{}", self.tool_formatter.format_tool_status(&tool_info));
                    if let Some(result) = self.tool_formatter.format_tool_result(&tool_info) {
                        println!("{}", result);
                    }
                }
            }

            AgentEvent::ResultRetry {
                retry,
                max_retries,
                reason,
            } => {
                warn!("Model answer rejected ({}/{}): {}", retry, max_retries, reason);
            }

            AgentEvent::TokenUsageUpdated { token_usage } => {
                debug!("Tokens so far: {}", token_usage.total_tokens);
            }
        }

        Ok(())
    }

    async fn flush(&self) -> OutputResult {
        use std::io::Write;
        std::io::stdout().flush().map_err(|e| e.into())
    }
}
