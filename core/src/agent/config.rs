//! Agent configuration structures

use crate::quote::QuoteSource;
use crate::tools::builtin::{FINAL_RESULT_TOOL_NAME, STOCK_PRICE_TOOL_NAME};
use crate::tools::ToolRegistry;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Configuration for an agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum number of model requests per run
    pub max_steps: usize,

    /// How many rejected answers the model may correct before the run fails
    #[serde(default = "default_max_result_retries")]
    pub max_result_retries: usize,

    /// List of tools available to this agent
    pub tools: Vec<String>,

    /// Custom system prompt, replacing the built-in one
    #[serde(default)]
    pub system_prompt: Option<String>,
}

fn default_max_result_retries() -> usize {
    1
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: 10,
            max_result_retries: default_max_result_retries(),
            tools: vec![
                STOCK_PRICE_TOOL_NAME.to_string(),
                FINAL_RESULT_TOOL_NAME.to_string(),
            ],
            system_prompt: None,
        }
    }
}

/// Builder for creating agents with resolved LLM configuration
pub struct AgentBuilder {
    llm_config: crate::config::ResolvedLlmConfig,
    agent_config: AgentConfig,
    quote_source: Option<Arc<dyn QuoteSource>>,
}

impl AgentBuilder {
    /// Create a new agent builder with LLM configuration
    pub fn new(llm_config: crate::config::ResolvedLlmConfig) -> Self {
        Self {
            llm_config,
            agent_config: AgentConfig::default(),
            quote_source: None,
        }
    }

    /// Set agent configuration
    pub fn with_agent_config(mut self, agent_config: AgentConfig) -> Self {
        self.agent_config = agent_config;
        self
    }

    /// Set maximum steps
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.agent_config.max_steps = max_steps;
        self
    }

    /// Set tools
    pub fn with_tools(mut self, tools: Vec<String>) -> Self {
        self.agent_config.tools = tools;
        self
    }

    /// Set system prompt
    pub fn with_system_prompt(mut self, system_prompt: Option<String>) -> Self {
        self.agent_config.system_prompt = system_prompt;
        self
    }

    /// Price lookups go through `source` instead of Yahoo Finance
    pub fn with_quote_source(mut self, source: Arc<dyn QuoteSource>) -> Self {
        self.quote_source = Some(source);
        self
    }

    /// Build the agent with the given output handler
    pub fn build_with_output(
        self,
        output: Box<dyn crate::output::AgentOutput>,
    ) -> crate::error::Result<super::AgentCore> {
        let registry = match self.quote_source {
            Some(source) => ToolRegistry::with_quote_source(source),
            None => ToolRegistry::with_yahoo()?,
        };
        super::AgentCore::new_with_llm_config(self.agent_config, self.llm_config, output, registry)
    }

    /// Build the agent with null output
    pub fn build(self) -> crate::error::Result<super::AgentCore> {
        self.build_with_output(Box::new(crate::output::NullOutput))
    }
}
