//! Builds a fresh agent per query from the loaded configuration

use crate::config::AppConfig;
use async_trait::async_trait;
use std::sync::Arc;
use stock_agent_core::output::{AgentOutput, NullOutput};
use stock_agent_core::{
    AgentBuilder, AgentConfig, AgentCore, AgentRun, QuoteSource, ResolvedLlmConfig,
    YahooQuoteSource,
};

/// Something that answers stock questions; the web server only sees this
#[async_trait]
pub trait StockAssistant: Send + Sync {
    async fn ask(&self, query: &str) -> stock_agent_core::Result<AgentRun>;
}

/// Agent settings shared by every run
#[derive(Clone)]
pub struct AgentRunner {
    llm: ResolvedLlmConfig,
    agent_config: AgentConfig,
    quote_source: Arc<dyn QuoteSource>,
}

impl AgentRunner {
    pub fn new(app: &AppConfig, agent_config: AgentConfig) -> stock_agent_core::Result<Self> {
        let source = YahooQuoteSource::with_base_url(app.quote_base_url.clone())?;
        Ok(Self {
            llm: app.llm.clone(),
            agent_config,
            quote_source: Arc::new(source),
        })
    }

    pub fn model(&self) -> &str {
        &self.llm.model
    }

    /// A new agent reporting to `output`
    pub fn build(&self, output: Box<dyn AgentOutput>) -> stock_agent_core::Result<AgentCore> {
        AgentBuilder::new(self.llm.clone())
            .with_agent_config(self.agent_config.clone())
            .with_quote_source(self.quote_source.clone())
            .build_with_output(output)
    }
}

#[async_trait]
impl StockAssistant for AgentRunner {
    async fn ask(&self, query: &str) -> stock_agent_core::Result<AgentRun> {
        let mut agent = self.build(Box::new(NullOutput))?;
        agent.run(query).await
    }
}
