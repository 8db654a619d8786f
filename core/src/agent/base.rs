//! Base agent trait

use super::config::AgentConfig;
use super::execution::AgentRun;
use crate::error::Result;
use async_trait::async_trait;

/// Result type for agent operations
pub type AgentResult<T> = Result<T>;

/// Base trait for all agents
#[async_trait]
pub trait Agent: Send + Sync {
    /// Answer a query, returning the structured result
    async fn run(&mut self, query: &str) -> AgentResult<AgentRun>;

    /// Get the agent's configuration
    fn config(&self) -> &AgentConfig;

    /// Get the agent's name/type
    fn agent_type(&self) -> &str;
}
