//! Agent run result structures

use crate::output::TokenUsage;
use crate::stock::StockPriceResult;
use serde::{Deserialize, Serialize};

/// Outcome of a successful agent run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRun {
    /// Structured answer produced by the model
    pub output: StockPriceResult,

    /// Number of model requests made
    pub steps: usize,

    /// Total run time in milliseconds
    pub duration_ms: u64,

    /// Tokens consumed across all steps
    pub usage: TokenUsage,
}

impl AgentRun {
    pub fn new(output: StockPriceResult, steps: usize, duration_ms: u64) -> Self {
        Self {
            output,
            steps,
            duration_ms,
            usage: TokenUsage::default(),
        }
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = usage;
        self
    }
}
