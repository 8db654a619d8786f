//! # Stock Agent Core
//!
//! Core library for stock-agent, a tool-calling assistant that answers
//! questions about current stock prices.
//!
//! The model is given a `get_stock_price` tool backed by a live quote source
//! and must finish every run through the `final_result` tool, which yields a
//! validated [`StockPriceResult`].

// Core modules
pub mod agent;
pub mod config;
pub mod error;
pub mod llm;
pub mod output;
pub mod quote;
pub mod stock;
pub mod tools;

// Re-export commonly used types
pub use agent::{Agent, AgentBuilder, AgentConfig, AgentCore, AgentRun};
pub use config::{ModelParams, Protocol, ResolvedLlmConfig};
pub use error::{Error, Result};
pub use quote::{QuoteSource, YahooQuoteSource};
pub use stock::{StockPriceResult, StockQuote};

/// Current version of the stock-agent-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing at `info`, or `debug` when asked
///
/// `RUST_LOG`, when set, takes precedence.
pub fn init_tracing_with_debug(debug: bool) {
    let filter = if debug { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}
