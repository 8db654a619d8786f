//! Agent core logic and execution engine

pub mod base;
pub mod config;
pub mod core;
pub mod execution;
pub mod prompt;

pub use base::{Agent, AgentResult};
pub use config::{AgentBuilder, AgentConfig};
pub use core::AgentCore;
pub use execution::AgentRun;
pub use prompt::{build_user_message, PLAIN_TEXT_RETRY_PROMPT, STOCK_AGENT_SYSTEM_PROMPT};
