//! # stock-agent CLI
//!
//! Console and web-form front ends for the stock price assistant.
//!
//! ## Usage
//!
//! - `stock-agent` - Ask the default question about AAPL
//! - `stock-agent "price of MSFT?"` - Ask a single question
//! - `stock-agent serve` - Serve the web form
//! - `stock-agent quote AAPL` - Look up a price without the model
//! - `stock-agent tools` - Show available tools

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

mod commands;
mod config;
mod output;
mod runner;
mod web;

use commands::{ask_command, quote_command, serve_command, tools_command};
use config::CliConfigLoader;

/// stock-agent - ask an LLM about live stock prices
#[derive(Parser)]
#[command(name = "stock-agent")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "An LLM assistant that looks up current stock prices")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file or directory path
    #[arg(short, long, env = "STOCK_AGENT_CONFIG")]
    config: Option<PathBuf>,

    /// Protocol to use (groq, openai)
    #[arg(long)]
    protocol: Option<String>,

    /// API key override
    #[arg(long)]
    api_key: Option<String>,

    /// Base URL override
    #[arg(long)]
    base_url: Option<String>,

    /// Model name override
    #[arg(long)]
    model: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Show tool calls and token usage
    #[arg(short = 'd', long = "debug")]
    debug_output: bool,

    /// Maximum number of model requests per query
    #[arg(long)]
    max_steps: Option<usize>,

    /// The question to ask (defaults to the price of AAPL)
    query: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the web form
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:7860")]
        bind: SocketAddr,
    },

    /// Look up a price directly, without the model
    Quote {
        /// Ticker symbol, e.g. AAPL
        symbol: String,
    },

    /// Show available tools
    Tools,
}

/// Build a configuration loader from CLI arguments
fn build_config_loader(cli: &Cli) -> CliConfigLoader {
    let mut loader = CliConfigLoader::new();

    if let Some(config_path) = &cli.config {
        loader = loader.with_config_override(config_path.clone());
    }

    if let Some(protocol) = &cli.protocol {
        loader = loader.with_protocol_override(protocol.clone());
    }

    if let Some(api_key) = &cli.api_key {
        loader = loader.with_api_key_override(api_key.clone());
    }

    if let Some(base_url) = &cli.base_url {
        loader = loader.with_base_url_override(base_url.clone());
    }

    if let Some(model) = &cli.model {
        loader = loader.with_model_override(model.clone());
    }

    loader
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be read before clap looks at env-backed flags
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    stock_agent_core::init_tracing_with_debug(cli.verbose);

    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Ignoring .env file: {}", e),
    }

    let config_loader = build_config_loader(&cli);

    let result = match (cli.query, cli.command) {
        (Some(_), Some(_)) => Err(anyhow::anyhow!(
            "Cannot specify both a query and a subcommand"
        )),
        (None, Some(Commands::Serve { bind })) => {
            serve_command(bind, config_loader, cli.max_steps).await
        }
        (None, Some(Commands::Quote { symbol })) => quote_command(symbol, config_loader).await,
        (None, Some(Commands::Tools)) => tools_command().await,
        (query, None) => ask_command(query, config_loader, cli.max_steps, cli.debug_output).await,
    };

    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }
    result
}
