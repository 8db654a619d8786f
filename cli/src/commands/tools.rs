//! Tools listing command

use anyhow::Result;
use colored::Colorize;
use stock_agent_core::tools::ToolRegistry;
use tracing::info;

/// Show available tools
pub async fn tools_command() -> Result<()> {
    info!("Listing available tools");

    println!("{}\n", "Available Tools".bold());

    let registry = ToolRegistry::with_yahoo()?;
    for name in registry.list_tools() {
        if let Some(tool) = registry.create_tool(name) {
            println!("{}", tool.name().green());
            // First line of the description only
            let description = tool.description();
            let first_line = description.lines().next().unwrap_or(description);
            println!("   {}\n", first_line);
        }
    }

    Ok(())
}
