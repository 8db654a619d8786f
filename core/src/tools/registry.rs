//! Tool registry for managing available tools

use crate::error::Result;
use crate::quote::{QuoteSource, YahooQuoteSource};
use crate::tools::builtin::{FinalResultToolFactory, StockPriceToolFactory};
use crate::tools::{Tool, ToolExecutor};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry for managing tool creation and registration
#[derive(Default)]
pub struct ToolRegistry {
    factories: HashMap<String, Box<dyn ToolFactory>>,
}

/// Factory trait for creating tools
pub trait ToolFactory: Send + Sync {
    /// Create a new instance of the tool
    fn create(&self) -> Box<dyn Tool>;

    /// Get the name of the tool this factory creates
    fn tool_name(&self) -> &str;

    /// Get the description of the tool this factory creates
    fn tool_description(&self) -> &str;
}

impl ToolRegistry {
    /// Create an empty tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in tools, pricing through Yahoo Finance
    pub fn with_yahoo() -> Result<Self> {
        Ok(Self::with_quote_source(Arc::new(YahooQuoteSource::new()?)))
    }

    /// Registry with the built-in tools, pricing through `source`
    pub fn with_quote_source(source: Arc<dyn QuoteSource>) -> Self {
        let mut registry = Self::new();
        registry.register_factory(Box::new(StockPriceToolFactory::new(source)));
        registry.register_factory(Box::new(FinalResultToolFactory));
        registry
    }

    /// Register a tool factory, replacing any factory with the same name
    pub fn register_factory(&mut self, factory: Box<dyn ToolFactory>) {
        self.factories.insert(factory.tool_name().to_string(), factory);
    }

    /// Create a tool by name
    pub fn create_tool(&self, name: &str) -> Option<Box<dyn Tool>> {
        self.factories.get(name).map(|factory| factory.create())
    }

    /// List all available tool names, sorted
    pub fn list_tools(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Get tool name and description
    pub fn get_tool_info(&self, name: &str) -> Option<(&str, &str)> {
        self.factories
            .get(name)
            .map(|factory| (factory.tool_name(), factory.tool_description()))
    }

    /// Create a tool executor with the specified tools
    ///
    /// Names without a factory are skipped with a warning.
    pub fn create_executor(&self, tool_names: &[String]) -> ToolExecutor {
        let mut executor = ToolExecutor::new();

        for name in tool_names {
            match self.create_tool(name) {
                Some(tool) => executor.register_tool(tool),
                None => tracing::warn!("Unknown tool '{}' in agent configuration", name),
            }
        }

        executor
    }

    /// Create a tool executor with all available tools
    pub fn create_executor_with_all(&self) -> ToolExecutor {
        let mut executor = ToolExecutor::new();

        for factory in self.factories.values() {
            executor.register_tool(factory.create());
        }

        executor
    }
}

/// Macro to help implement factories for stateless tools
#[macro_export]
macro_rules! impl_tool_factory {
    ($factory:ident, $tool:ident, $name:expr, $description:expr) => {
        pub struct $factory;

        impl $crate::tools::ToolFactory for $factory {
            fn create(&self) -> Box<dyn $crate::tools::Tool> {
                Box::new($tool::new())
            }

            fn tool_name(&self) -> &str {
                $name
            }

            fn tool_description(&self) -> &str {
                $description
            }
        }
    };
}
