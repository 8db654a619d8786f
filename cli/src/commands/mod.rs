//! CLI command implementations

pub mod ask;
pub mod quote;
pub mod serve;
pub mod tools;

pub use ask::ask_command;
pub use quote::quote_command;
pub use serve::serve_command;
pub use tools::tools_command;
