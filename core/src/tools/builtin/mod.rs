//! Built-in tools

pub mod final_result;
pub mod stock_price;

pub use final_result::{FinalResultTool, FinalResultToolFactory, FINAL_RESULT_TOOL_NAME};
pub use stock_price::{StockPriceTool, StockPriceToolFactory, STOCK_PRICE_TOOL_NAME};
