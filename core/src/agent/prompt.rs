//! Prompts sent to the model

/// Default system prompt for the stock assistant
pub const STOCK_AGENT_SYSTEM_PROMPT: &str = "You are a helpful financial assistant that can look up stock price. \
Use the get_stock_price tool to fetch current data";

/// Sent when the model answers in prose instead of calling a tool
pub const PLAIN_TEXT_RETRY_PROMPT: &str =
    "Plain text responses are not permitted, please call one of the functions instead.";

/// Feedback for a rejected `final_result` call
pub fn build_validation_retry_prompt(error: &str) -> String {
    format!("{}\n\nFix the errors and try again.", error)
}

/// User message for a query
pub fn build_user_message(query: &str) -> String {
    query.trim().to_string()
}
