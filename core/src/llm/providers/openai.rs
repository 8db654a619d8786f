//! OpenAI-compatible client implementation using async-openai library
//!
//! Groq exposes the same chat-completions surface, so both protocols share
//! this client and differ only in base URL and credential.

use crate::config::ResolvedLlmConfig;
use crate::error::{ConfigError, LlmError, Result};
use crate::llm::{
    ChatOptions, ContentBlock, FinishReason, LlmClient, LlmMessage, LlmResponse, MessageContent,
    MessageRole, ToolChoice, ToolDefinition, Usage,
};
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessage,
        ChatCompletionRequestAssistantMessageContent, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessage, ChatCompletionRequestToolMessage,
        ChatCompletionRequestToolMessageContent, ChatCompletionRequestUserMessage,
        ChatCompletionTool, ChatCompletionToolChoiceOption, ChatCompletionToolType,
        CreateChatCompletionRequestArgs, FunctionCall, FunctionObject,
    },
    Client,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

/// OpenAI-compatible client using async-openai library
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
    provider: String,
}

impl OpenAiClient {
    /// Create a new client from resolved LLM config
    pub fn new(config: &ResolvedLlmConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(LlmError::Authentication {
                message: format!("No API key found for {}", config.protocol),
            }
            .into());
        }

        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.api_key)
            .with_api_base(config.base_url.trim_end_matches('/'));

        let http_client = reqwest::Client::builder()
            .default_headers(Self::build_headers(config)?)
            .build()?;

        let client = Client::with_config(openai_config).with_http_client(http_client);

        Ok(Self {
            client,
            model: config.model.clone(),
            provider: config.protocol.as_str().to_string(),
        })
    }

    /// Turn configured extra headers into a header map
    fn build_headers(config: &ResolvedLlmConfig) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (key, value) in &config.headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
                ConfigError::InvalidValue {
                    field: "headers".to_string(),
                    value: key.clone(),
                }
            })?;
            let value = HeaderValue::from_str(value).map_err(|_| ConfigError::InvalidValue {
                field: format!("headers.{}", key),
                value: value.clone(),
            })?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    /// Convert our internal message format to async-openai format
    fn convert_messages(
        &self,
        messages: Vec<LlmMessage>,
    ) -> Result<Vec<ChatCompletionRequestMessage>> {
        let mut converted = Vec::new();

        for message in messages {
            match message.role {
                MessageRole::System => {
                    let content = Self::extract_text_content(&message.content);
                    converted.push(ChatCompletionRequestMessage::System(
                        ChatCompletionRequestSystemMessage {
                            content: content.into(),
                            name: None,
                        },
                    ));
                }
                MessageRole::User => {
                    let content = Self::extract_text_content(&message.content);
                    converted.push(ChatCompletionRequestMessage::User(
                        ChatCompletionRequestUserMessage {
                            content: content.into(),
                            name: None,
                        },
                    ));
                }
                MessageRole::Assistant => {
                    converted.push(Self::convert_assistant(&message.content));
                }
                MessageRole::Tool => {
                    let mut pushed_any = false;
                    if let MessageContent::MultiModal(blocks) = &message.content {
                        for block in blocks {
                            if let ContentBlock::ToolResult {
                                tool_use_id,
                                content,
                                ..
                            } = block
                            {
                                converted.push(ChatCompletionRequestMessage::Tool(
                                    ChatCompletionRequestToolMessage {
                                        content: ChatCompletionRequestToolMessageContent::Text(
                                            content.clone(),
                                        ),
                                        tool_call_id: tool_use_id.clone(),
                                    },
                                ));
                                pushed_any = true;
                            }
                        }
                    }
                    if !pushed_any {
                        return Err(LlmError::InvalidRequest {
                            message: "Tool message must contain ToolResult".to_string(),
                        }
                        .into());
                    }
                }
            }
        }

        Ok(converted)
    }

    fn convert_assistant(content: &MessageContent) -> ChatCompletionRequestMessage {
        let (text, tool_calls) = match content {
            MessageContent::Text(text) => (text.clone(), Vec::new()),
            MessageContent::MultiModal(blocks) => {
                let mut text = String::new();
                let mut tool_calls = Vec::new();

                for block in blocks {
                    match block {
                        ContentBlock::Text { text: part } => {
                            if !text.is_empty() {
                                text.push('\n');
                            }
                            text.push_str(part);
                        }
                        ContentBlock::ToolUse { id, name, input } => {
                            tool_calls.push(ChatCompletionMessageToolCall {
                                id: id.clone(),
                                r#type: ChatCompletionToolType::Function,
                                function: FunctionCall {
                                    name: name.clone(),
                                    arguments: input.to_string(),
                                },
                            });
                        }
                        ContentBlock::ToolResult { .. } => {}
                    }
                }

                (text, tool_calls)
            }
        };

        ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
            content: if text.is_empty() {
                None
            } else {
                Some(ChatCompletionRequestAssistantMessageContent::Text(text))
            },
            tool_calls: if tool_calls.is_empty() {
                None
            } else {
                Some(tool_calls)
            },
            ..Default::default()
        })
    }

    /// Extract text content from MessageContent
    fn extract_text_content(content: &MessageContent) -> String {
        match content {
            MessageContent::Text(text) => text.clone(),
            MessageContent::MultiModal(blocks) => blocks
                .iter()
                .filter_map(|block| match block {
                    ContentBlock::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Convert our tool definitions to async-openai format
    fn convert_tools(tools: Vec<ToolDefinition>) -> Vec<ChatCompletionTool> {
        tools
            .into_iter()
            .map(|tool| ChatCompletionTool {
                r#type: ChatCompletionToolType::Function,
                function: FunctionObject {
                    name: tool.function.name,
                    description: Some(tool.function.description),
                    parameters: Some(tool.function.parameters),
                    strict: None,
                },
            })
            .collect()
    }

    fn convert_tool_choice(choice: &ToolChoice) -> ChatCompletionToolChoiceOption {
        match choice {
            ToolChoice::Auto => ChatCompletionToolChoiceOption::Auto,
            ToolChoice::None => ChatCompletionToolChoiceOption::None,
            ToolChoice::Required => ChatCompletionToolChoiceOption::Required,
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn chat_completion(
        &self,
        messages: Vec<LlmMessage>,
        tools: Option<Vec<ToolDefinition>>,
        options: Option<ChatOptions>,
    ) -> Result<LlmResponse> {
        let converted_messages = self.convert_messages(messages)?;
        let converted_tools = tools.map(Self::convert_tools);

        if let Some(ref tools) = converted_tools {
            tracing::debug!("{} request with {} tools enabled", self.provider, tools.len());
        }

        let mut request_builder = CreateChatCompletionRequestArgs::default();
        request_builder.model(&self.model);
        request_builder.messages(converted_messages);

        let has_tools = converted_tools.as_ref().is_some_and(|t| !t.is_empty());
        if let Some(tools) = converted_tools.filter(|t| !t.is_empty()) {
            request_builder.tools(tools);
        }

        if let Some(opts) = options {
            if let Some(max_tokens) = opts.max_tokens {
                request_builder.max_tokens(max_tokens);
            }
            if let Some(temperature) = opts.temperature {
                request_builder.temperature(temperature);
            }
            if let Some(top_p) = opts.top_p {
                request_builder.top_p(top_p);
            }
            if let Some(choice) = opts.tool_choice.as_ref().filter(|_| has_tools) {
                request_builder.tool_choice(Self::convert_tool_choice(choice));
            }
        }

        let request = request_builder.build().map_err(|e| {
            tracing::error!("Failed to build {} request: {}", self.provider, e);
            LlmError::InvalidRequest {
                message: format!("Failed to build request: {}", e),
            }
        })?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            tracing::error!("{} API call failed: {}", self.provider, e);
            match e {
                OpenAIError::ApiError(api) if api.code.as_deref() == Some("invalid_api_key") => {
                    LlmError::Authentication {
                        message: api.message,
                    }
                }
                other => LlmError::ApiError {
                    status: 500, // async-openai doesn't expose status codes directly
                    message: other.to_string(),
                },
            }
        })?;

        let result = self.convert_response(response)?;

        let tool_use_count = result.message.get_tool_uses().len();
        if tool_use_count > 0 {
            tracing::debug!("{} response contains {} tool calls", self.provider, tool_use_count);
            for block in result.message.get_tool_uses() {
                if let ContentBlock::ToolUse { id, name, .. } = block {
                    tracing::debug!("Tool call: {} (id: {})", name, id);
                }
            }
        }

        Ok(result)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &str {
        &self.provider
    }
}

impl OpenAiClient {
    /// Convert async-openai response to our internal format
    fn convert_response(
        &self,
        response: async_openai::types::CreateChatCompletionResponse,
    ) -> Result<LlmResponse> {
        let choice =
            response
                .choices
                .into_iter()
                .next()
                .ok_or_else(|| LlmError::InvalidResponse {
                    message: "No choices in response".to_string(),
                })?;

        let mut blocks = Vec::new();
        if let Some(content) = choice.message.content.filter(|c| !c.is_empty()) {
            blocks.push(ContentBlock::Text { text: content });
        }
        for tool_call in choice.message.tool_calls.unwrap_or_default() {
            let function = tool_call.function;
            let args: Value = serde_json::from_str(&function.arguments)
                .unwrap_or_else(|_| Value::String(function.arguments.clone()));

            blocks.push(ContentBlock::ToolUse {
                id: tool_call.id,
                name: function.name,
                input: args,
            });
        }

        let message_content = match blocks.as_slice() {
            [] => MessageContent::Text(String::new()),
            [ContentBlock::Text { text }] => MessageContent::Text(text.clone()),
            _ => MessageContent::MultiModal(blocks),
        };

        let message = LlmMessage {
            role: MessageRole::Assistant,
            content: message_content,
            metadata: None,
        };

        let usage = response.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        let finish_reason = choice.finish_reason.map(|reason| match reason {
            async_openai::types::FinishReason::Stop => FinishReason::Stop,
            async_openai::types::FinishReason::Length => FinishReason::Length,
            async_openai::types::FinishReason::ToolCalls => FinishReason::ToolCalls,
            async_openai::types::FinishReason::ContentFilter => FinishReason::ContentFilter,
            async_openai::types::FinishReason::FunctionCall => FinishReason::ToolCalls,
        });

        Ok(LlmResponse {
            message,
            usage,
            model: response.model,
            finish_reason,
            metadata: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Protocol;
    use crate::llm::FunctionDefinition;
    use serde_json::json;
    use std::collections::HashMap;

    fn groq_client() -> OpenAiClient {
        let config = ResolvedLlmConfig::new(
            Protocol::Groq,
            "https://api.groq.com/openai/v1".to_string(),
            "gsk_test".to_string(),
            "llama3-groq-70b-8192-tool-use-preview".to_string(),
        );
        OpenAiClient::new(&config).unwrap()
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        let config = ResolvedLlmConfig::new(
            Protocol::Groq,
            "https://api.groq.com/openai/v1".to_string(),
            String::new(),
            "model".to_string(),
        );
        assert!(OpenAiClient::new(&config).is_err());
    }

    #[test]
    fn test_invalid_header_is_rejected() {
        let mut headers = HashMap::new();
        headers.insert("bad header".to_string(), "x".to_string());
        let config = ResolvedLlmConfig::new(
            Protocol::OpenAICompat,
            "https://api.openai.com/v1".to_string(),
            "sk-test".to_string(),
            "gpt-4o".to_string(),
        )
        .with_headers(headers);
        assert!(OpenAiClient::new(&config).is_err());
    }

    #[test]
    fn test_provider_name_follows_protocol() {
        let client = groq_client();
        assert_eq!(client.provider_name(), "groq");
        assert_eq!(client.model_name(), "llama3-groq-70b-8192-tool-use-preview");
    }

    #[test]
    fn test_tool_round_trip_conversation_converts() {
        let client = groq_client();
        let messages = vec![
            LlmMessage::system("You are a helpful financial assistant"),
            LlmMessage::user("what is the current price of Apple Inc. (AAPL)?"),
            LlmMessage {
                role: MessageRole::Assistant,
                content: MessageContent::MultiModal(vec![ContentBlock::ToolUse {
                    id: "call_1".to_string(),
                    name: "get_stock_price".to_string(),
                    input: json!({"symbol": "AAPL"}),
                }]),
                metadata: None,
            },
            LlmMessage::tool_result("call_1", r#"{"price":227.52,"currency":"USD"}"#, false),
        ];

        let converted = client.convert_messages(messages).unwrap();
        assert_eq!(converted.len(), 4);

        match &converted[2] {
            ChatCompletionRequestMessage::Assistant(msg) => {
                assert!(msg.content.is_none());
                let calls = msg.tool_calls.as_ref().unwrap();
                assert_eq!(calls[0].function.name, "get_stock_price");
                assert_eq!(calls[0].function.arguments, r#"{"symbol":"AAPL"}"#);
            }
            other => panic!("unexpected message: {:?}", other),
        }

        match &converted[3] {
            ChatCompletionRequestMessage::Tool(msg) => assert_eq!(msg.tool_call_id, "call_1"),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_tool_message_without_result_is_rejected() {
        let client = groq_client();
        let bad = LlmMessage {
            role: MessageRole::Tool,
            content: MessageContent::Text("orphan".to_string()),
            metadata: None,
        };
        assert!(client.convert_messages(vec![bad]).is_err());
    }

    #[test]
    fn test_convert_tools_keeps_schema() {
        let tools = OpenAiClient::convert_tools(vec![ToolDefinition {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: "get_stock_price".to_string(),
                description: "Look up a price".to_string(),
                parameters: json!({"type": "object"}),
            },
        }]);
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].function.name, "get_stock_price");
        assert_eq!(tools[0].function.parameters, Some(json!({"type": "object"})));
    }
}
