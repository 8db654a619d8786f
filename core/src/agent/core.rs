//! AgentCore implementation

use super::config::AgentConfig;
use crate::agent::execution::AgentRun;
use crate::agent::prompt::{
    build_user_message, build_validation_retry_prompt, PLAIN_TEXT_RETRY_PROMPT,
    STOCK_AGENT_SYSTEM_PROMPT,
};
use crate::agent::{Agent, AgentResult};
use crate::config::{Protocol, ResolvedLlmConfig};
use crate::error::{AgentError, ConfigError, Result};
use crate::llm::{ChatOptions, ContentBlock, LlmClient, LlmMessage, ToolChoice};
use crate::output::{
    AgentEvent, AgentExecutionContext, AgentOutput, TokenUsage, ToolExecutionInfo,
    ToolExecutionStatus,
};
use crate::stock::StockPriceResult;
use crate::tools::builtin::{FinalResultTool, FINAL_RESULT_TOOL_NAME};
use crate::tools::{ToolCall, ToolExecutor, ToolRegistry};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// What a single step left behind
enum StepOutcome {
    Continue,
    Finished(StockPriceResult),
}

/// Tool-calling agent that answers stock price questions
pub struct AgentCore {
    config: AgentConfig,
    llm_client: Arc<dyn LlmClient>,
    chat_options: ChatOptions,
    tool_executor: ToolExecutor,
    conversation_history: Vec<LlmMessage>,
    output: Box<dyn AgentOutput>,
    execution_context: Option<AgentExecutionContext>,
}

/// Create the model client for a resolved configuration
pub fn create_llm_client(llm_config: &ResolvedLlmConfig) -> Result<Arc<dyn LlmClient>> {
    match &llm_config.protocol {
        Protocol::Groq | Protocol::OpenAICompat => {
            Ok(Arc::new(crate::llm::OpenAiClient::new(llm_config)?))
        }
        Protocol::Custom(name) => Err(ConfigError::UnsupportedProtocol {
            protocol: name.clone(),
        }
        .into()),
    }
}

impl AgentCore {
    /// Create a new AgentCore with resolved LLM configuration
    pub fn new_with_llm_config(
        agent_config: AgentConfig,
        llm_config: ResolvedLlmConfig,
        output: Box<dyn AgentOutput>,
        tool_registry: ToolRegistry,
    ) -> Result<Self> {
        let llm_client = create_llm_client(&llm_config)?;
        let mut agent = Self::new_with_client(agent_config, llm_client, output, &tool_registry);
        agent.chat_options = ChatOptions {
            tool_choice: Some(ToolChoice::Required),
            ..ChatOptions::from(&llm_config.params)
        };
        Ok(agent)
    }

    /// Create an agent around an existing model client
    pub fn new_with_client(
        agent_config: AgentConfig,
        llm_client: Arc<dyn LlmClient>,
        output: Box<dyn AgentOutput>,
        tool_registry: &ToolRegistry,
    ) -> Self {
        let mut tool_executor = tool_registry.create_executor(&agent_config.tools);
        // Without the result tool a run could never finish.
        if tool_executor.get_tool(FINAL_RESULT_TOOL_NAME).is_none() {
            tool_executor.register_tool(Box::new(FinalResultTool::new()));
        }

        Self {
            config: agent_config,
            llm_client,
            chat_options: ChatOptions {
                tool_choice: Some(ToolChoice::Required),
                ..ChatOptions::default()
            },
            tool_executor,
            conversation_history: Vec::new(),
            output,
            execution_context: None,
        }
    }

    /// Get agent configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// System prompt in effect for the next run
    pub fn system_prompt(&self) -> &str {
        self.config
            .system_prompt
            .as_deref()
            .unwrap_or(STOCK_AGENT_SYSTEM_PROMPT)
    }

    /// Messages exchanged during the last run
    pub fn conversation_history(&self) -> &[LlmMessage] {
        &self.conversation_history
    }

    /// Names of the tools offered to the model
    pub fn tool_names(&self) -> Vec<&str> {
        self.tool_executor.list_tools()
    }

    async fn emit(&self, event: AgentEvent) {
        if let Err(e) = self.output.emit_event(event).await {
            tracing::debug!("Failed to emit agent event: {}", e);
        }
    }

    /// Answer `query` with a validated [`StockPriceResult`]
    ///
    /// Model and quote provider failures are returned unchanged.
    pub async fn run(&mut self, query: &str) -> Result<AgentRun> {
        let user_message = build_user_message(query);
        if user_message.is_empty() {
            return Err(AgentError::InvalidTask {
                message: "query must not be empty".to_string(),
            }
            .into());
        }

        let start_time = Instant::now();
        self.conversation_history.clear();
        self.execution_context = Some(AgentExecutionContext {
            run_id: Uuid::new_v4().to_string(),
            query: user_message.clone(),
            model: self.llm_client.model_name().to_string(),
            max_steps: self.config.max_steps,
            current_step: 0,
            execution_time: Duration::ZERO,
            token_usage: TokenUsage::default(),
        });

        if let Some(context) = self.execution_context.clone() {
            tracing::info!(run_id = %context.run_id, model = %context.model, "Starting run: {}", context.query);
            self.emit(AgentEvent::ExecutionStarted { context }).await;
        }

        let system_message = LlmMessage::system(self.system_prompt());
        self.conversation_history.push(system_message);
        self.conversation_history.push(LlmMessage::user(user_message));

        let outcome = self.run_steps().await;
        let duration = start_time.elapsed();

        let mut context = match self.execution_context.take() {
            Some(context) => context,
            None => {
                return Err(AgentError::InvalidTask {
                    message: "run context was lost".to_string(),
                }
                .into())
            }
        };
        context.execution_time = duration;

        let (success, summary) = match &outcome {
            Ok(result) => (true, format!("{} at {}", result.symbol, result.price_display())),
            Err(e) => (false, e.to_string()),
        };
        if success {
            tracing::info!(run_id = %context.run_id, steps = context.current_step, "Run finished: {}", summary);
        } else {
            tracing::error!(run_id = %context.run_id, steps = context.current_step, "Run failed: {}", summary);
        }

        let steps = context.current_step;
        let usage = context.token_usage.clone();
        self.execution_context = Some(context.clone());
        self.emit(AgentEvent::ExecutionCompleted {
            context,
            success,
            summary,
        })
        .await;
        if let Err(e) = self.output.flush().await {
            tracing::debug!("Failed to flush agent output: {}", e);
        }

        let output = outcome?;
        Ok(AgentRun::new(output, steps, duration.as_millis() as u64).with_usage(usage))
    }

    async fn run_steps(&mut self) -> Result<StockPriceResult> {
        let mut result_retries = 0;

        for step in 1..=self.config.max_steps {
            if let Some(context) = &mut self.execution_context {
                context.current_step = step;
            }

            if let StepOutcome::Finished(result) =
                self.execute_step(step, &mut result_retries).await?
            {
                return Ok(result);
            }
        }

        Err(AgentError::MaxStepsExceeded {
            max_steps: self.config.max_steps,
        }
        .into())
    }

    /// Count one rejected answer, failing once the budget is spent
    async fn record_result_retry(&self, retries: &mut usize, reason: &str) -> Result<()> {
        *retries += 1;
        let max_retries = self.config.max_result_retries;
        if *retries > max_retries {
            return Err(AgentError::UnexpectedModelBehavior {
                max_retries,
                message: reason.to_string(),
            }
            .into());
        }

        tracing::warn!("Retrying result ({}/{}): {}", retries, max_retries, reason);
        self.emit(AgentEvent::ResultRetry {
            retry: *retries,
            max_retries,
            reason: reason.to_string(),
        })
        .await;
        Ok(())
    }

    /// One model request plus the tool calls it asked for
    async fn execute_step(&mut self, step: usize, result_retries: &mut usize) -> Result<StepOutcome> {
        self.emit(AgentEvent::StepStarted { step_number: step })
            .await;

        let tool_definitions = self.tool_executor.get_tool_definitions();
        let response = match self
            .llm_client
            .chat_completion(
                self.conversation_history.clone(),
                Some(tool_definitions),
                Some(self.chat_options.clone()),
            )
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("LLM request failed for step {}: {}", step, e);
                return Err(e);
            }
        };

        if let Some(usage) = &response.usage {
            let token_usage = self.execution_context.as_mut().map(|context| {
                context.token_usage.add(usage);
                context.token_usage.clone()
            });
            if let Some(token_usage) = token_usage {
                if let Err(e) = self.output.emit_token_update(token_usage).await {
                    tracing::debug!("Failed to emit token update: {}", e);
                }
            }
        }

        self.conversation_history.push(response.message.clone());

        let tool_calls: Vec<ToolCall> = response
            .message
            .get_tool_uses()
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::ToolUse { id, name, input } => Some(ToolCall {
                    id: id.clone(),
                    name: name.clone(),
                    parameters: input.clone(),
                    metadata: None,
                }),
                _ => None,
            })
            .collect();

        if tool_calls.is_empty() {
            let text = response.message.get_text().unwrap_or_default();
            tracing::debug!("Plain text response at step {}: {}", step, text);
            self.record_result_retry(result_retries, "plain text response")
                .await?;
            self.conversation_history
                .push(LlmMessage::user(PLAIN_TEXT_RETRY_PROMPT));
            return Ok(StepOutcome::Continue);
        }

        for tool_call in tool_calls {
            let call_id = tool_call.id.clone();
            let is_final = tool_call.name == FINAL_RESULT_TOOL_NAME;

            self.emit(AgentEvent::ToolExecutionStarted {
                tool_info: ToolExecutionInfo::from_call(
                    &tool_call,
                    ToolExecutionStatus::Executing,
                    None,
                ),
            })
            .await;

            let tool_result = self.tool_executor.execute(tool_call.clone()).await?;

            let status = if tool_result.success {
                ToolExecutionStatus::Success
            } else {
                ToolExecutionStatus::Error
            };
            self.emit(AgentEvent::ToolExecutionCompleted {
                tool_info: ToolExecutionInfo::from_call(&tool_call, status, Some(&tool_result)),
            })
            .await;

            if is_final {
                if let (true, Some(data)) = (tool_result.success, tool_result.data.clone()) {
                    let result: StockPriceResult = serde_json::from_value(data)?;
                    return Ok(StepOutcome::Finished(result));
                }

                self.record_result_retry(result_retries, &tool_result.content)
                    .await?;
                self.conversation_history.push(LlmMessage::tool_result(
                    call_id,
                    build_validation_retry_prompt(&tool_result.content),
                    true,
                ));
                continue;
            }

            self.conversation_history.push(LlmMessage::tool_result(
                call_id,
                tool_result.content,
                !tool_result.success,
            ));
        }

        Ok(StepOutcome::Continue)
    }
}

#[async_trait]
impl Agent for AgentCore {
    async fn run(&mut self, query: &str) -> AgentResult<AgentRun> {
        AgentCore::run(self, query).await
    }

    fn config(&self) -> &AgentConfig {
        &self.config
    }

    fn agent_type(&self) -> &str {
        "stock_agent"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, LlmError, QuoteError};
    use crate::llm::{LlmResponse, MessageContent, MessageRole, ToolDefinition, Usage};
    use crate::output::{NullOutput, OutputResult};
    use crate::quote::{LastPrice, QuoteSource};
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses and records every request
    struct ScriptedLlm {
        responses: Mutex<VecDeque<LlmResponse>>,
        requests: Mutex<Vec<(Vec<LlmMessage>, Option<ChatOptions>)>>,
    }

    impl ScriptedLlm {
        fn new(responses: Vec<LlmResponse>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn request(&self, index: usize) -> Vec<LlmMessage> {
            self.requests.lock().unwrap()[index].0.clone()
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn chat_completion(
            &self,
            messages: Vec<LlmMessage>,
            _tools: Option<Vec<ToolDefinition>>,
            options: Option<ChatOptions>,
        ) -> Result<LlmResponse> {
            self.requests.lock().unwrap().push((messages, options));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| {
                    LlmError::InvalidResponse {
                        message: "script exhausted".to_string(),
                    }
                    .into()
                })
        }

        fn model_name(&self) -> &str {
            "scripted-model"
        }

        fn provider_name(&self) -> &str {
            "scripted"
        }
    }

    struct MockQuotes {
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl QuoteSource for MockQuotes {
        async fn last_price(&self, symbol: &str) -> Result<LastPrice> {
            self.requested.lock().unwrap().push(symbol.to_string());
            match symbol {
                "AAPL" => Ok(LastPrice {
                    symbol: "AAPL".to_string(),
                    price: 227.5234,
                    currency: Some("USD".to_string()),
                }),
                _ => Err(QuoteError::UnknownSymbol {
                    symbol: symbol.to_string(),
                    message: "No data found, symbol may be delisted".to_string(),
                }
                .into()),
            }
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    /// Keeps a short label for every event
    struct RecordingOutput {
        events: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl AgentOutput for RecordingOutput {
        async fn emit_event(&self, event: AgentEvent) -> OutputResult {
            let label = match event {
                AgentEvent::ExecutionStarted { .. } => "started".to_string(),
                AgentEvent::ExecutionCompleted { success, .. } => format!("completed:{}", success),
                AgentEvent::StepStarted { step_number } => format!("step:{}", step_number),
                AgentEvent::ToolExecutionStarted { tool_info } => {
                    format!("tool:{}", tool_info.tool_name)
                }
                AgentEvent::ToolExecutionCompleted { tool_info } => {
                    format!("tool_done:{}:{:?}", tool_info.tool_name, tool_info.status)
                }
                AgentEvent::ResultRetry { retry, .. } => format!("retry:{}", retry),
                AgentEvent::TokenUsageUpdated { token_usage } => {
                    format!("tokens:{}", token_usage.total_tokens)
                }
            };
            self.events.lock().unwrap().push(label);
            Ok(())
        }

        async fn flush(&self) -> OutputResult {
            self.events.lock().unwrap().push("flushed".to_string());
            Ok(())
        }
    }

    fn tool_call(id: &str, name: &str, input: serde_json::Value) -> LlmResponse {
        LlmResponse {
            message: LlmMessage {
                role: MessageRole::Assistant,
                content: MessageContent::MultiModal(vec![ContentBlock::ToolUse {
                    id: id.to_string(),
                    name: name.to_string(),
                    input,
                }]),
                metadata: None,
            },
            usage: Some(Usage {
                prompt_tokens: 100,
                completion_tokens: 20,
                total_tokens: 120,
            }),
            model: "scripted-model".to_string(),
            finish_reason: None,
            metadata: None,
        }
    }

    fn text(content: &str) -> LlmResponse {
        LlmResponse {
            message: LlmMessage::assistant(content),
            usage: None,
            model: "scripted-model".to_string(),
            finish_reason: None,
            metadata: None,
        }
    }

    fn aapl_answer() -> serde_json::Value {
        json!({
            "symbol": "AAPL",
            "price": 227.52,
            "currency": "USD",
            "message": "Apple Inc. (AAPL) is currently trading at $227.52 USD."
        })
    }

    fn quotes() -> Arc<MockQuotes> {
        Arc::new(MockQuotes {
            requested: Mutex::new(Vec::new()),
        })
    }

    fn agent(llm: Arc<ScriptedLlm>, quotes: Arc<MockQuotes>) -> AgentCore {
        AgentCore::new_with_client(
            AgentConfig::default(),
            llm,
            Box::new(NullOutput),
            &ToolRegistry::with_quote_source(quotes),
        )
    }

    fn tool_results(messages: &[LlmMessage]) -> Vec<(String, bool)> {
        messages
            .iter()
            .filter_map(|m| match &m.content {
                MessageContent::MultiModal(blocks) => Some(blocks),
                _ => None,
            })
            .flatten()
            .filter_map(|b| match b {
                ContentBlock::ToolResult {
                    content, is_error, ..
                } => Some((content.clone(), is_error.unwrap_or(false))),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_aapl_query_produces_structured_answer() {
        let llm = ScriptedLlm::new(vec![
            tool_call("call_1", "get_stock_price", json!({"symbol": "AAPL"})),
            tool_call("call_2", "final_result", aapl_answer()),
        ]);
        let quotes = quotes();
        let mut agent = agent(llm.clone(), quotes.clone());

        let run = agent
            .run("what is the current price of Apple Inc. (AAPL)?")
            .await
            .unwrap();

        assert_eq!(run.steps, 2);
        assert_eq!(run.output.symbol, "AAPL");
        assert_eq!(run.output.currency, "USD");
        assert!(run.output.message.contains("$227.52 USD"));
        assert_eq!(run.usage.total_tokens, 240);
        assert_eq!(quotes.requested.lock().unwrap().as_slice(), ["AAPL"]);

        let first = llm.request(0);
        assert_eq!(first[0].role, MessageRole::System);
        assert_eq!(first[0].get_text().as_deref(), Some(STOCK_AGENT_SYSTEM_PROMPT));
        assert_eq!(
            first[1].get_text().as_deref(),
            Some("what is the current price of Apple Inc. (AAPL)?")
        );

        let second = llm.request(1);
        let results = tool_results(&second);
        assert_eq!(results.len(), 1);
        let quote: serde_json::Value = serde_json::from_str(&results[0].0).unwrap();
        assert_eq!(quote, json!({"price": 227.52, "currency": "USD"}));
    }

    #[tokio::test]
    async fn test_tool_choice_is_required() {
        let llm = ScriptedLlm::new(vec![tool_call("call_1", "final_result", aapl_answer())]);
        let mut agent = agent(llm.clone(), quotes());
        agent.run("AAPL?").await.unwrap();

        let options = llm.requests.lock().unwrap()[0].1.clone().unwrap();
        assert_eq!(options.tool_choice, Some(ToolChoice::Required));
    }

    #[tokio::test]
    async fn test_unknown_symbol_aborts_run() {
        let llm = ScriptedLlm::new(vec![
            tool_call("call_1", "get_stock_price", json!({"symbol": "ZZZZZZ"})),
            tool_call("call_2", "final_result", aapl_answer()),
        ]);
        let mut agent = agent(llm.clone(), quotes());

        let err = agent.run("price of ZZZZZZ").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Quote(QuoteError::UnknownSymbol { .. })
        ));
        assert_eq!(llm.request_count(), 1);
    }

    #[tokio::test]
    async fn test_plain_text_answer_is_retried_once() {
        let llm = ScriptedLlm::new(vec![
            text("Apple trades at about $227."),
            tool_call("call_1", "final_result", aapl_answer()),
        ]);
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut agent = AgentCore::new_with_client(
            AgentConfig::default(),
            llm.clone(),
            Box::new(RecordingOutput {
                events: events.clone(),
            }),
            &ToolRegistry::with_quote_source(quotes()),
        );

        let run = agent.run("AAPL?").await.unwrap();
        assert_eq!(run.steps, 2);

        let second = llm.request(1);
        let last = second.last().unwrap();
        assert_eq!(last.role, MessageRole::User);
        assert_eq!(last.get_text().as_deref(), Some(PLAIN_TEXT_RETRY_PROMPT));
        assert!(events.lock().unwrap().contains(&"retry:1".to_string()));
    }

    #[tokio::test]
    async fn test_repeated_plain_text_is_unexpected_behavior() {
        let llm = ScriptedLlm::new(vec![text("About $227."), text("Still about $227.")]);
        let mut agent = agent(llm.clone(), quotes());

        let err = agent.run("AAPL?").await.unwrap_err();
        match err {
            Error::Agent(AgentError::UnexpectedModelBehavior { max_retries, .. }) => {
                assert_eq!(max_retries, 1)
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(llm.request_count(), 2);
    }

    #[tokio::test]
    async fn test_invalid_final_result_is_sent_back() {
        let llm = ScriptedLlm::new(vec![
            tool_call(
                "call_1",
                "final_result",
                json!({"symbol": "AAPL", "price": -1.0, "message": "?"}),
            ),
            tool_call("call_2", "final_result", aapl_answer()),
        ]);
        let mut agent = agent(llm.clone(), quotes());

        let run = agent.run("AAPL?").await.unwrap();
        assert_eq!(run.output.price, 227.52);

        let results = tool_results(&llm.request(1));
        assert_eq!(results.len(), 1);
        assert!(results[0].1);
        assert!(results[0].0.contains("positive"));
        assert!(results[0].0.ends_with("Fix the errors and try again."));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_reported_to_model() {
        let llm = ScriptedLlm::new(vec![
            tool_call("call_1", "get_weather", json!({"city": "Cupertino"})),
            tool_call("call_2", "final_result", aapl_answer()),
        ]);
        let mut agent = agent(llm.clone(), quotes());

        agent.run("AAPL?").await.unwrap();
        let results = tool_results(&llm.request(1));
        assert!(results[0].1);
        assert!(results[0].0.contains("get_weather"));
    }

    #[tokio::test]
    async fn test_max_steps_exceeded() {
        let llm = ScriptedLlm::new(vec![
            tool_call("call_1", "get_stock_price", json!({"symbol": "AAPL"})),
            tool_call("call_2", "get_stock_price", json!({"symbol": "AAPL"})),
            tool_call("call_3", "final_result", aapl_answer()),
        ]);
        let config = AgentConfig {
            max_steps: 2,
            ..AgentConfig::default()
        };
        let mut agent = AgentCore::new_with_client(
            config,
            llm.clone(),
            Box::new(NullOutput),
            &ToolRegistry::with_quote_source(quotes()),
        );

        let err = agent.run("AAPL?").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Agent(AgentError::MaxStepsExceeded { max_steps: 2 })
        ));
        assert_eq!(llm.request_count(), 2);
    }

    #[tokio::test]
    async fn test_llm_error_propagates() {
        let llm = ScriptedLlm::new(Vec::new());
        let mut agent = agent(llm, quotes());
        let err = agent.run("AAPL?").await.unwrap_err();
        assert!(matches!(err, Error::Llm(LlmError::InvalidResponse { .. })));
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected() {
        let llm = ScriptedLlm::new(Vec::new());
        let mut agent = agent(llm.clone(), quotes());
        let err = agent.run("   ").await.unwrap_err();
        assert!(matches!(err, Error::Agent(AgentError::InvalidTask { .. })));
        assert_eq!(llm.request_count(), 0);
    }

    #[tokio::test]
    async fn test_events_bracket_the_run() {
        let llm = ScriptedLlm::new(vec![
            tool_call("call_1", "get_stock_price", json!({"symbol": "AAPL"})),
            tool_call("call_2", "final_result", aapl_answer()),
        ]);
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut agent = AgentCore::new_with_client(
            AgentConfig::default(),
            llm,
            Box::new(RecordingOutput {
                events: events.clone(),
            }),
            &ToolRegistry::with_quote_source(quotes()),
        );

        agent.run("AAPL?").await.unwrap();
        let events = events.lock().unwrap();
        assert_eq!(events.first().map(String::as_str), Some("started"));
        assert_eq!(
            &events[events.len() - 2..],
            &["completed:true".to_string(), "flushed".to_string()]
        );
        assert!(events.contains(&"tool_done:get_stock_price:Success".to_string()));
        assert!(events.contains(&"tokens:240".to_string()));
    }

    #[test]
    fn test_result_tool_is_always_offered() {
        let config = AgentConfig {
            tools: vec!["get_stock_price".to_string()],
            ..AgentConfig::default()
        };
        let agent = AgentCore::new_with_client(
            config,
            ScriptedLlm::new(Vec::new()),
            Box::new(NullOutput),
            &ToolRegistry::with_quote_source(quotes()),
        );
        assert_eq!(agent.tool_names(), vec!["final_result", "get_stock_price"]);
    }

    #[test]
    fn test_custom_system_prompt_replaces_default() {
        let config = AgentConfig {
            system_prompt: Some("Answer only about index funds.".to_string()),
            ..AgentConfig::default()
        };
        let agent = AgentCore::new_with_client(
            config,
            ScriptedLlm::new(Vec::new()),
            Box::new(NullOutput),
            &ToolRegistry::with_quote_source(quotes()),
        );
        assert_eq!(agent.system_prompt(), "Answer only about index funds.");
    }
}
