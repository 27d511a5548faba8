//! Conversation turn orchestration
//!
//! One turn runs:
//!
//! ```text
//! user message ─▶ LLM (with tools) ─┬─▶ reply ───────────────────────────▶ done
//!                                   └─▶ tool call ─▶ ToolInvoker ─▶ LLM ─▶ done
//! ```
//!
//! Tool results are replayed to the LLM as JSON strings inside a `tool`
//! message. Requests that replay tool traffic always carry the tool
//! definitions; the hop budget is enforced on what the model answers. The transcript only changes when the turn succeeds, apart from
//! the user message, which is kept so the user can retry after a failure.

mod error;

pub use error::{TurnError, TurnResult};

use std::sync::Arc;

use crate::config::{DEFAULT_MAX_TOKENS, DEFAULT_MAX_TOOL_HOPS, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT};
use crate::logging::Logger;
use crate::providers::{Provider, ProviderError, ProviderModelConfig, StreamChatOptions};
use crate::session::{Session, SessionHandle};
use crate::tools::{ToolCallResult, ToolInvoker};
use crate::types::{ChatMessage, Completion};

/// Settings applied to every turn
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Prepended to each LLM request, never stored in the transcript
    pub system_prompt: String,
    pub model: ProviderModelConfig,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    /// Tool calls allowed per turn
    pub max_tool_hops: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            model: ProviderModelConfig::new(DEFAULT_MODEL),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            temperature: None,
            max_tool_hops: DEFAULT_MAX_TOOL_HOPS,
        }
    }
}

/// What a successful turn produced
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Final natural-language reply
    pub reply: String,
    /// Tool calls made along the way, for operator logging only
    pub tool_results: Vec<ToolCallResult>,
}

/// Drives the LLM and tool calls for each user turn
pub struct Orchestrator {
    provider: Arc<dyn Provider>,
    invoker: Arc<ToolInvoker>,
    config: OrchestratorConfig,
    logger: Arc<dyn Logger>,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn Provider>,
        invoker: Arc<ToolInvoker>,
        config: OrchestratorConfig,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            provider,
            invoker,
            config,
            logger,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn invoker(&self) -> &Arc<ToolInvoker> {
        &self.invoker
    }

    /// Run a turn while holding the session lock for its whole duration
    pub async fn chat(&self, session: &SessionHandle, content: &str) -> TurnResult<TurnOutcome> {
        let mut session = session.lock().await;
        self.run_turn(&mut session, content).await
    }

    /// Run one user turn against `session`.
    ///
    /// On success the transcript grows by the user message, any tool messages
    /// and the assistant reply. On an LLM failure only the user message stays.
    pub async fn run_turn(&self, session: &mut Session, content: &str) -> TurnResult<TurnOutcome> {
        if content.trim().is_empty() {
            return Err(TurnError::EmptyMessage);
        }

        session.push(ChatMessage::user(content));
        self.logger.info(&format!(
            "[Orchestrator] session={} turn started ({} messages)",
            session.id(),
            session.len()
        ));

        let tools = self.invoker.registry().llm_tools();
        let history_has_tools = session.messages().iter().any(ChatMessage::is_tool);
        let mut staged: Vec<ChatMessage> = Vec::new();
        let mut tool_results = Vec::new();

        loop {
            let hops = tool_results.len();
            // Providers reject tool_use blocks without the matching definitions
            let replaying_tools = history_has_tools || !staged.is_empty();
            let offer_tools = !tools.is_empty() && (hops < self.config.max_tool_hops || replaying_tools);

            let mut options = StreamChatOptions::new();
            options.max_tokens = self.config.max_tokens;
            options.temperature = self.config.temperature;
            if offer_tools {
                options = options.with_tools(tools.clone());
            }

            let messages = self.request_messages(session, &staged);
            let completion = self
                .provider
                .complete(messages, self.config.model.clone(), options)
                .await
                .map_err(|e| {
                    self.logger.error(&format!("[Orchestrator] session={} LLM call failed: {}", session.id(), e));
                    TurnError::Llm(e)
                })?;

            match completion {
                Completion::Reply(reply) => {
                    if reply.trim().is_empty() {
                        let e = ProviderError::invalid_response(self.provider.name(), "empty reply");
                        self.logger.error(&format!("[Orchestrator] session={} {}", session.id(), e));
                        return Err(TurnError::Llm(e));
                    }

                    session.extend(staged);
                    session.push(ChatMessage::assistant(reply.clone()));
                    self.logger.info(&format!(
                        "[Orchestrator] session={} turn done after {} tool call(s)",
                        session.id(),
                        tool_results.len()
                    ));
                    return Ok(TurnOutcome { reply, tool_results });
                }
                Completion::ToolCall(mut call) => {
                    if hops >= self.config.max_tool_hops {
                        self.logger.warn(&format!(
                            "[Orchestrator] session={} model asked for {} past the tool budget",
                            session.id(),
                            call.name
                        ));
                        return Err(TurnError::ToolHopLimitExceeded {
                            max: self.config.max_tool_hops,
                        });
                    }

                    if call.id.is_empty() {
                        call.id = format!("call_{}", uuid::Uuid::new_v4().simple());
                    }

                    let result = self.invoker.invoke(&call.name, call.input.clone()).await;
                    staged.push(ChatMessage::tool(call.id, call.name, call.input, result.to_llm_payload()));
                    tool_results.push(result);
                }
            }
        }
    }

    fn request_messages(&self, session: &Session, staged: &[ChatMessage]) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(session.len() + staged.len() + 1);
        messages.push(ChatMessage::system(self.config.system_prompt.clone()));
        messages.extend(session.messages().iter().cloned());
        messages.extend(staged.iter().cloned());
        messages
    }
}
