//! Mock provider for testing
//!
//! Provides deterministic, configurable responses without network dependencies.
//! The scripted mode drives the orchestrator through tool round trips, and
//! every request is recorded so tests can inspect what the LLM was sent.

use async_trait::async_trait;
use futures::stream;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use super::error::{ProviderError, ProviderResult};
use super::traits::{Provider, ProviderModelConfig, StreamChatOptions, StreamResponse};
use crate::logging::Logger;
use crate::types::{ChatMessage, MessageContent, MessageRole, StreamChunk, ToolCall};

/// Builds a reply from the messages the mock was sent
pub type ReplyFn = Arc<dyn Fn(&[ChatMessage]) -> String + Send + Sync>;

/// One scripted LLM response
#[derive(Clone)]
pub enum MockStep {
    /// Answer with fixed text
    Reply(String),
    /// Ask for a tool call
    ToolCall(ToolCall),
    /// Answer with text computed from the request, e.g. from a tool result
    Dynamic(ReplyFn),
    /// Fail the call
    Fail(String),
}

impl std::fmt::Debug for MockStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MockStep::Reply(text) => f.debug_tuple("Reply").field(text).finish(),
            MockStep::ToolCall(call) => f.debug_tuple("ToolCall").field(call).finish(),
            MockStep::Dynamic(_) => f.write_str("Dynamic(..)"),
            MockStep::Fail(msg) => f.debug_tuple("Fail").field(msg).finish(),
        }
    }
}

/// Mock response mode
#[derive(Debug, Clone, Default)]
pub enum MockMode {
    /// Echo back the last user message
    #[default]
    Echo,
    /// Return a fixed response
    Fixed(String),
    /// Fail every call
    Error(String),
    /// Return nothing (empty response)
    Empty,
    /// Play back steps in order, one per call
    Scripted,
}

/// What the mock received on one call
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub messages: Vec<ChatMessage>,
    /// Names of the tools offered, empty when none
    pub tool_names: Vec<String>,
}

/// Mock LLM provider for testing
pub struct MockProvider {
    mode: MockMode,
    script: Mutex<VecDeque<MockStep>>,
    requests: Mutex<Vec<RecordedRequest>>,
    logger: Arc<dyn Logger>,
}

impl MockProvider {
    /// Create a new mock provider in echo mode
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Echo, logger)
    }

    pub fn with_mode(mode: MockMode, logger: Arc<dyn Logger>) -> Self {
        Self {
            mode,
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            logger,
        }
    }

    /// Create an echo provider (echoes back user message)
    pub fn echo(logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Echo, logger)
    }

    /// Create a fixed response provider
    pub fn fixed(response: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Fixed(response.into()), logger)
    }

    /// Create an error-producing provider
    pub fn error(message: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Error(message.into()), logger)
    }

    /// Create a provider that plays back `steps`, one per call
    pub fn scripted(steps: Vec<MockStep>, logger: Arc<dyn Logger>) -> Self {
        let provider = Self::with_mode(MockMode::Scripted, logger);
        provider.script.lock().extend(steps);
        provider
    }

    /// Append more steps to the script
    pub fn push_steps(&self, steps: impl IntoIterator<Item = MockStep>) {
        self.script.lock().extend(steps);
    }

    /// Steps not yet consumed
    pub fn remaining_steps(&self) -> usize {
        self.script.lock().len()
    }

    /// All requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Extract last user message content
    fn last_user_message(messages: &[ChatMessage]) -> String {
        messages
            .iter()
            .rev()
            .filter(|m| m.role == MessageRole::User)
            .find_map(|m| match &m.content {
                MessageContent::Text(text) if !text.is_empty() => Some(text.clone()),
                _ => None,
            })
            .unwrap_or_else(|| "Hello from MockProvider!".to_string())
    }

    fn next_step(&self) -> ProviderResult<MockStep> {
        self.script
            .lock()
            .pop_front()
            .ok_or_else(|| ProviderError::Other("Mock error: script exhausted".to_string()))
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
        _model: ProviderModelConfig,
        options: StreamChatOptions,
    ) -> ProviderResult<StreamResponse> {
        let tool_names = options
            .tools
            .as_ref()
            .map(|tools| tools.iter().map(|t| t.name.clone()).collect())
            .unwrap_or_default();
        self.requests.lock().push(RecordedRequest {
            messages: messages.clone(),
            tool_names,
        });

        let chunks: Vec<StreamChunk> = match &self.mode {
            MockMode::Echo => {
                let user_msg = Self::last_user_message(&messages);
                self.logger.debug(&format!("MockProvider: Echo mode, echoing: {}", user_msg));
                vec![StreamChunk::text(format!("Echo: {}", user_msg))]
            }
            MockMode::Fixed(response) => vec![StreamChunk::text(response.clone())],
            MockMode::Empty => vec![],
            MockMode::Error(message) => {
                return Err(ProviderError::Other(format!("Mock error: {}", message)));
            }
            MockMode::Scripted => {
                let step = self.next_step()?;
                self.logger.debug(&format!("MockProvider: Scripted step {:?}", step));
                match step {
                    MockStep::Reply(text) => vec![StreamChunk::text(text)],
                    MockStep::ToolCall(call) => vec![StreamChunk::tool_call(call)],
                    MockStep::Dynamic(reply) => vec![StreamChunk::text(reply(&messages))],
                    MockStep::Fail(message) => {
                        return Err(ProviderError::Other(format!("Mock error: {}", message)));
                    }
                }
            }
        };

        Ok(Box::pin(stream::iter(chunks.into_iter().map(Ok))))
    }
}
