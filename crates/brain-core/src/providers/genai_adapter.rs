//! Adapter between brain-core types and genai types
//!
//! Auth flows through our `SecretStore` chain (config key, then environment)
//! rather than genai's own env var lookup.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use genai::chat::{
    ChatMessage as GenaiMessage, ChatOptions as GenaiOptions,
    ChatRole as GenaiRole, ChatStreamEvent, Tool as GenaiTool,
    ToolCall as GenaiToolCall, ToolResponse as GenaiToolResponse,
};
use genai::resolver::{AuthData, AuthResolver, Endpoint, ServiceTargetResolver};
use genai::{adapter::AdapterKind, Client, ModelIden, ServiceTarget};
use crate::secrets::SecretStore;
use crate::types::{
    ChatMessage, ContentPart, MessageContent, MessageRole, StreamChunk, Tool, ToolCall,
};

use super::error::ProviderError;
use super::traits::StreamChatOptions;

// ============================================================================
// Message Conversion: brain-core -> genai
// ============================================================================

/// Convert MessageRole to genai ChatRole
pub fn to_genai_role(role: MessageRole) -> GenaiRole {
    match role {
        MessageRole::System => GenaiRole::System,
        MessageRole::User => GenaiRole::User,
        MessageRole::Assistant => GenaiRole::Assistant,
        MessageRole::Tool => GenaiRole::Tool,
    }
}

fn flatten_text(parts: &[ContentPart]) -> String {
    parts
        .iter()
        .filter_map(|p| match p {
            ContentPart::Text { text } => Some(text.clone()),
            ContentPart::ToolResult { tool_use_id, content } => {
                Some(format!("[Tool result for {}]: {}", tool_use_id, content))
            }
            ContentPart::ToolUse { .. } => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn genai_tool_call(id: String, name: String, input: serde_json::Value) -> GenaiToolCall {
    GenaiToolCall {
        call_id: id,
        fn_name: name,
        fn_arguments: input,
        thought_signatures: None,
    }
}

/// Expand a tool message into the assistant tool-call message followed by
/// the tool-response message carrying the JSON string.
///
/// Text parts have no place in a tool round trip and are skipped.
fn tool_message_to_genai(parts: Vec<ContentPart>) -> Vec<GenaiMessage> {
    parts
        .into_iter()
        .filter_map(|part| match part {
            ContentPart::ToolUse { id, name, input } => {
                Some(GenaiMessage::from(vec![genai_tool_call(id, name, input)]))
            }
            ContentPart::ToolResult { tool_use_id, content } => {
                Some(GenaiMessage::from(GenaiToolResponse::new(tool_use_id, content)))
            }
            ContentPart::Text { .. } => None,
        })
        .collect()
}

/// Convert one ChatMessage to genai messages (a tool message becomes two)
pub fn to_genai_message(msg: ChatMessage) -> Vec<GenaiMessage> {
    match (msg.role, msg.content) {
        (MessageRole::Tool, MessageContent::Parts(parts)) => tool_message_to_genai(parts),
        (role, content) => {
            let text = match content {
                MessageContent::Text(text) => text,
                MessageContent::Parts(parts) => flatten_text(&parts),
            };
            let msg = match role {
                MessageRole::System => GenaiMessage::system(text),
                MessageRole::Assistant => GenaiMessage::assistant(text),
                MessageRole::User | MessageRole::Tool => GenaiMessage::user(text),
            };
            vec![msg]
        }
    }
}

/// Convert a vector of messages to genai messages
pub fn to_genai_messages(messages: Vec<ChatMessage>) -> Vec<GenaiMessage> {
    messages.into_iter().flat_map(to_genai_message).collect()
}

// ============================================================================
// Tool Conversion: brain-core -> genai
// ============================================================================

/// Convert Tool to genai Tool
pub fn to_genai_tool(tool: Tool) -> GenaiTool {
    let mut genai_tool = GenaiTool::new(&tool.name).with_description(&tool.description);

    if let Some(schema) = tool.input_schema {
        genai_tool = genai_tool.with_schema(schema);
    }

    genai_tool
}

/// Convert tools to genai tools
pub fn to_genai_tools(tools: Vec<Tool>) -> Vec<GenaiTool> {
    tools.into_iter().map(to_genai_tool).collect()
}

// ============================================================================
// Options Conversion: brain-core -> genai
// ============================================================================

/// Convert StreamChatOptions to genai ChatOptions
pub fn to_genai_options(options: &StreamChatOptions) -> GenaiOptions {
    let mut genai_opts = GenaiOptions::default();

    if let Some(temp) = options.temperature {
        genai_opts = genai_opts.with_temperature(temp as f64);
    }

    if let Some(max_tokens) = options.max_tokens {
        genai_opts = genai_opts.with_max_tokens(max_tokens);
    }

    // Capture tool calls in stream so we can return them
    genai_opts.with_capture_tool_calls(true)
}

// ============================================================================
// Response Conversion: genai -> brain-core
// ============================================================================

/// Convert genai ToolCall to ToolCall
pub fn from_genai_tool_call(tc: &GenaiToolCall) -> ToolCall {
    ToolCall {
        id: tc.call_id.clone(),
        name: tc.fn_name.clone(),
        input: tc.fn_arguments.clone(),
    }
}

/// Convert genai stream event to StreamChunk
pub fn from_genai_event(event: ChatStreamEvent) -> Option<Result<StreamChunk, ProviderError>> {
    match event {
        ChatStreamEvent::Chunk(chunk) => Some(Ok(StreamChunk::Text {
            text: chunk.content,
        })),
        ChatStreamEvent::ToolCallChunk(chunk) => Some(Ok(StreamChunk::ToolCallDelta {
            id: chunk.tool_call.call_id,
            name: Some(chunk.tool_call.fn_name),
            input_delta: Some(chunk.tool_call.fn_arguments.to_string()),
        })),
        ChatStreamEvent::End(end) => {
            // One tool call per turn: only the first captured call is surfaced
            let first = end
                .captured_tool_calls()
                .and_then(|calls| calls.first().map(|tc| from_genai_tool_call(tc)));
            first.map(|tc| Ok(StreamChunk::ToolCall { tool_call: tc }))
        }
        _ => None,
    }
}

// ============================================================================
// Provider Resolution
// ============================================================================

/// Provider configuration for routing
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Provider identifier (e.g., "anthropic", "openai", "ollama")
    pub provider: String,
    /// Custom API base URL
    pub api_base: Option<String>,
}

/// Map a provider ID to the genai adapter that speaks its protocol
pub fn provider_adapter_kind(provider: &str) -> Option<AdapterKind> {
    match provider.to_lowercase().as_str() {
        "anthropic" => Some(AdapterKind::Anthropic),
        "openai" | "openrouter" | "mistral" | "azure" => Some(AdapterKind::OpenAI),
        "gemini" | "google" => Some(AdapterKind::Gemini),
        "ollama" => Some(AdapterKind::Ollama),
        "groq" => Some(AdapterKind::Groq),
        "xai" => Some(AdapterKind::Xai),
        "deepseek" => Some(AdapterKind::DeepSeek),
        _ => None,
    }
}

/// Fixed endpoints for OpenAI-compatible providers genai does not know natively
fn provider_default_endpoint(provider: &str) -> Option<&'static str> {
    match provider.to_lowercase().as_str() {
        "openrouter" => Some("https://openrouter.ai/api/v1/"),
        "mistral" => Some("https://api.mistral.ai/v1/"),
        _ => None,
    }
}

/// Check if a provider can be handled by genai
pub fn is_genai_supported(provider: &str) -> bool {
    provider_adapter_kind(provider).is_some()
}

// ============================================================================
// Client Creation with Custom Auth
// ============================================================================

/// Create a genai Client with auth from `secrets` and endpoint overrides
pub fn create_client(config: &ProviderConfig, secrets: Arc<dyn SecretStore>) -> Client {
    let auth_provider = config.provider.clone();

    let auth_resolver = AuthResolver::from_resolver_async_fn(
        move |_model_iden: ModelIden| -> Pin<Box<dyn Future<Output = genai::resolver::Result<Option<AuthData>>> + Send>> {
            let provider = auth_provider.clone();
            let secrets = Arc::clone(&secrets);

            Box::pin(async move {
                // None lets genai handle keyless providers such as Ollama
                Ok(secrets.get(&provider).map(|key| AuthData::from_single(key)))
            })
        }
    );

    let target_provider = config.provider.clone();
    let target_api_base = config.api_base.clone();

    let target_resolver = ServiceTargetResolver::from_resolver_fn(
        move |target: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error> {
            let ServiceTarget { endpoint, auth, model } = target;

            let endpoint = match (&target_api_base, provider_default_endpoint(&target_provider)) {
                (Some(base), _) => Endpoint::from_owned(base.clone()),
                (None, Some(url)) => Endpoint::from_static(url),
                (None, None) => endpoint,
            };
            let adapter_kind = provider_adapter_kind(&target_provider)
                .unwrap_or(model.adapter_kind);
            let model = ModelIden::new(adapter_kind, model.model_name.clone());

            // Auth is handled by the AuthResolver, not here
            Ok(ServiceTarget { endpoint, auth, model })
        },
    );

    Client::builder()
        .with_auth_resolver(auth_resolver)
        .with_service_target_resolver(target_resolver)
        .build()
}
