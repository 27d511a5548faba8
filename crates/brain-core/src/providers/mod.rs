//! LLM Provider implementations
//!
//! All real providers go through the `genai` crate, which handles streaming,
//! provider-specific protocols and tool calling. Providers not native to genai
//! (OpenRouter, Mistral) are reached via its `ServiceTargetResolver` using
//! OpenAI-compatible protocols.
//!
//! Auth flows through our `SecretStore` chain, not genai's env var lookup.
//!
//! The `MockProvider` plays scripted responses for tests and offline runs.

mod traits;
mod error;
mod genai_adapter;
mod genai_provider;
mod mock;

pub use traits::{Provider, ProviderModelConfig, StreamChatOptions, StreamResponse};
pub use error::{ProviderError, ProviderResult};

pub use genai_provider::GenaiProvider;
pub use genai_adapter::{is_genai_supported, ProviderConfig};

pub use mock::{MockMode, MockProvider, MockStep, RecordedRequest, ReplyFn};

use crate::logging::Logger;
use std::sync::Arc;

/// Create a provider for the given provider ID
///
/// `mock` yields an echoing `MockProvider`; everything else goes through
/// `GenaiProvider`, which falls back to the OpenAI protocol for unknown IDs.
pub fn create_provider(provider_id: &str, logger: Arc<dyn Logger>) -> Arc<dyn Provider> {
    match provider_id.to_lowercase().as_str() {
        "mock" => Arc::new(MockProvider::echo(logger)),
        id => Arc::new(GenaiProvider::new(id, logger)),
    }
}

/// List all supported provider IDs
pub fn supported_providers() -> Vec<&'static str> {
    vec![
        "anthropic",
        "openai",
        "gemini",
        "ollama",
        "groq",
        "xai",
        "deepseek",
        "openrouter",
        "mistral",
        "mock",
    ]
}
