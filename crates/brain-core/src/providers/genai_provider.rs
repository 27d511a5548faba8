//! GenaiProvider - real LLM APIs through the genai crate

use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;

use genai::chat::{ChatRequest, ChatStreamEvent};

use crate::logging::Logger;
use crate::secrets::{ChainSecretStore, SecretStore};
use crate::types::ChatMessage;

use super::error::{ProviderError, ProviderResult};
use super::genai_adapter::{
    create_client, from_genai_event, is_genai_supported, to_genai_messages, to_genai_options,
    to_genai_tools, ProviderConfig,
};
use super::traits::{Provider, ProviderModelConfig, StreamChatOptions, StreamResponse};

/// Provider backed by genai for all supported LLM APIs
pub struct GenaiProvider {
    /// Provider identifier
    provider_id: String,
    logger: Arc<dyn Logger>,
}

impl GenaiProvider {
    pub fn new(provider_id: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self {
            provider_id: provider_id.into(),
            logger,
        }
    }

    /// Check if this provider can handle the given provider ID
    pub fn supports(provider_id: &str) -> bool {
        is_genai_supported(provider_id)
    }

    /// Extract model name from a model string (e.g., "anthropic/claude-3" -> "claude-3")
    pub fn extract_model_name(model: &str) -> &str {
        model.split('/').nth(1).unwrap_or(model)
    }

    fn requires_api_key(&self) -> bool {
        !matches!(self.provider_id.as_str(), "ollama")
    }
}

#[async_trait]
impl Provider for GenaiProvider {
    fn name(&self) -> &str {
        &self.provider_id
    }

    async fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
        model_config: ProviderModelConfig,
        options: StreamChatOptions,
    ) -> ProviderResult<StreamResponse> {
        let secrets = Arc::new(ChainSecretStore::with_explicit_key(
            &self.provider_id,
            model_config.api_key.as_deref(),
        ));
        if self.requires_api_key() && !secrets.has(&self.provider_id) {
            return Err(ProviderError::missing_api_key(&self.provider_id));
        }

        let config = ProviderConfig {
            provider: self.provider_id.clone(),
            api_base: model_config.api_base.clone(),
        };
        let client = create_client(&config, secrets);

        let mut chat_req = ChatRequest::new(to_genai_messages(messages));
        if let Some(tools) = &options.tools {
            chat_req = chat_req.with_tools(to_genai_tools(tools.clone()));
        }
        let genai_options = to_genai_options(&options);
        let model_name = Self::extract_model_name(&model_config.model);

        self.logger.debug(&format!(
            "[GenaiProvider] provider={} model={} tools={}",
            self.provider_id,
            model_name,
            options.tools.as_ref().map_or(0, |t| t.len())
        ));

        let chat_stream = client
            .exec_chat_stream(model_name, chat_req, Some(&genai_options))
            .await
            .map_err(|e| ProviderError::api_error(&self.provider_id, 500, e.to_string()))?;

        let logger = Arc::clone(&self.logger);
        let provider_id = self.provider_id.clone();

        let stream = chat_stream.stream.filter_map(move |result| {
            let logger = Arc::clone(&logger);
            let provider_id = provider_id.clone();

            async move {
                match result {
                    Ok(event) => {
                        if let ChatStreamEvent::End(_) = &event {
                            logger.debug("[GenaiProvider] Stream event: End");
                        }
                        from_genai_event(event)
                    }
                    Err(e) => {
                        logger.error(&format!("[GenaiProvider] Stream error: {}", e));
                        Some(Err(ProviderError::api_error(provider_id, 500, e.to_string())))
                    }
                }
            }
        });

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;

    #[test]
    fn test_extract_model_name() {
        assert_eq!(
            GenaiProvider::extract_model_name("anthropic/claude-3-haiku-20240307"),
            "claude-3-haiku-20240307"
        );
        assert_eq!(GenaiProvider::extract_model_name("gpt-4o"), "gpt-4o");
    }

    #[test]
    fn test_supports() {
        assert!(GenaiProvider::supports("anthropic"));
        assert!(GenaiProvider::supports("openrouter"));
        assert!(!GenaiProvider::supports("unknown_provider"));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        std::env::remove_var("BRAINNOKEYPROVIDER_API_KEY");
        let provider = GenaiProvider::new("brainnokeyprovider", Arc::new(NoOpLogger));
        let result = provider
            .stream_chat(
                vec![ChatMessage::user("hi")],
                ProviderModelConfig::new("some-model"),
                StreamChatOptions::new(),
            )
            .await;
        assert!(matches!(result, Err(ProviderError::MissingApiKey { .. })));
    }
}
