//! Turn error types

use crate::providers::ProviderError;

/// Why a turn produced no reply
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error("Message content is empty")]
    EmptyMessage,

    #[error("LLM call failed: {0}")]
    Llm(#[from] ProviderError),

    #[error("Model kept requesting tools after {max} tool call(s)")]
    ToolHopLimitExceeded { max: usize },
}

impl TurnError {
    /// Whether the caller sent something unusable, as opposed to an upstream failure
    pub fn is_client_error(&self) -> bool {
        matches!(self, TurnError::EmptyMessage)
    }
}

pub type TurnResult<T> = Result<T, TurnError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TurnError::from(ProviderError::missing_api_key("anthropic"));
        assert!(err.to_string().starts_with("LLM call failed"));
        assert!(!err.is_client_error());

        assert!(TurnError::EmptyMessage.is_client_error());
        assert_eq!(
            TurnError::ToolHopLimitExceeded { max: 1 }.to_string(),
            "Model kept requesting tools after 1 tool call(s)"
        );
    }
}
