//! Streaming response types

use serde::{Deserialize, Serialize};
use super::tool::ToolCall;

/// Streaming chunk from an LLM response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamChunk {
    /// Text content chunk
    Text {
        text: String,
    },
    /// Complete tool call
    ToolCall {
        #[serde(rename = "toolCall")]
        tool_call: ToolCall,
    },
    /// Partial tool call (for streaming tool arguments)
    ToolCallDelta {
        id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(rename = "inputDelta", skip_serializing_if = "Option::is_none")]
        input_delta: Option<String>,
    },
}

impl StreamChunk {
    /// Create a text chunk
    pub fn text(text: impl Into<String>) -> Self {
        StreamChunk::Text { text: text.into() }
    }

    /// Create a tool call chunk
    pub fn tool_call(tool_call: ToolCall) -> Self {
        StreamChunk::ToolCall { tool_call }
    }

    /// Get the text content if this is a text chunk
    pub fn as_text(&self) -> Option<&str> {
        match self {
            StreamChunk::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// What one LLM call produced once its stream is drained
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// A natural-language answer
    Reply(String),
    /// A request to invoke a tool
    ToolCall(ToolCall),
}

/// Folds stream chunks into a [`Completion`].
///
/// The first complete tool call wins; text the model emitted alongside it
/// is dropped.
#[derive(Debug, Default)]
pub struct CompletionBuilder {
    text: String,
    tool_call: Option<ToolCall>,
}

impl CompletionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one chunk
    pub fn push(&mut self, chunk: StreamChunk) {
        match chunk {
            StreamChunk::Text { text } => self.text.push_str(&text),
            StreamChunk::ToolCall { tool_call } => {
                if self.tool_call.is_none() {
                    self.tool_call = Some(tool_call);
                }
            }
            // Deltas are superseded by the complete call at end of stream
            StreamChunk::ToolCallDelta { .. } => {}
        }
    }

    pub fn finish(self) -> Completion {
        match self.tool_call {
            Some(call) => Completion::ToolCall(call),
            None => Completion::Reply(self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_chunks_concatenate() {
        let mut builder = CompletionBuilder::new();
        builder.push(StreamChunk::text("The margin "));
        builder.push(StreamChunk::text("is $20."));
        assert_eq!(builder.finish(), Completion::Reply("The margin is $20.".to_string()));
    }

    #[test]
    fn test_tool_call_wins_over_text() {
        let call = ToolCall::new("id1", "get_weather", json!({"location": "NYC"}));
        let mut builder = CompletionBuilder::new();
        builder.push(StreamChunk::text("Let me check."));
        builder.push(StreamChunk::ToolCallDelta {
            id: "id1".into(),
            name: Some("get_weather".into()),
            input_delta: Some("{\"loc".into()),
        });
        builder.push(StreamChunk::tool_call(call.clone()));
        assert_eq!(builder.finish(), Completion::ToolCall(call));
    }

    #[test]
    fn test_only_first_tool_call_kept() {
        let first = ToolCall::new("a", "one", json!({}));
        let second = ToolCall::new("b", "two", json!({}));
        let mut builder = CompletionBuilder::new();
        builder.push(StreamChunk::tool_call(first.clone()));
        builder.push(StreamChunk::tool_call(second));
        assert_eq!(builder.finish(), Completion::ToolCall(first));
    }

    #[test]
    fn test_chunk_serialization() {
        let chunk = StreamChunk::text("Hello world");
        let json = serde_json::to_string(&chunk).unwrap();
        assert!(json.contains("\"type\":\"text\""));
        assert!(json.contains("\"text\":\"Hello world\""));
        assert_eq!(chunk.as_text(), Some("Hello world"));
    }
}
