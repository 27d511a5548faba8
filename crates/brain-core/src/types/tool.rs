//! Tool/function calling types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool definition for function calling, as sent to the LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name (function name)
    pub name: String,
    /// Description of what the tool does
    pub description: String,
    /// JSON Schema for the input parameters
    #[serde(rename = "inputSchema", skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

impl Tool {
    /// Create a new tool definition
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: None,
        }
    }

    /// Set the input schema
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.input_schema = Some(schema);
        self
    }
}

/// A tool as advertised by a tool server's discovery endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique tool name
    pub name: String,
    /// What the tool does, shown to the LLM
    #[serde(default)]
    pub description: String,
    /// JSON Schema the arguments must satisfy
    #[serde(default = "empty_object_schema")]
    pub input_schema: Value,
    /// Invocation endpoint, relative to the tool server or absolute
    pub endpoint: String,
}

fn empty_object_schema() -> Value {
    serde_json::json!({ "type": "object" })
}

impl From<&ToolDescriptor> for Tool {
    fn from(desc: &ToolDescriptor) -> Self {
        Tool {
            name: desc.name.clone(),
            description: desc.description.clone(),
            input_schema: Some(desc.input_schema.clone()),
        }
    }
}

/// Tool call requested by the LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call
    pub id: String,
    /// Name of the tool being called
    pub name: String,
    /// Input arguments for the tool
    pub input: Value,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input,
        }
    }

    /// Get an input argument by key
    pub fn get_arg(&self, key: &str) -> Option<&Value> {
        self.input.get(key)
    }

    /// Get an input argument as a string
    pub fn get_arg_str(&self, key: &str) -> Option<&str> {
        self.input.get(key).and_then(|v| v.as_str())
    }

    /// Get an input argument as an f64
    pub fn get_arg_f64(&self, key: &str) -> Option<f64> {
        self.input.get(key).and_then(|v| v.as_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_creation() {
        let tool = Tool::new("get_weather", "Get the current weather")
            .with_schema(json!({
                "type": "object",
                "properties": {
                    "location": { "type": "string" }
                },
                "required": ["location"]
            }));

        assert_eq!(tool.name, "get_weather");
        assert!(tool.input_schema.is_some());
    }

    #[test]
    fn test_descriptor_defaults() {
        let desc: ToolDescriptor = serde_json::from_value(json!({
            "name": "ping",
            "endpoint": "/tools/ping"
        }))
        .unwrap();

        assert_eq!(desc.description, "");
        assert_eq!(desc.input_schema, json!({"type": "object"}));

        let tool = Tool::from(&desc);
        assert_eq!(tool.name, "ping");
        assert_eq!(tool.input_schema, Some(json!({"type": "object"})));
    }

    #[test]
    fn test_tool_call_args() {
        let call = ToolCall::new(
            "call_123",
            "calculate_margin",
            json!({
                "revenue": 100,
                "margin_pct": 20.5
            }),
        );

        assert_eq!(call.get_arg_f64("revenue"), Some(100.0));
        assert_eq!(call.get_arg_f64("margin_pct"), Some(20.5));
        assert_eq!(call.get_arg_str("revenue"), None);
        assert!(call.get_arg("nonexistent").is_none());
    }
}
