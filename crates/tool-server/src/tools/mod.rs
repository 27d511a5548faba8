//! Tool catalogue and per-tool handlers
//!
//! Each tool is a `POST /tools/<name>` endpoint taking a JSON object. The
//! discovery listing derives input schemas from the argument structs.

pub mod glossary;
pub mod margin;
pub mod weather;

use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry in the `GET /tools` listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    /// Path relative to the server root
    pub endpoint: String,
}

impl ToolDescriptor {
    fn new<T: JsonSchema>(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema: schema_for!(T).to_value(),
            endpoint: format!("/tools/{}", name),
        }
    }
}

/// Body of `GET /tools`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolListing {
    pub tools: Vec<ToolDescriptor>,
}

/// Every tool this server offers
pub fn descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new::<margin::MarginArgs>(
            "calculate_margin",
            "Calculate the margin amount from revenue and a margin percentage. \
             Returns {\"margin\": revenue * margin_pct / 100}.",
        ),
        ToolDescriptor::new::<weather::WeatherArgs>(
            "get_weather",
            "Get current weather conditions for a location. This is a stub returning sample data.",
        ),
        ToolDescriptor::new::<glossary::LookupArgs>(
            "lookup_business_term",
            "Look up definitions of business and finance terms (e.g. EBITDA, NPV, working capital) \
             from the business glossary.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptors() {
        let tools = descriptors();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["calculate_margin", "get_weather", "lookup_business_term"]);
        assert!(tools.iter().all(|t| t.endpoint == format!("/tools/{}", t.name)));
    }

    #[test]
    fn test_margin_schema_is_strict() {
        let margin = &descriptors()[0];
        let schema = &margin.input_schema;
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["additionalProperties"], false);
        assert_eq!(schema["properties"]["revenue"]["type"], "number");

        let mut required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        required.sort();
        assert_eq!(required, vec!["margin_pct", "revenue"]);
    }

    #[test]
    fn test_optional_fields_not_required() {
        let lookup = &descriptors()[2];
        let required = lookup.input_schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 1);
        assert_eq!(required[0], "query");
    }
}
