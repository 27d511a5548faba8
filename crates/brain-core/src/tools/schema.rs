//! Strict argument validation against a tool's input schema
//!
//! Supports the JSON Schema subset tool servers emit: `type` (single or list),
//! `properties`, `required`, `additionalProperties: false`, `enum` and `items`.
//! Other keywords are ignored.

use serde_json::{Map, Value};

/// Validate `value` against `schema`, returning the first violation found
pub fn validate(schema: &Value, value: &Value) -> Result<(), String> {
    validate_at(schema, value, "$")
}

fn validate_at(schema: &Value, value: &Value, path: &str) -> Result<(), String> {
    let schema = match schema {
        Value::Object(obj) => obj,
        // `true` or anything non-object accepts everything
        _ => return Ok(()),
    };

    if let Some(expected) = schema.get("type") {
        check_type(expected, value, path)?;
    }

    if let Some(Value::Array(allowed)) = schema.get("enum") {
        if !allowed.contains(value) {
            return Err(format!("{} must be one of {}", path, Value::Array(allowed.clone())));
        }
    }

    match value {
        Value::Object(fields) => check_object(schema, fields, path),
        Value::Array(items) => {
            if let Some(item_schema) = schema.get("items") {
                for (i, item) in items.iter().enumerate() {
                    validate_at(item_schema, item, &format!("{}[{}]", path, i))?;
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn check_object(schema: &Map<String, Value>, fields: &Map<String, Value>, path: &str) -> Result<(), String> {
    if let Some(Value::Array(required)) = schema.get("required") {
        for name in required.iter().filter_map(Value::as_str) {
            if !fields.contains_key(name) {
                return Err(format!("{} is missing required field '{}'", path, name));
            }
        }
    }

    let properties = schema.get("properties").and_then(Value::as_object);
    let closed = matches!(schema.get("additionalProperties"), Some(Value::Bool(false)));

    for (name, field) in fields {
        match properties.and_then(|p| p.get(name)) {
            Some(field_schema) => validate_at(field_schema, field, &format!("{}.{}", path, name))?,
            None if closed => return Err(format!("{} has unexpected field '{}'", path, name)),
            None => {}
        }
    }
    Ok(())
}

fn check_type(expected: &Value, value: &Value, path: &str) -> Result<(), String> {
    let matches = match expected {
        Value::String(name) => type_matches(name, value),
        Value::Array(names) => names
            .iter()
            .filter_map(Value::as_str)
            .any(|name| type_matches(name, value)),
        _ => true,
    };

    if matches {
        Ok(())
    } else {
        Err(format!("{} must be of type {}, got {}", path, expected, type_name(value)))
    }
}

fn type_matches(name: &str, value: &Value) -> bool {
    match name {
        "object" => value.is_object(),
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => is_integer(value),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

/// `3.0` is not an integer: tool servers deserialize these into integer types
fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_u64(),
        _ => false,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
