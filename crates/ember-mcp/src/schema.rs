//! JSON Schema validation for component arguments and structured output
//!
//! Covers the subset of JSON Schema that MCP tool and prompt schemas use in
//! practice: type checking, required fields, nested property and item
//! validation, enums, and basic numeric/string bounds. It is deliberately
//! not a full-draft implementation.

use std::fmt;

use serde_json::Value;

/// A single validation failure with the path to the offending value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Path to the invalid value, e.g. `arguments.a` or `arguments.items[2]`
    pub path: String,
    /// What went wrong
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Result of a validation pass: empty on success, all violations otherwise
pub type SchemaResult = Result<(), Vec<SchemaViolation>>;

/// Validate a JSON value against a schema
///
/// `root` names the top of the path in reported violations; the dispatcher
/// passes `"arguments"` for tool calls and `"structuredContent"` for output
/// validation.
pub fn validate(schema: &Value, value: &Value, root: &str) -> SchemaResult {
    let mut violations = Vec::new();
    check(schema, value, root, &mut violations);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Whether a schema describes a JSON object
///
/// Tool input schemas must satisfy this; registration rejects anything else.
pub fn is_object_schema(schema: &Value) -> bool {
    schema
        .as_object()
        .and_then(|obj| obj.get("type"))
        .and_then(Value::as_str)
        == Some("object")
}

fn check(schema: &Value, value: &Value, path: &str, violations: &mut Vec<SchemaViolation>) {
    // Boolean schemas: true accepts everything, false nothing.
    if let Some(accept) = schema.as_bool() {
        if !accept {
            violations.push(SchemaViolation {
                path: path.to_string(),
                message: "schema rejects all values".to_string(),
            });
        }
        return;
    }

    let Some(schema_obj) = schema.as_object() else {
        return;
    };

    if let Some(type_constraint) = schema_obj.get("type") {
        if !type_matches(type_constraint, value) {
            let expected = match type_constraint {
                Value::String(name) => name.clone(),
                other => other.to_string(),
            };
            violations.push(SchemaViolation {
                path: path.to_string(),
                message: format!("expected type {expected}, got {}", type_name(value)),
            });
            // Further constraints assume the right type.
            return;
        }
    }

    if let Some(allowed) = schema_obj.get("enum").and_then(Value::as_array) {
        if !allowed.contains(value) {
            violations.push(SchemaViolation {
                path: path.to_string(),
                message: format!("value must be one of {allowed:?}"),
            });
        }
    }

    if let Some(expected) = schema_obj.get("const") {
        if value != expected {
            violations.push(SchemaViolation {
                path: path.to_string(),
                message: format!("value must equal {expected}"),
            });
        }
    }

    match value {
        Value::Object(fields) => check_object(schema_obj, fields, path, violations),
        Value::Array(items) => check_array(schema_obj, items, path, violations),
        Value::String(text) => check_string(schema_obj, text, path, violations),
        Value::Number(number) => check_number(schema_obj, number, path, violations),
        _ => {}
    }
}

fn type_matches(constraint: &Value, value: &Value) -> bool {
    match constraint {
        Value::String(name) => single_type_matches(name, value),
        Value::Array(names) => names
            .iter()
            .filter_map(Value::as_str)
            .any(|name| single_type_matches(name, value)),
        _ => true,
    }
}

fn single_type_matches(name: &str, value: &Value) -> bool {
    match name {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn check_object(
    schema: &serde_json::Map<String, Value>,
    fields: &serde_json::Map<String, Value>,
    path: &str,
    violations: &mut Vec<SchemaViolation>,
) {
    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for name in required.iter().filter_map(Value::as_str) {
            if !fields.contains_key(name) {
                violations.push(SchemaViolation {
                    path: path.to_string(),
                    message: format!("missing required field: {name}"),
                });
            }
        }
    }

    let properties = schema.get("properties").and_then(Value::as_object);
    if let Some(properties) = properties {
        for (name, value) in fields {
            if let Some(property_schema) = properties.get(name) {
                check(property_schema, value, &format!("{path}.{name}"), violations);
            }
        }
    }

    if schema.get("additionalProperties") == Some(&Value::Bool(false)) {
        for name in fields.keys() {
            let declared = properties.is_some_and(|props| props.contains_key(name));
            if !declared {
                violations.push(SchemaViolation {
                    path: path.to_string(),
                    message: format!("additional property not allowed: {name}"),
                });
            }
        }
    }
}

fn check_array(
    schema: &serde_json::Map<String, Value>,
    items: &[Value],
    path: &str,
    violations: &mut Vec<SchemaViolation>,
) {
    if let Some(item_schema) = schema.get("items") {
        if item_schema.is_object() || item_schema.is_boolean() {
            for (index, item) in items.iter().enumerate() {
                check(item_schema, item, &format!("{path}[{index}]"), violations);
            }
        }
    }

    if let Some(min) = schema.get("minItems").and_then(Value::as_u64) {
        if (items.len() as u64) < min {
            violations.push(SchemaViolation {
                path: path.to_string(),
                message: format!("array must have at least {min} items"),
            });
        }
    }
    if let Some(max) = schema.get("maxItems").and_then(Value::as_u64) {
        if (items.len() as u64) > max {
            violations.push(SchemaViolation {
                path: path.to_string(),
                message: format!("array must have at most {max} items"),
            });
        }
    }
}

fn check_string(
    schema: &serde_json::Map<String, Value>,
    text: &str,
    path: &str,
    violations: &mut Vec<SchemaViolation>,
) {
    let length = text.chars().count() as u64;
    if let Some(min) = schema.get("minLength").and_then(Value::as_u64) {
        if length < min {
            violations.push(SchemaViolation {
                path: path.to_string(),
                message: format!("string must be at least {min} characters"),
            });
        }
    }
    if let Some(max) = schema.get("maxLength").and_then(Value::as_u64) {
        if length > max {
            violations.push(SchemaViolation {
                path: path.to_string(),
                message: format!("string must be at most {max} characters"),
            });
        }
    }
}

fn check_number(
    schema: &serde_json::Map<String, Value>,
    number: &serde_json::Number,
    path: &str,
    violations: &mut Vec<SchemaViolation>,
) {
    let Some(value) = number.as_f64() else {
        return;
    };

    if let Some(min) = schema.get("minimum").and_then(Value::as_f64) {
        if value < min {
            violations.push(SchemaViolation {
                path: path.to_string(),
                message: format!("value must be >= {min}"),
            });
        }
    }
    if let Some(max) = schema.get("maximum").and_then(Value::as_f64) {
        if value > max {
            violations.push(SchemaViolation {
                path: path.to_string(),
                message: format!("value must be <= {max}"),
            });
        }
    }
    if let Some(min) = schema.get("exclusiveMinimum").and_then(Value::as_f64) {
        if value <= min {
            violations.push(SchemaViolation {
                path: path.to_string(),
                message: format!("value must be > {min}"),
            });
        }
    }
    if let Some(max) = schema.get("exclusiveMaximum").and_then(Value::as_f64) {
        if value >= max {
            violations.push(SchemaViolation {
                path: path.to_string(),
                message: format!("value must be < {max}"),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn add_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "a": {"type": "integer"},
                "b": {"type": "integer"}
            },
            "required": ["a", "b"]
        })
    }

    #[test]
    fn accepts_valid_arguments() {
        assert!(validate(&add_schema(), &json!({"a": 2, "b": 3}), "arguments").is_ok());
    }

    #[test]
    fn rejects_wrong_type_with_path() {
        let violations =
            validate(&add_schema(), &json!({"a": "x", "b": 3}), "arguments").unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "arguments.a");
        assert!(violations[0].message.contains("integer"));
    }

    #[test]
    fn rejects_missing_required_field() {
        let violations = validate(&add_schema(), &json!({"b": 3}), "arguments").unwrap_err();
        assert!(violations[0].message.contains("missing required field: a"));
    }

    #[test]
    fn float_is_not_integer() {
        let violations =
            validate(&add_schema(), &json!({"a": 1.5, "b": 3}), "arguments").unwrap_err();
        assert_eq!(violations[0].path, "arguments.a");
    }

    #[test]
    fn enum_and_bounds() {
        let schema = json!({
            "type": "object",
            "properties": {
                "mode": {"type": "string", "enum": ["fast", "slow"]},
                "count": {"type": "integer", "minimum": 1, "maximum": 10}
            }
        });
        assert!(validate(&schema, &json!({"mode": "fast", "count": 5}), "arguments").is_ok());
        assert!(validate(&schema, &json!({"mode": "warp"}), "arguments").is_err());
        assert!(validate(&schema, &json!({"count": 0}), "arguments").is_err());
    }

    #[test]
    fn nested_arrays_report_indexed_paths() {
        let schema = json!({
            "type": "object",
            "properties": {
                "numbers": {"type": "array", "items": {"type": "number"}, "minItems": 2}
            },
            "required": ["numbers"]
        });
        let violations =
            validate(&schema, &json!({"numbers": [1, "two"]}), "arguments").unwrap_err();
        assert_eq!(violations[0].path, "arguments.numbers[1]");
    }

    #[test]
    fn additional_properties_false() {
        let schema = json!({
            "type": "object",
            "properties": {"a": {"type": "integer"}},
            "additionalProperties": false
        });
        let violations = validate(&schema, &json!({"a": 1, "z": 2}), "arguments").unwrap_err();
        assert!(violations[0].message.contains("additional property"));
    }

    #[test]
    fn object_schema_probe() {
        assert!(is_object_schema(&json!({"type": "object"})));
        assert!(!is_object_schema(&json!({"type": "string"})));
        assert!(!is_object_schema(&json!(true)));
    }
}
