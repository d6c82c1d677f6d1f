//! Tool listing and invocation messages

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::content::ContentItem;

/// Descriptor of a callable tool as listed to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    /// Unique tool name
    pub name: String,

    /// Display title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// What the tool does
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// JSON Schema describing the tool's arguments object
    pub input_schema: Value,

    /// JSON Schema describing `structuredContent` in the tool's replies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<Value>,

    /// Behavioral hints (read-only, destructive, idempotent, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Value>,
}

/// Parameters of `tools/list`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ListToolsParams {
    /// Opaque pagination cursor from a previous reply
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// Result of `tools/list`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListToolsResult {
    /// Tool descriptors, ascending by name
    pub tools: Vec<Tool>,

    /// Cursor for the next page, when more tools remain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Parameters of `tools/call`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallToolParams {
    /// Name of the tool to invoke
    pub name: String,

    /// Arguments object, validated against the tool's input schema
    #[serde(default)]
    pub arguments: Value,
}

/// Result of `tools/call`
///
/// `is_error: true` marks a domain failure carried in `content`; it is still
/// a successful JSON-RPC reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    /// Content items of the reply
    pub content: Vec<ContentItem>,

    /// Whether the reply represents a tool-domain failure
    pub is_error: bool,

    /// Structured payload validated against the tool's output schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_descriptor_uses_camel_case_schema_keys() {
        let tool = Tool {
            name: "add".to_string(),
            title: None,
            description: Some("Add numbers".to_string()),
            input_schema: json!({"type": "object"}),
            output_schema: Some(json!({"type": "object"})),
            annotations: None,
        };
        let value = serde_json::to_value(&tool).unwrap();
        assert!(value.get("inputSchema").is_some());
        assert!(value.get("outputSchema").is_some());
    }

    #[test]
    fn call_result_wire_shape() {
        let result = CallToolResult {
            content: vec![ContentItem::text("{\"sum\":5}")],
            is_error: false,
            structured_content: Some(json!({"sum": 5})),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["isError"], false);
        assert_eq!(value["structuredContent"]["sum"], 5);
        assert_eq!(value["content"][0]["type"], "text");
    }

    #[test]
    fn call_params_default_arguments_to_null() {
        let params: CallToolParams = serde_json::from_value(json!({"name": "add"})).unwrap();
        assert!(params.arguments.is_null());
    }
}
