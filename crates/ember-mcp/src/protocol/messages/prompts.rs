//! Prompt listing and rendering messages

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::protocol::content::ContentItem;
use crate::protocol::types::Role;

/// An argument a prompt accepts, as listed to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptArgument {
    /// Argument name
    pub name: String,

    /// What the argument controls
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether the argument must be supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// Descriptor of a prompt template as listed to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prompt {
    /// Unique prompt name
    pub name: String,

    /// Display title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// What the prompt produces
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Arguments the prompt accepts
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<PromptArgument>,
}

/// Parameters of `prompts/list`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ListPromptsParams {
    /// Opaque pagination cursor from a previous reply
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// Result of `prompts/list`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListPromptsResult {
    /// Prompt descriptors, ascending by name
    pub prompts: Vec<Prompt>,

    /// Cursor for the next page, when more prompts remain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Parameters of `prompts/get`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetPromptParams {
    /// Name of the prompt to render
    pub name: String,

    /// Argument values keyed by argument name
    #[serde(default)]
    pub arguments: HashMap<String, String>,
}

/// One message of a rendered prompt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptMessage {
    /// Author role
    pub role: Role,

    /// Message content
    pub content: ContentItem,
}

impl PromptMessage {
    /// A user-role text message
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: ContentItem::text(text),
        }
    }

    /// An assistant-role text message
    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: ContentItem::text(text),
        }
    }
}

/// Result of `prompts/get`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetPromptResult {
    /// What this rendering represents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The rendered messages in order
    pub messages: Vec<PromptMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prompt_message_wire_shape() {
        let message = PromptMessage::user_text("hello");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["role"], "user");
        assert_eq!(value["content"]["type"], "text");
    }

    #[test]
    fn get_params_default_arguments_to_empty() {
        let params: GetPromptParams = serde_json::from_value(json!({"name": "greet"})).unwrap();
        assert!(params.arguments.is_empty());
    }

    #[test]
    fn prompt_without_arguments_omits_field() {
        let prompt = Prompt {
            name: "greet".to_string(),
            title: None,
            description: None,
            arguments: vec![],
        };
        let json = serde_json::to_string(&prompt).unwrap();
        assert!(!json.contains("arguments"));
    }
}
