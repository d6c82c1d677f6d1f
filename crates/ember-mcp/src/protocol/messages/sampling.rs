//! Server-initiated sampling and roots messages

use serde::{Deserialize, Serialize};

use crate::protocol::content::ContentItem;
use crate::protocol::types::Role;

/// One message in a sampling conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SamplingMessage {
    /// Author role
    pub role: Role,

    /// Message content
    pub content: ContentItem,
}

impl SamplingMessage {
    /// A user-role text message
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: ContentItem::text(text),
        }
    }
}

/// Server preferences for model selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ModelPreferences {
    /// Ordered model name hints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<ModelHint>>,

    /// Weight of cost in selection, 0.0 to 1.0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_priority: Option<f64>,

    /// Weight of latency in selection, 0.0 to 1.0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_priority: Option<f64>,

    /// Weight of capability in selection, 0.0 to 1.0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intelligence_priority: Option<f64>,
}

/// A model name hint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelHint {
    /// Substring-matched model name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Parameters of `sampling/createMessage`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageParams {
    /// Conversation to sample from
    pub messages: Vec<SamplingMessage>,

    /// Model selection preferences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_preferences: Option<ModelPreferences>,

    /// System prompt the client should apply
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    /// Token budget for the completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,
}

/// Result of `sampling/createMessage`, produced by the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageResult {
    /// Role of the sampled message
    pub role: Role,

    /// Sampled content
    pub content: ContentItem,

    /// Model that produced the completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Why sampling stopped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
}

/// One filesystem root exposed by the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Root {
    /// Root URI, typically `file://`
    pub uri: String,

    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Result of `roots/list`, produced by the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListRootsResult {
    /// The client's roots
    pub roots: Vec<Root>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_message_params_wire_shape() {
        let params = CreateMessageParams {
            messages: vec![SamplingMessage::user_text("hi")],
            model_preferences: None,
            system_prompt: Some("be brief".to_string()),
            max_tokens: Some(100),
        };
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["systemPrompt"], "be brief");
        assert_eq!(value["maxTokens"], 100);
        assert_eq!(value["messages"][0]["role"], "user");
    }

    #[test]
    fn roots_result_parses() {
        let result: ListRootsResult = serde_json::from_value(json!({
            "roots": [{"uri": "file:///home/me", "name": "home"}]
        }))
        .unwrap();
        assert_eq!(result.roots.len(), 1);
    }
}
