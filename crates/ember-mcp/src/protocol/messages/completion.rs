//! Argument completion messages

use serde::{Deserialize, Serialize};

/// What a completion request is completing against
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum CompletionReference {
    /// Completing an argument of a prompt
    #[serde(rename = "ref/prompt")]
    Prompt {
        /// Prompt name
        name: String,
    },
    /// Completing an expansion of a resource template
    #[serde(rename = "ref/resource")]
    Resource {
        /// The template URI
        uri: String,
    },
}

/// The argument being completed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionArgument {
    /// Argument name
    pub name: String,
    /// Partial value typed so far
    pub value: String,
}

/// Parameters of `completion/complete`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompleteParams {
    /// The prompt or resource template being completed
    #[serde(rename = "ref")]
    pub reference: CompletionReference,

    /// The argument and its partial value
    pub argument: CompletionArgument,
}

/// One completion candidate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionValue {
    /// The completed value
    pub value: String,

    /// What this candidate means
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Display label when it differs from the value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Result of `completion/complete`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompleteResult {
    /// Candidate values in preference order
    pub values: Vec<CompletionValue>,

    /// Total number of candidates available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,

    /// Whether more candidates exist beyond `values`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_more: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reference_tag_shapes() {
        let prompt_ref: CompletionReference =
            serde_json::from_value(json!({"type": "ref/prompt", "name": "greet"})).unwrap();
        assert_eq!(prompt_ref, CompletionReference::Prompt { name: "greet".to_string() });

        let resource_ref: CompletionReference =
            serde_json::from_value(json!({"type": "ref/resource", "uri": "file:///{x}"})).unwrap();
        assert!(matches!(resource_ref, CompletionReference::Resource { .. }));
    }

    #[test]
    fn params_rename_ref_keyword() {
        let params: CompleteParams = serde_json::from_value(json!({
            "ref": {"type": "ref/prompt", "name": "greet"},
            "argument": {"name": "who", "value": "wo"}
        }))
        .unwrap();
        assert_eq!(params.argument.value, "wo");
    }
}
