//! MCP capability declarations for protocol negotiation
//!
//! Capability maps are exchanged during initialize. A feature that is not
//! advertised is treated as absent: the related methods answer
//! `method_not_found` (server side) or are never emitted (client side).

use serde::{Deserialize, Serialize};

/// Capabilities declared by an MCP client during initialization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClientCapabilities {
    /// Experimental, implementation-specific capabilities
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experimental: Option<serde_json::Value>,

    /// Server-initiated LLM sampling support
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling: Option<SamplingCapability>,

    /// Filesystem roots the client can enumerate for the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roots: Option<RootsCapability>,
}

impl ClientCapabilities {
    /// Whether the client accepts `sampling/createMessage` requests
    pub fn supports_sampling(&self) -> bool {
        self.sampling.is_some()
    }

    /// Whether the client answers `roots/list` requests
    pub fn supports_roots(&self) -> bool {
        self.roots.is_some()
    }
}

/// Capabilities declared by an MCP server during initialization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServerCapabilities {
    /// Experimental, implementation-specific capabilities
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experimental: Option<serde_json::Value>,

    /// `notifications/log/message` support and `logging/setLevel`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingCapability>,

    /// Prompt templates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompts: Option<PromptsCapability>,

    /// Readable resources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourcesCapability>,

    /// Callable tools
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,

    /// Argument completion for prompts and resource templates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completions: Option<CompletionsCapability>,
}

/// Resource capability flags
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesCapability {
    /// Whether per-URI subscriptions are supported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscribe: Option<bool>,

    /// Whether `notifications/resources/list_changed` is emitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Tool capability flags
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    /// Whether `notifications/tools/list_changed` is emitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Prompt capability flags
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PromptsCapability {
    /// Whether `notifications/prompts/list_changed` is emitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Logging capability marker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct LoggingCapability {}

/// Completion capability marker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CompletionsCapability {}

/// Sampling capability marker (client side)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SamplingCapability {}

/// Roots capability (client side)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RootsCapability {
    /// Whether the client emits `notifications/roots/list_changed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_capabilities_serialize_to_empty_object() {
        let caps = ServerCapabilities::default();
        assert_eq!(serde_json::to_string(&caps).unwrap(), "{}");
    }

    #[test]
    fn resource_flags_use_camel_case() {
        let caps = ResourcesCapability {
            subscribe: Some(true),
            list_changed: Some(false),
        };
        let json = serde_json::to_string(&caps).unwrap();
        assert!(json.contains("listChanged"));
        assert!(!json.contains("list_changed"));
    }

    #[test]
    fn client_capability_probes() {
        let caps: ClientCapabilities =
            serde_json::from_str(r#"{"sampling":{},"roots":{"listChanged":true}}"#).unwrap();
        assert!(caps.supports_sampling());
        assert!(caps.supports_roots());
        assert!(!ClientCapabilities::default().supports_sampling());
    }
}
