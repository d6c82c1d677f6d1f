//! Initialize handshake messages

use serde::{Deserialize, Serialize};

use crate::protocol::capabilities::{ClientCapabilities, ServerCapabilities};
use crate::protocol::types::{Implementation, ProtocolVersion};

/// Parameters of the `initialize` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Protocol revision the client wants to speak
    pub protocol_version: ProtocolVersion,

    /// Capabilities the client supports
    #[serde(default)]
    pub capabilities: ClientCapabilities,

    /// Client identification
    pub client_info: Implementation,
}

/// Result of the `initialize` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// Protocol revision the server selected
    pub protocol_version: ProtocolVersion,

    /// Capabilities the server advertises
    pub capabilities: ServerCapabilities,

    /// Server identification
    pub server_info: Implementation,

    /// Optional usage instructions for the client's model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn initialize_params_parse_spec_shape() {
        let params: InitializeParams = serde_json::from_value(json!({
            "protocolVersion": "2025-03-26",
            "capabilities": {},
            "clientInfo": {"name": "c", "version": "1"}
        }))
        .unwrap();

        assert_eq!(params.protocol_version.as_str(), "2025-03-26");
        assert_eq!(params.client_info.name, "c");
    }

    #[test]
    fn initialize_result_wire_shape() {
        let result = InitializeResult {
            protocol_version: ProtocolVersion::new("2024-11-05"),
            capabilities: ServerCapabilities::default(),
            server_info: Implementation::new("srv", "1.0"),
            instructions: None,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["protocolVersion"], "2024-11-05");
        assert_eq!(value["serverInfo"]["name"], "srv");
        assert!(value.get("instructions").is_none());
    }

    #[test]
    fn missing_capabilities_default_to_empty() {
        let params: InitializeParams = serde_json::from_value(json!({
            "protocolVersion": "2024-11-05",
            "clientInfo": {"name": "c", "version": "1"}
        }))
        .unwrap();
        assert!(!params.capabilities.supports_sampling());
    }
}
