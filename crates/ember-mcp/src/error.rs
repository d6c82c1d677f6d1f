//! Core error types and the wire-facing error taxonomy
//!
//! Errors carry a [`ErrorKind`] tag deciding how they surface: `Protocol`,
//! `Resource`, and `Execution` errors become JSON-RPC error objects on the
//! wire; `Transport` errors are logged and never shown to the client.

use serde_json::{json, Value};
use thiserror::Error;

use crate::protocol::constants::error_codes;
use crate::protocol::JsonRpcError;
use crate::transport::TransportError;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Category tag deciding how an error surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed JSON-RPC, wrong state, invalid params, unknown method
    Protocol,
    /// Send failure or missing transport binding
    Transport,
    /// Unknown URI or template mismatch
    Resource,
    /// User-handler failure
    Execution,
}

/// Error produced while processing MCP traffic
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid JSON reached the codec
    #[error("parse error: {message}")]
    Parse {
        /// What failed to parse
        message: String,
    },

    /// The message is not a valid request or arrived in a bad state
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// Why the request was refused
        message: String,
    },

    /// The method is unknown or not advertised
    #[error("method not found: {method}")]
    MethodNotFound {
        /// The offending method name
        method: String,
    },

    /// Parameters failed validation
    #[error("invalid params: {message}")]
    InvalidParams {
        /// Summary of the failure
        message: String,
        /// Individual validation errors for `data.errors`
        errors: Vec<String>,
    },

    /// The dispatcher or a handler failed internally
    #[error("internal error: {message}")]
    Internal {
        /// What went wrong
        message: String,
    },

    /// No registered resource matches the URI
    #[error("resource not found: {uri}")]
    ResourceNotFound {
        /// The requested URI
        uri: String,
    },

    /// The transport rejected an outbound send
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// A handler reported a structured failure
    #[error("execution failed: {message}")]
    Execution {
        /// The handler's failure description
        message: String,
        /// Optional structured context for `data`
        data: Option<Value>,
    },
}

impl CoreError {
    /// Parse error helper
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Invalid request helper
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Method-not-found helper
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::MethodNotFound {
            method: method.into(),
        }
    }

    /// Invalid params helper without itemised errors
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Invalid params helper carrying itemised validation errors
    pub fn invalid_params_with(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self::InvalidParams {
            message: message.into(),
            errors,
        }
    }

    /// Internal error helper
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Resource-not-found helper
    pub fn resource_not_found(uri: impl Into<String>) -> Self {
        Self::ResourceNotFound { uri: uri.into() }
    }

    /// Execution failure helper
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
            data: None,
        }
    }

    /// Execution failure helper with structured context
    pub fn execution_with(message: impl Into<String>, data: Value) -> Self {
        Self::Execution {
            message: message.into(),
            data: Some(data),
        }
    }

    /// The taxonomy tag for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Parse { .. }
            | CoreError::InvalidRequest { .. }
            | CoreError::MethodNotFound { .. }
            | CoreError::InvalidParams { .. }
            | CoreError::Internal { .. } => ErrorKind::Protocol,
            CoreError::Transport(_) => ErrorKind::Transport,
            CoreError::ResourceNotFound { .. } => ErrorKind::Resource,
            CoreError::Execution { .. } => ErrorKind::Execution,
        }
    }

    /// Convert into the JSON-RPC error object sent on the wire
    ///
    /// Transport errors have no wire shape; callers log them instead. When
    /// one reaches this conversion anyway it degrades to an internal error
    /// so the client still receives well-formed JSON-RPC.
    pub fn to_wire(&self) -> JsonRpcError {
        match self {
            CoreError::Parse { message } => {
                JsonRpcError::new(error_codes::PARSE_ERROR, format!("Parse error: {message}"))
            }
            CoreError::InvalidRequest { message } => {
                JsonRpcError::new(error_codes::INVALID_REQUEST, message.clone())
            }
            CoreError::MethodNotFound { method } => JsonRpcError::with_data(
                error_codes::METHOD_NOT_FOUND,
                "Method not found",
                json!({ "method": method }),
            ),
            CoreError::InvalidParams { errors, .. } => {
                if errors.is_empty() {
                    JsonRpcError::new(error_codes::INVALID_PARAMS, "Invalid params")
                } else {
                    JsonRpcError::with_data(
                        error_codes::INVALID_PARAMS,
                        "Invalid params",
                        json!({ "errors": errors }),
                    )
                }
            }
            CoreError::Internal { message } => JsonRpcError::with_data(
                error_codes::INTERNAL_ERROR,
                "Internal error",
                json!({ "message": message }),
            ),
            CoreError::ResourceNotFound { uri } => JsonRpcError::with_data(
                error_codes::RESOURCE_NOT_FOUND,
                "Resource not found",
                json!({ "uri": uri }),
            ),
            CoreError::Transport(error) => JsonRpcError::with_data(
                error_codes::INTERNAL_ERROR,
                "Internal error",
                json!({ "message": error.to_string() }),
            ),
            CoreError::Execution { message, data } => match data {
                Some(data) => JsonRpcError::with_data(
                    error_codes::SERVER_ERROR,
                    message.clone(),
                    data.clone(),
                ),
                None => JsonRpcError::new(error_codes::SERVER_ERROR, message.clone()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_taxonomy() {
        assert_eq!(CoreError::parse("x").kind(), ErrorKind::Protocol);
        assert_eq!(
            CoreError::resource_not_found("file:///x").kind(),
            ErrorKind::Resource
        );
        assert_eq!(CoreError::execution("boom").kind(), ErrorKind::Execution);
        assert_eq!(
            CoreError::from(TransportError::closed("s1")).kind(),
            ErrorKind::Transport
        );
    }

    #[test]
    fn wire_codes() {
        assert_eq!(CoreError::parse("x").to_wire().code, -32700);
        assert_eq!(CoreError::invalid_request("x").to_wire().code, -32600);
        assert_eq!(CoreError::method_not_found("m").to_wire().code, -32601);
        assert_eq!(CoreError::invalid_params("x").to_wire().code, -32602);
        assert_eq!(CoreError::internal("x").to_wire().code, -32603);
        assert_eq!(
            CoreError::resource_not_found("file:///nope").to_wire().code,
            -32002
        );
        assert_eq!(CoreError::execution("x").to_wire().code, -32000);
    }

    #[test]
    fn invalid_params_carries_itemised_errors() {
        let error = CoreError::invalid_params_with(
            "validation failed",
            vec!["root: missing required field: a".to_string()],
        );
        let wire = error.to_wire();
        assert_eq!(wire.message, "Invalid params");
        let data = wire.data.unwrap();
        assert_eq!(data["errors"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn resource_not_found_names_uri() {
        let wire = CoreError::resource_not_found("file:///nope").to_wire();
        assert_eq!(wire.data.unwrap()["uri"], "file:///nope");
    }
}
