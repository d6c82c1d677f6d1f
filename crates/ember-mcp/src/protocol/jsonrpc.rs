//! Core JSON-RPC 2.0 message types and wire codec
//!
//! Implements the message structures defined by the JSON-RPC 2.0
//! specification, shape-based classification of inbound traffic, and
//! buffer-based encoding for the transport boundary. Batches (JSON arrays of
//! messages) are decoded here; their processing order is the engine's
//! concern.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::constants::JSONRPC_VERSION;

/// Trait for JSON-RPC message serialization and deserialization
///
/// Provides common functionality for all JSON-RPC message types. Any type
/// that implements `Serialize + Deserialize` gets the default
/// implementations for JSON conversion.
///
/// # Examples
///
/// ```rust
/// use ember_mcp::protocol::{JsonRpcMessage, JsonRpcRequest, RequestId};
///
/// let request = JsonRpcRequest::new("ping", None, RequestId::from(1));
///
/// let json = request.to_json().unwrap();
/// let parsed = JsonRpcRequest::from_json(&json).unwrap();
///
/// assert_eq!(request, parsed);
/// ```
pub trait JsonRpcMessage: Serialize + for<'de> Deserialize<'de> + Sized {
    /// Serialize this message to a JSON string
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if serialization fails, which should be
    /// rare given the controlled structure of JSON-RPC messages.
    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize a message from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if the JSON is malformed, required fields
    /// are missing, or field types do not match the JSON-RPC structure.
    fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize directly into a buffer, avoiding intermediate String
    /// allocations
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if serialization fails.
    fn serialize_to_buffer(&self, buffer: &mut BytesMut) -> Result<usize, serde_json::Error> {
        let start_len = buffer.len();
        let writer = buffer.writer();
        serde_json::to_writer(writer, self)?;
        Ok(buffer.len() - start_len)
    }

    /// Serialize to bytes suitable for handing to a transport
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if serialization fails.
    fn to_bytes(&self) -> Result<Bytes, serde_json::Error> {
        let mut buffer = BytesMut::with_capacity(256);
        self.serialize_to_buffer(&mut buffer)?;
        Ok(buffer.freeze())
    }

    /// Deserialize a message from raw bytes
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if parsing fails.
    fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Request ID supporting both string and numeric formats per JSON-RPC 2.0
///
/// The wire representation preserves the original JSON type: a string id
/// serializes as a string, a numeric id as a number. Null ids (used only in
/// parse-error responses) are represented as `Option<RequestId>`.
///
/// # Examples
///
/// ```rust
/// use ember_mcp::protocol::RequestId;
///
/// let string_id = RequestId::from("req-123");
/// let numeric_id = RequestId::from(42);
///
/// assert_eq!(serde_json::to_string(&string_id).unwrap(), r#""req-123""#);
/// assert_eq!(serde_json::to_string(&numeric_id).unwrap(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// String-based request identifier
    String(String),
    /// Numeric request identifier
    Number(i64),
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        RequestId::String(id.to_string())
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        RequestId::String(id)
    }
}

impl From<i64> for RequestId {
    fn from(id: i64) -> Self {
        RequestId::Number(id)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::String(s) => write!(f, "{}", s),
            RequestId::Number(n) => write!(f, "{}", n),
        }
    }
}

/// JSON-RPC 2.0 request message
///
/// All fields are required except `params`, which may be omitted when the
/// method takes no parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcRequest {
    /// Protocol version, always "2.0"
    pub jsonrpc: String,

    /// Name of the method to invoke
    pub method: String,

    /// Parameters for the method
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,

    /// Unique identifier for this request
    pub id: RequestId,
}

impl JsonRpcRequest {
    /// Create a new JSON-RPC 2.0 request
    pub fn new(method: impl Into<String>, params: Option<Value>, id: RequestId) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
        }
    }

    /// Whether this request opens the initialize handshake
    pub fn is_initialize(&self) -> bool {
        self.method == crate::protocol::constants::methods::INITIALIZE
    }

    /// Whether this is a liveness ping
    pub fn is_ping(&self) -> bool {
        self.method == crate::protocol::constants::methods::PING
    }
}

impl JsonRpcMessage for JsonRpcRequest {}

/// JSON-RPC 2.0 error object carried inside an error response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    /// Numeric error code (see [`crate::protocol::constants::error_codes`])
    pub code: i64,

    /// Short human-readable error description
    pub message: String,

    /// Additional structured error context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Create an error object without additional data
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create an error object with structured context
    pub fn with_data(code: i64, message: impl Into<String>, data: Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }
}

/// JSON-RPC 2.0 response message
///
/// Contains either a successful `result` or an `error` object, never both.
/// The `id` echoes the originating request; it is `None` only for parse
/// errors where the request id could not be recovered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcResponse {
    /// Protocol version, always "2.0"
    pub jsonrpc: String,

    /// Result of a successful method invocation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Error information for a failed invocation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,

    /// Request identifier from the original request
    pub id: Option<RequestId>,
}

impl JsonRpcResponse {
    /// Create a successful response
    pub fn success(result: Value, id: RequestId) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id: Some(id),
        }
    }

    /// Create an error response
    pub fn error(error: JsonRpcError, id: Option<RequestId>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }

    /// Whether this response carries an error object
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl JsonRpcMessage for JsonRpcResponse {}

/// JSON-RPC 2.0 notification message
///
/// A request without an `id`; the peer must not reply to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcNotification {
    /// Protocol version, always "2.0"
    pub jsonrpc: String,

    /// Name of the notification method
    pub method: String,

    /// Parameters for the notification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    // No `id` field: its absence is what makes this a notification.
}

impl JsonRpcNotification {
    /// Create a new JSON-RPC 2.0 notification
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
        }
    }

    /// Whether this is the `notifications/initialized` lifecycle signal
    pub fn is_initialized_lifecycle(&self) -> bool {
        self.method == crate::protocol::constants::methods::NOTIFICATION_INITIALIZED
    }
}

impl JsonRpcMessage for JsonRpcNotification {}

/// A single inbound message classified by shape
///
/// Classification follows the JSON-RPC 2.0 field rules: `method` + `id` is a
/// request, `method` without `id` a notification, `id` with `result` or
/// `error` a response. Objects that carry `"jsonrpc": "2.0"` but fit none of
/// those shapes (and objects missing the version tag entirely) classify as
/// [`InboundMessage::Invalid`] so batch processing can reject them
/// per-element instead of dropping the whole batch.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// A request expecting a response
    Request(JsonRpcRequest),
    /// A fire-and-forget notification
    Notification(JsonRpcNotification),
    /// A response to a server-initiated request
    Response(JsonRpcResponse),
    /// An object that is not a well-formed JSON-RPC 2.0 message; the id is
    /// preserved when one could be recovered
    Invalid(Option<RequestId>),
}

impl InboundMessage {
    /// Classify a decoded JSON value by shape
    pub fn classify(value: Value) -> Self {
        let Some(obj) = value.as_object() else {
            return InboundMessage::Invalid(None);
        };

        let id = obj
            .get("id")
            .cloned()
            .and_then(|v| serde_json::from_value::<RequestId>(v).ok());

        if obj.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
            return InboundMessage::Invalid(id);
        }

        let has_method = obj.get("method").is_some_and(Value::is_string);
        let has_id = obj.contains_key("id");
        let has_result = obj.contains_key("result");
        let has_error = obj.contains_key("error");

        if has_method && has_id {
            match serde_json::from_value::<JsonRpcRequest>(value) {
                Ok(request) => InboundMessage::Request(request),
                Err(_) => InboundMessage::Invalid(id),
            }
        } else if has_method {
            match serde_json::from_value::<JsonRpcNotification>(value) {
                Ok(notification) => InboundMessage::Notification(notification),
                Err(_) => InboundMessage::Invalid(None),
            }
        } else if has_id && (has_result || has_error) {
            match serde_json::from_value::<JsonRpcResponse>(value) {
                Ok(response) => InboundMessage::Response(response),
                Err(_) => InboundMessage::Invalid(id),
            }
        } else {
            InboundMessage::Invalid(id)
        }
    }

    /// Whether this is a request
    pub fn is_request(&self) -> bool {
        matches!(self, InboundMessage::Request(_))
    }

    /// Whether this is a notification
    pub fn is_notification(&self) -> bool {
        matches!(self, InboundMessage::Notification(_))
    }

    /// Whether this is a response (successful or error)
    pub fn is_response(&self) -> bool {
        matches!(self, InboundMessage::Response(_))
    }

    /// Whether this is an `initialize` request
    pub fn is_initialize(&self) -> bool {
        matches!(self, InboundMessage::Request(r) if r.is_initialize())
    }

    /// Whether this message belongs to the initialize lifecycle: the
    /// `initialize` request or the `notifications/initialized` notification
    pub fn is_initialize_lifecycle(&self) -> bool {
        match self {
            InboundMessage::Request(r) => r.is_initialize(),
            InboundMessage::Notification(n) => n.is_initialized_lifecycle(),
            _ => false,
        }
    }

    /// Whether this is a `ping` request
    pub fn is_ping(&self) -> bool {
        matches!(self, InboundMessage::Request(r) if r.is_ping())
    }
}

/// A decoded top-level wire payload: a single message or a batch
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedPayload {
    /// A single JSON-RPC message
    Single(InboundMessage),
    /// A JSON array of messages, processed as a unit
    Batch(Vec<InboundMessage>),
}

/// Decode failure at the codec layer
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The payload was not valid UTF-8 JSON
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A batch array with no elements
    #[error("empty batch")]
    EmptyBatch,
}

/// Decode a raw wire payload into a single message or a batch
///
/// Unknown fields on otherwise well-formed messages are ignored. An empty
/// array is rejected here rather than producing an empty batch.
///
/// # Errors
///
/// Returns [`CodecError::Parse`] for malformed JSON and
/// [`CodecError::EmptyBatch`] for `[]`.
pub fn decode(bytes: &[u8]) -> Result<DecodedPayload, CodecError> {
    let value: Value = serde_json::from_slice(bytes)?;
    match value {
        Value::Array(elements) => {
            if elements.is_empty() {
                return Err(CodecError::EmptyBatch);
            }
            Ok(DecodedPayload::Batch(
                elements.into_iter().map(InboundMessage::classify).collect(),
            ))
        }
        other => Ok(DecodedPayload::Single(InboundMessage::classify(other))),
    }
}

/// Encode an ordered set of batch responses as a JSON array
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn encode_batch(responses: &[JsonRpcResponse]) -> Result<Bytes, serde_json::Error> {
    let mut buffer = BytesMut::with_capacity(256 * responses.len().max(1));
    let writer = (&mut buffer).writer();
    serde_json::to_writer(writer, responses)?;
    Ok(buffer.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_id_serialization_preserves_json_type() {
        let string_id = RequestId::from("test-123");
        let numeric_id = RequestId::from(42);

        assert_eq!(serde_json::to_string(&string_id).unwrap(), r#""test-123""#);
        assert_eq!(serde_json::to_string(&numeric_id).unwrap(), "42");

        let parsed: RequestId = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, RequestId::Number(42));
        let parsed: RequestId = serde_json::from_str(r#""42""#).unwrap();
        assert_eq!(parsed, RequestId::String("42".to_string()));
    }

    #[test]
    fn request_round_trip() {
        let request = JsonRpcRequest::new(
            "tools/call",
            Some(json!({"name": "add", "arguments": {"a": 1}})),
            RequestId::from("call-1"),
        );

        let json = request.to_json().unwrap();
        let parsed = JsonRpcRequest::from_json(&json).unwrap();
        assert_eq!(request, parsed);
    }

    #[test]
    fn request_without_params_omits_field() {
        let request = JsonRpcRequest::new("ping", None, RequestId::from("p"));
        let json = request.to_json().unwrap();

        assert!(!json.contains("params"));
        assert!(json.contains(r#""method":"ping""#));
    }

    #[test]
    fn notification_has_no_id() {
        let notification = JsonRpcNotification::new("notifications/initialized", None);
        let json = notification.to_json().unwrap();

        assert!(!json.contains("\"id\""), "notification must not carry an id: {json}");
    }

    #[test]
    fn error_response_shape() {
        let response = JsonRpcResponse::error(
            JsonRpcError::new(-32601, "Method not found"),
            Some(RequestId::from(7)),
        );

        let json = response.to_json().unwrap();
        assert!(json.contains(r#""code":-32601"#));
        assert!(!json.contains("result"));
        assert!(json.contains(r#""id":7"#));
    }

    #[test]
    fn classify_request_notification_response() {
        let request = InboundMessage::classify(json!({
            "jsonrpc": "2.0", "id": 1, "method": "tools/list"
        }));
        assert!(request.is_request());

        let notification = InboundMessage::classify(json!({
            "jsonrpc": "2.0", "method": "notifications/initialized"
        }));
        assert!(notification.is_notification());
        assert!(notification.is_initialize_lifecycle());

        let response = InboundMessage::classify(json!({
            "jsonrpc": "2.0", "id": 1, "result": {}
        }));
        assert!(response.is_response());

        let error = InboundMessage::classify(json!({
            "jsonrpc": "2.0", "id": 1, "error": {"code": -32000, "message": "boom"}
        }));
        assert!(error.is_response());
    }

    #[test]
    fn classify_rejects_missing_version_tag() {
        let classified = InboundMessage::classify(json!({"id": 3, "method": "ping"}));
        assert_eq!(classified, InboundMessage::Invalid(Some(RequestId::Number(3))));
    }

    #[test]
    fn classify_ping_and_initialize() {
        let ping = InboundMessage::classify(json!({"jsonrpc": "2.0", "id": "p", "method": "ping"}));
        assert!(ping.is_ping());

        let init = InboundMessage::classify(json!({
            "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}
        }));
        assert!(init.is_initialize());
        assert!(init.is_initialize_lifecycle());
    }

    #[test]
    fn decode_single_object() {
        let payload = decode(br#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#).unwrap();
        assert!(matches!(payload, DecodedPayload::Single(m) if m.is_ping()));
    }

    #[test]
    fn decode_batch_preserves_order() {
        let payload = decode(
            br#"[{"jsonrpc":"2.0","id":1,"method":"a"},{"jsonrpc":"2.0","method":"b"}]"#,
        )
        .unwrap();

        let DecodedPayload::Batch(messages) = payload else {
            panic!("expected batch");
        };
        assert_eq!(messages.len(), 2);
        assert!(messages[0].is_request());
        assert!(messages[1].is_notification());
    }

    #[test]
    fn decode_empty_batch_is_rejected() {
        assert!(matches!(decode(b"[]"), Err(CodecError::EmptyBatch)));
    }

    #[test]
    fn decode_malformed_json_is_parse_error() {
        assert!(matches!(decode(b"{nope"), Err(CodecError::Parse(_))));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let payload = decode(
            br#"{"jsonrpc":"2.0","id":1,"method":"ping","x-trace":"abc"}"#,
        )
        .unwrap();
        assert!(matches!(payload, DecodedPayload::Single(m) if m.is_ping()));
    }

    mod props {
        use proptest::prelude::*;
        use serde_json::json;

        use crate::protocol::jsonrpc::{
            InboundMessage, JsonRpcMessage, JsonRpcRequest, RequestId,
        };

        proptest! {
            #[test]
            fn numeric_ids_round_trip(id in any::<i64>()) {
                let request = JsonRpcRequest::new("ping", None, RequestId::Number(id));
                let json = request.to_json().unwrap();
                let parsed = JsonRpcRequest::from_json(&json).unwrap();
                prop_assert_eq!(parsed.id, RequestId::Number(id));
            }

            #[test]
            fn string_ids_round_trip(id in "[a-zA-Z0-9_-]{1,32}") {
                let request = JsonRpcRequest::new("ping", None, RequestId::from(id.as_str()));
                let json = request.to_json().unwrap();
                let parsed = JsonRpcRequest::from_json(&json).unwrap();
                prop_assert_eq!(parsed.id, RequestId::String(id));
            }

            #[test]
            fn any_method_with_id_classifies_as_request(
                method in "[a-z]{1,12}(/[a-z]{1,12}){0,2}",
                id in any::<i64>(),
            ) {
                let classified = InboundMessage::classify(json!({
                    "jsonrpc": "2.0", "id": id, "method": method
                }));
                prop_assert!(classified.is_request());
            }

            #[test]
            fn any_method_without_id_classifies_as_notification(
                method in "[a-z]{1,12}(/[a-z]{1,12}){0,2}",
            ) {
                let classified = InboundMessage::classify(json!({
                    "jsonrpc": "2.0", "method": method
                }));
                prop_assert!(classified.is_notification());
            }
        }
    }
}
