//! MCP protocol layer: JSON-RPC codec, typed messages, and response builders
//!
//! This module owns everything that touches the wire format. The
//! [`jsonrpc`] submodule implements the JSON-RPC 2.0 codec and shape
//! classification; [`messages`] holds the typed parameter/result structs per
//! MCP method family; [`builders`] provides the fluent reply constructors
//! handed to component handlers.

pub mod builders;
pub mod capabilities;
pub mod constants;
pub mod content;
pub mod jsonrpc;
pub mod messages;
pub mod types;

pub use builders::{CompletionResponse, PromptResponse, ResourceResponse, ToolResponse};
pub use capabilities::{
    ClientCapabilities, CompletionsCapability, LoggingCapability, PromptsCapability,
    ResourcesCapability, RootsCapability, SamplingCapability, ServerCapabilities, ToolsCapability,
};
pub use content::{Annotations, ContentItem, EmbeddedResource};
pub use jsonrpc::{
    decode, encode_batch, CodecError, DecodedPayload, InboundMessage, JsonRpcError,
    JsonRpcMessage, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, RequestId,
};
pub use types::{Implementation, LogLevel, ProtocolVersion, Role};
