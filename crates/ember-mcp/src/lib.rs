//! # ember-mcp
//!
//! Core of an MCP (Model Context Protocol) server framework: a JSON-RPC 2.0
//! protocol engine with session management, component dispatch, and
//! correlation of server-initiated requests.
//!
//! A transport feeds raw payloads into [`McpCore::handle_message`] and gets
//! the encoded reply back; everything the server initiates (notifications,
//! sampling, roots) leaves through the [`transport::TransportSink`] the core
//! was built with.
//!
//! ## Architecture
//!
//! - [`protocol`] — JSON-RPC codec, typed MCP messages, response builders
//! - [`session`] — per-client state with idle expiry
//! - [`registry`] — tools, resources, and prompts with schema validation and
//!   pagination
//! - [`correlation`] — outbound-request tracking with per-request timeouts
//! - [`engine`] — the coordinator tying the pieces together
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use ember_mcp::transport::{TransportError, TransportSink};
//! use ember_mcp::{
//!     CoreResult, Frame, InboundContext, McpCoreBuilder, ToolComponent, ToolHandler,
//!     ToolResponse,
//! };
//! use serde_json::{json, Value};
//!
//! struct Add;
//!
//! #[async_trait]
//! impl ToolHandler for Add {
//!     async fn call(&self, arguments: Value, _frame: &Frame) -> CoreResult<ToolResponse> {
//!         let a = arguments["a"].as_i64().unwrap_or(0);
//!         let b = arguments["b"].as_i64().unwrap_or(0);
//!         Ok(ToolResponse::new().structured(json!({"sum": a + b})))
//!     }
//! }
//!
//! struct NullSink;
//!
//! #[async_trait]
//! impl TransportSink for NullSink {
//!     async fn send(&self, _session_id: &str, _payload: &[u8]) -> Result<(), TransportError> {
//!         Ok(())
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let core = McpCoreBuilder::new()
//!     .server_info("adder", "1.0.0")
//!     .tool(ToolComponent::new(
//!         "add",
//!         json!({
//!             "type": "object",
//!             "properties": {"a": {"type": "integer"}, "b": {"type": "integer"}},
//!             "required": ["a", "b"]
//!         }),
//!         Add,
//!     )?)
//!     .build(Arc::new(NullSink))
//!     .await?;
//!
//! let reply = core
//!     .handle_message(
//!         "session-1",
//!         InboundContext::default(),
//!         br#"{"jsonrpc":"2.0","id":"p","method":"ping"}"#,
//!     )
//!     .await;
//! assert!(reply.is_some());
//! # Ok(())
//! # }
//! ```

pub mod correlation;
pub mod engine;
pub mod error;
pub mod frame;
pub mod handler;
pub mod protocol;
pub mod registry;
pub mod schema;
pub mod session;
pub mod transport;

pub use engine::{CoreConfig, McpCore, McpCoreBuilder};
pub use error::{CoreError, CoreResult, ErrorKind};
pub use frame::{Frame, InboundContext};
pub use handler::{DefaultServerHandler, ServerHandler};
pub use protocol::{
    Annotations, ClientCapabilities, CompletionResponse, ContentItem, Implementation,
    JsonRpcError, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, LogLevel,
    PromptResponse, ProtocolVersion, RequestId, ResourceResponse, Role, ServerCapabilities,
    ToolResponse,
};
pub use registry::{
    ComponentRegistry, PromptComponent, PromptHandler, RegistryError, ResourceComponent,
    ResourceHandler, ToolComponent, ToolHandler,
};
pub use session::{Session, SessionStore};
