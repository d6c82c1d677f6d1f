//! User-server hooks invoked by the protocol engine
//!
//! A server implementation supplies a [`ServerHandler`] for everything the
//! built-in component dispatch does not cover: custom request methods,
//! forwarded notifications, completion, and the results of server-initiated
//! sampling and roots requests. Every hook has a default, so a server built
//! purely from registered components needs no handler of its own.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::frame::Frame;
use crate::protocol::builders::CompletionResponse;
use crate::protocol::jsonrpc::{JsonRpcNotification, JsonRpcRequest, RequestId};
use crate::protocol::messages::{CompleteParams, CreateMessageResult, Root};
use crate::protocol::types::Implementation;

/// Hooks a user server can implement on top of the component dispatch
#[async_trait]
pub trait ServerHandler: Send + Sync {
    /// Handle a request method the core does not implement natively
    ///
    /// The default answers `method_not_found`.
    async fn handle_request(&self, request: &JsonRpcRequest, _frame: &Frame) -> CoreResult<Value> {
        Err(CoreError::method_not_found(request.method.clone()))
    }

    /// Observe a forwarded notification
    ///
    /// Receives `notifications/progress`, `notifications/roots/list_changed`,
    /// and any notification the core does not consume itself. The default
    /// ignores them.
    async fn handle_notification(&self, _notification: &JsonRpcNotification, _frame: &Frame) {}

    /// Observe the completed initialize handshake
    ///
    /// Runs once per session, right after `notifications/initialized` flips
    /// the session state.
    async fn on_initialized(&self, _client_info: Option<&Implementation>, _frame: &Frame) {}

    /// Produce completion candidates for `completion/complete`
    ///
    /// Only reached when the server advertises the completion capability.
    /// The default returns no candidates.
    async fn handle_completion(
        &self,
        _params: &CompleteParams,
        _frame: &Frame,
    ) -> CoreResult<CompletionResponse> {
        Ok(CompletionResponse::new())
    }

    /// Receive the client's answer to a `sampling/createMessage` request
    async fn handle_sampling(
        &self,
        _result: CreateMessageResult,
        _id: &RequestId,
        _frame: &Frame,
    ) {
    }

    /// Receive the client's answer to a `roots/list` request
    async fn handle_roots(&self, _roots: Vec<Root>, _id: &RequestId, _frame: &Frame) {}
}

/// Handler with every hook at its default
///
/// The builder falls back to this when no handler is supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultServerHandler;

#[async_trait]
impl ServerHandler for DefaultServerHandler {}
