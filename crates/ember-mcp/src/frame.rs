//! Per-request context passed to every user callback
//!
//! A [`Frame`] is built by the engine for each inbound message and carries
//! the host's assigns, the transport's per-message metadata, the session
//! identity, and the current request. Its outbound handle is the only door
//! for server-initiated traffic: notifications, sampling requests, roots
//! requests, and session-scoped component registration all route through the
//! coordinator's transport sink.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::correlation::OutboundTracker;
use crate::error::{CoreError, CoreResult};
use crate::protocol::capabilities::ServerCapabilities;
use crate::protocol::constants::methods;
use crate::protocol::jsonrpc::{
    JsonRpcMessage, JsonRpcNotification, JsonRpcRequest, RequestId,
};
use crate::protocol::messages::{
    CreateMessageParams, LogMessageParams, ProgressParams, ResourceUpdatedParams,
};
use crate::protocol::types::{Implementation, LogLevel, ProtocolVersion};
use crate::registry::{PromptComponent, ResourceComponent, ToolComponent};
use crate::session::{Session, SessionSnapshot};
use crate::transport::TransportSink;

/// Host- and transport-supplied context for one inbound payload
#[derive(Debug, Clone, Default)]
pub struct InboundContext {
    /// Host-populated values, e.g. the authenticated subject
    pub assigns: HashMap<String, Value>,
    /// Transport metadata for this message (headers, peer info)
    pub transport: HashMap<String, Value>,
}

/// Shared outbound machinery handed to every frame of a session
pub(crate) struct OutboundHandle {
    pub(crate) sink: Arc<dyn TransportSink>,
    pub(crate) tracker: Arc<OutboundTracker>,
    pub(crate) capabilities: ServerCapabilities,
    pub(crate) default_timeout: Duration,
}

/// Immutable per-request context
///
/// Cloning is shallow; the underlying session and outbound machinery are
/// shared.
#[derive(Clone)]
pub struct Frame {
    assigns: HashMap<String, Value>,
    transport: HashMap<String, Value>,
    request: Option<JsonRpcRequest>,
    session: Arc<Session>,
    snapshot: SessionSnapshot,
    outbound: Arc<OutboundHandle>,
}

impl Frame {
    pub(crate) fn new(
        session: Arc<Session>,
        context: &InboundContext,
        request: Option<JsonRpcRequest>,
        outbound: Arc<OutboundHandle>,
    ) -> Self {
        let snapshot = session.snapshot();
        Self {
            assigns: context.assigns.clone(),
            transport: context.transport.clone(),
            request,
            session,
            snapshot,
            outbound,
        }
    }

    /// Host-populated assigns
    pub fn assigns(&self) -> &HashMap<String, Value> {
        &self.assigns
    }

    /// Transport metadata for the current message
    pub fn transport(&self) -> &HashMap<String, Value> {
        &self.transport
    }

    /// The request currently being processed, if any
    pub fn request(&self) -> Option<&JsonRpcRequest> {
        self.request.as_ref()
    }

    /// The transport-chosen session id
    pub fn session_id(&self) -> &str {
        self.session.id()
    }

    /// Whether the session completed the initialize handshake
    pub fn initialized(&self) -> bool {
        self.snapshot.initialized
    }

    /// The negotiated protocol version
    pub fn protocol_version(&self) -> Option<&ProtocolVersion> {
        self.snapshot.protocol_version.as_ref()
    }

    /// Client identification from initialize
    pub fn client_info(&self) -> Option<&Implementation> {
        self.snapshot.client_info.as_ref()
    }

    /// Whether the client advertised the sampling capability
    pub fn client_supports_sampling(&self) -> bool {
        self.snapshot.client_capabilities.supports_sampling()
    }

    /// Whether the client advertised the roots capability
    pub fn client_supports_roots(&self) -> bool {
        self.snapshot.client_capabilities.supports_roots()
    }

    pub(crate) fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Register a tool visible only to this session
    pub fn register_tool(&self, component: ToolComponent) {
        self.session.add_dynamic_tool(component);
    }

    /// Register a prompt visible only to this session
    pub fn register_prompt(&self, component: PromptComponent) {
        self.session.add_dynamic_prompt(component);
    }

    /// Register a resource visible only to this session
    pub fn register_resource(&self, component: ResourceComponent) {
        self.session.add_dynamic_resource(component);
    }

    /// Send a raw notification on this session
    ///
    /// # Errors
    ///
    /// Surfaces transport send failures to the caller; the core neither
    /// buffers nor retries.
    pub async fn notify(&self, method: &str, params: Option<Value>) -> CoreResult<()> {
        let notification = JsonRpcNotification::new(method, params);
        let payload = notification
            .to_bytes()
            .map_err(|e| CoreError::internal(e.to_string()))?;
        self.outbound
            .sink
            .send(self.session.id(), &payload)
            .await
            .map_err(CoreError::from)
    }

    /// Push a log record to the client
    ///
    /// Dropped silently when the record's severity is below the session's
    /// configured level, and with a warning when the server never advertised
    /// the logging capability.
    pub async fn notify_log(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        data: Option<Value>,
    ) -> CoreResult<()> {
        if self.outbound.capabilities.logging.is_none() {
            warn!("dropping log notification: logging capability not advertised");
            return Ok(());
        }
        if level < self.session.snapshot().log_level {
            return Ok(());
        }
        let params = LogMessageParams {
            level,
            message: message.into(),
            data,
        };
        self.notify(
            methods::NOTIFICATION_LOG_MESSAGE,
            Some(serde_json::to_value(params).map_err(|e| CoreError::internal(e.to_string()))?),
        )
        .await
    }

    /// Report progress for the current request
    ///
    /// Requires the inbound request to carry `params._meta.progressToken`;
    /// without one there is nothing to correlate and the call is a no-op.
    pub async fn notify_progress(
        &self,
        progress: f64,
        total: Option<f64>,
        message: Option<String>,
    ) -> CoreResult<()> {
        let Some(token) = self.progress_token() else {
            debug!("dropping progress notification: request has no progress token");
            return Ok(());
        };
        let params = ProgressParams {
            progress_token: token,
            progress,
            total,
            message,
        };
        self.notify(
            methods::NOTIFICATION_PROGRESS,
            Some(serde_json::to_value(params).map_err(|e| CoreError::internal(e.to_string()))?),
        )
        .await
    }

    fn progress_token(&self) -> Option<Value> {
        self.request
            .as_ref()
            .and_then(|request| request.params.as_ref())
            .and_then(|params| params.get("_meta"))
            .and_then(|meta| meta.get("progressToken"))
            .cloned()
    }

    /// Tell this session a subscribed resource changed
    ///
    /// No-op when the session is not subscribed to the URI.
    pub async fn notify_resource_updated(&self, uri: impl Into<String>) -> CoreResult<()> {
        let uri = uri.into();
        if !self.session.is_subscribed(&uri) {
            debug!(%uri, "dropping resources/updated: session not subscribed");
            return Ok(());
        }
        let params = ResourceUpdatedParams {
            uri,
            timestamp: Some(Utc::now()),
        };
        self.notify(
            methods::NOTIFICATION_RESOURCES_UPDATED,
            Some(serde_json::to_value(params).map_err(|e| CoreError::internal(e.to_string()))?),
        )
        .await
    }

    /// Announce that the tool registry changed
    ///
    /// Gated on the advertised `tools.listChanged` capability flag.
    pub async fn notify_tools_list_changed(&self) -> CoreResult<()> {
        let advertised = self
            .outbound
            .capabilities
            .tools
            .as_ref()
            .and_then(|caps| caps.list_changed)
            .unwrap_or(false);
        if !advertised {
            debug!("dropping tools/list_changed: capability flag not advertised");
            return Ok(());
        }
        self.notify(methods::NOTIFICATION_TOOLS_LIST_CHANGED, None).await
    }

    /// Announce that the prompt registry changed
    pub async fn notify_prompts_list_changed(&self) -> CoreResult<()> {
        let advertised = self
            .outbound
            .capabilities
            .prompts
            .as_ref()
            .and_then(|caps| caps.list_changed)
            .unwrap_or(false);
        if !advertised {
            debug!("dropping prompts/list_changed: capability flag not advertised");
            return Ok(());
        }
        self.notify(methods::NOTIFICATION_PROMPTS_LIST_CHANGED, None)
            .await
    }

    /// Announce that the resource registry changed
    pub async fn notify_resources_list_changed(&self) -> CoreResult<()> {
        let advertised = self
            .outbound
            .capabilities
            .resources
            .as_ref()
            .and_then(|caps| caps.list_changed)
            .unwrap_or(false);
        if !advertised {
            debug!("dropping resources/list_changed: capability flag not advertised");
            return Ok(());
        }
        self.notify(methods::NOTIFICATION_RESOURCES_LIST_CHANGED, None)
            .await
    }

    /// Issue a `sampling/createMessage` request to the client
    ///
    /// Gated on the client's `sampling` capability. The response (or its
    /// timeout) is delivered through the server handler's sampling hook; the
    /// returned id correlates the two.
    ///
    /// # Errors
    ///
    /// Fails without emitting anything when the client did not advertise
    /// sampling, and surfaces transport failures.
    pub async fn send_sampling_request(
        &self,
        request: CreateMessageParams,
        timeout: Option<Duration>,
    ) -> CoreResult<RequestId> {
        if !self.client_supports_sampling() {
            error!(
                session_id = self.session.id(),
                "sampling request refused: client does not advertise sampling"
            );
            return Err(CoreError::invalid_request(
                "client does not advertise the sampling capability",
            ));
        }
        let params =
            serde_json::to_value(request).map_err(|e| CoreError::internal(e.to_string()))?;
        self.send_tracked(methods::SAMPLING_CREATE_MESSAGE, Some(params), timeout)
            .await
    }

    /// Issue a `roots/list` request to the client
    ///
    /// Gated on the client's `roots` capability.
    ///
    /// # Errors
    ///
    /// Fails without emitting anything when the client did not advertise
    /// roots, and surfaces transport failures.
    pub async fn send_roots_request(&self, timeout: Option<Duration>) -> CoreResult<RequestId> {
        if !self.client_supports_roots() {
            error!(
                session_id = self.session.id(),
                "roots request refused: client does not advertise roots"
            );
            return Err(CoreError::invalid_request(
                "client does not advertise the roots capability",
            ));
        }
        self.send_tracked(methods::ROOTS_LIST, Some(serde_json::json!({})), timeout)
            .await
    }

    async fn send_tracked(
        &self,
        method: &str,
        params: Option<Value>,
        timeout: Option<Duration>,
    ) -> CoreResult<RequestId> {
        let timeout = timeout.unwrap_or(self.outbound.default_timeout);
        let id = self.outbound.tracker.register(
            Arc::clone(&self.outbound.sink),
            self.session.id(),
            method,
            timeout,
        );

        let request = JsonRpcRequest::new(method, params, id.clone());
        let payload = request
            .to_bytes()
            .map_err(|e| CoreError::internal(e.to_string()))?;

        if let Err(send_error) = self.outbound.sink.send(self.session.id(), &payload).await {
            // The request never left the server; release the record so the
            // timeout cannot fire for it.
            self.outbound.tracker.resolve(&id);
            return Err(CoreError::from(send_error));
        }
        Ok(id)
    }
}
