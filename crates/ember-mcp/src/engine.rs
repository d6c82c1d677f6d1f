//! Protocol engine: top-level dispatch for inbound MCP traffic
//!
//! [`McpCore`] is the coordinator a transport feeds. It decodes payloads,
//! attaches sessions, enforces the initialize handshake, routes requests to
//! the component registry or the user handler, fans notifications out to the
//! right consumer, and correlates responses to server-initiated requests.
//! Replies to inbound requests are returned to the calling transport;
//! server-initiated traffic leaves through the configured
//! [`TransportSink`].

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::FutureExt;
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::correlation::OutboundTracker;
use crate::error::{CoreError, CoreResult, ErrorKind};
use crate::frame::{Frame, InboundContext, OutboundHandle};
use crate::handler::{DefaultServerHandler, ServerHandler};
use crate::protocol::capabilities::{
    PromptsCapability, ResourcesCapability, ServerCapabilities, ToolsCapability,
};
use crate::protocol::constants::{
    error_codes, methods, DEFAULT_OUTBOUND_REQUEST_TIMEOUT_MS, DEFAULT_SESSION_IDLE_TIMEOUT_MS,
    DEFAULT_SESSION_SWEEP_INTERVAL_MS, DEFAULT_SUPPORTED_VERSIONS,
};
use crate::protocol::jsonrpc::{
    decode, encode_batch, CodecError, DecodedPayload, InboundMessage, JsonRpcError,
    JsonRpcMessage, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse,
};
use crate::protocol::messages::{
    CancelledParams, CompleteParams, CreateMessageResult, InitializeParams, InitializeResult,
    ListRootsResult, ResourceUriParams, SetLevelParams,
};
use crate::protocol::types::{Implementation, ProtocolVersion};
use crate::registry::{
    ComponentRegistry, PromptComponent, RegistryError, ResourceComponent, ToolComponent,
};
use crate::session::{Session, SessionStore};
use crate::transport::TransportSink;

/// Configuration of the protocol core
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Server identification sent in the initialize reply
    pub server_info: Implementation,

    /// Protocol revisions the server speaks, newest first
    pub supported_versions: Vec<ProtocolVersion>,

    /// Capabilities advertised to clients; components registered on the
    /// builder fill in the matching entries automatically
    pub capabilities: ServerCapabilities,

    /// Usage instructions included in the initialize reply
    pub instructions: Option<String>,

    /// How long a session may stay idle before it is destroyed
    pub session_idle_timeout: Duration,

    /// Interval of the idle-session sweep
    pub session_sweep_interval: Duration,

    /// Default timeout for server-initiated requests
    pub outbound_request_timeout: Duration,

    /// Page size for the listing methods; `None` lists everything at once
    pub list_pagination_limit: Option<usize>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            server_info: Implementation::new("ember-mcp", env!("CARGO_PKG_VERSION")),
            supported_versions: DEFAULT_SUPPORTED_VERSIONS
                .iter()
                .map(|version| ProtocolVersion::new(*version))
                .collect(),
            capabilities: ServerCapabilities::default(),
            instructions: None,
            session_idle_timeout: Duration::from_millis(DEFAULT_SESSION_IDLE_TIMEOUT_MS),
            session_sweep_interval: Duration::from_millis(DEFAULT_SESSION_SWEEP_INTERVAL_MS),
            outbound_request_timeout: Duration::from_millis(DEFAULT_OUTBOUND_REQUEST_TIMEOUT_MS),
            list_pagination_limit: None,
        }
    }
}

/// Builder assembling a [`McpCore`]
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use ember_mcp::{McpCoreBuilder, ToolComponent, ToolHandler, ToolResponse};
/// use ember_mcp::transport::{TransportError, TransportSink};
/// use ember_mcp::{CoreResult, Frame};
/// use serde_json::{json, Value};
///
/// struct Echo;
///
/// #[async_trait]
/// impl ToolHandler for Echo {
///     async fn call(&self, arguments: Value, _frame: &Frame) -> CoreResult<ToolResponse> {
///         Ok(ToolResponse::from_text(arguments.to_string()))
///     }
/// }
///
/// struct NullSink;
///
/// #[async_trait]
/// impl TransportSink for NullSink {
///     async fn send(&self, _session_id: &str, _payload: &[u8]) -> Result<(), TransportError> {
///         Ok(())
///     }
/// }
///
/// # async fn build() -> Result<(), Box<dyn std::error::Error>> {
/// let core = McpCoreBuilder::new()
///     .server_info("echo-server", "1.0.0")
///     .tool(ToolComponent::new("echo", json!({"type": "object"}), Echo)?)
///     .build(Arc::new(NullSink))
///     .await?;
/// # let _ = core;
/// # Ok(())
/// # }
/// ```
pub struct McpCoreBuilder {
    config: CoreConfig,
    registry: ComponentRegistry,
    handler: Arc<dyn ServerHandler>,
    registration_error: Option<RegistryError>,
}

impl McpCoreBuilder {
    /// Start a builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CoreConfig::default(),
            registry: ComponentRegistry::new(),
            handler: Arc::new(DefaultServerHandler),
            registration_error: None,
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: CoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the server identification
    pub fn server_info(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.config.server_info = Implementation::new(name, version);
        self
    }

    /// Set the supported protocol revisions, newest first
    pub fn supported_versions(mut self, versions: &[&str]) -> Self {
        self.config.supported_versions = versions
            .iter()
            .map(|version| ProtocolVersion::new(*version))
            .collect();
        self
    }

    /// Set the advertised capabilities explicitly
    pub fn capabilities(mut self, capabilities: ServerCapabilities) -> Self {
        self.config.capabilities = capabilities;
        self
    }

    /// Include usage instructions in the initialize reply
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.config.instructions = Some(instructions.into());
        self
    }

    /// Override the session idle timeout
    pub fn session_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.session_idle_timeout = timeout;
        self
    }

    /// Override the idle sweep interval
    pub fn session_sweep_interval(mut self, interval: Duration) -> Self {
        self.config.session_sweep_interval = interval;
        self
    }

    /// Override the default outbound request timeout
    pub fn outbound_request_timeout(mut self, timeout: Duration) -> Self {
        self.config.outbound_request_timeout = timeout;
        self
    }

    /// Bound the page size of the listing methods
    pub fn list_pagination_limit(mut self, limit: Option<usize>) -> Self {
        self.config.list_pagination_limit = limit;
        self
    }

    /// Install the user server hooks
    pub fn handler(mut self, handler: impl ServerHandler + 'static) -> Self {
        self.handler = Arc::new(handler);
        self
    }

    /// Register a tool
    pub fn tool(mut self, component: ToolComponent) -> Self {
        if let Err(error) = self.registry.register_tool(component) {
            self.registration_error.get_or_insert(error);
        }
        self
    }

    /// Register a prompt
    pub fn prompt(mut self, component: PromptComponent) -> Self {
        if let Err(error) = self.registry.register_prompt(component) {
            self.registration_error.get_or_insert(error);
        }
        self
    }

    /// Register a resource
    pub fn resource(mut self, component: ResourceComponent) -> Self {
        if let Err(error) = self.registry.register_resource(component) {
            self.registration_error.get_or_insert(error);
        }
        self
    }

    /// Assemble the core and start its background tasks
    ///
    /// Capabilities left unset in the configuration are derived from the
    /// registered components.
    ///
    /// # Errors
    ///
    /// Surfaces the first registration error (duplicate name, invalid
    /// schema, unanchored template).
    pub async fn build(self, sink: Arc<dyn TransportSink>) -> Result<McpCore, RegistryError> {
        if let Some(error) = self.registration_error {
            return Err(error);
        }

        let mut config = self.config;
        if config.capabilities.tools.is_none() && self.registry.has_tools() {
            config.capabilities.tools = Some(ToolsCapability {
                list_changed: Some(false),
            });
        }
        if config.capabilities.prompts.is_none() && self.registry.has_prompts() {
            config.capabilities.prompts = Some(PromptsCapability {
                list_changed: Some(false),
            });
        }
        if config.capabilities.resources.is_none() && self.registry.has_resources() {
            config.capabilities.resources = Some(ResourcesCapability {
                subscribe: Some(false),
                list_changed: Some(false),
            });
        }

        let sessions = SessionStore::new(config.session_idle_timeout);
        let sweeper = sessions.start_sweeper(config.session_sweep_interval);
        let tracker = Arc::new(OutboundTracker::new());
        let outbound = Arc::new(OutboundHandle {
            sink,
            tracker: Arc::clone(&tracker),
            capabilities: config.capabilities.clone(),
            default_timeout: config.outbound_request_timeout,
        });

        info!(
            server = %config.server_info.name,
            version = %config.server_info.version,
            "core assembled"
        );

        Ok(McpCore {
            config,
            registry: self.registry,
            handler: self.handler,
            sessions,
            tracker,
            outbound,
            sweeper: Some(sweeper),
        })
    }
}

impl Default for McpCoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The protocol coordinator a transport feeds
pub struct McpCore {
    config: CoreConfig,
    registry: ComponentRegistry,
    handler: Arc<dyn ServerHandler>,
    sessions: SessionStore,
    tracker: Arc<OutboundTracker>,
    outbound: Arc<OutboundHandle>,
    sweeper: Option<JoinHandle<()>>,
}

impl McpCore {
    /// The active configuration
    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Number of live sessions
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Number of outstanding server-initiated requests
    pub fn outbound_pending_count(&self) -> usize {
        self.tracker.pending_count()
    }

    /// Destroy a session after its transport binding is lost
    ///
    /// Transports call this when they lose the client. Outstanding outbound
    /// requests on the session are dropped with their timers.
    pub fn close_session(&self, session_id: &str) -> bool {
        self.tracker.drop_session(session_id);
        self.sessions.destroy(session_id)
    }

    /// Build a frame for host-initiated traffic on an existing session
    ///
    /// Lets the host push notifications (log messages, list-changed,
    /// resource updates) or start sampling outside of request processing.
    /// Returns `None` for unknown session ids.
    pub fn frame_for(&self, session_id: &str) -> Option<Frame> {
        let session = self.sessions.get(session_id)?;
        Some(Frame::new(
            session,
            &InboundContext::default(),
            None,
            Arc::clone(&self.outbound),
        ))
    }

    /// Process one inbound wire payload for a session
    ///
    /// Returns the encoded reply to hand back to the client, or `None` when
    /// the payload produces no reply (notifications, correlated responses,
    /// all-notification batches).
    #[instrument(level = "debug", skip(self, context, payload))]
    pub async fn handle_message(
        &self,
        session_id: &str,
        context: InboundContext,
        payload: &[u8],
    ) -> Option<Bytes> {
        let decoded = match decode(payload) {
            Ok(decoded) => decoded,
            Err(CodecError::EmptyBatch) => {
                return encode_single(&JsonRpcResponse::error(
                    JsonRpcError::new(error_codes::INVALID_REQUEST, "Empty batch"),
                    None,
                ));
            }
            Err(CodecError::Parse(parse_error)) => {
                debug!(%parse_error, "rejecting unparseable payload");
                return encode_single(&JsonRpcResponse::error(
                    CoreError::parse(parse_error.to_string()).to_wire(),
                    None,
                ));
            }
        };

        let session = self.sessions.attach(session_id);

        match decoded {
            DecodedPayload::Single(message) => {
                let response = self.process_message(&session, &context, message).await;
                response.as_ref().and_then(encode_single)
            }
            DecodedPayload::Batch(messages) => {
                self.process_batch(&session, &context, messages).await
            }
        }
    }

    async fn process_batch(
        &self,
        session: &Arc<Session>,
        context: &InboundContext,
        messages: Vec<InboundMessage>,
    ) -> Option<Bytes> {
        if messages.iter().any(InboundMessage::is_initialize) {
            return encode_single(&JsonRpcResponse::error(
                JsonRpcError::new(
                    error_codes::INVALID_REQUEST,
                    "Initialize cannot be part of a batch",
                ),
                None,
            ));
        }

        // Uninitialized sessions have no negotiated version to hold against
        // the batch; per-message gating below still refuses their requests.
        if session.is_initialized() {
            let supports_batching = session
                .snapshot()
                .protocol_version
                .is_some_and(|version| version.supports_batching());
            if !supports_batching {
                return encode_single(&JsonRpcResponse::error(
                    JsonRpcError::new(
                        error_codes::INVALID_REQUEST,
                        format!(
                            "JSON-RPC batching requires protocol version {} or newer",
                            crate::protocol::constants::BATCHING_MIN_VERSION
                        ),
                    ),
                    None,
                ));
            }
        }

        let mut responses = Vec::new();
        for message in messages {
            if let Some(response) = self.process_message(session, context, message).await {
                responses.push(response);
            }
        }

        if responses.is_empty() {
            return None;
        }
        match encode_batch(&responses) {
            Ok(payload) => Some(payload),
            Err(encode_error) => {
                error!(%encode_error, "failed to encode batch response");
                None
            }
        }
    }

    async fn process_message(
        &self,
        session: &Arc<Session>,
        context: &InboundContext,
        message: InboundMessage,
    ) -> Option<JsonRpcResponse> {
        if let InboundMessage::Response(response) = message {
            self.correlate_response(session, context, response).await;
            return None;
        }

        if message.is_ping() {
            let InboundMessage::Request(request) = message else {
                return None;
            };
            return Some(JsonRpcResponse::success(json!({}), request.id));
        }

        if !message.is_initialize_lifecycle() && !session.is_initialized() {
            return match message {
                InboundMessage::Request(request) => Some(JsonRpcResponse::error(
                    JsonRpcError::new(error_codes::INVALID_REQUEST, "Server not initialized"),
                    Some(request.id),
                )),
                InboundMessage::Notification(notification) => {
                    warn!(
                        method = %notification.method,
                        session_id = session.id(),
                        "dropping notification on uninitialized session"
                    );
                    None
                }
                InboundMessage::Invalid(id) => Some(invalid_request_response(id)),
                InboundMessage::Response(_) => None,
            };
        }

        match message {
            InboundMessage::Request(request) => {
                Some(self.process_request(session, context, request).await)
            }
            InboundMessage::Notification(notification) => {
                self.process_notification(session, context, notification)
                    .await;
                None
            }
            InboundMessage::Invalid(id) => Some(invalid_request_response(id)),
            InboundMessage::Response(_) => None,
        }
    }

    async fn process_request(
        &self,
        session: &Arc<Session>,
        context: &InboundContext,
        request: JsonRpcRequest,
    ) -> JsonRpcResponse {
        let id = request.id.clone();
        let result = self.dispatch_request(session, context, request).await;
        match result {
            Ok(value) => JsonRpcResponse::success(value, id),
            Err(core_error) => {
                match core_error.kind() {
                    ErrorKind::Transport => {
                        error!(%core_error, session_id = session.id(), "transport failure during dispatch");
                    }
                    _ => debug!(%core_error, session_id = session.id(), "request failed"),
                }
                JsonRpcResponse::error(core_error.to_wire(), Some(id))
            }
        }
    }

    async fn dispatch_request(
        &self,
        session: &Arc<Session>,
        context: &InboundContext,
        request: JsonRpcRequest,
    ) -> CoreResult<Value> {
        match request.method.as_str() {
            methods::INITIALIZE => self.handle_initialize(session, &request),
            methods::LOGGING_SET_LEVEL => self.handle_set_level(session, &request),
            _ => {
                session.track_request(request.id.clone(), request.method.clone());
                let frame = Frame::new(
                    Arc::clone(session),
                    context,
                    Some(request.clone()),
                    Arc::clone(&self.outbound),
                );

                let dispatch = self.dispatch_tracked(&frame, &request);
                let outcome = AssertUnwindSafe(dispatch).catch_unwind().await;
                session.complete_request(&request.id);

                match outcome {
                    Ok(result) => result,
                    Err(_panic) => {
                        error!(
                            method = %request.method,
                            session_id = session.id(),
                            "handler panicked"
                        );
                        Err(CoreError::internal("handler panicked"))
                    }
                }
            }
        }
    }

    async fn dispatch_tracked(&self, frame: &Frame, request: &JsonRpcRequest) -> CoreResult<Value> {
        let params = request.params.as_ref();
        let limit = self.config.list_pagination_limit;
        match request.method.as_str() {
            methods::TOOLS_LIST => self.registry.list_tools(params, frame, limit).await,
            methods::TOOLS_CALL => self.registry.call_tool(params, frame).await,
            methods::RESOURCES_LIST => self.registry.list_resources(params, frame, limit).await,
            methods::RESOURCES_TEMPLATES_LIST => {
                self.registry
                    .list_resource_templates(params, frame, limit)
                    .await
            }
            methods::RESOURCES_READ => self.registry.read_resource(params, frame).await,
            methods::RESOURCES_SUBSCRIBE => self.handle_subscription(frame, params, true),
            methods::RESOURCES_UNSUBSCRIBE => self.handle_subscription(frame, params, false),
            methods::PROMPTS_LIST => self.registry.list_prompts(params, frame, limit).await,
            methods::PROMPTS_GET => self.registry.get_prompt(params, frame).await,
            methods::COMPLETION_COMPLETE => self.handle_completion(frame, params).await,
            _ => self.handler.handle_request(request, frame).await,
        }
    }

    fn handle_initialize(
        &self,
        session: &Arc<Session>,
        request: &JsonRpcRequest,
    ) -> CoreResult<Value> {
        if session.is_initialized() {
            return Err(CoreError::invalid_request("Server already initialized"));
        }

        let params_value = request
            .params
            .as_ref()
            .ok_or_else(|| CoreError::invalid_params("params are required"))?;
        let params: InitializeParams = serde_json::from_value(params_value.clone())
            .map_err(|parse_error| CoreError::invalid_params(parse_error.to_string()))?;

        let version = self.negotiate_version(&params.protocol_version);
        info!(
            session_id = session.id(),
            client = %params.client_info.name,
            requested = params.protocol_version.as_str(),
            negotiated = version.as_str(),
            "initialize handshake"
        );

        session.update_after_initialize(
            version.clone(),
            params.client_info,
            params.capabilities,
        );

        let result = InitializeResult {
            protocol_version: version,
            capabilities: self.config.capabilities.clone(),
            server_info: self.config.server_info.clone(),
            instructions: self.config.instructions.clone(),
        };
        serde_json::to_value(result).map_err(|e| CoreError::internal(e.to_string()))
    }

    /// Pick the client's revision when the server supports it, the server's
    /// newest otherwise
    fn negotiate_version(&self, requested: &ProtocolVersion) -> ProtocolVersion {
        if self.config.supported_versions.contains(requested) {
            requested.clone()
        } else {
            self.config
                .supported_versions
                .first()
                .cloned()
                .unwrap_or_else(|| requested.clone())
        }
    }

    fn handle_set_level(
        &self,
        session: &Arc<Session>,
        request: &JsonRpcRequest,
    ) -> CoreResult<Value> {
        if self.config.capabilities.logging.is_none() {
            return Err(CoreError::method_not_found(methods::LOGGING_SET_LEVEL));
        }
        let params_value = request
            .params
            .as_ref()
            .ok_or_else(|| CoreError::invalid_params("params are required"))?;
        let params: SetLevelParams = serde_json::from_value(params_value.clone())
            .map_err(|parse_error| CoreError::invalid_params(parse_error.to_string()))?;

        session.set_log_level(params.level);
        debug!(
            session_id = session.id(),
            level = %params.level,
            "log level updated"
        );
        Ok(json!({}))
    }

    fn handle_subscription(
        &self,
        frame: &Frame,
        params: Option<&Value>,
        subscribe: bool,
    ) -> CoreResult<Value> {
        let advertised = self
            .config
            .capabilities
            .resources
            .as_ref()
            .and_then(|caps| caps.subscribe)
            .unwrap_or(false);
        if !advertised {
            let method = if subscribe {
                methods::RESOURCES_SUBSCRIBE
            } else {
                methods::RESOURCES_UNSUBSCRIBE
            };
            return Err(CoreError::method_not_found(method));
        }

        let params_value =
            params.ok_or_else(|| CoreError::invalid_params("params are required"))?;
        let params: ResourceUriParams = serde_json::from_value(params_value.clone())
            .map_err(|parse_error| CoreError::invalid_params(parse_error.to_string()))?;

        if subscribe {
            if !self.registry.covers_uri(&params.uri, frame) {
                return Err(CoreError::resource_not_found(&params.uri));
            }
            frame.session().subscribe(&params.uri);
        } else if !frame.session().unsubscribe(&params.uri) {
            debug!(uri = %params.uri, "unsubscribe for unknown subscription");
        }
        Ok(json!({}))
    }

    async fn handle_completion(&self, frame: &Frame, params: Option<&Value>) -> CoreResult<Value> {
        if self.config.capabilities.completions.is_none() {
            return Err(CoreError::method_not_found(methods::COMPLETION_COMPLETE));
        }
        let params_value =
            params.ok_or_else(|| CoreError::invalid_params("params are required"))?;
        let params: CompleteParams = serde_json::from_value(params_value.clone())
            .map_err(|parse_error| CoreError::invalid_params(parse_error.to_string()))?;

        let response = self.handler.handle_completion(&params, frame).await?;
        serde_json::to_value(response.into_result())
            .map_err(|e| CoreError::internal(e.to_string()))
    }

    async fn process_notification(
        &self,
        session: &Arc<Session>,
        context: &InboundContext,
        notification: JsonRpcNotification,
    ) {
        match notification.method.as_str() {
            methods::NOTIFICATION_INITIALIZED => {
                if !session.mark_initialized() {
                    debug!(session_id = session.id(), "duplicate initialized notification");
                    return;
                }
                let frame = Frame::new(
                    Arc::clone(session),
                    context,
                    None,
                    Arc::clone(&self.outbound),
                );
                let client_info = frame.client_info().cloned();
                let hook = self.handler.on_initialized(client_info.as_ref(), &frame);
                if AssertUnwindSafe(hook).catch_unwind().await.is_err() {
                    error!(session_id = session.id(), "on_initialized hook panicked");
                }
            }
            methods::NOTIFICATION_CANCELLED => {
                let params: Option<CancelledParams> = notification
                    .params
                    .as_ref()
                    .and_then(|value| serde_json::from_value(value.clone()).ok());
                let Some(params) = params else {
                    warn!(session_id = session.id(), "malformed cancellation notification");
                    return;
                };
                // Advisory only: bookkeeping is completed, the in-flight
                // handler is not aborted.
                match session.complete_request(&params.request_id) {
                    Some(pending) => info!(
                        session_id = session.id(),
                        request_id = %params.request_id,
                        method = %pending.method,
                        elapsed_ms = pending.started_at.elapsed().as_millis() as u64,
                        reason = params.reason.as_deref().unwrap_or("unspecified"),
                        "request cancelled by client"
                    ),
                    None => warn!(
                        session_id = session.id(),
                        request_id = %params.request_id,
                        "cancellation for unknown request"
                    ),
                }
            }
            _ => {
                let frame = Frame::new(
                    Arc::clone(session),
                    context,
                    None,
                    Arc::clone(&self.outbound),
                );
                let hook = self.handler.handle_notification(&notification, &frame);
                if AssertUnwindSafe(hook).catch_unwind().await.is_err() {
                    error!(
                        method = %notification.method,
                        session_id = session.id(),
                        "notification hook panicked"
                    );
                }
            }
        }
    }

    async fn correlate_response(
        &self,
        session: &Arc<Session>,
        context: &InboundContext,
        response: JsonRpcResponse,
    ) {
        let Some(id) = response.id.clone() else {
            warn!(session_id = session.id(), "response without id dropped");
            return;
        };
        let Some(record) = self.tracker.resolve(&id) else {
            debug!(%id, session_id = session.id(), "response for unknown outbound request");
            return;
        };
        if record.session_id != session.id() {
            warn!(
                %id,
                expected = %record.session_id,
                actual = session.id(),
                "response arrived on the wrong session"
            );
            return;
        }

        if let Some(wire_error) = response.error {
            error!(
                %id,
                method = %record.method,
                code = wire_error.code,
                message = %wire_error.message,
                "outbound request failed"
            );
            return;
        }

        let result = response.result.unwrap_or(Value::Null);
        let frame = Frame::new(
            Arc::clone(session),
            context,
            None,
            Arc::clone(&self.outbound),
        );

        match record.method.as_str() {
            methods::SAMPLING_CREATE_MESSAGE => {
                match serde_json::from_value::<CreateMessageResult>(result) {
                    Ok(sampling_result) => {
                        self.handler
                            .handle_sampling(sampling_result, &id, &frame)
                            .await;
                    }
                    Err(parse_error) => {
                        error!(%id, %parse_error, "malformed sampling result");
                    }
                }
            }
            methods::ROOTS_LIST => match serde_json::from_value::<ListRootsResult>(result) {
                Ok(roots_result) => {
                    self.handler
                        .handle_roots(roots_result.roots, &id, &frame)
                        .await;
                }
                Err(parse_error) => {
                    error!(%id, %parse_error, "malformed roots result");
                }
            },
            other => debug!(%id, method = other, "response for untracked method"),
        }
    }
}

impl Drop for McpCore {
    fn drop(&mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.abort();
        }
    }
}

fn invalid_request_response(id: Option<crate::protocol::jsonrpc::RequestId>) -> JsonRpcResponse {
    JsonRpcResponse::error(
        JsonRpcError::new(error_codes::INVALID_REQUEST, "Invalid request"),
        id,
    )
}

fn encode_single(response: &JsonRpcResponse) -> Option<Bytes> {
    match response.to_bytes() {
        Ok(payload) => Some(payload),
        Err(encode_error) => {
            error!(%encode_error, "failed to encode response");
            None
        }
    }
}
