//! Protocol constants: method names, error codes, version identifiers

/// JSON-RPC protocol version tag required on every message
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP method names handled by the core
pub mod methods {
    /// Initialize handshake request
    pub const INITIALIZE: &str = "initialize";
    /// Liveness check, allowed before initialization
    pub const PING: &str = "ping";
    /// Adjust the session's minimum log level
    pub const LOGGING_SET_LEVEL: &str = "logging/setLevel";

    /// List registered tools
    pub const TOOLS_LIST: &str = "tools/list";
    /// Invoke a tool by name
    pub const TOOLS_CALL: &str = "tools/call";

    /// List non-template resources
    pub const RESOURCES_LIST: &str = "resources/list";
    /// List template resources
    pub const RESOURCES_TEMPLATES_LIST: &str = "resources/templates/list";
    /// Read a resource by URI
    pub const RESOURCES_READ: &str = "resources/read";
    /// Subscribe to change notifications for a URI
    pub const RESOURCES_SUBSCRIBE: &str = "resources/subscribe";
    /// Cancel a resource subscription
    pub const RESOURCES_UNSUBSCRIBE: &str = "resources/unsubscribe";

    /// List registered prompts
    pub const PROMPTS_LIST: &str = "prompts/list";
    /// Render a prompt by name
    pub const PROMPTS_GET: &str = "prompts/get";

    /// Argument completion for prompts and resource templates
    pub const COMPLETION_COMPLETE: &str = "completion/complete";

    /// Server-initiated LLM sampling request
    pub const SAMPLING_CREATE_MESSAGE: &str = "sampling/createMessage";
    /// Server-initiated roots listing request
    pub const ROOTS_LIST: &str = "roots/list";

    /// Client signals the handshake is complete
    pub const NOTIFICATION_INITIALIZED: &str = "notifications/initialized";
    /// Advisory cancellation of an in-flight request
    pub const NOTIFICATION_CANCELLED: &str = "notifications/cancelled";
    /// Progress report tied to a progress token
    pub const NOTIFICATION_PROGRESS: &str = "notifications/progress";
    /// Client roots changed
    pub const NOTIFICATION_ROOTS_LIST_CHANGED: &str = "notifications/roots/list_changed";
    /// Server tool registry changed
    pub const NOTIFICATION_TOOLS_LIST_CHANGED: &str = "notifications/tools/list_changed";
    /// Server prompt registry changed
    pub const NOTIFICATION_PROMPTS_LIST_CHANGED: &str = "notifications/prompts/list_changed";
    /// Server resource registry changed
    pub const NOTIFICATION_RESOURCES_LIST_CHANGED: &str = "notifications/resources/list_changed";
    /// A subscribed resource changed
    pub const NOTIFICATION_RESOURCES_UPDATED: &str = "notifications/resources/updated";
    /// Structured log record pushed to the client
    pub const NOTIFICATION_LOG_MESSAGE: &str = "notifications/log/message";
}

/// JSON-RPC and MCP error codes
pub mod error_codes {
    /// Invalid JSON was received
    pub const PARSE_ERROR: i64 = -32700;
    /// The message is not a valid request object or arrived in a bad state
    pub const INVALID_REQUEST: i64 = -32600;
    /// The method does not exist or is not advertised
    pub const METHOD_NOT_FOUND: i64 = -32601;
    /// Invalid method parameters
    pub const INVALID_PARAMS: i64 = -32602;
    /// Internal server failure
    pub const INTERNAL_ERROR: i64 = -32603;
    /// MCP: the requested resource URI is not registered
    pub const RESOURCE_NOT_FOUND: i64 = -32002;
    /// Generic server-defined error
    pub const SERVER_ERROR: i64 = -32000;
}

/// Protocol revision that introduced JSON-RPC batching
pub const BATCHING_MIN_VERSION: &str = "2025-03-26";

/// Protocol revisions supported by default, newest first
pub const DEFAULT_SUPPORTED_VERSIONS: &[&str] = &["2025-03-26", "2024-11-05"];

/// Default session idle timeout (30 minutes)
pub const DEFAULT_SESSION_IDLE_TIMEOUT_MS: u64 = 1_800_000;

/// Default interval between idle-session sweeps
pub const DEFAULT_SESSION_SWEEP_INTERVAL_MS: u64 = 60_000;

/// Default timeout for server-initiated requests (30 seconds)
pub const DEFAULT_OUTBOUND_REQUEST_TIMEOUT_MS: u64 = 30_000;
