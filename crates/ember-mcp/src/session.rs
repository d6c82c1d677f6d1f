//! Per-client session state and the session store
//!
//! Sessions are created lazily on the first inbound message carrying a
//! transport-chosen session id and destroyed on idle expiry, transport loss,
//! or explicit close. All mutations on a single session go through its mutex,
//! making them linearizable; sessions are independent of each other.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::protocol::capabilities::ClientCapabilities;
use crate::protocol::jsonrpc::RequestId;
use crate::protocol::types::{Implementation, LogLevel, ProtocolVersion};
use crate::registry::{PromptComponent, ResourceComponent, ToolComponent};

/// Bookkeeping for an inbound request that has not completed yet
#[derive(Debug, Clone)]
pub struct PendingRequest {
    /// Method the request invoked
    pub method: String,
    /// When processing started
    pub started_at: Instant,
}

/// Mutable state of a session, guarded by the session mutex
#[derive(Default)]
pub struct SessionState {
    /// True once `notifications/initialized` arrived
    pub initialized: bool,
    /// Version negotiated during initialize
    pub protocol_version: Option<ProtocolVersion>,
    /// Client identification from initialize
    pub client_info: Option<Implementation>,
    /// Client capabilities from initialize
    pub client_capabilities: ClientCapabilities,
    /// Minimum severity for `notifications/log/message` delivery
    pub log_level: LogLevel,
    pending: HashMap<RequestId, PendingRequest>,
    subscriptions: HashSet<String>,
    dynamic_tools: Vec<ToolComponent>,
    dynamic_prompts: Vec<PromptComponent>,
    dynamic_resources: Vec<ResourceComponent>,
}

/// A single client session
///
/// Cheap to share: the store hands out `Arc<Session>` and the frame keeps one
/// for the duration of a callback.
pub struct Session {
    id: String,
    state: Mutex<SessionState>,
    last_activity: Mutex<Instant>,
    closed: AtomicBool,
}

/// Read-only view of the identity fields a frame mirrors
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// True once the handshake completed
    pub initialized: bool,
    /// Negotiated protocol version
    pub protocol_version: Option<ProtocolVersion>,
    /// Client identification
    pub client_info: Option<Implementation>,
    /// Client capabilities
    pub client_capabilities: ClientCapabilities,
    /// Current log level
    pub log_level: LogLevel,
}

impl Session {
    fn new(id: String) -> Self {
        Self {
            id,
            state: Mutex::new(SessionState::default()),
            last_activity: Mutex::new(Instant::now()),
            closed: AtomicBool::new(false),
        }
    }

    /// The transport-chosen session id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Lock the session state, recovering from poisoning
    ///
    /// State mutations never panic while holding the lock, but a poisoned
    /// mutex must not wedge the whole session.
    pub fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn touch(&self) {
        *self
            .last_activity
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        self.last_activity
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed()
    }

    /// Whether the store already destroyed this session
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Snapshot the identity fields for frame construction
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state();
        SessionSnapshot {
            initialized: state.initialized,
            protocol_version: state.protocol_version.clone(),
            client_info: state.client_info.clone(),
            client_capabilities: state.client_capabilities.clone(),
            log_level: state.log_level,
        }
    }

    /// Store the initialize handshake outcome
    pub fn update_after_initialize(
        &self,
        protocol_version: ProtocolVersion,
        client_info: Implementation,
        client_capabilities: ClientCapabilities,
    ) {
        let mut state = self.state();
        state.protocol_version = Some(protocol_version);
        state.client_info = Some(client_info);
        state.client_capabilities = client_capabilities;
    }

    /// Flip the initialized flag; returns false when it was already set
    ///
    /// The false→true transition happens exactly once per session.
    pub fn mark_initialized(&self) -> bool {
        let mut state = self.state();
        if state.initialized {
            false
        } else {
            state.initialized = true;
            true
        }
    }

    /// Whether the handshake completed
    pub fn is_initialized(&self) -> bool {
        self.state().initialized
    }

    /// Set the minimum log level for pushed log notifications
    pub fn set_log_level(&self, level: LogLevel) {
        self.state().log_level = level;
    }

    /// Record an inbound request as in-flight
    pub fn track_request(&self, id: RequestId, method: impl Into<String>) {
        self.state().pending.insert(
            id,
            PendingRequest {
                method: method.into(),
                started_at: Instant::now(),
            },
        );
    }

    /// Remove an in-flight request, returning its bookkeeping entry
    pub fn complete_request(&self, id: &RequestId) -> Option<PendingRequest> {
        self.state().pending.remove(id)
    }

    /// Whether a request id is currently in flight
    pub fn has_pending_request(&self, id: &RequestId) -> bool {
        self.state().pending.contains_key(id)
    }

    /// Subscribe this session to updates for a resource URI
    pub fn subscribe(&self, uri: impl Into<String>) {
        self.state().subscriptions.insert(uri.into());
    }

    /// Drop a resource subscription; returns whether one existed
    pub fn unsubscribe(&self, uri: &str) -> bool {
        self.state().subscriptions.remove(uri)
    }

    /// Whether this session subscribed to a URI
    pub fn is_subscribed(&self, uri: &str) -> bool {
        self.state().subscriptions.contains(uri)
    }

    /// Add a session-scoped tool, merged with static registrations at list
    /// time
    pub fn add_dynamic_tool(&self, component: ToolComponent) {
        self.state().dynamic_tools.push(component);
    }

    /// Add a session-scoped prompt
    pub fn add_dynamic_prompt(&self, component: PromptComponent) {
        self.state().dynamic_prompts.push(component);
    }

    /// Add a session-scoped resource
    pub fn add_dynamic_resource(&self, component: ResourceComponent) {
        self.state().dynamic_resources.push(component);
    }

    /// Clone the session-scoped tools
    pub fn dynamic_tools(&self) -> Vec<ToolComponent> {
        self.state().dynamic_tools.clone()
    }

    /// Clone the session-scoped prompts
    pub fn dynamic_prompts(&self) -> Vec<PromptComponent> {
        self.state().dynamic_prompts.clone()
    }

    /// Clone the session-scoped resources
    pub fn dynamic_resources(&self) -> Vec<ResourceComponent> {
        self.state().dynamic_resources.clone()
    }
}

/// Store of live sessions, owned by the coordinator
///
/// `attach` is the single entry point for inbound traffic: it creates the
/// session on first contact and refreshes the idle deadline on every call.
/// A background sweep destroys sessions whose idle time exceeded the
/// configured timeout.
pub struct SessionStore {
    sessions: Arc<DashMap<String, Arc<Session>>>,
    idle_timeout: Duration,
}

impl SessionStore {
    /// Create a store with the given idle timeout
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            idle_timeout,
        }
    }

    /// Look up or create the session for an id, refreshing its idle deadline
    pub fn attach(&self, session_id: &str) -> Arc<Session> {
        let session = Arc::clone(
            self.sessions
                .entry(session_id.to_string())
                .or_insert_with(|| {
                    debug!(session_id, "creating session");
                    Arc::new(Session::new(session_id.to_string()))
                })
                .value(),
        );
        session.touch();
        session
    }

    /// Look up a session without refreshing its deadline
    pub fn get(&self, session_id: &str) -> Option<Arc<Session>> {
        self.sessions
            .get(session_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Destroy a session; returns whether one existed
    pub fn destroy(&self, session_id: &str) -> bool {
        if let Some((_, session)) = self.sessions.remove(session_id) {
            session.closed.store(true, Ordering::Release);
            debug!(session_id, "session destroyed");
            true
        } else {
            false
        }
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions are live
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Destroy every session idle longer than the timeout
    ///
    /// Returns the number of sessions destroyed. Called by the background
    /// sweeper and directly from tests.
    pub fn sweep_idle(&self) -> usize {
        let expired: Vec<String> = self
            .sessions
            .iter()
            .filter(|entry| entry.value().idle_for() > self.idle_timeout)
            .map(|entry| entry.key().clone())
            .collect();

        for session_id in &expired {
            warn!(%session_id, "destroying idle session");
            self.destroy(session_id);
        }
        expired.len()
    }

    /// Spawn the periodic idle sweep task
    pub fn start_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let sessions = Arc::clone(&self.sessions);
        let idle_timeout = self.idle_timeout;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let expired: Vec<String> = sessions
                    .iter()
                    .filter(|entry| entry.value().idle_for() > idle_timeout)
                    .map(|entry| entry.key().clone())
                    .collect();
                for session_id in expired {
                    if let Some((_, session)) = sessions.remove(&session_id) {
                        session.closed.store(true, Ordering::Release);
                        warn!(%session_id, "destroying idle session");
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_creates_then_reuses() {
        let store = SessionStore::new(Duration::from_secs(60));
        let first = store.attach("s1");
        let second = store.attach("s1");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn initialized_transitions_exactly_once() {
        let store = SessionStore::new(Duration::from_secs(60));
        let session = store.attach("s1");
        assert!(!session.is_initialized());
        assert!(session.mark_initialized());
        assert!(!session.mark_initialized());
        assert!(session.is_initialized());
    }

    #[test]
    fn pending_request_lifecycle() {
        let store = SessionStore::new(Duration::from_secs(60));
        let session = store.attach("s1");
        let id = RequestId::from(1);

        session.track_request(id.clone(), "tools/call");
        assert!(session.has_pending_request(&id));

        let entry = session.complete_request(&id).unwrap();
        assert_eq!(entry.method, "tools/call");
        assert!(!session.has_pending_request(&id));
        assert!(session.complete_request(&id).is_none());
    }

    #[test]
    fn destroy_marks_session_closed() {
        let store = SessionStore::new(Duration::from_secs(60));
        let session = store.attach("s1");
        assert!(store.destroy("s1"));
        assert!(session.is_closed());
        assert!(!store.destroy("s1"));

        // A fresh attach starts over with a clean handshake state.
        let fresh = store.attach("s1");
        assert!(!fresh.is_initialized());
        assert!(!Arc::ptr_eq(&session, &fresh));
    }

    #[test]
    fn sweep_destroys_only_idle_sessions() {
        let store = SessionStore::new(Duration::from_millis(0));
        store.attach("old");
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(store.sweep_idle(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn sweeper_task_destroys_idle_sessions() {
        tokio_test::block_on(async {
            let store = SessionStore::new(Duration::from_millis(10));
            let sweeper = store.start_sweeper(Duration::from_millis(5));
            store.attach("s1");

            tokio::time::sleep(Duration::from_millis(60)).await;
            assert!(store.is_empty());
            sweeper.abort();
        });
    }

    #[test]
    fn subscriptions_are_per_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        let a = store.attach("a");
        let b = store.attach("b");

        a.subscribe("file:///watched");
        assert!(a.is_subscribed("file:///watched"));
        assert!(!b.is_subscribed("file:///watched"));
        assert!(a.unsubscribe("file:///watched"));
        assert!(!a.unsubscribe("file:///watched"));
    }
}
