//! Correlation of server-initiated requests with client responses
//!
//! The tracker owns the table of outstanding `sampling/createMessage` and
//! `roots/list` requests. Each registration spawns a timeout task; whichever
//! of response-arrival and timeout removes the record first wins, so the
//! timeout action fires at most once and no callback runs for a timed-out
//! id.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::protocol::constants::methods;
use crate::protocol::jsonrpc::{JsonRpcMessage, JsonRpcNotification, RequestId};
use crate::protocol::messages::CancelledParams;
use crate::transport::TransportSink;

/// Bookkeeping for one outstanding server-initiated request
pub struct OutboundRecord {
    /// Method of the outbound request
    pub method: String,
    /// Session the request was sent on
    pub session_id: String,
    timeout_task: JoinHandle<()>,
}

/// Table of outstanding server-initiated requests
#[derive(Default)]
pub struct OutboundTracker {
    pending: DashMap<RequestId, OutboundRecord>,
}

impl OutboundTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an outbound request and start its timeout
    ///
    /// Returns the freshly allocated request id. When the timeout elapses
    /// before [`OutboundTracker::resolve`] removes the record, the tracker
    /// emits `notifications/cancelled {requestId, reason: "timeout"}` on the
    /// request's session and drops the record.
    pub fn register(
        self: &Arc<Self>,
        sink: Arc<dyn TransportSink>,
        session_id: impl Into<String>,
        method: impl Into<String>,
        timeout: Duration,
    ) -> RequestId {
        let id = RequestId::String(Uuid::new_v4().to_string());
        let session_id = session_id.into();
        let method = method.into();

        let timeout_task = {
            let tracker = Arc::clone(self);
            let id = id.clone();
            let session_id = session_id.clone();
            let method = method.clone();
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                // Losing the removal race to a response means the request
                // completed in time; nothing to do.
                if tracker.pending.remove(&id).is_none() {
                    return;
                }
                warn!(%id, %method, %session_id, "outbound request timed out");

                let params = CancelledParams {
                    request_id: id.clone(),
                    reason: Some("timeout".to_string()),
                };
                let notification = JsonRpcNotification::new(
                    methods::NOTIFICATION_CANCELLED,
                    serde_json::to_value(&params).ok(),
                );
                match notification.to_bytes() {
                    Ok(payload) => {
                        if let Err(error) = sink.send(&session_id, &payload).await {
                            warn!(%id, %error, "failed to send cancellation notification");
                        }
                    }
                    Err(error) => warn!(%id, %error, "failed to encode cancellation"),
                }
            })
        };

        debug!(%id, %method, %session_id, ?timeout, "tracking outbound request");
        self.pending.insert(
            id.clone(),
            OutboundRecord {
                method,
                session_id,
                timeout_task,
            },
        );
        id
    }

    /// Correlate a client response with its record
    ///
    /// Removes the record and cancels its timeout. Returns `None` when the
    /// id is unknown, already resolved, or already timed out; the caller
    /// must not invoke a user callback in that case.
    pub fn resolve(&self, id: &RequestId) -> Option<OutboundRecord> {
        let (_, record) = self.pending.remove(id)?;
        record.timeout_task.abort();
        debug!(%id, method = %record.method, "correlated outbound response");
        Some(record)
    }

    /// Number of requests still awaiting a response
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Drop every record bound to a session, cancelling their timeouts
    ///
    /// Called when a session is destroyed so stale timers cannot emit
    /// cancellations on a dead binding.
    pub fn drop_session(&self, session_id: &str) {
        let stale: Vec<RequestId> = self
            .pending
            .iter()
            .filter(|entry| entry.value().session_id == session_id)
            .map(|entry| entry.key().clone())
            .collect();
        for id in stale {
            if let Some((_, record)) = self.pending.remove(&id) {
                record.timeout_task.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::transport::TransportError;

    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<(String, Vec<u8>)>>,
    }

    #[async_trait]
    impl TransportSink for RecordingSink {
        async fn send(&self, session_id: &str, payload: &[u8]) -> Result<(), TransportError> {
            self.sent
                .lock()
                .unwrap()
                .push((session_id.to_string(), payload.to_vec()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn resolve_before_timeout_suppresses_cancellation() {
        let tracker = Arc::new(OutboundTracker::new());
        let sink = Arc::new(RecordingSink::default());

        let id = tracker.register(
            sink.clone(),
            "s1",
            methods::ROOTS_LIST,
            Duration::from_secs(5),
        );
        assert_eq!(tracker.pending_count(), 1);

        let record = tracker.resolve(&id).unwrap();
        assert_eq!(record.method, methods::ROOTS_LIST);
        assert_eq!(record.session_id, "s1");
        assert_eq!(tracker.pending_count(), 0);

        // Second resolution must find nothing.
        assert!(tracker.resolve(&id).is_none());
        assert!(sink.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn timeout_emits_cancellation_and_clears_record() {
        let tracker = Arc::new(OutboundTracker::new());
        let sink = Arc::new(RecordingSink::default());

        let id = tracker.register(
            sink.clone(),
            "s1",
            methods::SAMPLING_CREATE_MESSAGE,
            Duration::from_millis(10),
        );

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(tracker.pending_count(), 0);
        assert!(tracker.resolve(&id).is_none());

        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "s1");
        let payload: serde_json::Value = serde_json::from_slice(&sent[0].1).unwrap();
        assert_eq!(payload["method"], methods::NOTIFICATION_CANCELLED);
        assert_eq!(payload["params"]["reason"], "timeout");
        assert_eq!(payload["params"]["requestId"], id.to_string());
    }

    #[tokio::test]
    async fn drop_session_cancels_outstanding_timers() {
        let tracker = Arc::new(OutboundTracker::new());
        let sink = Arc::new(RecordingSink::default());

        tracker.register(sink.clone(), "s1", methods::ROOTS_LIST, Duration::from_millis(10));
        tracker.register(sink.clone(), "s2", methods::ROOTS_LIST, Duration::from_millis(10));
        tracker.drop_session("s1");
        assert_eq!(tracker.pending_count(), 1);

        tokio::time::sleep(Duration::from_millis(50)).await;
        // Only the surviving session's timer fired.
        assert_eq!(sink.sent.lock().unwrap().len(), 1);
        assert_eq!(sink.sent.lock().unwrap()[0].0, "s2");
    }
}
