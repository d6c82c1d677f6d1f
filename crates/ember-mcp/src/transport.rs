//! Transport contract consumed by the core
//!
//! The core never frames bytes or owns sockets. A transport implementation
//! feeds inbound payloads to [`crate::McpCore::handle_message`] and accepts
//! outbound payloads through [`TransportSink::send`], addressed by the
//! opaque session id the transport chose for the client. When a transport
//! loses a client it calls [`crate::McpCore::close_session`].

use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by a transport on an outbound send
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The session has no live connection
    #[error("session {session_id} is closed")]
    Closed {
        /// The session whose binding is gone
        session_id: String,
    },

    /// The transport could not deliver the payload
    #[error("send failed: {reason}")]
    SendFailed {
        /// Transport-specific reason
        reason: String,
    },
}

impl TransportError {
    /// A closed-session error
    pub fn closed(session_id: impl Into<String>) -> Self {
        Self::Closed {
            session_id: session_id.into(),
        }
    }

    /// A delivery failure
    pub fn send_failed(reason: impl Into<String>) -> Self {
        Self::SendFailed {
            reason: reason.into(),
        }
    }
}

/// Outbound half of the transport, held by the core
///
/// Implementations route the payload to whatever connection currently backs
/// `session_id` and complete once the bytes are handed to the peer or fail
/// with a [`TransportError`]. The core does not retry or buffer.
#[async_trait]
pub trait TransportSink: Send + Sync {
    /// Deliver an encoded JSON-RPC payload to the client behind a session
    async fn send(&self, session_id: &str, payload: &[u8]) -> Result<(), TransportError>;
}
