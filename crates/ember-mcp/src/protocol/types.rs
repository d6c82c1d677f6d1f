//! Common protocol types shared across message families

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::protocol::constants::BATCHING_MIN_VERSION;

/// An MCP protocol revision, identified by its date string
///
/// Revisions are dated `YYYY-MM-DD`, so lexicographic comparison matches
/// chronological ordering.
///
/// # Examples
///
/// ```rust
/// use ember_mcp::protocol::ProtocolVersion;
///
/// let newer = ProtocolVersion::new("2025-03-26");
/// let older = ProtocolVersion::new("2024-11-05");
///
/// assert!(newer > older);
/// assert!(newer.supports_batching());
/// assert!(!older.supports_batching());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtocolVersion(String);

impl ProtocolVersion {
    /// Wrap a version string
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    /// The version string as sent on the wire
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this revision allows JSON-RPC batch payloads
    pub fn supports_batching(&self) -> bool {
        self.0.as_str() >= BATCHING_MIN_VERSION
    }
}

impl PartialOrd for ProtocolVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ProtocolVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProtocolVersion {
    fn from(version: &str) -> Self {
        Self::new(version)
    }
}

/// Identifying information a server or client presents during initialize
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Implementation {
    /// Implementation name
    pub name: String,
    /// Implementation version
    pub version: String,
}

impl Implementation {
    /// Create implementation info
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Message author role in prompt and sampling exchanges
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Content authored by or shown to the human user
    User,
    /// Content authored by the model
    Assistant,
    /// System-level instructions
    System,
}

/// Syslog-style severity levels for MCP log notifications
///
/// Ordered from least to most severe; a session's configured level is the
/// minimum severity it wants delivered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose diagnostic detail
    Debug,
    /// Routine operational messages
    Info,
    /// Normal but significant events
    Notice,
    /// Warning conditions
    Warning,
    /// Error conditions
    Error,
    /// Critical conditions
    Critical,
    /// Action must be taken immediately
    Alert,
    /// System is unusable
    Emergency,
}

impl LogLevel {
    /// The wire name of this level
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Notice => "notice",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
            LogLevel::Alert => "alert",
            LogLevel::Emergency => "emergency",
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Debug
    }
}

impl FromStr for LogLevel {
    type Err = UnknownLogLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "notice" => Ok(LogLevel::Notice),
            "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "critical" => Ok(LogLevel::Critical),
            "alert" => Ok(LogLevel::Alert),
            "emergency" => Ok(LogLevel::Emergency),
            other => Err(UnknownLogLevel(other.to_string())),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for log level strings outside the syslog set
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown log level: {0}")]
pub struct UnknownLogLevel(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_ordering_is_chronological() {
        let v1 = ProtocolVersion::new("2024-11-05");
        let v2 = ProtocolVersion::new("2025-03-26");
        assert!(v1 < v2);
        assert!(!v1.supports_batching());
        assert!(v2.supports_batching());
    }

    #[test]
    fn log_level_ordering_and_parsing() {
        assert!(LogLevel::Debug < LogLevel::Warning);
        assert!(LogLevel::Error < LogLevel::Emergency);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert!("loud".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::default(), LogLevel::Debug);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            r#""assistant""#
        );
    }
}
