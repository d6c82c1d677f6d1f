//! Logging control and log-push messages

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::types::LogLevel;

/// Parameters of `logging/setLevel`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetLevelParams {
    /// Minimum severity the client wants delivered
    pub level: LogLevel,
}

/// Parameters of `notifications/log/message`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogMessageParams {
    /// Severity of the record
    pub level: LogLevel,

    /// Human-readable message
    pub message: String,

    /// Structured context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_level_params_parse() {
        let params: SetLevelParams = serde_json::from_value(json!({"level": "warning"})).unwrap();
        assert_eq!(params.level, LogLevel::Warning);
    }

    #[test]
    fn unknown_level_is_rejected() {
        assert!(serde_json::from_value::<SetLevelParams>(json!({"level": "loud"})).is_err());
    }
}
