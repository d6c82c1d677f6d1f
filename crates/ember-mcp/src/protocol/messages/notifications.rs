//! Parameter shapes for lifecycle and progress notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::jsonrpc::RequestId;

/// Parameters of `notifications/cancelled`
///
/// The request id keeps its original JSON type; a numeric id cancelled by the
/// client round-trips as a number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CancelledParams {
    /// Id of the request being cancelled
    pub request_id: RequestId,

    /// Why it was cancelled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Parameters of `notifications/progress`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressParams {
    /// Token correlating progress to the originating request
    pub progress_token: Value,

    /// Work completed so far
    pub progress: f64,

    /// Total work expected, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,

    /// Human-readable status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Parameters of `notifications/resources/updated`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceUpdatedParams {
    /// URI of the resource that changed
    pub uri: String,

    /// When it changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cancelled_params_preserve_id_type() {
        let numeric: CancelledParams =
            serde_json::from_value(json!({"requestId": 7})).unwrap();
        assert_eq!(numeric.request_id, RequestId::Number(7));
        assert_eq!(
            serde_json::to_value(&numeric).unwrap()["requestId"],
            json!(7)
        );

        let string: CancelledParams =
            serde_json::from_value(json!({"requestId": "r-1", "reason": "timeout"})).unwrap();
        assert_eq!(string.request_id, RequestId::String("r-1".to_string()));
    }

    #[test]
    fn progress_params_wire_shape() {
        let params = ProgressParams {
            progress_token: json!("tok"),
            progress: 0.5,
            total: Some(1.0),
            message: None,
        };
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["progressToken"], "tok");
        assert_eq!(value["progress"], 0.5);
    }
}
