//! Standard API response envelope with the trace correlation field.

use reqtrace_core::current_trace_id;
use serde::{Deserialize, Serialize};

/// Standard API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation was successful
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error information (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
    /// Request metadata for correlation
    pub metadata: ResponseMetadata,
}

impl<T> ApiResponse<T> {
    /// Create a successful response, stamped with the current trace id.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            metadata: ResponseMetadata::current(),
        }
    }

    /// Create an error response, stamped with the current trace id.
    pub fn error(error: ErrorInfo) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(error),
            metadata: ResponseMetadata::current(),
        }
    }
}

/// Error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Response metadata carrying the trace correlation field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Trace identifier active for this request. Always present in the JSON;
    /// `null` when no context was ever established, and callers must not
    /// assume otherwise.
    pub trace_id: Option<String>,
    /// Timestamp of response generation (ISO 8601)
    pub timestamp: String,
    /// Service version
    pub version: String,
}

impl ResponseMetadata {
    /// Build metadata from the calling carrier's context at
    /// response-construction time.
    pub fn current() -> Self {
        Self {
            trace_id: current_trace_id(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqtrace_core::TRACE_ID_KEY;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_success_envelope_carries_trace_id() {
        let mut seed = HashMap::new();
        seed.insert(TRACE_ID_KEY.to_string(), "T1".to_string());

        let envelope = reqtrace_core::propagate::with_context(seed, async {
            ApiResponse::success("payload")
        })
        .await;

        assert!(envelope.success);
        assert_eq!(envelope.data, Some("payload"));
        assert_eq!(envelope.metadata.trace_id, Some("T1".to_string()));
    }

    #[test]
    fn test_trace_id_serialized_as_null_when_absent() {
        let envelope = ApiResponse::success(serde_json::json!({"ok": true}));
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["metadata"]["trace_id"], serde_json::Value::Null);
    }

    #[test]
    fn test_error_envelope() {
        let envelope =
            ApiResponse::<()>::error(ErrorInfo::new("INVALID_INPUT", "name must not be empty"));
        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        let json = serde_json::to_string(&envelope).unwrap();
        assert!(json.contains("INVALID_INPUT"));
        assert!(json.contains("trace_id"));
    }
}
