use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

/// Transport-level failures talking to the booking backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401: the credential is missing, expired or wrong.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// Message from the backend, if it sent one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized(msg) | ApiError::Rejected { message: msg, .. }
                if !msg.is_empty() =>
            {
                Some(msg.as_str())
            }
            _ => None,
        }
    }
}

/// Pull a readable message out of an error body.
///
/// Understands `{"error": "..."}` and `{"error": {"code", "message"}}`;
/// anything else is returned trimmed. A null `error` yields no message.
pub(crate) fn error_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };

    match json.get("error") {
        Some(Value::Null) => String::new(),
        Some(Value::String(msg)) => msg.clone(),
        Some(obj) => obj
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| obj.to_string()),
        None => body.trim().to_string(),
    }
}
