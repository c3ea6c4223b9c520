use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorObject,
}

#[derive(Debug, Serialize)]
pub struct ErrorObject {
    pub code: String,
    pub message: String,
}

/// Failures of the stub backend, rendered as `{"error": {"code", "message"}}`.
#[derive(Debug)]
pub enum ServiceError {
    Unauthorized(&'static str, String),
    Forbidden(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl ServiceError {
    pub fn invalid_credentials() -> Self {
        ServiceError::Unauthorized("INVALID_CREDENTIALS", "Invalid credentials".into())
    }

    pub fn session_expired() -> Self {
        ServiceError::Unauthorized("SESSION_EXPIRED", "Session expired".into())
    }

    pub fn booking_not_found(id: i64) -> Self {
        ServiceError::NotFound(format!("booking {id} not found"))
    }

    fn parts(&self) -> (StatusCode, &'static str, &str) {
        match self {
            ServiceError::Unauthorized(code, msg) => (StatusCode::UNAUTHORIZED, *code, msg.as_str()),
            ServiceError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.as_str()),
            ServiceError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.as_str())
            }
            ServiceError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.as_str()),
            ServiceError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.as_str()),
            ServiceError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", msg.as_str())
            }
        }
    }
}

/// Unreadable or mistyped request bodies get the same envelope as every
/// other failure.
impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(%code, %message, "request failed");
        }

        let body = Json(ErrorResponse {
            error: ErrorObject {
                code: code.to_string(),
                message: message.to_string(),
            },
        });
        (status, body).into_response()
    }
}
