use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use uuid::Uuid;

use crate::session::Role;
use crate::stub::error::ServiceError;
use crate::stub::state::AppState;

/// Caller identity resolved from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub role: Role,
    pub subject: String,
    pub session_token_id: Uuid,
}

impl AuthContext {
    pub fn require_trainer(&self) -> Result<(), ServiceError> {
        match self.role {
            Role::Trainer => Ok(()),
            Role::Client => Err(ServiceError::Forbidden(
                "Only the trainer can manage bookings".into(),
            )),
        }
    }

    /// Email of the signed-in client.
    pub fn require_client(&self) -> Result<&str, ServiceError> {
        match self.role {
            Role::Client => Ok(self.subject.as_str()),
            Role::Trainer => Err(ServiceError::Forbidden(
                "Client account required".into(),
            )),
        }
    }
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ServiceError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let TypedHeader(authz): TypedHeader<Authorization<Bearer>> =
                TypedHeader::from_request_parts(parts, state)
                    .await
                    .map_err(|_| ServiceError::session_expired())?;

            let session = state
                .db
                .lock()
                .await
                .lookup_session(authz.token())
                .ok_or_else(ServiceError::session_expired)?;

            Ok(AuthContext {
                role: session.role,
                subject: session.subject,
                session_token_id: session.session_token_id,
            })
        }
    }
}
