use std::fmt;

use thiserror::Error;

use crate::api::ApiError;
use crate::session::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No credential stored for the role.
    Missing,
    /// The backend rejected the stored credential; it has been cleared.
    Expired,
    InvalidCredentials,
}

/// Write operations a user can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SignIn,
    Register,
    CreateBooking,
    UpdateStatus,
    DeleteBooking,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::SignIn => "sign in",
            Action::Register => "register",
            Action::CreateBooking => "create booking",
            Action::UpdateStatus => "update booking status",
            Action::DeleteBooking => "delete booking",
        })
    }
}

/// Failures surfaced by the portals. Each one becomes a user-visible notice;
/// none of them ends the process.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{} authentication failed: {kind:?}", .role.as_str())]
    Auth { role: Role, kind: AuthFailure },

    #[error("could not load bookings: {source}")]
    Fetch {
        role: Role,
        #[source]
        source: ApiError,
    },

    #[error("could not {action}: {source}")]
    Mutation {
        action: Action,
        #[source]
        source: ApiError,
    },

    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
}

impl BookingError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        BookingError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn auth(role: Role, kind: AuthFailure) -> Self {
        BookingError::Auth { role, kind }
    }

    /// Role that has to sign in again before retrying, if any.
    pub fn requires_login(&self) -> Option<Role> {
        match self {
            BookingError::Auth { role, .. } => Some(*role),
            _ => None,
        }
    }
}
