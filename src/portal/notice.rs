use std::fmt;

use crate::error::{Action, AuthFailure, BookingError};
use crate::session::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Message shown to the user after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Set when the user must sign in as this role before retrying.
    pub login_required: Option<Role>,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
            login_required: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            login_required: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            login_required: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl From<&BookingError> for Notice {
    fn from(err: &BookingError) -> Self {
        match err {
            BookingError::Auth { role, kind } => {
                let message = match (kind, role) {
                    (AuthFailure::InvalidCredentials, _) => "Invalid credentials",
                    (AuthFailure::Expired, _) => "Session expired. Please log in again",
                    (AuthFailure::Missing, Role::Client) => "Please log in to continue",
                    (AuthFailure::Missing, Role::Trainer) => "Trainer login required",
                };
                Notice {
                    login_required: Some(*role),
                    ..Notice::error(message)
                }
            }
            BookingError::Fetch { role: Role::Trainer, .. } => Notice::error("Could not load bookings."),
            BookingError::Fetch { role: Role::Client, .. } => {
                Notice::error("Could not load your bookings")
            }
            BookingError::Mutation { action, source } => match action {
                Action::SignIn => Notice::error("Could not sign in. Please try again."),
                Action::Register => {
                    Notice::error(source.backend_message().unwrap_or("Registration failed"))
                }
                Action::CreateBooking => {
                    Notice::error("Could not create booking. Please try again.")
                }
                Action::UpdateStatus => Notice::error("Could not update booking status."),
                Action::DeleteBooking => Notice::error("Could not delete booking."),
            },
            BookingError::Validation { message, .. } => Notice::error(message.clone()),
        }
    }
}

impl From<BookingError> for Notice {
    fn from(err: BookingError) -> Self {
        Notice::from(&err)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
