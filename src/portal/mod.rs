//! Operation boundary between the user and the booking backend.
//!
//! Portals own the local store, consult the injected session for
//! credentials and turn every backend failure into a [`BookingError`].

mod client;
mod notice;
mod trainer;

pub use client::{ClientPortal, validate_booking};
pub use notice::{Notice, NoticeLevel};
pub use trainer::{CalendarEntry, CalendarView, TrainerPortal};

use crate::api::ApiError;
use crate::error::{AuthFailure, BookingError};
use crate::session::{Role, SessionContext};

fn require_token(session: &dyn SessionContext, role: Role) -> Result<String, BookingError> {
    session
        .get(role)
        .map(|c| c.token)
        .ok_or_else(|| BookingError::auth(role, AuthFailure::Missing))
}

/// A 401 invalidates the stored credential; everything else is left to
/// the caller.
fn expire_on_unauthorized(
    session: &mut dyn SessionContext,
    role: Role,
    err: ApiError,
) -> Result<ApiError, BookingError> {
    if err.is_unauthorized() {
        tracing::warn!(role = role.as_str(), "credential rejected, clearing session");
        session.clear(role);
        return Err(BookingError::auth(role, AuthFailure::Expired));
    }
    Ok(err)
}
