use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use super::{expire_on_unauthorized, require_token};
use crate::api::{ApiError, BookingBackend};
use crate::calendar::{
    BadgeCategory, MonthMarkers, Selection, can_transition, classify, day_heading,
};
use crate::error::{Action, AuthFailure, BookingError};
use crate::models::{Appointment, AppointmentStatus, LoginRequest};
use crate::session::{Credential, Role, SessionContext};
use crate::store::AppointmentStore;

/// Trainer dashboard and calendar.
pub struct TrainerPortal {
    backend: Arc<dyn BookingBackend>,
    store: AppointmentStore,
}

/// One row of the per-day detail panel.
#[derive(Debug, Clone, Copy)]
pub struct CalendarEntry<'a> {
    pub appointment: &'a Appointment,
    pub badge: BadgeCategory,
}

/// Everything the calendar page needs for one render.
#[derive(Debug, Clone)]
pub struct CalendarView<'a> {
    pub heading: String,
    pub markers: MonthMarkers,
    pub entries: Vec<CalendarEntry<'a>>,
    /// Loaded records that could not be placed on any day.
    pub unplaced: usize,
}

impl TrainerPortal {
    pub fn new(backend: Arc<dyn BookingBackend>) -> Self {
        Self {
            backend,
            store: AppointmentStore::new(),
        }
    }

    pub fn store(&self) -> &AppointmentStore {
        &self.store
    }

    pub fn is_signed_in(&self, session: &dyn SessionContext) -> bool {
        session.get(Role::Trainer).is_some()
    }

    pub async fn login(
        &self,
        session: &mut dyn SessionContext,
        username: &str,
        password: &str,
    ) -> Result<Credential, BookingError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(BookingError::validation("username", "Username is required"));
        }
        if password.is_empty() {
            return Err(BookingError::validation("password", "Password is required"));
        }

        let req = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let resp = self.backend.trainer_login(&req).await.map_err(|e| {
            if e.is_unauthorized() {
                BookingError::auth(Role::Trainer, AuthFailure::InvalidCredentials)
            } else {
                BookingError::Mutation {
                    action: Action::SignIn,
                    source: e,
                }
            }
        })?;

        let credential = Credential {
            token: resp.token,
            display_name: resp.name.unwrap_or_else(|| username.to_string()),
        };
        session.set(Role::Trainer, credential.clone());
        info!(trainer = %credential.display_name, "trainer signed in");
        Ok(credential)
    }

    /// Forget the trainer credential and the bookings loaded with it.
    pub fn logout(&mut self, session: &mut dyn SessionContext) {
        session.clear(Role::Trainer);
        self.store.replace_all(Vec::new());
    }

    /// Fetch every booking into the store. Returns how many were loaded.
    ///
    /// A fetch failure leaves the store empty; an auth failure leaves it as
    /// it was and clears the credential.
    pub async fn load(&mut self, session: &mut dyn SessionContext) -> Result<usize, BookingError> {
        let token = require_token(session, Role::Trainer)?;

        match self.backend.fetch_bookings(&token).await {
            Ok(bookings) => {
                let count = bookings.len();
                self.store.replace_all(bookings);
                info!(count, "bookings loaded");
                Ok(count)
            }
            Err(err) => {
                let err = expire_on_unauthorized(session, Role::Trainer, err)?;
                warn!(error = %err, "could not load bookings");
                self.store.replace_all(Vec::new());
                Err(BookingError::Fetch {
                    role: Role::Trainer,
                    source: err,
                })
            }
        }
    }

    /// Change the status of booking `id`. The store is only touched once
    /// the backend has acknowledged the change.
    pub async fn update_status(
        &mut self,
        session: &mut dyn SessionContext,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<(), BookingError> {
        let token = require_token(session, Role::Trainer)?;

        let current = self.store.get(id).and_then(Appointment::known_status);
        if let Some(from) = current.filter(|from| !can_transition(*from, status)) {
            return Err(BookingError::validation(
                "status",
                format!("A {from} booking cannot be marked {status}"),
            ));
        }

        match self.backend.update_status(&token, id, status).await {
            Ok(()) => {
                if !self.store.update_status(id, status) {
                    warn!(booking_id = id, "status updated for a booking that is not loaded");
                }
                info!(booking_id = id, %status, "booking status updated");
                Ok(())
            }
            Err(err) => Err(mutation_failed(session, Action::UpdateStatus, err)),
        }
    }

    pub async fn delete(
        &mut self,
        session: &mut dyn SessionContext,
        id: i64,
    ) -> Result<(), BookingError> {
        let token = require_token(session, Role::Trainer)?;

        match self.backend.delete_booking(&token, id).await {
            Ok(()) => {
                self.store.remove(id);
                info!(booking_id = id, "booking deleted");
                Ok(())
            }
            Err(err) => Err(mutation_failed(session, Action::DeleteBooking, err)),
        }
    }

    /// Calendar for the month of the selected day, or of `fallback_month`
    /// when nothing is selected.
    pub fn calendar(&self, selection: &Selection, fallback_month: NaiveDate) -> CalendarView<'_> {
        let index = self.store.index();
        let shown = selection.current().unwrap_or(fallback_month);

        let markers = MonthMarkers::containing(shown, self.store.appointments());

        let entries = selection
            .appointments_for_selection(&index)
            .iter()
            .copied()
            .map(|appointment| CalendarEntry {
                appointment,
                badge: classify(&appointment.status),
            })
            .collect();

        CalendarView {
            heading: day_heading(selection.current()),
            markers,
            entries,
            unplaced: index.unindexed(),
        }
    }
}

fn mutation_failed(
    session: &mut dyn SessionContext,
    action: Action,
    err: ApiError,
) -> BookingError {
    match expire_on_unauthorized(session, Role::Trainer, err) {
        Ok(err) => {
            warn!(%action, error = %err, "booking mutation failed");
            BookingError::Mutation { action, source: err }
        }
        Err(auth) => auth,
    }
}
