use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use super::{expire_on_unauthorized, require_token};
use crate::api::BookingBackend;
use crate::error::{Action, AuthFailure, BookingError};
use crate::models::{Appointment, ClientLoginRequest, ClientRegistration, NewBooking};
use crate::session::{Credential, Role, SessionContext};

const MIN_PASSWORD_LEN: usize = 6;

/// Client registration, sign-in, booking form and "my bookings".
pub struct ClientPortal {
    backend: Arc<dyn BookingBackend>,
}

fn required(field: &'static str, value: &str, label: &str) -> Result<String, BookingError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(BookingError::validation(field, format!("{label} is required")));
    }
    Ok(value.to_string())
}

fn validate_email(email: &str) -> Result<String, BookingError> {
    let email = required("email", email, "Email")?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(BookingError::validation("email", "Please enter a valid email address")),
    }
}

fn validate_password(password: &str) -> Result<(), BookingError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(BookingError::validation(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

/// Check a booking form before anything is sent. Returns the trimmed form.
pub fn validate_booking(form: &NewBooking) -> Result<NewBooking, BookingError> {
    let name = required("name", &form.name, "Name")?;
    let email = validate_email(&form.email)?;
    let date = required("date", &form.date, "Date")?;
    if NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_err() {
        return Err(BookingError::validation("date", "Date must be YYYY-MM-DD"));
    }
    let time = required("time", &form.time, "Time")?;

    Ok(NewBooking {
        name,
        email,
        phone: form.phone.trim().to_string(),
        date,
        time,
        message: form.message.trim().to_string(),
    })
}

impl ClientPortal {
    pub fn new(backend: Arc<dyn BookingBackend>) -> Self {
        Self { backend }
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), BookingError> {
        let req = ClientRegistration {
            name: required("name", name, "Name")?,
            email: validate_email(email)?,
            password: {
                validate_password(password)?;
                password.to_string()
            },
        };

        self.backend
            .client_register(&req)
            .await
            .map_err(|e| {
                warn!(error = %e, "registration failed");
                BookingError::Mutation {
                    action: Action::Register,
                    source: e,
                }
            })?;

        info!(email = %req.email, "client registered");
        Ok(())
    }

    pub async fn login(
        &self,
        session: &mut dyn SessionContext,
        email: &str,
        password: &str,
    ) -> Result<Credential, BookingError> {
        let email = validate_email(email)?;
        if password.is_empty() {
            return Err(BookingError::validation("password", "Password is required"));
        }

        let req = ClientLoginRequest {
            email: email.clone(),
            password: password.to_string(),
        };
        let resp = self.backend.client_login(&req).await.map_err(|e| {
            if e.is_unauthorized() {
                BookingError::auth(Role::Client, AuthFailure::InvalidCredentials)
            } else {
                BookingError::Mutation {
                    action: Action::SignIn,
                    source: e,
                }
            }
        })?;

        let credential = Credential {
            token: resp.token,
            display_name: resp.name.unwrap_or(email),
        };
        session.set(Role::Client, credential.clone());
        info!(client = %credential.display_name, "client signed in");
        Ok(credential)
    }

    pub fn logout(&self, session: &mut dyn SessionContext) {
        session.clear(Role::Client);
    }

    /// The signed-in client's own bookings, in backend order.
    pub async fn my_bookings(
        &self,
        session: &mut dyn SessionContext,
    ) -> Result<Vec<Appointment>, BookingError> {
        let token = require_token(session, Role::Client)?;

        match self.backend.fetch_client_bookings(&token).await {
            Ok(bookings) => Ok(bookings),
            Err(err) => {
                let err = expire_on_unauthorized(session, Role::Client, err)?;
                warn!(error = %err, "could not load client bookings");
                Err(BookingError::Fetch {
                    role: Role::Client,
                    source: err,
                })
            }
        }
    }

    /// Validate and submit the booking form. Nothing is sent when the form
    /// is invalid; the backend assigns the id and the `pending` status.
    pub async fn submit_booking(
        &self,
        session: &mut dyn SessionContext,
        form: &NewBooking,
    ) -> Result<Appointment, BookingError> {
        let booking = validate_booking(form)?;
        let token = require_token(session, Role::Client)?;

        match self.backend.create_booking(&token, &booking).await {
            Ok(created) => {
                info!(booking_id = created.id, date = %created.date, "booking created");
                Ok(created)
            }
            Err(err) => {
                let err = expire_on_unauthorized(session, Role::Client, err)?;
                warn!(error = %err, "could not create booking");
                Err(BookingError::Mutation {
                    action: Action::CreateBooking,
                    source: err,
                })
            }
        }
    }
}
