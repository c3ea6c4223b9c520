use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::api::{ApiError, BookingBackend};
use crate::models::{
    Appointment, AppointmentStatus, ClientLoginRequest, ClientRegistration, LoginRequest,
    NewBooking, TokenResponse,
};

pub(crate) fn appt(id: i64, date: &str, status: &str) -> Appointment {
    Appointment {
        id,
        name: format!("Client {id}"),
        email: format!("client{id}@example.com"),
        phone: String::new(),
        date: date.to_string(),
        time: "09:00".to_string(),
        message: String::new(),
        status: status.to_string(),
    }
}

/// Two bookings on June 1st, one on June 2nd.
pub(crate) fn june_bookings() -> Vec<Appointment> {
    vec![
        appt(1, "2024-06-01", "pending"),
        appt(2, "2024-06-01", "confirmed"),
        appt(3, "2024-06-02", "completed"),
    ]
}

pub(crate) fn ids<'a>(appointments: impl IntoIterator<Item = &'a Appointment>) -> Vec<i64> {
    appointments.into_iter().map(|a| a.id).collect()
}

/// In-process backend double: keeps its own copy of the bookings, counts
/// calls per operation and can be told to fail the next call.
#[derive(Default)]
pub(crate) struct FakeBackend {
    bookings: Mutex<Vec<Appointment>>,
    fail_next: Mutex<Option<ApiError>>,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeBackend {
    pub(crate) fn with_bookings(bookings: Vec<Appointment>) -> Arc<Self> {
        Arc::new(Self {
            bookings: Mutex::new(bookings),
            ..Default::default()
        })
    }

    pub(crate) fn fail_next(&self, err: ApiError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    pub(crate) fn calls(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == op).count()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn backend_bookings(&self) -> Vec<Appointment> {
        self.bookings.lock().unwrap().clone()
    }

    fn enter(&self, op: &'static str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(op);
        match self.fail_next.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BookingBackend for FakeBackend {
    async fn trainer_login(&self, req: &LoginRequest) -> Result<TokenResponse, ApiError> {
        self.enter("trainer_login")?;
        if req.username == "coach" && req.password == "pw" {
            Ok(TokenResponse {
                token: "t-token".into(),
                name: None,
            })
        } else {
            Err(ApiError::Unauthorized("Invalid credentials".into()))
        }
    }

    async fn client_register(&self, _req: &ClientRegistration) -> Result<(), ApiError> {
        self.enter("client_register")
    }

    async fn client_login(&self, req: &ClientLoginRequest) -> Result<TokenResponse, ApiError> {
        self.enter("client_login")?;
        if req.password == "pw" {
            Ok(TokenResponse {
                token: "c-token".into(),
                name: Some("Ana".into()),
            })
        } else {
            Err(ApiError::Unauthorized("Invalid credentials".into()))
        }
    }

    async fn fetch_bookings(&self, _token: &str) -> Result<Vec<Appointment>, ApiError> {
        self.enter("fetch_bookings")?;
        Ok(self.backend_bookings())
    }

    async fn fetch_client_bookings(&self, _token: &str) -> Result<Vec<Appointment>, ApiError> {
        self.enter("fetch_client_bookings")?;
        Ok(self.backend_bookings())
    }

    async fn create_booking(
        &self,
        _token: &str,
        booking: &NewBooking,
    ) -> Result<Appointment, ApiError> {
        self.enter("create_booking")?;
        let mut bookings = self.bookings.lock().unwrap();
        let id = bookings.iter().map(|b| b.id).max().unwrap_or(0) + 1;
        let created = Appointment {
            id,
            name: booking.name.clone(),
            email: booking.email.clone(),
            phone: booking.phone.clone(),
            date: booking.date.clone(),
            time: booking.time.clone(),
            message: booking.message.clone(),
            status: AppointmentStatus::default().to_string(),
        };
        bookings.push(created.clone());
        Ok(created)
    }

    async fn update_status(
        &self,
        _token: &str,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<(), ApiError> {
        self.enter("update_status")?;
        if let Some(b) = self.bookings.lock().unwrap().iter_mut().find(|b| b.id == id) {
            b.status = status.to_string();
        }
        Ok(())
    }

    async fn delete_booking(&self, _token: &str, id: i64) -> Result<(), ApiError> {
        self.enter("delete_booking")?;
        self.bookings.lock().unwrap().retain(|b| b.id != id);
        Ok(())
    }
}
