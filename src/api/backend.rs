use async_trait::async_trait;

use super::ApiError;
use crate::models::{
    Appointment, AppointmentStatus, ClientLoginRequest, ClientRegistration, LoginRequest,
    NewBooking, TokenResponse,
};

/// The remote service that owns bookings, accounts and credentials.
///
/// Portals only ever talk to this trait; `ApiClient` is the HTTP
/// implementation.
#[async_trait]
pub trait BookingBackend: Send + Sync {
    async fn trainer_login(&self, req: &LoginRequest) -> Result<TokenResponse, ApiError>;

    async fn client_register(&self, req: &ClientRegistration) -> Result<(), ApiError>;

    async fn client_login(&self, req: &ClientLoginRequest) -> Result<TokenResponse, ApiError>;

    /// Every booking; trainer credential.
    async fn fetch_bookings(&self, token: &str) -> Result<Vec<Appointment>, ApiError>;

    /// The caller's own bookings; client credential.
    async fn fetch_client_bookings(&self, token: &str) -> Result<Vec<Appointment>, ApiError>;

    async fn create_booking(
        &self,
        token: &str,
        booking: &NewBooking,
    ) -> Result<Appointment, ApiError>;

    async fn update_status(
        &self,
        token: &str,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<(), ApiError>;

    async fn delete_booking(&self, token: &str, id: i64) -> Result<(), ApiError>;
}
