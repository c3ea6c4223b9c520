//! HTTP implementation of [`BookingBackend`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::error::error_message;
use super::{ApiError, BookingBackend};
use crate::config::Config;
use crate::models::{
    Appointment, AppointmentStatus, ClientLoginRequest, ClientRegistration, LoginRequest,
    NewBooking, StatusUpdate, TokenResponse,
};

/// reqwest-backed client for the booking backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    /// Build a client for `base_url` (e.g. `http://localhost:4000`).
    ///
    /// Every request is bounded by `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self, ApiError> {
        Self::new(cfg.api_url.clone(), cfg.http_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, url = %url, "backend request");

        let builder = self.http.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn map_transport_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(self.timeout)
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }

    /// Send and turn non-2xx responses into errors.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let mut message = error_message(&body);
        if message.is_empty() {
            message = status.canonical_reason().unwrap_or("request failed").to_string();
        }

        if status == StatusCode::UNAUTHORIZED {
            warn!("backend rejected credential");
            return Err(ApiError::Unauthorized(message));
        }

        warn!(status = status.as_u16(), message = %message, "backend request failed");
        Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn post_json<B, T>(&self, path: &str, token: Option<&str>, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send_json(self.request(Method::POST, path, token).json(body))
            .await
    }
}

#[async_trait]
impl BookingBackend for ApiClient {
    #[instrument(skip(self, req), fields(username = %req.username))]
    async fn trainer_login(&self, req: &LoginRequest) -> Result<TokenResponse, ApiError> {
        self.post_json("/api/login", None, req).await
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    async fn client_register(&self, req: &ClientRegistration) -> Result<(), ApiError> {
        self.send(self.request(Method::POST, "/api/client/register", None).json(req))
            .await?;
        Ok(())
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    async fn client_login(&self, req: &ClientLoginRequest) -> Result<TokenResponse, ApiError> {
        self.post_json("/api/client/login", None, req).await
    }

    #[instrument(skip_all)]
    async fn fetch_bookings(&self, token: &str) -> Result<Vec<Appointment>, ApiError> {
        self.send_json(self.request(Method::GET, "/api/bookings", Some(token)))
            .await
    }

    #[instrument(skip_all)]
    async fn fetch_client_bookings(&self, token: &str) -> Result<Vec<Appointment>, ApiError> {
        self.send_json(self.request(Method::GET, "/api/client/bookings", Some(token)))
            .await
    }

    #[instrument(skip_all, fields(date = %booking.date))]
    async fn create_booking(
        &self,
        token: &str,
        booking: &NewBooking,
    ) -> Result<Appointment, ApiError> {
        self.post_json("/api/client/bookings", Some(token), booking)
            .await
    }

    #[instrument(skip(self, token))]
    async fn update_status(
        &self,
        token: &str,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<(), ApiError> {
        let path = format!("/api/bookings/{id}/status");
        self.send(
            self.request(Method::PATCH, &path, Some(token))
                .json(&StatusUpdate { status }),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn delete_booking(&self, token: &str, id: i64) -> Result<(), ApiError> {
        let path = format!("/api/bookings/{id}");
        self.send(self.request(Method::DELETE, &path, Some(token)))
            .await?;
        Ok(())
    }
}
