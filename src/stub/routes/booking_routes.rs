use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{delete, get, patch},
};
use chrono::NaiveDate;

use super::auth_routes::OkResponse;
use crate::calendar::can_transition;
use crate::models::{Appointment, AppointmentStatus, NewBooking, StatusUpdate};
use crate::stub::error::ServiceError;
use crate::stub::middleware::auth_context::AuthContext;
use crate::stub::state::{AppState, BookingRow};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(list_bookings))
        .route("/bookings/{booking_id}", delete(delete_booking))
        .route("/bookings/{booking_id}/status", patch(update_status))
        .route("/client/bookings", get(list_own_bookings).post(create_booking))
}

/* ============================================================
   Trainer
   ============================================================ */

pub async fn list_bookings(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<Appointment>>, ServiceError> {
    auth.require_trainer()?;

    let db = state.db.lock().await;
    let bookings = db.bookings.iter().map(|row| row.booking.clone()).collect();
    Ok(Json(bookings))
}

/// Any status may follow any other; the trainer can reopen a completed
/// booking.
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(booking_id): Path<i64>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<Json<OkResponse>, ServiceError> {
    auth.require_trainer()?;
    let Json(req) = payload?;

    let mut db = state.db.lock().await;
    let booking = db
        .booking_mut(booking_id)
        .ok_or_else(|| ServiceError::booking_not_found(booking_id))?;
    if let Some(from) = booking
        .known_status()
        .filter(|from| !can_transition(*from, req.status))
    {
        return Err(ServiceError::Conflict(format!(
            "booking {booking_id} cannot go from {from} to {}",
            req.status
        )));
    }
    booking.status = req.status.to_string();

    tracing::info!(
        booking_id,
        status = %req.status,
        session = %auth.session_token_id,
        "booking status changed"
    );
    Ok(Json(OkResponse { ok: true }))
}

pub async fn delete_booking(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(booking_id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    auth.require_trainer()?;

    let mut db = state.db.lock().await;
    let before = db.bookings.len();
    db.bookings.retain(|row| row.booking.id != booking_id);
    if db.bookings.len() == before {
        return Err(ServiceError::booking_not_found(booking_id));
    }

    tracing::info!(booking_id, session = %auth.session_token_id, "booking deleted");
    Ok(StatusCode::NO_CONTENT)
}

/* ============================================================
   Client
   ============================================================ */

pub async fn list_own_bookings(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<Appointment>>, ServiceError> {
    let owner = auth.require_client()?;

    let db = state.db.lock().await;
    let bookings = db
        .bookings
        .iter()
        .filter(|row| row.owner_email == owner)
        .map(|row| row.booking.clone())
        .collect();
    Ok(Json(bookings))
}

fn validate_new_booking(req: &NewBooking) -> Result<(), ServiceError> {
    for (field, value) in [
        ("name", &req.name),
        ("email", &req.email),
        ("date", &req.date),
        ("time", &req.time),
    ] {
        if value.trim().is_empty() {
            return Err(ServiceError::Validation(format!("{field} is required")));
        }
    }
    if NaiveDate::parse_from_str(req.date.trim(), "%Y-%m-%d").is_err() {
        return Err(ServiceError::Validation("date must be YYYY-MM-DD".into()));
    }
    Ok(())
}

pub async fn create_booking(
    State(state): State<AppState>,
    auth: AuthContext,
    payload: Result<Json<NewBooking>, JsonRejection>,
) -> Result<(StatusCode, Json<Appointment>), ServiceError> {
    let owner = auth.require_client()?.to_string();
    let Json(req) = payload?;
    validate_new_booking(&req)?;

    let mut db = state.db.lock().await;
    let booking = Appointment {
        id: db.next_id(),
        name: req.name.trim().to_string(),
        email: req.email.trim().to_string(),
        phone: req.phone.trim().to_string(),
        date: req.date.trim().to_string(),
        time: req.time.trim().to_string(),
        message: req.message.trim().to_string(),
        status: AppointmentStatus::default().to_string(),
    };
    db.bookings.push(BookingRow {
        owner_email: owner,
        booking: booking.clone(),
    });

    tracing::info!(booking_id = booking.id, date = %booking.date, "booking created");
    Ok((StatusCode::CREATED, Json(booking)))
}
