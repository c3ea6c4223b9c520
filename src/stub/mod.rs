//! In-memory implementation of the booking backend's REST contract, for
//! local development and end-to-end tests.

pub mod auth;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use axum::http::header;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::{AppState, TrainerAccount};

/// Full application: routes plus CORS and request tracing.
pub fn app(state: AppState) -> Router {
    // Browser front ends are served from another origin in development.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    routes::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::NaiveDate;

    use super::*;
    use crate::api::{ApiClient, BookingBackend};
    use crate::calendar::Selection;
    use crate::error::{AuthFailure, BookingError};
    use crate::models::{AppointmentStatus, NewBooking};
    use crate::portal::{ClientPortal, TrainerPortal};
    use crate::session::{MemorySession, Role, SessionContext};

    async fn spawn_stub() -> (String, AppState) {
        let state = AppState::new(
            TrainerAccount {
                username: "coach".into(),
                password_hash: auth::hash_password("coach-pass").unwrap(),
            },
            1,
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = app(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), state)
    }

    fn booking(date: &str, time: &str) -> NewBooking {
        NewBooking {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            phone: "555-0100".into(),
            date: date.into(),
            time: time.into(),
            message: String::new(),
        }
    }

    #[tokio::test]
    async fn test_full_booking_flow() {
        let (base_url, _state) = spawn_stub().await;
        let backend: Arc<dyn BookingBackend> =
            Arc::new(ApiClient::new(base_url, Duration::from_secs(10)).unwrap());
        let mut session = MemorySession::new();

        let client = ClientPortal::new(backend.clone());
        client.register("Ana", "ana@example.com", "ana-pass").await.unwrap();
        client.login(&mut session, "ana@example.com", "ana-pass").await.unwrap();
        assert_eq!(session.get(Role::Client).unwrap().display_name, "Ana");

        let first = client
            .submit_booking(&mut session, &booking("2024-06-01", "09:00"))
            .await
            .unwrap();
        client
            .submit_booking(&mut session, &booking("2024-06-01", "11:00"))
            .await
            .unwrap();
        client
            .submit_booking(&mut session, &booking("2024-06-02", "09:00"))
            .await
            .unwrap();
        assert_eq!(first.status, "pending");
        assert_eq!(client.my_bookings(&mut session).await.unwrap().len(), 3);

        let mut trainer = TrainerPortal::new(backend.clone());
        trainer.login(&mut session, "coach", "coach-pass").await.unwrap();
        assert_eq!(trainer.load(&mut session).await.unwrap(), 3);

        trainer
            .update_status(&mut session, first.id, AppointmentStatus::Completed)
            .await
            .unwrap();
        trainer
            .update_status(&mut session, first.id, AppointmentStatus::Confirmed)
            .await
            .unwrap();
        trainer.delete(&mut session, first.id + 1).await.unwrap();

        let june_first = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut selection = Selection::default();
        selection.select(june_first);
        let view = trainer.calendar(&selection, june_first);
        assert_eq!(view.entries.len(), 1);
        assert_eq!(view.entries[0].appointment.status, "confirmed");
        assert_eq!(view.markers.marked_days().collect::<Vec<_>>(), vec![1, 2]);

        // the backend agrees with the optimistic local state
        trainer.load(&mut session).await.unwrap();
        assert_eq!(trainer.store().len(), 2);
        assert_eq!(
            trainer.store().get(first.id).unwrap().status,
            "confirmed"
        );
    }

    #[tokio::test]
    async fn test_roles_are_enforced() {
        let (base_url, _state) = spawn_stub().await;
        let api = ApiClient::new(base_url, Duration::from_secs(10)).unwrap();
        let backend: Arc<dyn BookingBackend> = Arc::new(api.clone());
        let mut session = MemorySession::new();

        let client = ClientPortal::new(backend.clone());
        client.register("Ana", "ana@example.com", "ana-pass").await.unwrap();
        let cred = client.login(&mut session, "ana@example.com", "ana-pass").await.unwrap();

        // a client token cannot list every booking
        let err = api.fetch_bookings(&cred.token).await.unwrap_err();
        assert!(matches!(err, crate::api::ApiError::Rejected { status: 403, .. }));

        let dup = client.register("Ana", "ANA@example.com", "ana-pass").await.unwrap_err();
        assert!(matches!(dup, BookingError::Mutation { .. }));
    }

    #[tokio::test]
    async fn test_unknown_token_expires_session() {
        let (base_url, _state) = spawn_stub().await;
        let backend: Arc<dyn BookingBackend> =
            Arc::new(ApiClient::new(base_url, Duration::from_secs(10)).unwrap());
        let mut session = MemorySession::new();
        session.set(
            Role::Trainer,
            crate::session::Credential {
                token: "forged".into(),
                display_name: "coach".into(),
            },
        );

        let mut trainer = TrainerPortal::new(backend);
        let err = trainer.load(&mut session).await.unwrap_err();
        assert!(matches!(
            err,
            BookingError::Auth {
                kind: AuthFailure::Expired,
                ..
            }
        ));
        assert_eq!(session.get(Role::Trainer), None);
    }

    #[tokio::test]
    async fn test_bad_request_bodies_use_error_envelope() {
        let (base_url, state) = spawn_stub().await;
        let token = state
            .db
            .lock()
            .await
            .issue_session(Role::Trainer, "coach", 1)
            .unwrap();
        let http = reqwest::Client::new();

        for body in [r#"{"status":"cancelled"}"#, "{not json", "{}"] {
            let resp = http
                .patch(format!("{base_url}/api/bookings/1/status"))
                .bearer_auth(&token)
                .header(header::CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status().as_u16(), 400, "body {body}");

            let json: serde_json::Value = resp.json().await.unwrap();
            assert_eq!(json["error"]["code"], "VALIDATION_ERROR", "body {body}");
            assert!(json["error"]["message"].as_str().is_some_and(|m| !m.is_empty()));
        }

        let resp = http
            .post(format!("{base_url}/api/login"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(r#"{"username":"coach"}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 400);
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_missing_booking_is_404() {
        let (base_url, state) = spawn_stub().await;
        let api = ApiClient::new(base_url, Duration::from_secs(10)).unwrap();
        let token = state
            .db
            .lock()
            .await
            .issue_session(Role::Trainer, "coach", 1)
            .unwrap();

        let err = api
            .update_status(&token, 999, AppointmentStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, crate::api::ApiError::Rejected { status: 404, .. }));

        let err = api.delete_booking(&token, 999).await.unwrap_err();
        assert!(matches!(err, crate::api::ApiError::Rejected { status: 404, .. }));
    }
}
