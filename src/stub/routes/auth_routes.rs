use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::post,
};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{ClientLoginRequest, ClientRegistration, LoginRequest, TokenResponse};
use crate::session::Role;
use crate::stub::auth::{hash_password, verify_password};
use crate::stub::error::ServiceError;
use crate::stub::state::{AppState, ClientRow};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(trainer_login))
        .route("/client/register", post(client_register))
        .route("/client/login", post(client_login))
}

fn validate_email(email: &str) -> Result<String, ServiceError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(ServiceError::Validation("a valid email is required".into())),
    }
}

fn validate_password(password: &str) -> Result<(), ServiceError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ServiceError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub async fn trainer_login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ServiceError> {
    let Json(req) = payload?;
    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        return Err(ServiceError::Validation(
            "username and password are required".into(),
        ));
    }

    if username != state.trainer.username
        || !verify_password(&req.password, &state.trainer.password_hash)
    {
        tracing::info!(%username, "trainer login rejected");
        return Err(ServiceError::invalid_credentials());
    }

    let token = state
        .db
        .lock()
        .await
        .issue_session(Role::Trainer, username, state.session_ttl_hours)?;

    tracing::info!(%username, "trainer signed in");
    Ok(Json(TokenResponse { token, name: None }))
}

pub async fn client_register(
    State(state): State<AppState>,
    payload: Result<Json<ClientRegistration>, JsonRejection>,
) -> Result<(StatusCode, Json<OkResponse>), ServiceError> {
    let Json(req) = payload?;
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ServiceError::Validation("name is required".into()));
    }
    let email = validate_email(&req.email)?;
    validate_password(&req.password)?;

    if state.db.lock().await.clients.contains_key(&email) {
        return Err(ServiceError::Conflict("Email already registered".into()));
    }

    // Hash outside the lock; argon2 is slow on purpose.
    let password_hash = hash_password(&req.password).map_err(ServiceError::Internal)?;

    let mut db = state.db.lock().await;
    if db.clients.contains_key(&email) {
        return Err(ServiceError::Conflict("Email already registered".into()));
    }
    db.clients.insert(
        email.clone(),
        ClientRow {
            client_id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.clone(),
            password_hash,
        },
    );

    tracing::info!(%email, "client registered");
    Ok((StatusCode::CREATED, Json(OkResponse { ok: true })))
}

pub async fn client_login(
    State(state): State<AppState>,
    payload: Result<Json<ClientLoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ServiceError> {
    let Json(req) = payload?;
    let email = req.email.trim().to_lowercase();

    let account = state
        .db
        .lock()
        .await
        .clients
        .get(&email)
        .cloned()
        .ok_or_else(ServiceError::invalid_credentials)?;

    if !verify_password(&req.password, &account.password_hash) {
        return Err(ServiceError::invalid_credentials());
    }

    let token = state
        .db
        .lock()
        .await
        .issue_session(Role::Client, &account.email, state.session_ttl_hours)?;

    tracing::info!(client_id = %account.client_id, "client signed in");
    Ok(Json(TokenResponse {
        token,
        name: Some(account.name),
    }))
}
