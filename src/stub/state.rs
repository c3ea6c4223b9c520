use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::auth::{generate_access_token, hash_access_token};
use super::error::ServiceError;
use crate::config::StubConfig;
use crate::models::Appointment;
use crate::session::Role;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Db>>,
    pub trainer: TrainerAccount,
    pub session_ttl_hours: i64,
}

#[derive(Clone, Debug)]
pub struct TrainerAccount {
    pub username: String,
    pub password_hash: String,
}

impl AppState {
    pub fn new(trainer: TrainerAccount, session_ttl_hours: i64) -> Self {
        Self {
            db: Arc::new(Mutex::new(Db::default())),
            trainer,
            session_ttl_hours,
        }
    }

    pub fn from_config(cfg: &StubConfig) -> Self {
        Self::new(
            TrainerAccount {
                username: cfg.trainer_username.clone(),
                password_hash: cfg.trainer_password_hash.clone(),
            },
            cfg.session_ttl_hours,
        )
    }
}

/* -------------------------
   In-memory rows
--------------------------*/

#[derive(Debug, Clone)]
pub struct ClientRow {
    pub client_id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct SessionRow {
    pub session_token_id: Uuid,
    pub role: Role,
    /// Trainer username or client email.
    pub subject: String,
    pub expires_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct BookingRow {
    pub owner_email: String,
    pub booking: Appointment,
}

/// Everything the stub persists, for the lifetime of the process.
#[derive(Debug, Default)]
pub struct Db {
    pub bookings: Vec<BookingRow>,
    pub next_booking_id: i64,
    /// Keyed by lowercased email.
    pub clients: HashMap<String, ClientRow>,
    /// Keyed by SHA-256 of the bearer token.
    pub sessions: HashMap<String, SessionRow>,
}

impl Db {
    /// Open a session and return the bearer token for it. The lifetime must
    /// be a positive number of hours that still lands on a representable
    /// instant.
    pub fn issue_session(
        &mut self,
        role: Role,
        subject: &str,
        ttl_hours: i64,
    ) -> Result<String, ServiceError> {
        let now = Utc::now();
        let expires_at = TimeDelta::try_hours(ttl_hours)
            .filter(|ttl| *ttl > TimeDelta::zero())
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| ServiceError::Internal(format!("invalid session lifetime: {ttl_hours}h")))?;

        let token = generate_access_token();
        self.sessions.insert(
            hash_access_token(&token),
            SessionRow {
                session_token_id: Uuid::new_v4(),
                role,
                subject: subject.to_string(),
                expires_at,
                last_seen_at: now,
            },
        );
        Ok(token)
    }

    /// Valid (unexpired) session for `token`, touching its last-seen time.
    /// Expired sessions are purged on the way.
    pub fn lookup_session(&mut self, token: &str) -> Option<SessionRow> {
        let now = Utc::now();
        self.sessions.retain(|_, s| s.expires_at > now);

        let session = self.sessions.get_mut(&hash_access_token(token))?;
        session.last_seen_at = now;
        Some(session.clone())
    }

    pub fn next_id(&mut self) -> i64 {
        self.next_booking_id += 1;
        self.next_booking_id
    }

    pub fn booking_mut(&mut self, id: i64) -> Option<&mut Appointment> {
        self.bookings
            .iter_mut()
            .map(|row| &mut row.booking)
            .find(|b| b.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_expire() {
        let mut db = Db::default();
        let live = db.issue_session(Role::Trainer, "coach", 1).unwrap();
        let dead = db.issue_session(Role::Client, "ana@example.com", 1).unwrap();
        db.sessions.get_mut(&hash_access_token(&dead)).unwrap().expires_at =
            Utc::now() - TimeDelta::hours(1);

        assert_eq!(db.lookup_session(&live).unwrap().subject, "coach");
        assert!(db.lookup_session(&dead).is_none());
        assert!(db.lookup_session("made-up").is_none());
        assert_eq!(db.sessions.len(), 1);
    }

    #[test]
    fn test_unusable_lifetimes_are_rejected() {
        let mut db = Db::default();
        for ttl in [0, -5, 10_000_000_000, i64::MAX] {
            assert!(
                matches!(
                    db.issue_session(Role::Trainer, "coach", ttl),
                    Err(ServiceError::Internal(_))
                ),
                "ttl {ttl}"
            );
        }
        assert!(db.sessions.is_empty());

        let token = db.issue_session(Role::Trainer, "coach", 24).unwrap();
        let session = db.lookup_session(&token).unwrap();
        assert!(session.expires_at > Utc::now() + TimeDelta::hours(23));
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut db = Db::default();
        assert_eq!(db.next_id(), 1);
        assert_eq!(db.next_id(), 2);
    }
}
