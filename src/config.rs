use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, ensure};

const DEFAULT_SESSION_TTL_HOURS: i64 = 24;
/// One year.
const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

/// Settings for the front end (CLI) talking to the booking backend.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub http_timeout: Duration,
    pub session_file: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_url = env::var("API_URL").unwrap_or_else(|_| "http://localhost:4000".to_string());
        let http_timeout_secs = env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(10);
        let session_file = env::var("SESSION_FILE")
            .unwrap_or_else(|_| ".pt-booking-session.json".to_string());

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            http_timeout: Duration::from_secs(http_timeout_secs),
            session_file: PathBuf::from(session_file),
        })
    }
}

/// Settings for the local stub backend.
#[derive(Clone, Debug)]
pub struct StubConfig {
    pub bind_addr: String,
    pub trainer_username: String,
    pub trainer_password_hash: String,
    pub session_ttl_hours: i64,
}

impl StubConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:4000".to_string());
        let trainer_username = env::var("TRAINER_USERNAME").unwrap_or_else(|_| "trainer".to_string());
        let trainer_password_hash = env::var("TRAINER_PASSWORD_HASH")
            .context("TRAINER_PASSWORD_HASH must be set (generate one with `hashpass`)")?;
        let session_ttl_hours = match env::var("SESSION_TTL_HOURS") {
            Ok(raw) => parse_session_ttl_hours(&raw)?,
            Err(_) => DEFAULT_SESSION_TTL_HOURS,
        };

        Ok(Self {
            bind_addr,
            trainer_username,
            trainer_password_hash,
            session_ttl_hours,
        })
    }
}

fn parse_session_ttl_hours(raw: &str) -> anyhow::Result<i64> {
    let hours: i64 = raw
        .trim()
        .parse()
        .with_context(|| format!("SESSION_TTL_HOURS must be a whole number of hours, got {raw:?}"))?;
    ensure!(
        (1..=MAX_SESSION_TTL_HOURS).contains(&hours),
        "SESSION_TTL_HOURS must be between 1 and {MAX_SESSION_TTL_HOURS}, got {hours}"
    );
    Ok(hours)
}
