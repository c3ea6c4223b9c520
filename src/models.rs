use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::calendar::calendar_day;

/* -------------------------
   Booking records
--------------------------*/

/// A booked session as the backend returns it.
///
/// `date` and `status` stay in their wire form: a record with a corrupt
/// value must not fail the decode of the whole list it arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone: String,
    pub date: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub time: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    pub status: String,
}

impl Appointment {
    /// Calendar day this appointment falls on, `None` when `date` is malformed.
    pub fn calendar_day(&self) -> Option<NaiveDate> {
        calendar_day(&self.date)
    }

    pub fn known_status(&self) -> Option<AppointmentStatus> {
        self.status.parse().ok()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 3] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown status: {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for AppointmentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "completed" => Ok(AppointmentStatus::Completed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/* -------------------------
   API DTOs
--------------------------*/

/// Public booking form payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: AppointmentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appointment_decodes_nulls_and_unknown_status() {
        let raw = r#"{
            "id": 7,
            "name": "Ana",
            "email": "ana@example.com",
            "phone": null,
            "date": "2024-06-01T00:00:00.000Z",
            "time": "09:30",
            "status": "cancelled"
        }"#;
        let a: Appointment = serde_json::from_str(raw).unwrap();
        assert_eq!(a.phone, "");
        assert_eq!(a.message, "");
        assert_eq!(a.known_status(), None);
        assert_eq!(a.calendar_day(), NaiveDate::from_ymd_opt(2024, 6, 1));
    }

    #[test]
    fn test_status_parse_is_strict() {
        assert_eq!("pending".parse(), Ok(AppointmentStatus::Pending));
        assert_eq!("completed".parse(), Ok(AppointmentStatus::Completed));
        assert!("Pending".parse::<AppointmentStatus>().is_err());
        assert!("".parse::<AppointmentStatus>().is_err());
        assert_eq!(AppointmentStatus::default(), AppointmentStatus::Pending);
    }

    #[test]
    fn test_status_update_serializes_lowercase() {
        let body = serde_json::to_string(&StatusUpdate {
            status: AppointmentStatus::Confirmed,
        })
        .unwrap();
        assert_eq!(body, r#"{"status":"confirmed"}"#);
    }
}
