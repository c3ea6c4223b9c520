use chrono::{DateTime, NaiveDate, NaiveDateTime};

// Naive timestamp shapes the backend has been seen to emit besides RFC 3339.
const NAIVE_DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Truncate a wire date to its calendar day.
///
/// Every day comparison in the crate goes through here. Timestamps keep the
/// year/month/day written in the string; an embedded offset is ignored, so
/// `2024-06-01T23:30:00-05:00` is June 1st and not June 2nd.
pub fn calendar_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_local().date());
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|ts| ts.date())
}

/// Title of the per-day detail panel.
pub fn day_heading(selected: Option<NaiveDate>) -> String {
    match selected {
        Some(date) => format!("Bookings for {}", date.format("%B %-d, %Y")),
        None => "Select a date to view bookings".to_string(),
    }
}
