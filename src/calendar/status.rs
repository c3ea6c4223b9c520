use crate::models::AppointmentStatus;

/// Badge styling bucket for a status value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeCategory {
    Pending,
    Confirmed,
    Completed,
    Unknown,
}

impl BadgeCategory {
    pub fn label(self) -> &'static str {
        match self {
            BadgeCategory::Pending => "Pending",
            BadgeCategory::Confirmed => "Confirmed",
            BadgeCategory::Completed => "Completed",
            BadgeCategory::Unknown => "Unknown",
        }
    }

    /// Short marker used by the terminal views.
    pub fn glyph(self) -> char {
        match self {
            BadgeCategory::Pending => '~',
            BadgeCategory::Confirmed => '+',
            BadgeCategory::Completed => '*',
            BadgeCategory::Unknown => '?',
        }
    }
}

impl From<AppointmentStatus> for BadgeCategory {
    fn from(status: AppointmentStatus) -> Self {
        match status {
            AppointmentStatus::Pending => BadgeCategory::Pending,
            AppointmentStatus::Confirmed => BadgeCategory::Confirmed,
            AppointmentStatus::Completed => BadgeCategory::Completed,
        }
    }
}

/// Total over any input: values the backend should never send fall back to
/// `Unknown`.
pub fn classify(status: &str) -> BadgeCategory {
    status
        .parse::<AppointmentStatus>()
        .map(BadgeCategory::from)
        .unwrap_or(BadgeCategory::Unknown)
}

/// Status changes are trainer-driven and any-to-any; `completed` is not
/// terminal.
pub fn can_transition(_from: AppointmentStatus, _to: AppointmentStatus) -> bool {
    true
}
