use chrono::NaiveDate;

use super::DayIndex;
use crate::models::Appointment;

/// The date the user currently has picked on the calendar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    current: Option<NaiveDate>,
}

impl Selection {
    pub fn new(current: Option<NaiveDate>) -> Self {
        Self { current }
    }

    pub fn select(&mut self, date: NaiveDate) {
        self.current = Some(date);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<NaiveDate> {
        self.current
    }

    /// Appointments on the selected day; empty when nothing is selected.
    pub fn appointments_for_selection<'i, 'a>(
        &self,
        index: &'i DayIndex<'a>,
    ) -> &'i [&'a Appointment] {
        match self.current {
            Some(date) => index.day(date),
            None => &[],
        }
    }
}
