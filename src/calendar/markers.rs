use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

use crate::models::Appointment;

/// Whether any appointment falls on `date`. Records with malformed dates
/// simply never match.
pub fn has_appointments(date: NaiveDate, appointments: &[Appointment]) -> bool {
    appointments
        .iter()
        .any(|a| a.calendar_day() == Some(date))
}

/// Dot markers for one month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthMarkers {
    first: NaiveDate,
    marked: BTreeSet<u32>,
}

impl MonthMarkers {
    /// Scan `appointments` once for `year`/`month`. `None` for an invalid month.
    pub fn for_month(year: i32, month: u32, appointments: &[Appointment]) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let marked = Self::scan(first, appointments);
        Some(Self { first, marked })
    }

    /// Markers for the month that contains `date`.
    pub fn containing(date: NaiveDate, appointments: &[Appointment]) -> Self {
        let first = date.with_day(1).unwrap_or(date);
        let marked = Self::scan(first, appointments);
        Self { first, marked }
    }

    fn scan(first: NaiveDate, appointments: &[Appointment]) -> BTreeSet<u32> {
        appointments
            .iter()
            .filter_map(Appointment::calendar_day)
            .filter(|d| d.year() == first.year() && d.month() == first.month())
            .map(|d| d.day())
            .collect()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn has_appointments(&self, date: NaiveDate) -> bool {
        date.year() == self.first.year()
            && date.month() == self.first.month()
            && self.marked.contains(&date.day())
    }

    pub fn marked_days(&self) -> impl Iterator<Item = u32> + '_ {
        self.marked.iter().copied()
    }

    pub fn days_in_month(&self) -> u32 {
        let next = match self.first.month() {
            12 => NaiveDate::from_ymd_opt(self.first.year() + 1, 1, 1),
            m => NaiveDate::from_ymd_opt(self.first.year(), m + 1, 1),
        };
        next.map(|n| (n - self.first).num_days() as u32).unwrap_or(31)
    }

    /// Month laid out Monday-first, one row per week; `None` pads cells
    /// outside the month.
    pub fn weeks(&self) -> Vec<[Option<u32>; 7]> {
        let lead = self.first.weekday().num_days_from_monday() as usize;
        let total = self.days_in_month() as usize;

        let mut weeks = Vec::new();
        let mut row = [None; 7];
        for cell in 0..lead + total {
            if cell >= lead {
                row[cell % 7] = Some((cell - lead + 1) as u32);
            }
            if cell % 7 == 6 {
                weeks.push(row);
                row = [None; 7];
            }
        }
        if row.iter().any(Option::is_some) {
            weeks.push(row);
        }
        weeks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{appt, june_bookings};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_has_appointments() {
        let bookings = june_bookings();
        assert!(has_appointments(ymd(2024, 6, 1), &bookings));
        assert!(has_appointments(ymd(2024, 6, 2), &bookings));
        assert!(!has_appointments(ymd(2024, 6, 3), &bookings));
        assert!(!has_appointments(ymd(2024, 6, 1), &[]));
    }

    #[test]
    fn test_malformed_record_does_not_break_markers() {
        let mut bookings = vec![appt(9, "not-a-date", "pending")];
        assert!(!has_appointments(ymd(2024, 6, 1), &bookings));

        bookings.extend(june_bookings());
        assert!(has_appointments(ymd(2024, 6, 1), &bookings));
        assert!(!has_appointments(ymd(2024, 6, 5), &bookings));
    }

    #[test]
    fn test_malformed_only_never_matches() {
        let bookings = vec![appt(1, "not-a-date", "pending")];
        let start = ymd(2024, 1, 1);
        for offset in 0..366 {
            let day = start + chrono::Duration::days(offset);
            assert!(!has_appointments(day, &bookings));
        }
    }

    #[test]
    fn test_month_markers_agree_with_per_day_query() {
        let mut bookings = june_bookings();
        bookings.push(appt(4, "2024-07-01", "pending"));
        bookings.push(appt(5, "garbage", "pending"));

        let june = MonthMarkers::for_month(2024, 6, &bookings).unwrap();
        assert_eq!(june.marked_days().collect::<Vec<_>>(), vec![1, 2]);
        for day in 1..=june.days_in_month() {
            let date = ymd(2024, 6, day);
            assert_eq!(june.has_appointments(date), has_appointments(date, &bookings));
        }
        assert!(!june.has_appointments(ymd(2024, 7, 1)));
    }

    #[test]
    fn test_invalid_month() {
        assert!(MonthMarkers::for_month(2024, 13, &[]).is_none());
    }

    #[test]
    fn test_containing_uses_first_of_month() {
        let bookings = june_bookings();
        let markers = MonthMarkers::containing(ymd(2024, 6, 17), &bookings);
        assert_eq!(markers.first_day(), ymd(2024, 6, 1));
        assert!(markers.has_appointments(ymd(2024, 6, 2)));
    }

    #[test]
    fn test_weeks_layout() {
        // June 2024 starts on a Saturday and has 30 days.
        let june = MonthMarkers::for_month(2024, 6, &[]).unwrap();
        assert_eq!(june.days_in_month(), 30);

        let weeks = june.weeks();
        assert_eq!(weeks.len(), 5);
        assert_eq!(weeks[0], [None, None, None, None, None, Some(1), Some(2)]);
        assert_eq!(weeks[4][0], Some(24));
        assert_eq!(weeks[4][6], Some(30));

        let feb = MonthMarkers::for_month(2024, 2, &[]).unwrap();
        assert_eq!(feb.days_in_month(), 29);
        let dec = MonthMarkers::for_month(2023, 12, &[]).unwrap();
        assert_eq!(dec.days_in_month(), 31);
    }
}
