use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::Appointment;

/// Appointments grouped by calendar day.
///
/// Borrows the slice it was built from, so it cannot outlive or drift from
/// the store: any mutation of the store requires dropping the index and
/// building a new one.
#[derive(Debug, Default)]
pub struct DayIndex<'a> {
    by_day: HashMap<NaiveDate, Vec<&'a Appointment>>,
    indexed: usize,
    unindexed: usize,
}

impl<'a> DayIndex<'a> {
    /// Group `appointments` by day, keeping input order within each day.
    /// Records whose date does not parse land in no group.
    pub fn build(appointments: &'a [Appointment]) -> Self {
        let mut index = DayIndex::default();

        for appointment in appointments {
            match appointment.calendar_day() {
                Some(day) => {
                    index.by_day.entry(day).or_default().push(appointment);
                    index.indexed += 1;
                }
                None => {
                    tracing::debug!(
                        appointment_id = appointment.id,
                        date = %appointment.date,
                        "skipping appointment with malformed date"
                    );
                    index.unindexed += 1;
                }
            }
        }

        index
    }

    pub fn day(&self, date: NaiveDate) -> &[&'a Appointment] {
        self.by_day.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_appointments(&self, date: NaiveDate) -> bool {
        self.by_day.contains_key(&date)
    }

    /// Days with at least one appointment, ascending.
    pub fn days(&self) -> Vec<NaiveDate> {
        let mut days: Vec<NaiveDate> = self.by_day.keys().copied().collect();
        days.sort_unstable();
        days
    }

    /// Number of appointments that made it into a group.
    pub fn len(&self) -> usize {
        self.indexed
    }

    pub fn is_empty(&self) -> bool {
        self.indexed == 0
    }

    /// Number of appointments skipped because their date is malformed.
    pub fn unindexed(&self) -> usize {
        self.unindexed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{appt, ids, june_bookings};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_groups_by_day_in_input_order() {
        let bookings = june_bookings();
        let index = DayIndex::build(&bookings);

        assert_eq!(index.days(), vec![ymd(2024, 6, 1), ymd(2024, 6, 2)]);
        assert_eq!(ids(index.day(ymd(2024, 6, 1)).iter().copied()), vec![1, 2]);
        assert_eq!(ids(index.day(ymd(2024, 6, 2)).iter().copied()), vec![3]);
        assert!(index.day(ymd(2024, 6, 3)).is_empty());
    }

    #[test]
    fn test_same_day_across_timestamp_granularity() {
        let bookings = vec![
            appt(10, "2024-06-01T18:00:00.000Z", "pending"),
            appt(11, "2024-06-01", "pending"),
            appt(12, "2024-06-01T07:15:00+02:00", "confirmed"),
        ];
        let index = DayIndex::build(&bookings);

        assert_eq!(index.days().len(), 1);
        assert_eq!(ids(index.day(ymd(2024, 6, 1)).iter().copied()), vec![10, 11, 12]);
    }

    #[test]
    fn test_no_secondary_sort_by_time() {
        let mut late = appt(1, "2024-06-01", "pending");
        late.time = "17:00".into();
        let mut early = appt(2, "2024-06-01", "pending");
        early.time = "08:00".into();
        let bookings = vec![late, early];

        let index = DayIndex::build(&bookings);
        assert_eq!(ids(index.day(ymd(2024, 6, 1)).iter().copied()), vec![1, 2]);
    }

    #[test]
    fn test_groups_partition_the_input() {
        let mut bookings = june_bookings();
        bookings.push(appt(4, "2024-07-15", "pending"));
        bookings.push(appt(5, "2024-06-02T10:00:00", "pending"));
        let index = DayIndex::build(&bookings);

        let mut seen: Vec<i64> = index
            .days()
            .into_iter()
            .flat_map(|d| ids(index.day(d).iter().copied()))
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
        assert_eq!(index.len(), bookings.len());
        assert_eq!(index.unindexed(), 0);
    }

    #[test]
    fn test_malformed_dates_are_excluded() {
        let mut bookings = june_bookings();
        bookings.push(appt(99, "not-a-date", "pending"));
        let index = DayIndex::build(&bookings);

        assert_eq!(index.len(), 3);
        assert_eq!(index.unindexed(), 1);
        assert!(
            index
                .days()
                .into_iter()
                .all(|d| index.day(d).iter().all(|a| a.id != 99))
        );
    }

    #[test]
    fn test_empty_input() {
        let index = DayIndex::build(&[]);
        assert!(index.is_empty());
        assert!(index.days().is_empty());
        assert!(!index.has_appointments(ymd(2024, 6, 1)));
    }
}
