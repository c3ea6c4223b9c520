//! Scheduling-view core: turns a flat appointment list into a date-indexed
//! calendar with status badges.

mod day;
mod index;
mod markers;
mod selection;
mod status;

pub use day::{calendar_day, day_heading};
pub use index::DayIndex;
pub use markers::{MonthMarkers, has_appointments};
pub use selection::Selection;
pub use status::{BadgeCategory, can_transition, classify};
