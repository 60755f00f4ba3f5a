//! Calendar helpers shared by generators, accumulators and the snapshot.
//!
//! Ages and tenures are whole years measured at a reference date, usually
//! the last day of the simulated year.

use chrono::{Datelike, NaiveDate};

/// Errors produced by calendar arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    /// The year cannot be represented as a calendar date.
    #[error("simulation year {year} is outside the supported calendar range")]
    YearOutOfRange {
        /// The offending year.
        year: i32,
    },
}

/// First day of `year`.
pub fn year_start(year: i32) -> Result<NaiveDate, CalendarError> {
    NaiveDate::from_ymd_opt(year, 1, 1).ok_or(CalendarError::YearOutOfRange { year })
}

/// Last day of `year`.
pub fn year_end(year: i32) -> Result<NaiveDate, CalendarError> {
    NaiveDate::from_ymd_opt(year, 12, 31).ok_or(CalendarError::YearOutOfRange { year })
}

/// Number of days in `year` (365 or 366).
pub fn days_in_year(year: i32) -> Result<u32, CalendarError> {
    Ok(year_end(year)?.ordinal())
}

/// The `ordinal`-th day of `year`, clamped into the year.
pub fn day_of_year(year: i32, ordinal: u32) -> Result<NaiveDate, CalendarError> {
    let last = days_in_year(year)?;
    let ordinal = ordinal.clamp(1, last);
    NaiveDate::from_yo_opt(year, ordinal).ok_or(CalendarError::YearOutOfRange { year })
}

/// Whole years elapsed from `from` to `at` (zero if `at` precedes `from`).
pub fn whole_years_between(from: NaiveDate, at: NaiveDate) -> u32 {
    at.years_since(from).unwrap_or(0)
}

/// The anniversary of `date` that falls in `year`.
///
/// A 29 February anniversary falls on 28 February in non-leap years.
pub fn anniversary_in_year(date: NaiveDate, year: i32) -> Result<NaiveDate, CalendarError> {
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), 28))
        .ok_or(CalendarError::YearOutOfRange { year })
}
