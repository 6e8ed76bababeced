//! Market-open date enumeration.
//!
//! Enumeration and filtering are kept separate: `dates_between` knows
//! nothing about weekends or holidays, and the holiday source is an
//! injected [`HolidayCalendar`] so it can be swapped without touching
//! range logic.

use super::holidays::HolidayCalendar;
use super::month::Month;
use chrono::{Datelike, NaiveDate, Weekday};

/// Every calendar day from `start` to `end` inclusive, ascending.
///
/// Returns an empty vec when `start > end`.
pub fn dates_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = start;
    while current <= end {
        dates.push(current);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    dates
}

/// The Saturdays and Sundays from `start` to `end` inclusive, ascending.
pub fn weekend_dates(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    dates_between(start, end)
        .into_iter()
        .filter(|d| is_weekend(*d))
        .collect()
}

/// The market-open dates of a month: every calendar day minus weekends
/// and the days the given calendar classifies as holidays. Ascending.
pub fn market_dates(month: Month, calendar: &dyn HolidayCalendar) -> Vec<NaiveDate> {
    let (start, end) = month.bounds();
    dates_between(start, end)
        .into_iter()
        .filter(|d| !is_weekend(*d) && !calendar.is_holiday(*d))
        .collect()
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
