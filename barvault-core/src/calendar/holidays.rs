//! Financial holiday calendars.
//!
//! The `HolidayCalendar` trait abstracts "set of dates the exchange is
//! closed" so the calendar source can be swapped (or mocked in tests)
//! without touching date-range or bucketing logic.

use chrono::{Datelike, NaiveDate, Weekday};

/// Set-membership predicate over dates the market is closed.
pub trait HolidayCalendar: Send + Sync {
    /// Human-readable name of this calendar.
    fn name(&self) -> &str;

    /// True if the exchange observes a holiday on `date`.
    fn is_holiday(&self, date: NaiveDate) -> bool;
}

/// Rule-based observed NYSE holiday calendar.
///
/// Covers the nine fixed/floating NYSE holidays plus Good Friday.
/// Fixed-date holidays shift Saturday→Friday and Sunday→Monday, with one
/// exchange quirk: New Year's Day falling on a Saturday is not observed.
/// One-off closures (mourning days, weather) are not modeled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NyseCalendar;

impl HolidayCalendar for NyseCalendar {
    fn name(&self) -> &str {
        "NYSE"
    }

    fn is_holiday(&self, date: NaiveDate) -> bool {
        observed_holidays(date.year()).contains(&date)
    }
}

/// All observed NYSE holidays for a year, ascending.
fn observed_holidays(year: i32) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(10);

    // New Year's Day: Sunday shifts to Monday, Saturday is unobserved.
    let new_year = ymd(year, 1, 1);
    match new_year.weekday() {
        Weekday::Sat => {}
        Weekday::Sun => days.push(ymd(year, 1, 2)),
        _ => days.push(new_year),
    }

    // Martin Luther King Jr. Day, observed since 1998.
    if year >= 1998 {
        days.push(nth_weekday(year, 1, Weekday::Mon, 3));
    }

    // Washington's Birthday.
    days.push(nth_weekday(year, 2, Weekday::Mon, 3));

    // Good Friday: two days before Easter Sunday.
    days.push(easter_sunday(year) - chrono::Duration::days(2));

    // Memorial Day: last Monday of May.
    days.push(last_weekday(year, 5, Weekday::Mon));

    // Juneteenth, observed by the NYSE since 2022.
    if year >= 2022 {
        days.push(shift_weekend(ymd(year, 6, 19)));
    }

    // Independence Day.
    days.push(shift_weekend(ymd(year, 7, 4)));

    // Labor Day: first Monday of September.
    days.push(nth_weekday(year, 9, Weekday::Mon, 1));

    // Thanksgiving: fourth Thursday of November.
    days.push(nth_weekday(year, 11, Weekday::Thu, 4));

    // Christmas Day.
    days.push(shift_weekend(ymd(year, 12, 25)));

    days.sort_unstable();
    days
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Saturday→Friday, Sunday→Monday observed shift for fixed-date holidays.
fn shift_weekend(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date - chrono::Duration::days(1),
        Weekday::Sun => date + chrono::Duration::days(1),
        _ => date,
    }
}

/// The n-th (1-based) given weekday of a month.
fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u32) -> NaiveDate {
    let first = ymd(year, month, 1);
    let offset = (7 + weekday.num_days_from_monday() - first.weekday().num_days_from_monday()) % 7;
    first + chrono::Duration::days(i64::from(offset + (n - 1) * 7))
}

/// The last given weekday of a month.
fn last_weekday(year: i32, month: u32, weekday: Weekday) -> NaiveDate {
    let last = super::month::Month::new(year, month).unwrap().last_day();
    let offset = (7 + last.weekday().num_days_from_monday() - weekday.num_days_from_monday()) % 7;
    last - chrono::Duration::days(i64::from(offset))
}

/// Easter Sunday via the anonymous Gregorian computus.
fn easter_sunday(year: i32) -> NaiveDate {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    ymd(year, month as u32, day as u32)
}
