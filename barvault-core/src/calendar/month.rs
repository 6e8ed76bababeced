//! Calendar month type and `YYYY-MM` arithmetic.
//!
//! A [`Month`] is a year + month pair with no day component. All boundary
//! math goes through chrono date arithmetic (first day of the next month
//! minus one day) rather than a day-count table, so leap years fall out
//! for free.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A calendar month, canonically rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
    year: i32,
    month: u32,
}

/// Errors from parsing a `YYYY-MM` string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MonthParseError {
    #[error("expected YYYY-MM, got '{0}'")]
    Malformed(String),

    #[error("month component out of range in '{0}' (must be 01-12)")]
    MonthOutOfRange(String),
}

impl Month {
    /// Build a month from parts. Returns `None` when the month component
    /// is outside `[1, 12]`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The month a given date falls in.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First calendar day of this month (always day 01).
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap()
    }

    /// Last calendar day of this month (28-31).
    ///
    /// Computed as the first day of the following month minus one day,
    /// which rolls December into January of the next year correctly.
    pub fn last_day(&self) -> NaiveDate {
        self.succ().first_day().pred_opt().unwrap()
    }

    /// Inclusive `(first_day, last_day)` bounds of this month.
    pub fn bounds(&self) -> (NaiveDate, NaiveDate) {
        (self.first_day(), self.last_day())
    }

    /// The month before this one. January rolls to December of the
    /// previous year.
    pub fn pred(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The month after this one. December rolls to January of the
    /// next year.
    pub fn succ(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year_part, month_part) = s
            .split_once('-')
            .ok_or_else(|| MonthParseError::Malformed(s.to_string()))?;

        if year_part.len() != 4 || month_part.len() != 2 {
            return Err(MonthParseError::Malformed(s.to_string()));
        }

        let year: i32 = year_part
            .parse()
            .map_err(|_| MonthParseError::Malformed(s.to_string()))?;
        let month: u32 = month_part
            .parse()
            .map_err(|_| MonthParseError::Malformed(s.to_string()))?;

        Self::new(year, month).ok_or_else(|| MonthParseError::MonthOutOfRange(s.to_string()))
    }
}

impl TryFrom<String> for Month {
    type Error = MonthParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Month> for String {
    fn from(m: Month) -> Self {
        m.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn month(s: &str) -> Month {
        s.parse().unwrap()
    }

    #[test]
    fn parse_and_display_round_trip() {
        assert_eq!(month("2024-07").to_string(), "2024-07");
        assert_eq!(month("1999-01").to_string(), "1999-01");
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert!("2024".parse::<Month>().is_err());
        assert!("2024-7".parse::<Month>().is_err());
        assert!("24-07".parse::<Month>().is_err());
        assert!("2024-07-01".parse::<Month>().is_err());
        assert_eq!(
            "2024-13".parse::<Month>(),
            Err(MonthParseError::MonthOutOfRange("2024-13".into()))
        );
        assert_eq!(
            "2024-00".parse::<Month>(),
            Err(MonthParseError::MonthOutOfRange("2024-00".into()))
        );
    }

    #[test]
    fn bounds_of_leap_february() {
        let (start, end) = month("2024-02").bounds();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn bounds_of_non_leap_february() {
        let (start, end) = month("2023-02").bounds();
        assert_eq!(start, NaiveDate::from_ymd_opt(2023, 2, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
    }

    #[test]
    fn december_rolls_into_next_year() {
        let (start, end) = month("2023-12").bounds();
        assert_eq!(start, NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(month("2023-12").succ(), month("2024-01"));
    }

    #[test]
    fn pred_rolls_january_to_previous_december() {
        assert_eq!(month("2024-01").pred(), month("2023-12"));
        assert_eq!(month("2024-03").pred(), month("2024-02"));
    }

    #[test]
    fn containing_strips_the_day() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 19).unwrap();
        assert_eq!(Month::containing(date), month("2024-07"));
    }

    #[test]
    fn serde_uses_the_string_form() {
        let m = month("2021-11");
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "\"2021-11\"");
        let back: Month = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    proptest! {
        #[test]
        fn first_day_is_always_day_one(year in 1900i32..2200, m in 1u32..=12) {
            let month = Month::new(year, m).unwrap();
            prop_assert_eq!(month.first_day().day(), 1);
        }

        #[test]
        fn last_day_is_the_true_month_end(year in 1900i32..2200, m in 1u32..=12) {
            let month = Month::new(year, m).unwrap();
            let (start, end) = month.bounds();
            prop_assert!(start <= end);
            prop_assert!((28..=31).contains(&end.day()));
            // The day after the end is the first of the next month.
            prop_assert_eq!(end.succ_opt().unwrap(), month.succ().first_day());
        }

        #[test]
        fn pred_and_succ_are_inverses(year in 1900i32..2200, m in 1u32..=12) {
            let month = Month::new(year, m).unwrap();
            prop_assert_eq!(month.pred().succ(), month);
            prop_assert_eq!(month.succ().pred(), month);
        }

        #[test]
        fn pred_twice_steps_back_two_months(year in 1900i32..2200, m in 1u32..=12) {
            let month = Month::new(year, m).unwrap();
            let back_two = month.pred().pred();
            let expected = NaiveDate::from_ymd_opt(year, m, 1)
                .unwrap()
                .checked_sub_months(chrono::Months::new(2))
                .unwrap();
            prop_assert_eq!(back_two, Month::containing(expected));
        }

        #[test]
        fn parse_display_round_trips(year in 1900i32..2200, m in 1u32..=12) {
            let month = Month::new(year, m).unwrap();
            prop_assert_eq!(month.to_string().parse::<Month>().unwrap(), month);
        }
    }
}
