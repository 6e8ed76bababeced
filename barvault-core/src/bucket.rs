//! Session bucketing: flat intraday bars → per-day session segments.
//!
//! A market day of 30-minute bars has 32 slots: 11 pre-market (04:00 to
//! 09:30), 13 regular-market (09:30 to 16:00), 8 after-hours (16:00 to
//! 20:00). The bucketer slices a month's flat bar sequence at those fixed
//! offsets, one 32-bar window per market-open date in ascending order.

use crate::calendar::holidays::HolidayCalendar;
use crate::calendar::market::market_dates;
use crate::calendar::month::Month;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Bars per market day including extended hours.
pub const BARS_PER_DAY: usize = 32;

/// Pre-market slots per day (offsets 0..11).
pub const PRE_MARKET_BARS: usize = 11;

/// Regular-market slots per day (offsets 11..24).
pub const REGULAR_MARKET_BARS: usize = 13;

/// After-hours slots per day (offsets 24..32).
pub const AFTER_HOURS_BARS: usize = 8;

/// One fixed-duration aggregate bar, in the provider's wire shape.
///
/// Field names follow the aggregates API (`t` epoch-millis, OHLCV,
/// optional volume-weighted price and trade count) so persisted payloads
/// stay byte-compatible with raw provider output. The bucketer treats
/// the bar as opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Window start, milliseconds since the Unix epoch.
    #[serde(rename = "t")]
    pub timestamp_ms: i64,
    #[serde(rename = "o")]
    pub open: f64,
    #[serde(rename = "h")]
    pub high: f64,
    #[serde(rename = "l")]
    pub low: f64,
    #[serde(rename = "c")]
    pub close: f64,
    #[serde(rename = "v")]
    pub volume: f64,
    /// Volume-weighted average price, when the provider supplies it.
    #[serde(rename = "vw", skip_serializing_if = "Option::is_none")]
    pub vwap: Option<f64>,
    /// Trade count, when the provider supplies it.
    #[serde(rename = "n", skip_serializing_if = "Option::is_none")]
    pub trade_count: Option<u64>,
}

/// One market day's bars, split into the three session segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DayBucket {
    #[serde(rename = "pre-market")]
    pub pre_market: Vec<Bar>,
    #[serde(rename = "regular-market")]
    pub regular_market: Vec<Bar>,
    #[serde(rename = "after-hours")]
    pub after_hours: Vec<Bar>,
}

/// A fully materialized month: one [`DayBucket`] per market-open date,
/// plus the reserved `complete` marker distinguishing whole-month blobs
/// from partial daily pulls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthBucket {
    #[serde(flatten)]
    pub days: BTreeMap<NaiveDate, DayBucket>,
    pub complete: bool,
}

/// Errors from bucketing or payload encoding.
#[derive(Debug, Error)]
pub enum BucketError {
    #[error(
        "bar count mismatch for {month}: expected {expected} ({days} market days x {per_day}), got {actual}"
    )]
    BarCountMismatch {
        month: Month,
        days: usize,
        per_day: usize,
        expected: usize,
        actual: usize,
    },

    #[error("payload encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Partition a month's flat bar sequence into per-date session buckets.
///
/// Bars must be chronological and gap-free, exactly [`BARS_PER_DAY`] per
/// market-open date of `month`. Any other length is a
/// [`BucketError::BarCountMismatch`] — the upstream contract does not
/// document partial trading days, so silent truncation would hide missing
/// data in a blob marked `complete`.
pub fn bucket_bars(
    bars: &[Bar],
    month: Month,
    calendar: &dyn HolidayCalendar,
) -> Result<MonthBucket, BucketError> {
    let dates = market_dates(month, calendar);
    let expected = dates.len() * BARS_PER_DAY;
    if bars.len() != expected {
        return Err(BucketError::BarCountMismatch {
            month,
            days: dates.len(),
            per_day: BARS_PER_DAY,
            expected,
            actual: bars.len(),
        });
    }

    let mut days = BTreeMap::new();
    for (i, date) in dates.into_iter().enumerate() {
        let window = &bars[i * BARS_PER_DAY..(i + 1) * BARS_PER_DAY];
        days.insert(
            date,
            DayBucket {
                pre_market: window[..PRE_MARKET_BARS].to_vec(),
                regular_market: window[PRE_MARKET_BARS..PRE_MARKET_BARS + REGULAR_MARKET_BARS]
                    .to_vec(),
                after_hours: window[PRE_MARKET_BARS + REGULAR_MARKET_BARS..].to_vec(),
            },
        );
    }

    Ok(MonthBucket {
        days,
        complete: true,
    })
}

impl MonthBucket {
    /// Encode as a UTF-8 JSON byte payload for upload.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, BucketError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a payload previously produced by [`Self::to_json_bytes`].
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, BucketError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
