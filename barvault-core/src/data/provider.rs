//! Bar provider trait and structured error types.
//!
//! The `BarProvider` trait abstracts over aggregate-bar sources so the
//! backfill driver can be tested against a mock and the HTTP client can
//! be swapped without touching orchestration.

use crate::bucket::Bar;
use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

/// The fixed bar duration to request, e.g. 30 x minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarInterval {
    pub multiplier: u32,
    pub timespan: Timespan,
}

/// Aggregation window unit supported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timespan {
    Minute,
    Hour,
    Day,
}

impl BarInterval {
    /// The half-hour interval the session bucketer is built around.
    pub const THIRTY_MINUTE: Self = Self {
        multiplier: 30,
        timespan: Timespan::Minute,
    };
}

impl fmt::Display for BarInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let span = match self.timespan {
            Timespan::Minute => "minute",
            Timespan::Hour => "hour",
            Timespan::Day => "day",
        };
        write!(f, "{}-{span}", self.multiplier)
    }
}

/// Structured error types for provider operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (HTTP 429)")]
    RateLimited,

    #[error("provider returned HTTP {status} for {ticker}")]
    HttpStatus { status: u16, ticker: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("ticker not found: {ticker}")]
    TickerNotFound { ticker: String },

    #[error("missing credentials: {0}")]
    MissingCredentials(String),
}

/// Trait for aggregate-bar providers.
///
/// Implementations are thin I/O wrappers: they return the provider's bars
/// in chronological order and do not reshape them. Gap-freeness is an
/// upstream contract the bucketer re-checks by count.
pub trait BarProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch aggregate bars for a ticker over an inclusive date range.
    fn fetch_bars(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: BarInterval,
    ) -> Result<Vec<Bar>, DataError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_renders_as_provider_segment_suffix() {
        assert_eq!(BarInterval::THIRTY_MINUTE.to_string(), "30-minute");
        let hourly = BarInterval {
            multiplier: 1,
            timespan: Timespan::Hour,
        };
        assert_eq!(hourly.to_string(), "1-hour");
    }
}
