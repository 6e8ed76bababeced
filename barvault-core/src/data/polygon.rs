//! Polygon aggregates provider.
//!
//! Fetches fixed-duration aggregate bars from the v2 aggs endpoint,
//! following `next_url` pagination. There is no retry or backoff: the
//! backfill is a run-to-completion batch and a failed fetch aborts the
//! run without advancing the checkpoint.

use super::provider::{BarInterval, BarProvider, DataError, Timespan};
use crate::bucket::Bar;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const BASE_URL: &str = "https://api.polygon.io";

/// Maximum results per page; the API caps at 50000.
const PAGE_LIMIT: u32 = 50_000;

/// Polygon v2 aggregates response.
#[derive(Debug, Deserialize)]
struct AggsResponse {
    status: Option<String>,
    error: Option<String>,
    /// Absent when the range has no results.
    results: Option<Vec<Bar>>,
    next_url: Option<String>,
}

/// Polygon.io aggregate-bar provider.
#[derive(Debug)]
pub struct PolygonProvider {
    client: reqwest::blocking::Client,
    api_key: String,
}

impl PolygonProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            api_key: api_key.into(),
        }
    }

    /// Build a provider from a credentials file holding a single API key.
    ///
    /// Surrounding whitespace is trimmed; a missing or empty file is a
    /// [`DataError::MissingCredentials`].
    pub fn from_key_file(path: &Path) -> Result<Self, DataError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            DataError::MissingCredentials(format!("cannot read {}: {e}", path.display()))
        })?;
        let key = contents.trim();
        if key.is_empty() {
            return Err(DataError::MissingCredentials(format!(
                "{} is empty",
                path.display()
            )));
        }
        Ok(Self::new(key))
    }

    /// Build the aggs URL for a ticker, interval, and inclusive date range.
    fn aggs_url(ticker: &str, start: NaiveDate, end: NaiveDate, interval: BarInterval) -> String {
        let span = match interval.timespan {
            Timespan::Minute => "minute",
            Timespan::Hour => "hour",
            Timespan::Day => "day",
        };
        format!(
            "{BASE_URL}/v2/aggs/ticker/{ticker}/range/{}/{span}/{start}/{end}\
             ?adjusted=true&sort=asc&limit={PAGE_LIMIT}",
            interval.multiplier
        )
    }

    /// Fetch one page and map HTTP/provider failures to typed errors.
    fn fetch_page(&self, ticker: &str, url: &str) -> Result<AggsResponse, DataError> {
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::TickerNotFound {
                ticker: ticker.to_string(),
            });
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(DataError::MissingCredentials(format!(
                "provider rejected credentials (HTTP {status})"
            )));
        }
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
                ticker: ticker.to_string(),
            });
        }

        let body: AggsResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {ticker}: {e}"))
        })?;

        if let Some(status) = &body.status {
            if status == "ERROR" || status == "NOT_AUTHORIZED" {
                return Err(DataError::ResponseFormatChanged(format!(
                    "{status}: {}",
                    body.error.as_deref().unwrap_or("no detail")
                )));
            }
        }

        Ok(body)
    }
}

impl BarProvider for PolygonProvider {
    fn name(&self) -> &str {
        "polygon"
    }

    fn fetch_bars(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: BarInterval,
    ) -> Result<Vec<Bar>, DataError> {
        let mut bars = Vec::new();
        let mut url = Self::aggs_url(ticker, start, end, interval);

        loop {
            let page = self.fetch_page(ticker, &url)?;
            if let Some(mut page_bars) = page.results {
                bars.append(&mut page_bars);
            }
            match page.next_url {
                Some(next) => url = next,
                None => break,
            }
        }

        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn aggs_url_encodes_range_and_interval() {
        let url = PolygonProvider::aggs_url(
            "NVDA",
            date("2024-07-01"),
            date("2024-07-31"),
            BarInterval::THIRTY_MINUTE,
        );
        assert_eq!(
            url,
            "https://api.polygon.io/v2/aggs/ticker/NVDA/range/30/minute/2024-07-01/2024-07-31\
             ?adjusted=true&sort=asc&limit=50000"
        );
    }

    #[test]
    fn response_parses_bars_in_wire_shape() {
        let body = r#"{
            "ticker": "NVDA",
            "queryCount": 2,
            "resultsCount": 2,
            "adjusted": true,
            "status": "OK",
            "request_id": "abc",
            "results": [
                {"t": 1719835200000, "o": 123.0, "h": 124.5, "l": 122.0, "c": 124.0, "v": 1000.0, "vw": 123.4, "n": 57},
                {"t": 1719837000000, "o": 124.0, "h": 125.0, "l": 123.5, "c": 124.8, "v": 800.0}
            ],
            "next_url": "https://api.polygon.io/v2/aggs/cursor"
        }"#;

        let parsed: AggsResponse = serde_json::from_str(body).unwrap();
        let bars = parsed.results.unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].trade_count, Some(57));
        assert_eq!(bars[1].vwap, None);
        assert_eq!(parsed.next_url.as_deref(), Some("https://api.polygon.io/v2/aggs/cursor"));
    }

    #[test]
    fn empty_range_omits_results() {
        let body = r#"{"ticker": "NVDA", "queryCount": 0, "resultsCount": 0,
                       "adjusted": true, "status": "OK", "request_id": "abc"}"#;
        let parsed: AggsResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.results.is_none());
        assert!(parsed.next_url.is_none());
    }

    #[test]
    fn key_file_is_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  pk_test_key  ").unwrap();
        let provider = PolygonProvider::from_key_file(file.path()).unwrap();
        assert_eq!(provider.api_key, "pk_test_key");
    }

    #[test]
    fn missing_or_empty_key_file_is_a_credentials_error() {
        let err = PolygonProvider::from_key_file(Path::new("/nonexistent/key")).unwrap_err();
        assert!(matches!(err, DataError::MissingCredentials(_)));

        let file = tempfile::NamedTempFile::new().unwrap();
        let err = PolygonProvider::from_key_file(file.path()).unwrap_err();
        assert!(matches!(err, DataError::MissingCredentials(_)));
    }
}
