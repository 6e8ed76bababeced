//! The backfill driver.
//!
//! One run processes one month: read the checkpoint (or default to the
//! month before `today`'s), honor the hard stop, fetch the month's bars,
//! bucket them into session segments, upload the JSON payload, and only
//! then step the checkpoint back one month. A failure at any step aborts
//! the run with the checkpoint untouched, so no month is ever skipped.

use crate::checkpoint::{read_checkpoint, read_hard_stop_year, write_checkpoint};
use crate::config::BackfillConfig;
use barvault_core::{
    bucket_bars, BarInterval, BarProvider, BlobStore, BucketError, DataError, HolidayCalendar,
    Month, StoreError,
};
use chrono::NaiveDate;
use thiserror::Error;

/// Errors that abort a backfill run.
#[derive(Debug, Error)]
pub enum BackfillError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] DataError),

    #[error("bucketing failed: {0}")]
    Bucket(#[from] BucketError),

    #[error("upload failed: {0}")]
    Upload(#[from] StoreError),

    #[error("checkpoint write failed after upload of {month}: {source}")]
    CheckpointWrite {
        month: Month,
        #[source]
        source: std::io::Error,
    },
}

/// What a run did, for the caller to report.
#[derive(Debug, Clone, PartialEq)]
pub enum BackfillOutcome {
    /// The checkpoint month's year is below the hard-stop year; nothing
    /// was fetched and the checkpoint was left untouched.
    HardStopReached { month: Month, hard_stop_year: i32 },

    /// A month was fetched, bucketed, and uploaded, and the checkpoint
    /// now points one month further back.
    Uploaded {
        month: Month,
        key: String,
        market_days: usize,
        bar_count: usize,
        next_month: Month,
    },
}

/// Run one backfill step for the configured ticker.
///
/// `today` anchors the default starting month (the month before the one
/// containing `today`) when no checkpoint exists; passing it in keeps the
/// driver deterministic under test.
pub fn run_backfill(
    config: &BackfillConfig,
    provider: &dyn BarProvider,
    store: &dyn BlobStore,
    calendar: &dyn HolidayCalendar,
    today: NaiveDate,
) -> Result<BackfillOutcome, BackfillError> {
    let month =
        read_checkpoint(&config.checkpoint_path).unwrap_or_else(|| Month::containing(today).pred());

    if let Some(hard_stop_year) = read_hard_stop_year(&config.hard_stop_path) {
        if month.year() < hard_stop_year {
            return Ok(BackfillOutcome::HardStopReached {
                month,
                hard_stop_year,
            });
        }
    }

    // The 32-slot day layout in the bucketer assumes half-hour bars.
    let (start, end) = month.bounds();
    let bars = provider.fetch_bars(&config.ticker, start, end, BarInterval::THIRTY_MINUTE)?;

    let bucket = bucket_bars(&bars, month, calendar)?;
    let payload = bucket.to_json_bytes()?;

    let key = config.storage_key(month);
    store.put(&key, &payload)?;

    let next_month = month.pred();
    write_checkpoint(&config.checkpoint_path, next_month).map_err(|source| {
        BackfillError::CheckpointWrite { month, source }
    })?;

    Ok(BackfillOutcome::Uploaded {
        month,
        key,
        market_days: bucket.days.len(),
        bar_count: bars.len(),
        next_month,
    })
}
