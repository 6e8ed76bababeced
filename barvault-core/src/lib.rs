//! BarVault Core — calendar math, session bucketing, and I/O seams.
//!
//! This crate contains the pure logic of the backfill pipeline:
//! - Month arithmetic (`YYYY-MM` boundaries, predecessor months)
//! - Market calendar (date enumeration, weekend and holiday exclusion)
//! - Bar bucketer (flat intraday bars → per-day session segments)
//! - Provider seam (`BarProvider` trait + Polygon aggregates client)
//! - Store seam (`BlobStore` trait + filesystem implementation)
//!
//! Everything in `calendar` and `bucket` is pure and side-effect free;
//! the only I/O lives behind the `data` and `store` traits.

pub mod bucket;
pub mod calendar;
pub mod data;
pub mod store;

pub use bucket::{
    bucket_bars, Bar, BucketError, DayBucket, MonthBucket, AFTER_HOURS_BARS, BARS_PER_DAY,
    PRE_MARKET_BARS, REGULAR_MARKET_BARS,
};
pub use calendar::holidays::{HolidayCalendar, NyseCalendar};
pub use calendar::market::{dates_between, market_dates, weekend_dates};
pub use calendar::month::{Month, MonthParseError};
pub use data::polygon::PolygonProvider;
pub use data::provider::{BarInterval, BarProvider, DataError};
pub use store::{BlobStore, FsBlobStore, StoreError};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: the collaborator seams stay object-safe and
    /// usable across threads.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Month>();
        require_sync::<Month>();
        require_send::<Bar>();
        require_sync::<Bar>();
        require_send::<MonthBucket>();
        require_sync::<MonthBucket>();
        require_send::<NyseCalendar>();
        require_sync::<NyseCalendar>();
        require_send::<FsBlobStore>();
        require_sync::<FsBlobStore>();
    }

    #[test]
    fn collaborator_traits_are_object_safe() {
        fn _takes_calendar(_: &dyn HolidayCalendar) {}
        fn _takes_provider(_: &dyn BarProvider) {}
        fn _takes_store(_: &dyn BlobStore) {}
    }
}
