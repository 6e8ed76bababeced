//! Calendar logic: month boundaries and market-open date enumeration.

pub mod holidays;
pub mod market;
pub mod month;

pub use holidays::{HolidayCalendar, NyseCalendar};
pub use market::{dates_between, market_dates, weekend_dates};
pub use month::{Month, MonthParseError};
