//! Market-data provider seam and implementations.

pub mod polygon;
pub mod provider;

pub use polygon::PolygonProvider;
pub use provider::{BarInterval, BarProvider, DataError, Timespan};
