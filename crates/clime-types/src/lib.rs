//! Shared data model for ClimeCapsule.
//!
//! This crate defines the platform-agnostic types that flow through the
//! ingestion pipeline: raw sub-daily [`Observation`]s as returned by the
//! remote provider, and the [`DailySummary`] records the rest of the system
//! persists and compares. It also provides the calendar-date helpers used by
//! the store and the backfill driver.
//!
//! # Example
//!
//! ```
//! use clime_types::{DailySummary, month_day_key};
//! use time::{Date, Month};
//!
//! let date = Date::from_calendar_date(2023, Month::September, 15).unwrap();
//! let summary = DailySummary::new("KAZPHOEN1", date);
//!
//! assert_eq!(summary.sample_count, 0);
//! assert_eq!(month_day_key(Month::September, 15), "09-15");
//! ```

mod dates;
mod error;
mod types;

pub use dates::{
    DateRange, format_date, local_date, month_day_key, parse_date, parse_utc_offset,
};
pub use error::ParseError;
pub use types::{DailySummary, Observation};

#[cfg(feature = "serde")]
pub use dates::serde_date;
