//! SQLite persistence for ClimeCapsule daily summaries.
//!
//! This crate owns the persisted rows: one table keyed by
//! `(station_id, date)` holding a [`clime_types::DailySummary`] per station
//! per calendar day. Everything above it treats the store as the sole source
//! of truth for summaries.
//!
//! # Example
//!
//! ```
//! use clime_store::Store;
//! use clime_types::DailySummary;
//! use time::{Date, Month};
//!
//! let store = Store::open_in_memory()?;
//! let date = Date::from_calendar_date(2023, Month::September, 15).unwrap();
//!
//! store.upsert_summary(&DailySummary::new("S1", date))?;
//! assert!(store.has_summary("S1", date)?);
//! # Ok::<(), clime_store::Error>(())
//! ```

mod error;
mod schema;
mod store;

pub use error::{Error, Result};
pub use store::Store;

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/climecapsule/data.db`
/// - macOS: `~/Library/Application Support/climecapsule/data.db`
/// - Windows: `C:\Users\<user>\AppData\Local\climecapsule\data.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("climecapsule")
        .join("data.db")
}
