//! Aggregation, backfill, and comparison pipeline for ClimeCapsule.
//!
//! This crate composes the provider client and the summary store into the
//! operations an HTTP layer exposes:
//!
//! - [`aggregate`] folds one day's raw observations into a
//!   [`clime_types::DailySummary`],
//! - [`backfill`] populates the store over a historical date range,
//! - [`Engine`] answers current-conditions, single-date, and year-over-year
//!   comparison requests.
//!
//! All shared resources (the store connection, the provider's rate-limit
//! window) are constructed once at process start and injected; there is no
//! hidden global state.
//!
//! # Example
//!
//! ```no_run
//! use clime_engine::{Config, Engine};
//!
//! # async fn example() -> Result<(), clime_engine::Error> {
//! let config = Config::load_validated("climecapsule.toml")?;
//! let engine = Engine::from_config(&config)?;
//!
//! engine.backfill_to_present().await?;
//! let comparison = engine.compare_across_years(9, 15, 2).await?;
//! println!("{} matching years", comparison.history.len());
//! # Ok(())
//! # }
//! ```

mod aggregate;
pub mod backfill;
mod compare;
mod config;
mod engine;
mod error;

pub use aggregate::{AggregateError, aggregate};
pub use backfill::{BackfillError, BackfillFailure, BackfillReport};
pub use compare::Comparison;
pub use config::{
    Config, ConfigError, LimitsConfig, ProviderConfig, StationConfig, StorageConfig,
    ValidationError,
};
pub use engine::Engine;
pub use error::{Error, Result};
