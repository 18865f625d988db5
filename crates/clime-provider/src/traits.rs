//! Trait abstraction over the remote weather provider.
//!
//! The [`WeatherProvider`] trait lets the aggregation and backfill pipeline
//! run against the real [`crate::ProviderClient`] in production and against
//! [`crate::MockProvider`] in tests.

use async_trait::async_trait;
use time::Date;

use clime_types::Observation;

use crate::error::Result;

/// Source of raw weather-station observations.
///
/// Implementations perform the network call (and any rate limiting or
/// retrying) but never write to the store; they are read-only collaborators.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetch all sub-daily observations recorded on the given calendar day.
    ///
    /// Returns an empty sequence when the provider has no data for the day;
    /// the caller decides whether that is a gap or an error.
    async fn fetch_hourly(&self, station_id: &str, date: Date) -> Result<Vec<Observation>>;

    /// Fetch the single most recent observation from the station.
    async fn fetch_current(&self, station_id: &str) -> Result<Observation>;
}
