//! The engine facade.
//!
//! [`Engine`] wires the provider client and the store together and exposes
//! the operations the external HTTP layer maps to routes: current
//! conditions, a single historical date, and the year-over-year comparison.
//! The HTTP layer translates [`Error::NotFound`] to 404,
//! [`Error::InvalidInput`] to 400, and everything else to a server error.

use std::sync::Arc;

use time::{Date, Month, OffsetDateTime, UtcOffset};
use tokio::sync::Mutex;
use tracing::{debug, info};

use clime_provider::{ProviderClient, RateLimiter, RetryPolicy, WeatherProvider};
use clime_store::Store;
use clime_types::{DailySummary, parse_utc_offset};

use crate::aggregate::{AggregateError, aggregate};
use crate::backfill::{self, BackfillReport};
use crate::compare::{Comparison, take_recent};
use crate::config::Config;
use crate::error::{Error, Result};

/// Pipeline facade over one station, one provider, and one store.
///
/// All process-wide state lives here: the store connection (behind a mutex,
/// so upserts and reads on the same key serialize) and the provider's shared
/// rate-limit window. Both are constructed once and injected.
pub struct Engine<P: WeatherProvider> {
    provider: P,
    store: Mutex<Store>,
    station_id: String,
    utc_offset: UtcOffset,
    earliest_observation: Date,
}

impl Engine<ProviderClient> {
    /// Build a production engine from a validated [`Config`].
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let utc_offset = parse_utc_offset(&config.station.utc_offset)
            .map_err(|e| Error::InvalidInput(e.to_string()))?;

        let limiter = Arc::new(RateLimiter::new(
            config.limits.max_calls,
            config.limits.window(),
        ));
        let retry = RetryPolicy::new(config.limits.max_retries)
            .initial_delay(config.limits.initial_delay());
        let provider = ProviderClient::new(
            &config.provider.base_url,
            &config.provider.api_key,
            limiter,
            retry,
        )?;

        let store = Store::open(&config.storage.path)?;

        Ok(Self::new(
            provider,
            store,
            &config.station.id,
            utc_offset,
            config.station.earliest_observation,
        ))
    }
}

impl<P: WeatherProvider> Engine<P> {
    /// Create an engine from already-constructed resources.
    pub fn new(
        provider: P,
        store: Store,
        station_id: &str,
        utc_offset: UtcOffset,
        earliest_observation: Date,
    ) -> Self {
        Self {
            provider,
            store: Mutex::new(store),
            station_id: station_id.to_string(),
            utc_offset,
            earliest_observation,
        }
    }

    /// Today's date in the station's local calendar.
    #[must_use]
    pub fn today(&self) -> Date {
        OffsetDateTime::now_utc().to_offset(self.utc_offset).date()
    }

    /// Fetch and store today's (partial-day) summary, then return it.
    ///
    /// Prefers the day's hourly observations; when none are available yet
    /// (early in the local day), falls back to the station's single current
    /// reading. The freshly aggregated summary replaces whatever was stored
    /// for today, so repeated calls converge on the full day.
    pub async fn current(&self) -> Result<DailySummary> {
        let today = self.today();
        debug!("Refreshing current conditions for {}", today);

        let observations = self.provider.fetch_hourly(&self.station_id, today).await?;
        let summary = match aggregate(&observations, today, self.utc_offset) {
            Ok(summary) => summary,
            Err(AggregateError::InsufficientData { .. }) => {
                let current = self.provider.fetch_current(&self.station_id).await?;
                aggregate(&[current], today, self.utc_offset).map_err(|_| Error::NotFound)?
            }
        };

        self.store.lock().await.upsert_summary(&summary)?;
        Ok(summary)
    }

    /// The stored summary for a single date.
    pub async fn historical(&self, date: Date) -> Result<DailySummary> {
        self.store
            .lock()
            .await
            .get_summary(&self.station_id, date)?
            .ok_or(Error::NotFound)
    }

    /// Compare a calendar month/day across all stored years.
    ///
    /// `history` holds the most recent `years_back` matching summaries in
    /// ascending year order; asking for more years than exist returns all of
    /// them. `current` is today's stored summary when present. No matching
    /// years is an empty history, not an error.
    pub async fn compare_across_years(
        &self,
        month: u8,
        day: u8,
        years_back: u32,
    ) -> Result<Comparison> {
        let (month, day) = validate_month_day(month, day)?;
        let today = self.today();

        let store = self.store.lock().await;
        let history = store.summaries_for_month_day(&self.station_id, month, day)?;
        let current = store.get_summary(&self.station_id, today)?;
        drop(store);

        Ok(Comparison {
            current,
            history: take_recent(history, years_back),
        })
    }

    /// Backfill the store over an explicit date range.
    pub async fn backfill(&self, from: Date, to: Date) -> Result<BackfillReport> {
        let report = backfill::run(
            &self.provider,
            &self.store,
            &self.station_id,
            self.utc_offset,
            from,
            to,
        )
        .await?;
        Ok(report)
    }

    /// Backfill from the station's earliest observation date through today.
    pub async fn backfill_to_present(&self) -> Result<BackfillReport> {
        let today = self.today();
        info!(
            "Backfilling {} from {} to present",
            self.station_id, self.earliest_observation
        );
        self.backfill(self.earliest_observation, today).await
    }
}

/// Check that a month/day pair names a calendar day in at least one year.
fn validate_month_day(month: u8, day: u8) -> Result<(Month, u8)> {
    let month = Month::try_from(month)
        .map_err(|_| Error::InvalidInput(format!("invalid month: {month}")))?;

    // Year 2000 is a leap year, so Feb 29 passes while Feb 30 does not.
    if Date::from_calendar_date(2000, month, day).is_err() {
        return Err(Error::InvalidInput(format!(
            "invalid day {day} for month {month}"
        )));
    }

    Ok((month, day))
}
