//! Mock provider implementation for testing.
//!
//! [`MockProvider`] implements [`WeatherProvider`] so pipeline code can be
//! exercised without a network. It supports canned observations per date,
//! transient and permanent failure injection, and call counting.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use time::Date;
use tokio::sync::RwLock;

use clime_types::Observation;

use crate::error::{Error, Result};
use crate::traits::WeatherProvider;

/// A canned weather provider for tests.
///
/// # Example
///
/// ```
/// use clime_provider::{MockProvider, WeatherProvider};
/// use time::{Date, Month};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let provider = MockProvider::new();
/// let date = Date::from_calendar_date(2023, Month::September, 15).unwrap();
///
/// let observations = provider.fetch_hourly("S1", date).await.unwrap();
/// assert!(observations.is_empty());
/// assert_eq!(provider.call_count(), 1);
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MockProvider {
    hourly: RwLock<HashMap<Date, Vec<Observation>>>,
    current: RwLock<Option<Observation>>,
    calls: AtomicU32,
    /// Remaining injected transient failures.
    transient_failures: AtomicU32,
    permanent_failure: AtomicBool,
}

impl MockProvider {
    /// Create a provider with no data and no injected failures.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the observations returned for one calendar day.
    pub async fn set_hourly(&self, date: Date, observations: Vec<Observation>) {
        self.hourly.write().await.insert(date, observations);
    }

    /// Set the observation returned by `fetch_current`.
    pub async fn set_current(&self, observation: Observation) {
        *self.current.write().await = Some(observation);
    }

    /// Fail the next `count` calls with a transient error.
    pub fn fail_transient(&self, count: u32) {
        self.transient_failures.store(count, Ordering::SeqCst);
    }

    /// Fail every call with a permanent error until cleared.
    pub fn set_permanent_failure(&self, fail: bool) {
        self.permanent_failure.store(fail, Ordering::SeqCst);
    }

    /// Total calls made against this provider.
    #[must_use]
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn check_failures(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.permanent_failure.load(Ordering::SeqCst) {
            return Err(Error::Status { status: 403 });
        }

        // Decrement one injected transient failure, if any remain.
        let mut remaining = self.transient_failures.load(Ordering::SeqCst);
        while remaining > 0 {
            match self.transient_failures.compare_exchange(
                remaining,
                remaining - 1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return Err(Error::Timeout),
                Err(actual) => remaining = actual,
            }
        }

        Ok(())
    }
}

#[async_trait]
impl WeatherProvider for MockProvider {
    async fn fetch_hourly(&self, _station_id: &str, date: Date) -> Result<Vec<Observation>> {
        self.check_failures()?;
        Ok(self
            .hourly
            .read()
            .await
            .get(&date)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_current(&self, _station_id: &str) -> Result<Observation> {
        self.check_failures()?;
        self.current.read().await.clone().ok_or_else(|| {
            Error::MalformedResponse("mock provider has no current observation".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Month, OffsetDateTime};

    fn obs(epoch: i64) -> Observation {
        Observation {
            station_id: "S1".to_string(),
            timestamp: OffsetDateTime::from_unix_timestamp(epoch).unwrap(),
            temperature: Some(20.0),
            humidity: None,
            precipitation: None,
            wind_speed: None,
            pressure: None,
        }
    }

    #[tokio::test]
    async fn test_canned_observations_are_returned_per_date() {
        let provider = MockProvider::new();
        let date = Date::from_calendar_date(2023, Month::September, 15).unwrap();
        provider.set_hourly(date, vec![obs(1_694_775_600)]).await;

        assert_eq!(provider.fetch_hourly("S1", date).await.unwrap().len(), 1);

        let other = Date::from_calendar_date(2023, Month::September, 16).unwrap();
        assert!(provider.fetch_hourly("S1", other).await.unwrap().is_empty());
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_transient_failures_run_out() {
        let provider = MockProvider::new();
        let date = Date::from_calendar_date(2023, Month::September, 15).unwrap();
        provider.fail_transient(2);

        assert!(matches!(
            provider.fetch_hourly("S1", date).await,
            Err(Error::Timeout)
        ));
        assert!(matches!(
            provider.fetch_hourly("S1", date).await,
            Err(Error::Timeout)
        ));
        assert!(provider.fetch_hourly("S1", date).await.is_ok());
    }

    #[tokio::test]
    async fn test_permanent_failure_persists() {
        let provider = MockProvider::new();
        provider.set_permanent_failure(true);

        let err = provider.fetch_current("S1").await.unwrap_err();
        assert!(matches!(err, Error::Status { status: 403 }));
        assert!(!err.is_transient());

        provider.set_permanent_failure(false);
        provider.set_current(obs(1_694_775_600)).await;
        assert!(provider.fetch_current("S1").await.is_ok());
    }
}
