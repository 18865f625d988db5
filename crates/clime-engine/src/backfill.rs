//! Historical backfill driver.
//!
//! Walks a calendar-date range ascending and, for each day not already in
//! the store, drives fetch → aggregate → upsert. Days with no provider data
//! are recorded as gaps and never abort the run; provider or storage
//! failures stop the run immediately, carrying the last successfully
//! completed date so a caller can resume from there.

use time::{Date, UtcOffset};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use clime_provider::WeatherProvider;
use clime_store::Store;
use clime_types::DateRange;

use crate::aggregate::{AggregateError, aggregate};

/// Outcome of a completed backfill run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackfillReport {
    /// Days fetched, aggregated, and stored by this run.
    pub completed: u32,
    /// Days skipped because the store already had a summary.
    pub skipped: u32,
    /// Days the provider had no observations for.
    pub gaps: Vec<Date>,
}

/// The failure that stopped a backfill run.
#[derive(Debug, thiserror::Error)]
pub enum BackfillFailure {
    /// The provider failed permanently (or exhausted its retries).
    #[error(transparent)]
    Provider(#[from] clime_provider::Error),

    /// The store rejected a read or write.
    #[error(transparent)]
    Storage(#[from] clime_store::Error),
}

/// A backfill run that stopped before reaching the end of its range.
///
/// `last_completed` is the most recent date fully processed before the
/// failure; re-invoking over the same range resumes after it, since the
/// already-stored days are skipped.
#[derive(Debug, thiserror::Error)]
#[error("backfill aborted: {source}")]
pub struct BackfillError {
    /// Last date fully processed before the failure, if any.
    pub last_completed: Option<Date>,
    /// What went wrong.
    #[source]
    pub source: BackfillFailure,
}

/// Populate the store for every date in `[from, to]`, ascending.
///
/// Idempotent: days that already have a summary are skipped, so an
/// interrupted run can simply be re-invoked with the same range.
pub async fn run<P: WeatherProvider>(
    provider: &P,
    store: &Mutex<Store>,
    station_id: &str,
    offset: UtcOffset,
    from: Date,
    to: Date,
) -> Result<BackfillReport, BackfillError> {
    let mut report = BackfillReport::default();
    let mut last_completed: Option<Date> = None;

    info!("Backfilling {} from {} to {}", station_id, from, to);

    for date in DateRange::inclusive(from, to) {
        let abort = move |source: BackfillFailure| BackfillError {
            last_completed,
            source,
        };

        let exists = store
            .lock()
            .await
            .has_summary(station_id, date)
            .map_err(|e| abort(e.into()))?;
        if exists {
            debug!("Summary for {} already stored, skipping", date);
            report.skipped += 1;
            last_completed = Some(date);
            continue;
        }

        let observations = provider
            .fetch_hourly(station_id, date)
            .await
            .map_err(|e| abort(e.into()))?;

        match aggregate(&observations, date, offset) {
            Ok(summary) => {
                store
                    .lock()
                    .await
                    .upsert_summary(&summary)
                    .map_err(|e| abort(e.into()))?;
                report.completed += 1;
            }
            Err(AggregateError::InsufficientData { .. }) => {
                // A single missing day must not abort the whole run.
                warn!("No observations for {}, recording gap", date);
                report.gaps.push(date);
            }
        }
        last_completed = Some(date);
    }

    info!(
        "Backfill finished: {} stored, {} skipped, {} gaps",
        report.completed,
        report.skipped,
        report.gaps.len()
    );
    Ok(report)
}
