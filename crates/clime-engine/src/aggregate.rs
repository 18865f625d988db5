//! Daily aggregation of raw observations.
//!
//! [`aggregate`] is a pure function: no I/O, no side effects, and the same
//! inputs always produce a bit-identical summary. Calendar-day boundaries
//! are station-local (the configured UTC offset), so "today" matches what a
//! person at the station would call today.

use time::{Date, UtcOffset};
use tracing::debug;

use clime_types::{DailySummary, Observation};

/// Error produced when a date has nothing to aggregate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    /// No observation in the input falls on the requested local date.
    ///
    /// Recoverable: the backfill driver records the day as a gap and
    /// continues, while a single-date query reports "not found".
    #[error("no observations for {date}")]
    InsufficientData {
        /// The date that had no observations.
        date: Date,
    },
}

/// Reduce one calendar day's raw observations to a [`DailySummary`].
///
/// Input observations are filtered to those whose timestamp falls on
/// `for_date` in the station's local calendar (per `offset`). Temperature
/// gets literal min/max plus an arithmetic mean; humidity and wind speed get
/// arithmetic means; precipitation increments are summed, since a cumulative
/// quantity must never be averaged.
///
/// Measurements the provider omitted are skipped per field: each mean
/// divides by the number of observations that actually carried the field,
/// and a field no observation carried stays `None`.
pub fn aggregate(
    observations: &[Observation],
    for_date: Date,
    offset: UtcOffset,
) -> Result<DailySummary, AggregateError> {
    let included: Vec<&Observation> = observations
        .iter()
        .filter(|obs| obs.local_date(offset) == for_date)
        .collect();

    if included.is_empty() {
        return Err(AggregateError::InsufficientData { date: for_date });
    }

    let mut summary = DailySummary::new(included[0].station_id.clone(), for_date);
    summary.sample_count = included.len() as u32;

    let mut temp_sum = 0.0;
    let mut temp_count = 0u32;
    let mut humidity_sum = 0.0;
    let mut humidity_count = 0u32;
    let mut wind_sum = 0.0;
    let mut wind_count = 0u32;

    for obs in &included {
        if let Some(temp) = obs.temperature {
            summary.temp_min = Some(summary.temp_min.map_or(temp, |min| min.min(temp)));
            summary.temp_max = Some(summary.temp_max.map_or(temp, |max| max.max(temp)));
            temp_sum += temp;
            temp_count += 1;
        }
        if let Some(humidity) = obs.humidity {
            humidity_sum += humidity;
            humidity_count += 1;
        }
        if let Some(wind) = obs.wind_speed {
            wind_sum += wind;
            wind_count += 1;
        }
        if let Some(precip) = obs.precipitation {
            summary.precip_total = Some(summary.precip_total.unwrap_or(0.0) + precip);
        }
    }

    if temp_count > 0 {
        summary.temp_avg = Some(temp_sum / f64::from(temp_count));
    }
    if humidity_count > 0 {
        summary.humidity_avg = Some(humidity_sum / f64::from(humidity_count));
    }
    if wind_count > 0 {
        summary.wind_speed_avg = Some(wind_sum / f64::from(wind_count));
    }

    debug!(
        "Aggregated {} observations into summary for {}",
        summary.sample_count, for_date
    );

    Ok(summary)
}
