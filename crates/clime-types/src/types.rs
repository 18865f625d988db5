//! Core observation and summary types.

use time::{Date, OffsetDateTime, UtcOffset};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dates::local_date;

/// One raw, sub-daily reading from a weather station.
///
/// Observations are immutable once fetched and identified by
/// `(station_id, timestamp)`. Measurement fields the provider omitted are
/// `None`: absent, never zero.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Observation {
    /// Station identifier.
    pub station_id: String,
    /// When the reading was taken (UTC).
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub timestamp: OffsetDateTime,
    /// Temperature in degrees.
    pub temperature: Option<f64>,
    /// Relative humidity percentage.
    pub humidity: Option<f64>,
    /// Precipitation increment since the previous observation.
    pub precipitation: Option<f64>,
    /// Wind speed.
    pub wind_speed: Option<f64>,
    /// Barometric pressure in hPa.
    pub pressure: Option<f64>,
}

impl Observation {
    /// Calendar date of this observation in the station's local time.
    ///
    /// Daily boundaries are station-local, not UTC, so that "today" matches
    /// what a person at the station would call today.
    #[must_use]
    pub fn local_date(&self, offset: UtcOffset) -> Date {
        local_date(self.timestamp, offset)
    }
}

/// Aggregated statistics for one station on one calendar date.
///
/// A summary is a pure function of the raw observations for its date:
/// recomputing from the same inputs yields an identical value. There is at
/// most one summary per `(station_id, date)`.
///
/// Aggregate fields are `None` when no included observation carried the
/// underlying measurement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DailySummary {
    /// Station identifier.
    pub station_id: String,
    /// Calendar date (station-local), no time component.
    #[cfg_attr(feature = "serde", serde(with = "crate::dates::serde_date"))]
    pub date: Date,
    /// Lowest temperature of the day.
    pub temp_min: Option<f64>,
    /// Highest temperature of the day.
    pub temp_max: Option<f64>,
    /// Arithmetic mean temperature.
    pub temp_avg: Option<f64>,
    /// Total precipitation (sum of increments, never averaged).
    pub precip_total: Option<f64>,
    /// Arithmetic mean humidity.
    pub humidity_avg: Option<f64>,
    /// Arithmetic mean wind speed.
    pub wind_speed_avg: Option<f64>,
    /// Number of raw observations folded into this summary.
    pub sample_count: u32,
}

impl DailySummary {
    /// Create an empty summary shell for a station and date.
    ///
    /// All aggregates start as `None` and `sample_count` as zero; the
    /// aggregator fills them in.
    #[must_use]
    pub fn new(station_id: impl Into<String>, date: Date) -> Self {
        Self {
            station_id: station_id.into(),
            date,
            temp_min: None,
            temp_max: None,
            temp_avg: None,
            precip_total: None,
            humidity_avg: None,
            wind_speed_avg: None,
            sample_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    fn ts(s: i64) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(s).unwrap()
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        // 2023-09-16 02:00 UTC is still 2023-09-15 at UTC-7.
        let obs = Observation {
            station_id: "S1".to_string(),
            timestamp: ts(1_694_829_600),
            temperature: Some(18.0),
            humidity: None,
            precipitation: None,
            wind_speed: None,
            pressure: None,
        };

        let mst = UtcOffset::from_hms(-7, 0, 0).unwrap();
        assert_eq!(
            obs.local_date(mst),
            Date::from_calendar_date(2023, Month::September, 15).unwrap()
        );
        assert_eq!(
            obs.local_date(UtcOffset::UTC),
            Date::from_calendar_date(2023, Month::September, 16).unwrap()
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_summary_serializes_date_as_plain_string() {
        let date = Date::from_calendar_date(2023, Month::September, 15).unwrap();
        let summary = DailySummary::new("S1", date);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["date"], "2023-09-15");

        let back: DailySummary = serde_json::from_value(json).unwrap();
        assert_eq!(back, summary);
    }
}
