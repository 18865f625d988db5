//! Main store implementation.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension};
use time::{Date, Month, OffsetDateTime};
use tracing::{debug, info};

use clime_types::{DailySummary, format_date, month_day_key, parse_date};

use crate::error::{Error, Result};
use crate::schema;

/// SQLite-based store for daily weather summaries.
///
/// The store exclusively owns the persisted rows. An upsert fully replaces
/// the row for its `(station_id, date)` key in a single statement, so a
/// concurrent reader never observes a partially written summary and a
/// re-aggregated day never merges with stale values.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        // WAL mode for reader/writer isolation
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        schema::initialize(&conn)?;

        Ok(Self { conn })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    /// Insert or fully replace the summary for its `(station_id, date)` key.
    ///
    /// Every column is rewritten on conflict, including `sample_count`, so a
    /// day re-aggregated from a different fetch replaces rather than merges.
    pub fn upsert_summary(&self, summary: &DailySummary) -> Result<()> {
        let now = OffsetDateTime::now_utc().unix_timestamp();

        debug!(
            "Upserting summary for {} on {}",
            summary.station_id,
            format_date(summary.date)
        );

        self.conn.execute(
            "INSERT INTO daily_summaries (
                station_id, date, temp_min, temp_max, temp_avg,
                precip_total, humidity_avg, wind_speed_avg, sample_count, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT(station_id, date) DO UPDATE SET
                temp_min = ?3,
                temp_max = ?4,
                temp_avg = ?5,
                precip_total = ?6,
                humidity_avg = ?7,
                wind_speed_avg = ?8,
                sample_count = ?9,
                updated_at = ?10",
            rusqlite::params![
                summary.station_id,
                format_date(summary.date),
                summary.temp_min,
                summary.temp_max,
                summary.temp_avg,
                summary.precip_total,
                summary.humidity_avg,
                summary.wind_speed_avg,
                summary.sample_count,
                now
            ],
        )?;

        Ok(())
    }

    /// Get the summary for a station and date, if one is stored.
    pub fn get_summary(&self, station_id: &str, date: Date) -> Result<Option<DailySummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT station_id, date, temp_min, temp_max, temp_avg,
                    precip_total, humidity_avg, wind_speed_avg, sample_count
             FROM daily_summaries
             WHERE station_id = ?1 AND date = ?2",
        )?;

        let row = stmt
            .query_row(
                rusqlite::params![station_id, format_date(date)],
                map_summary_row,
            )
            .optional()?;

        row.map(row_to_summary).transpose()
    }

    /// Whether a summary exists for a station and date.
    ///
    /// Used by the backfill driver to skip already-populated days.
    pub fn has_summary(&self, station_id: &str, date: Date) -> Result<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM daily_summaries WHERE station_id = ?1 AND date = ?2",
            rusqlite::params![station_id, format_date(date)],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// All summaries matching a calendar month/day across stored years,
    /// ordered by year ascending.
    pub fn summaries_for_month_day(
        &self,
        station_id: &str,
        month: Month,
        day: u8,
    ) -> Result<Vec<DailySummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT station_id, date, temp_min, temp_max, temp_avg,
                    precip_total, humidity_avg, wind_speed_avg, sample_count
             FROM daily_summaries
             WHERE station_id = ?1 AND substr(date, 6) = ?2
             ORDER BY date ASC",
        )?;

        let rows = stmt.query_map(
            rusqlite::params![station_id, month_day_key(month, day)],
            map_summary_row,
        )?;

        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(row_to_summary(row?)?);
        }
        Ok(summaries)
    }

    /// The most recent summary stored for a station, if any.
    pub fn latest_summary(&self, station_id: &str) -> Result<Option<DailySummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT station_id, date, temp_min, temp_max, temp_avg,
                    precip_total, humidity_avg, wind_speed_avg, sample_count
             FROM daily_summaries
             WHERE station_id = ?1
             ORDER BY date DESC
             LIMIT 1",
        )?;

        let row = stmt
            .query_row(rusqlite::params![station_id], map_summary_row)
            .optional()?;

        row.map(row_to_summary).transpose()
    }

    /// Number of summaries stored for a station.
    pub fn summary_count(&self, station_id: &str) -> Result<u32> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM daily_summaries WHERE station_id = ?1",
            rusqlite::params![station_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete the summary for a station and date. Returns whether a row
    /// was removed.
    pub fn delete_summary(&self, station_id: &str, date: Date) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM daily_summaries WHERE station_id = ?1 AND date = ?2",
            rusqlite::params![station_id, format_date(date)],
        )?;
        Ok(removed > 0)
    }
}

/// Raw row before the date column is parsed.
struct SummaryRow {
    station_id: String,
    date: String,
    temp_min: Option<f64>,
    temp_max: Option<f64>,
    temp_avg: Option<f64>,
    precip_total: Option<f64>,
    humidity_avg: Option<f64>,
    wind_speed_avg: Option<f64>,
    sample_count: u32,
}

fn map_summary_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SummaryRow> {
    Ok(SummaryRow {
        station_id: row.get(0)?,
        date: row.get(1)?,
        temp_min: row.get(2)?,
        temp_max: row.get(3)?,
        temp_avg: row.get(4)?,
        precip_total: row.get(5)?,
        humidity_avg: row.get(6)?,
        wind_speed_avg: row.get(7)?,
        sample_count: row.get(8)?,
    })
}

fn row_to_summary(row: SummaryRow) -> Result<DailySummary> {
    let date = parse_date(&row.date)?;
    Ok(DailySummary {
        station_id: row.station_id,
        date,
        temp_min: row.temp_min,
        temp_max: row.temp_max,
        temp_avg: row.temp_avg,
        precip_total: row.precip_total,
        humidity_avg: row.humidity_avg,
        wind_speed_avg: row.wind_speed_avg,
        sample_count: row.sample_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> Date {
        parse_date(s).unwrap()
    }

    fn summary(station: &str, date_str: &str, temp_avg: f64) -> DailySummary {
        DailySummary {
            station_id: station.to_string(),
            date: date(date_str),
            temp_min: Some(temp_avg - 3.0),
            temp_max: Some(temp_avg + 4.0),
            temp_avg: Some(temp_avg),
            precip_total: Some(0.0),
            humidity_avg: Some(40.0),
            wind_speed_avg: Some(5.5),
            sample_count: 24,
        }
    }

    #[test]
    fn test_upsert_and_get_roundtrip() {
        let store = Store::open_in_memory().unwrap();
        let s = DailySummary {
            station_id: "S1".to_string(),
            date: date("2023-09-15"),
            temp_min: Some(18.0),
            temp_max: Some(25.0),
            temp_avg: Some(21.25),
            precip_total: None,
            humidity_avg: None,
            wind_speed_avg: None,
            sample_count: 4,
        };

        store.upsert_summary(&s).unwrap();
        let got = store.get_summary("S1", date("2023-09-15")).unwrap().unwrap();
        assert_eq!(got, s);
    }

    #[test]
    fn test_get_summary_missing_is_none() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.get_summary("S1", date("2023-09-15")).unwrap().is_none());
        assert!(!store.has_summary("S1", date("2023-09-15")).unwrap());
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let store = Store::open_in_memory().unwrap();
        let s = summary("S1", "2023-09-15", 21.0);

        store.upsert_summary(&s).unwrap();
        store.upsert_summary(&s).unwrap();

        assert_eq!(store.summary_count("S1").unwrap(), 1);
        assert_eq!(store.get_summary("S1", s.date).unwrap().unwrap(), s);
    }

    #[test]
    fn test_upsert_replaces_entirely() {
        let store = Store::open_in_memory().unwrap();
        store.upsert_summary(&summary("S1", "2023-09-15", 21.0)).unwrap();

        // Re-aggregated from a smaller fetch: fewer samples, one field gone.
        let mut replacement = summary("S1", "2023-09-15", 19.0);
        replacement.sample_count = 3;
        replacement.humidity_avg = None;
        store.upsert_summary(&replacement).unwrap();

        let got = store.get_summary("S1", date("2023-09-15")).unwrap().unwrap();
        assert_eq!(got.sample_count, 3);
        assert_eq!(got.temp_avg, Some(19.0));
        assert_eq!(got.humidity_avg, None);
        assert_eq!(store.summary_count("S1").unwrap(), 1);
    }

    #[test]
    fn test_month_day_lookup_is_year_ascending() {
        let store = Store::open_in_memory().unwrap();
        // Inserted out of order on purpose
        store.upsert_summary(&summary("S1", "2023-09-15", 25.0)).unwrap();
        store.upsert_summary(&summary("S1", "2021-09-15", 21.0)).unwrap();
        store.upsert_summary(&summary("S1", "2022-09-15", 23.0)).unwrap();
        // Different day and different station must not match
        store.upsert_summary(&summary("S1", "2022-09-16", 30.0)).unwrap();
        store.upsert_summary(&summary("S2", "2022-09-15", 30.0)).unwrap();

        let years: Vec<i32> = store
            .summaries_for_month_day("S1", Month::September, 15)
            .unwrap()
            .iter()
            .map(|s| s.date.year())
            .collect();
        assert_eq!(years, [2021, 2022, 2023]);
    }

    #[test]
    fn test_month_day_lookup_empty_is_ok() {
        let store = Store::open_in_memory().unwrap();
        let summaries = store
            .summaries_for_month_day("S1", Month::January, 1)
            .unwrap();
        assert!(summaries.is_empty());
    }

    #[test]
    fn test_latest_summary() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.latest_summary("S1").unwrap().is_none());

        store.upsert_summary(&summary("S1", "2023-09-14", 20.0)).unwrap();
        store.upsert_summary(&summary("S1", "2023-09-15", 22.0)).unwrap();
        store.upsert_summary(&summary("S1", "2023-08-30", 28.0)).unwrap();

        let latest = store.latest_summary("S1").unwrap().unwrap();
        assert_eq!(latest.date, date("2023-09-15"));
    }

    #[test]
    fn test_delete_summary() {
        let store = Store::open_in_memory().unwrap();
        let s = summary("S1", "2023-09-15", 21.0);
        store.upsert_summary(&s).unwrap();

        assert!(store.delete_summary("S1", s.date).unwrap());
        assert!(!store.delete_summary("S1", s.date).unwrap());
        assert!(!store.has_summary("S1", s.date).unwrap());
    }

    #[test]
    fn test_open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.db");

        let store = Store::open(&path).unwrap();
        store.upsert_summary(&summary("S1", "2023-09-15", 21.0)).unwrap();
        drop(store);

        // Reopen and verify the row survived
        let store = Store::open(&path).unwrap();
        assert!(store.has_summary("S1", date("2023-09-15")).unwrap());
    }
}
