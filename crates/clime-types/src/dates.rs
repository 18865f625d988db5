//! Calendar-date helpers.
//!
//! Dates travel through the system as `time::Date` values and are rendered
//! as plain `YYYY-MM-DD` strings at the edges (the store's key column, the
//! config file, serialized summaries). Month/day pairs use the `MM-DD` form
//! so the same calendar day can be matched across years.

use time::{Date, Month, OffsetDateTime, UtcOffset};

use crate::error::ParseError;

/// Parse a `YYYY-MM-DD` string into a [`Date`].
pub fn parse_date(s: &str) -> Result<Date, ParseError> {
    let invalid = || ParseError::InvalidDate(s.to_string());

    let mut parts = s.splitn(3, '-');
    let year: i32 = parts
        .next()
        .filter(|p| p.len() == 4)
        .and_then(|p| p.parse().ok())
        .ok_or_else(invalid)?;
    let month: u8 = parts
        .next()
        .filter(|p| p.len() == 2)
        .and_then(|p| p.parse().ok())
        .ok_or_else(invalid)?;
    let day: u8 = parts
        .next()
        .filter(|p| p.len() == 2)
        .and_then(|p| p.parse().ok())
        .ok_or_else(invalid)?;

    let month = Month::try_from(month).map_err(|_| invalid())?;
    Date::from_calendar_date(year, month, day).map_err(|_| invalid())
}

/// Format a [`Date`] as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// The `MM-DD` key shared by the same calendar day across years.
#[must_use]
pub fn month_day_key(month: Month, day: u8) -> String {
    format!("{:02}-{:02}", u8::from(month), day)
}

/// Parse a `±HH:MM` string into a [`UtcOffset`].
pub fn parse_utc_offset(s: &str) -> Result<UtcOffset, ParseError> {
    let invalid = || ParseError::InvalidOffset(s.to_string());

    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1i8, &s[1..]),
        Some(b'-') => (-1i8, &s[1..]),
        _ => return Err(invalid()),
    };

    let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
    let hours: i8 = hours
        .parse::<u8>()
        .ok()
        .filter(|h| *h <= 23)
        .map(|h| h as i8)
        .ok_or_else(invalid)?;
    let minutes: i8 = minutes
        .parse::<u8>()
        .ok()
        .filter(|m| *m <= 59)
        .map(|m| m as i8)
        .ok_or_else(invalid)?;

    UtcOffset::from_hms(sign * hours, sign * minutes, 0).map_err(|_| invalid())
}

/// Project a UTC timestamp onto the calendar date at the given offset.
#[must_use]
pub fn local_date(timestamp: OffsetDateTime, offset: UtcOffset) -> Date {
    timestamp.to_offset(offset).date()
}

/// Inclusive, ascending iterator over a calendar-date range.
///
/// Yields nothing when `from > to`.
#[derive(Debug, Clone)]
pub struct DateRange {
    next: Option<Date>,
    to: Date,
}

impl DateRange {
    /// Iterate every date in `[from, to]`, ascending.
    #[must_use]
    pub fn inclusive(from: Date, to: Date) -> Self {
        Self {
            next: (from <= to).then_some(from),
            to,
        }
    }
}

impl Iterator for DateRange {
    type Item = Date;

    fn next(&mut self) -> Option<Date> {
        let current = self.next?;
        self.next = if current < self.to {
            current.next_day()
        } else {
            None
        };
        Some(current)
    }
}

/// Serde adapter storing a [`Date`] as its `YYYY-MM-DD` string.
#[cfg(feature = "serde")]
pub mod serde_date {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_date(&s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_roundtrip() {
        let date = parse_date("2023-09-15").unwrap();
        assert_eq!(date.year(), 2023);
        assert_eq!(date.month(), Month::September);
        assert_eq!(date.day(), 15);
        assert_eq!(format_date(date), "2023-09-15");
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        for s in ["", "2023", "2023-13-01", "2023-02-30", "15-09-2023", "2023/09/15"] {
            assert!(parse_date(s).is_err(), "accepted {s:?}");
        }
    }

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(
            parse_utc_offset("-07:00").unwrap(),
            UtcOffset::from_hms(-7, 0, 0).unwrap()
        );
        assert_eq!(
            parse_utc_offset("+05:30").unwrap(),
            UtcOffset::from_hms(5, 30, 0).unwrap()
        );
        assert!(parse_utc_offset("07:00").is_err());
        assert!(parse_utc_offset("-25:00").is_err());
        assert!(parse_utc_offset("-07").is_err());
    }

    #[test]
    fn test_date_range_inclusive() {
        let from = parse_date("2023-02-27").unwrap();
        let to = parse_date("2023-03-02").unwrap();

        let dates: Vec<String> = DateRange::inclusive(from, to).map(format_date).collect();
        assert_eq!(
            dates,
            ["2023-02-27", "2023-02-28", "2023-03-01", "2023-03-02"]
        );
    }

    #[test]
    fn test_date_range_single_day_and_empty() {
        let day = parse_date("2023-09-15").unwrap();
        assert_eq!(DateRange::inclusive(day, day).count(), 1);

        let earlier = parse_date("2023-09-14").unwrap();
        assert_eq!(DateRange::inclusive(day, earlier).count(), 0);
    }

    #[test]
    fn test_month_day_key_zero_pads() {
        assert_eq!(month_day_key(Month::March, 5), "03-05");
        assert_eq!(month_day_key(Month::December, 31), "12-31");
    }
}
