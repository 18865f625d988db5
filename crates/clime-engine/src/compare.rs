//! Year-over-year comparison.

use serde::{Deserialize, Serialize};

use clime_types::DailySummary;

/// A calendar day compared across years.
///
/// `history` is ordered by year ascending. `current` is today's summary when
/// one is available; an empty history is a valid result, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Today's (possibly partial-day) summary, if one is stored.
    pub current: Option<DailySummary>,
    /// Summaries for the same month/day across stored years, ascending.
    pub history: Vec<DailySummary>,
}

/// Keep only the most recent `years_back` entries of an ascending history.
///
/// When `years_back` exceeds the available years, everything is kept.
pub(crate) fn take_recent(mut history: Vec<DailySummary>, years_back: u32) -> Vec<DailySummary> {
    let years_back = years_back as usize;
    if history.len() > years_back {
        history.split_off(history.len() - years_back)
    } else {
        history
    }
}
