//! Parse errors for dates and offsets.

/// Errors produced when parsing calendar dates or UTC offsets from their
/// textual forms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The string is not a valid `YYYY-MM-DD` calendar date.
    #[error("invalid calendar date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The string is not a valid `±HH:MM` UTC offset.
    #[error("invalid UTC offset '{0}': expected ±HH:MM")]
    InvalidOffset(String),
}
