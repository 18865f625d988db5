//! Error types for clime-store.

use std::path::PathBuf;

/// Result type for clime-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in clime-store.
///
/// A storage failure always surfaces; a write is never dropped silently.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error from SQLite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failed to create the database directory.
    #[error("Failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A persisted date column did not parse back into a calendar date.
    #[error("Corrupt date column: {0}")]
    CorruptDate(#[from] clime_types::ParseError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
