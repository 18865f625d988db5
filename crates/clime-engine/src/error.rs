//! Error types for clime-engine.
//!
//! The engine surfaces the pipeline's error taxonomy to the request layer:
//! missing data maps to a "not found" response, malformed parameters to
//! "bad request", and provider/storage failures to "server error" with the
//! original error kind preserved for diagnostics.

use crate::backfill::BackfillError;
use crate::config::ConfigError;

/// Result type for clime-engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the engine's request operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No data is stored (or obtainable) for the requested date.
    #[error("no data found for the requested date")]
    NotFound,

    /// A request parameter was malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The remote provider failed permanently (retries already spent).
    #[error("provider error: {0}")]
    Provider(#[from] clime_provider::Error),

    /// The persistence layer failed.
    #[error("storage error: {0}")]
    Storage(#[from] clime_store::Error),

    /// A backfill run aborted partway through.
    #[error(transparent)]
    Backfill(#[from] BackfillError),

    /// The configuration could not be loaded or validated.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
