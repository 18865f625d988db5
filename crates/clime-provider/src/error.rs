//! Error types for clime-provider.
//!
//! Failures are split into two classes, which drives the retry logic:
//!
//! - **Transient**: timeouts, connection errors, HTTP 429 and 5xx. Retried
//!   under [`crate::RetryPolicy`]; after the attempt budget is spent they
//!   escalate to [`Error::RetriesExhausted`].
//! - **Permanent**: other 4xx statuses and malformed response bodies.
//!   Never retried.

/// Result type for clime-provider operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the remote provider.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The provider returned a non-success HTTP status.
    ///
    /// 5xx statuses are transient; 4xx statuses (other than 429, which maps
    /// to [`Error::RateLimited`]) are permanent.
    #[error("provider returned HTTP {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },

    /// The provider rejected the call with HTTP 429.
    #[error("provider rate-limited the request (HTTP 429)")]
    RateLimited,

    /// The request timed out.
    #[error("request to the provider timed out")]
    Timeout,

    /// The request failed below the HTTP layer (DNS, connect, TLS).
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The response body did not match the expected schema.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// The configured base URL is not usable.
    #[error("invalid provider URL: {0}")]
    InvalidUrl(String),

    /// A transient failure persisted through every retry attempt.
    #[error("{operation} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// Name of the operation that was retried.
        operation: String,
        /// Total attempts made (initial call plus retries).
        attempts: u32,
        /// The last transient error observed.
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Whether this failure may succeed on a later attempt.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Timeout | Error::RateLimited | Error::Network(_) => true,
            Error::Status { status } => *status >= 500,
            Error::MalformedResponse(_)
            | Error::InvalidUrl(_)
            | Error::RetriesExhausted { .. } => false,
        }
    }

    /// Classify a reqwest transport error.
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else {
            Error::Network(err)
        }
    }

    /// Classify a non-success HTTP status.
    pub(crate) fn from_status(status: u16) -> Self {
        if status == 429 {
            Error::RateLimited
        } else {
            Error::Status { status }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(Error::Timeout.is_transient());
        assert!(Error::RateLimited.is_transient());
        assert!(Error::Status { status: 500 }.is_transient());
        assert!(Error::Status { status: 503 }.is_transient());

        assert!(!Error::Status { status: 400 }.is_transient());
        assert!(!Error::Status { status: 404 }.is_transient());
        assert!(!Error::MalformedResponse("bad".to_string()).is_transient());
    }

    #[test]
    fn test_status_429_maps_to_rate_limited() {
        assert!(matches!(Error::from_status(429), Error::RateLimited));
        assert!(matches!(
            Error::from_status(404),
            Error::Status { status: 404 }
        ));
    }
}
