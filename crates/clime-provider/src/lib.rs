//! Rate-limited HTTP client for the remote weather provider.
//!
//! This crate owns everything between the pipeline and the provider's API:
//! the fixed-window [`RateLimiter`], the exponential-backoff [`RetryPolicy`],
//! the reqwest-based [`ProviderClient`], and the [`WeatherProvider`] trait
//! that lets the rest of the system run against a [`MockProvider`] in tests.
//!
//! Retries are fully contained here: callers see a single final outcome per
//! fetch. Transient failures (timeouts, connection errors, HTTP 429/5xx) are
//! retried with exponentially growing delays; permanent failures (other 4xx,
//! malformed bodies) fail immediately.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use clime_provider::{ProviderClient, RateLimiter, RetryPolicy, WeatherProvider};
//!
//! # async fn example() -> Result<(), clime_provider::Error> {
//! let limiter = Arc::new(RateLimiter::default());
//! let client = ProviderClient::new(
//!     "https://api.example.com/v2/pws",
//!     "secret-key",
//!     limiter,
//!     RetryPolicy::default(),
//! )?;
//!
//! let current = client.fetch_current("KAZPHOEN1").await?;
//! println!("now: {:?}", current.temperature);
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod limiter;
mod mock;
mod retry;
mod traits;

pub use client::ProviderClient;
pub use error::{Error, Result};
pub use limiter::RateLimiter;
pub use mock::MockProvider;
pub use retry::{RetryPolicy, with_retry};
pub use traits::WeatherProvider;
