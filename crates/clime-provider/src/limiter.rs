//! Fixed-window rate limiter for outbound provider calls.
//!
//! The limiter state is shared process-wide: every caller that holds a clone
//! of the same `Arc<RateLimiter>` draws from one call budget, so concurrent
//! callers cannot jointly exceed the configured rate. Calls beyond the
//! window's budget wait for the next window; they are never dropped and
//! never fail because of rate alone.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::debug;

/// Default call budget per window (30 calls per 60 seconds).
pub const DEFAULT_MAX_CALLS: u32 = 30;
/// Default window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct WindowState {
    window_start: Instant,
    calls: u32,
}

/// Fixed-window rate limiter.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use clime_provider::RateLimiter;
///
/// # async fn example() {
/// let limiter = RateLimiter::new(30, Duration::from_secs(60));
/// limiter.acquire().await; // returns immediately while budget remains
/// # }
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    max_calls: u32,
    window: Duration,
    state: Mutex<WindowState>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CALLS, DEFAULT_WINDOW)
    }
}

impl RateLimiter {
    /// Create a limiter admitting `max_calls` per `window`.
    ///
    /// A `max_calls` of zero is treated as one call per window so the
    /// limiter can never deadlock.
    #[must_use]
    pub fn new(max_calls: u32, window: Duration) -> Self {
        Self {
            max_calls: max_calls.max(1),
            window,
            state: Mutex::new(WindowState {
                window_start: Instant::now(),
                calls: 0,
            }),
        }
    }

    /// Wait until the current window admits a call, then record it.
    ///
    /// The check-and-record step is a single critical section; the wait for
    /// the next window happens outside the lock so unrelated tasks are not
    /// blocked while this caller sleeps.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut state = self.state.lock().await;
                let now = Instant::now();
                let elapsed = now.duration_since(state.window_start);

                if elapsed >= self.window {
                    state.window_start = now;
                    state.calls = 0;
                }

                if state.calls < self.max_calls {
                    state.calls += 1;
                    return;
                }

                self.window - now.duration_since(state.window_start)
            };

            debug!("rate limit reached, waiting {:?} for next window", wait);
            sleep(wait).await;
        }
    }

    /// The configured call budget per window.
    #[must_use]
    pub fn max_calls(&self) -> u32 {
        self.max_calls
    }

    /// The configured window length.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }
}
