//! Request pacing for the platform API
//!
//! A single token bucket is shared by every worker, so the spacing between
//! API requests holds no matter how many expansions run at once.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::time::Duration;

/// Token bucket allowing one request per configured interval
pub struct RequestPacer {
    limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl RequestPacer {
    /// Creates a pacer releasing one request every `interval`
    ///
    /// A zero interval disables pacing entirely.
    pub fn new(interval: Duration) -> Self {
        // with_period has a burst size of one
        let limiter = Quota::with_period(interval).map(RateLimiter::direct);
        Self { limiter }
    }

    /// Creates a pacer that never waits
    pub fn unpaced() -> Self {
        Self { limiter: None }
    }

    /// Returns true if this pacer ever delays requests
    pub fn is_paced(&self) -> bool {
        self.limiter.is_some()
    }

    /// Waits until the next request is allowed
    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

impl std::fmt::Debug for RequestPacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPacer")
            .field("paced", &self.is_paced())
            .finish()
    }
}
