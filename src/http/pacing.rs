//! Call pacing
//!
//! Uses the governor crate to enforce a minimum interval between calls.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Paces outbound calls to a configured maximum rate.
///
/// The burst size is pinned to 1, so consecutive admissions are spaced at
/// least `1 / calls_per_second` apart. Clones share the same pacing state,
/// which makes one pacer safe to share across concurrent sessions: admission
/// order across callers is not FIFO, but no caller can shorten the interval.
#[derive(Clone)]
pub struct Pacer {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
    calls_per_second: u32,
}

impl Pacer {
    /// Create a pacer admitting at most `calls_per_second` calls per second.
    ///
    /// A rate of zero is clamped to one call per second.
    pub fn new(calls_per_second: u32) -> Self {
        let rate = NonZeroU32::new(calls_per_second).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_second(rate).allow_burst(NonZeroU32::MIN);

        Self {
            limiter: Arc::new(Governor::direct(quota)),
            calls_per_second: rate.get(),
        }
    }

    /// Suspend until the next call may be issued
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Check whether a call could be admitted right now, without waiting
    pub fn check(&self) -> bool {
        self.limiter.check().is_ok()
    }

    /// The configured maximum call rate
    pub fn calls_per_second(&self) -> u32 {
        self.calls_per_second
    }

    /// The minimum interval enforced between consecutive calls
    pub fn min_interval(&self) -> Duration {
        Duration::from_secs(1) / self.calls_per_second
    }
}

impl std::fmt::Debug for Pacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pacer")
            .field("calls_per_second", &self.calls_per_second)
            .finish()
    }
}
