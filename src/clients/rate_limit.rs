//! Token-bucket rate limiter shared by every request to the origin site.
//!
//! Politeness, not mutual exclusion: concurrent callers compete for one
//! token budget so the host is never hit faster than the configured
//! ceiling. The internal mutex is only held to update counters, never
//! across a sleep or any I/O. Dropping the future returned by
//! [`TokenBucket::acquire`] (caller-side timeout or cancellation) aborts
//! the wait immediately.

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant, sleep};

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket with a sustained refill rate and a bounded burst.
#[derive(Debug)]
pub struct TokenBucket {
    /// Tokens added per second.
    rate: f64,
    /// Maximum tokens the bucket holds.
    burst: f64,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// Creates a full bucket so the first `burst` requests pass untouched.
    #[must_use]
    pub fn new(rate: f64, burst: u32) -> Self {
        Self {
            rate,
            burst: f64::from(burst),
            state: Mutex::new(BucketState {
                tokens: f64::from(burst),
                last_refill: Instant::now(),
            }),
        }
    }

    /// Waits until a token is available and consumes it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut state = self.state.lock().await;
                let now = Instant::now();
                let elapsed = now.duration_since(state.last_refill).as_secs_f64();
                state.tokens = (state.tokens + elapsed * self.rate).min(self.burst);
                state.last_refill = now;

                if state.tokens >= 1.0 {
                    state.tokens -= 1.0;
                    return;
                }
                // Lock is released before sleeping.
                Duration::from_secs_f64((1.0 - state.tokens) / self.rate)
            };

            tracing::debug!(wait_ms = wait.as_millis(), "Rate limit: waiting for token");
            sleep(wait).await;
        }
    }
}
