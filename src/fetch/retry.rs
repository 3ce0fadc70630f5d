//! Retry decisions and exponential backoff for timed-out fetch attempts.
//!
//! Only connect/receive timeouts are retryable; every other transport
//! failure surfaces immediately. `tries_used` counts retries, not total
//! attempts: a fetch with `max_retries = 3` issues at most 4 requests.

use std::time::Duration;

/// Returns whether another retry is permitted.
///
/// True while `tries_used < max_retries`.
#[must_use]
pub fn should_retry(tries_used: u32, max_retries: u32) -> bool {
    tries_used < max_retries
}

/// Computes the backoff delay before retry number `tries_used` (1-indexed).
///
/// Formula: `min(backoff_factor * 2^(tries_used - 1), backoff_max)` — the
/// first retry waits exactly `backoff_factor`, and the delay doubles on each
/// subsequent retry until capped.
#[must_use]
pub fn backoff_delay(tries_used: u32, backoff_factor: Duration, backoff_max: Duration) -> Duration {
    let exponent = tries_used.saturating_sub(1).min(u32::BITS - 1);
    let factor_ms = u64::try_from(backoff_factor.as_millis()).unwrap_or(u64::MAX);
    let delay_ms = factor_ms.saturating_mul(1_u64 << exponent);
    Duration::from_millis(delay_ms).min(backoff_max)
}
