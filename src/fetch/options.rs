//! Fetch configuration with process-wide defaults.
//!
//! A [`FetchOptions`] value is constructed once at the edge of the host
//! application (typically deserialized from its config file) and passed into
//! the fetcher; it is never re-read mid-flight.

use std::time::Duration;

use serde::Deserialize;

/// Default time to establish the TCP/TLS connection (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

/// Default time to receive a response (5 seconds).
pub const DEFAULT_RECV_TIMEOUT_MS: u64 = 5_000;

/// Default attempts allowed after the first timeout.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default base unit for exponential backoff (1 second).
pub const DEFAULT_BACKOFF_FACTOR_MS: u64 = 1_000;

/// Default cap on the computed backoff delay (30 seconds).
pub const DEFAULT_BACKOFF_MAX_MS: u64 = 30_000;

/// Default bound on redirect hops before a fetch is abandoned.
pub const DEFAULT_MAX_REDIRECTS: u32 = 8;

/// Configuration for one logical remote fetch.
///
/// All fields have defaults, so `FetchOptions::default()` and a config file
/// with any subset of keys both produce a usable value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchOptions {
    /// Time to establish the TCP/TLS connection, in milliseconds.
    pub connect_timeout_ms: u64,

    /// Time to receive a response, in milliseconds.
    pub recv_timeout_ms: u64,

    /// Attempts allowed after the first timeout.
    pub max_retries: u32,

    /// Base unit for exponential backoff, in milliseconds.
    pub backoff_factor_ms: u64,

    /// Cap on the computed backoff delay, in milliseconds.
    pub backoff_max_ms: u64,

    /// Redirect hops allowed before the fetch fails.
    pub max_redirects: u32,

    /// Let the transport follow redirects instead of the fetcher.
    ///
    /// Must stay `false` for meta-refresh redirects to be honored; when
    /// `true` the transport resolves `Location` chains on its own.
    pub follow_redirects: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            recv_timeout_ms: DEFAULT_RECV_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_factor_ms: DEFAULT_BACKOFF_FACTOR_MS,
            backoff_max_ms: DEFAULT_BACKOFF_MAX_MS,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            follow_redirects: false,
        }
    }
}

impl FetchOptions {
    /// Connect timeout as a [`Duration`].
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Receive timeout as a [`Duration`].
    #[must_use]
    pub fn recv_timeout(&self) -> Duration {
        Duration::from_millis(self.recv_timeout_ms)
    }

    /// Backoff base unit as a [`Duration`].
    #[must_use]
    pub fn backoff_factor(&self) -> Duration {
        Duration::from_millis(self.backoff_factor_ms)
    }

    /// Backoff cap as a [`Duration`].
    #[must_use]
    pub fn backoff_max(&self) -> Duration {
        Duration::from_millis(self.backoff_max_ms)
    }
}
