//! Remote file acquisition over HTTP.
//!
//! This module implements one logical download as a loop between issuing a
//! GET, consulting the redirect resolver, and consulting the retry policy:
//!
//! - 302 + `Location` and 200 + `Refresh` responses re-enter the loop at the
//!   new URL without consuming retry budget, bounded by a hop limit.
//! - Connect/receive timeouts retry with exponential backoff, bounded by
//!   `max_retries`.
//! - Every other transport failure or status code fails immediately.
//!
//! # Example
//!
//! ```no_run
//! use filestage::fetch::{FetchOptions, RemoteFetcher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = RemoteFetcher::new(FetchOptions::default());
//! let outcome = fetcher.fetch("https://example.com/photo.jpg").await?;
//! println!("{} ({} bytes)", outcome.mime_type, outcome.body.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod options;
mod redirect;
mod retry;

pub use client::{FetchOutcome, RemoteFetcher};
pub use error::FetchError;
pub use options::{
    DEFAULT_BACKOFF_FACTOR_MS, DEFAULT_BACKOFF_MAX_MS, DEFAULT_CONNECT_TIMEOUT_MS,
    DEFAULT_MAX_REDIRECTS, DEFAULT_MAX_RETRIES, DEFAULT_RECV_TIMEOUT_MS, FetchOptions,
};
pub use redirect::{RedirectDecision, resolve_redirect};
pub use retry::{backoff_delay, should_retry};
